use image::{Rgba as Pixel, Rgba32FImage, RgbaImage};

use super::{LineCap, Rect, Stroke, Surface};
use crate::palette::Rgba;

/// Software canvas: a straight-alpha `f32` RGBA buffer sized in device pixels.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: Rgba32FImage,
    logical: (f32, f32),
    pixel_ratio: f32,
}

impl RasterSurface {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        let (w, h) = device_size(width, height, pixel_ratio);
        Self {
            pixels: Rgba32FImage::new(w, h),
            logical: (width.max(0.0), height.max(0.0)),
            pixel_ratio,
        }
    }

    /// Size of the backing buffer in device pixels.
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    pub fn is_empty(&self) -> bool {
        let (w, h) = self.dimensions();
        w == 0 || h == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        self.pixels
            .get_pixel_checked(x, y)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
    }

    pub fn to_rgba8(&self) -> RgbaImage {
        let (w, h) = self.dimensions();
        RgbaImage::from_fn(w, h, |x, y| {
            let p = self.pixels.get_pixel(x, y);
            Pixel(Rgba::new(p[0], p[1], p[2], p[3]).to_rgba8())
        })
    }

    fn blend(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let src_a = color.a * coverage;
        if src_a <= 0.0 {
            return;
        }
        let dst = self.pixels.get_pixel_mut(x, y);
        let dst_a = dst[3];
        let out_a = src_a + dst_a * (1.0 - src_a);
        let mix = |s: f32, d: f32| (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        *dst = Pixel([
            mix(color.r, dst[0]),
            mix(color.g, dst[1]),
            mix(color.b, dst[2]),
            out_a,
        ]);
    }
}

fn device_size(width: f32, height: f32, pixel_ratio: f32) -> (u32, u32) {
    let scale = |v: f32| (v * pixel_ratio).round().max(0.0) as u32;
    (scale(width), scale(height))
}

impl Surface for RasterSurface {
    fn logical_size(&self) -> (f32, f32) {
        self.logical
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        if self.is_empty() {
            return;
        }
        let (w, h) = self.dimensions();
        let ratio = self.pixel_ratio;
        let x0 = (rect.x * ratio).round().clamp(0.0, w as f32) as u32;
        let y0 = (rect.y * ratio).round().clamp(0.0, h as f32) as u32;
        let x1 = ((rect.x + rect.width) * ratio).round().clamp(0.0, w as f32) as u32;
        let y1 = ((rect.y + rect.height) * ratio).round().clamp(0.0, h as f32) as u32;
        for y in y0..y1 {
            for x in x0..x1 {
                self.blend(x, y, color, 1.0);
            }
        }
    }

    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke) {
        if self.is_empty() || stroke.width <= 0.0 || stroke.color.a <= 0.0 {
            return;
        }
        let ratio = self.pixel_ratio;
        let (ax, ay) = (from.0 * ratio, from.1 * ratio);
        let (bx, by) = (to.0 * ratio, to.1 * ratio);
        let half = stroke.width * ratio / 2.0;
        let (dx, dy) = (bx - ax, by - ay);
        let length = (dx * dx + dy * dy).sqrt();
        if length == 0.0 && stroke.cap == LineCap::Butt {
            return;
        }

        let (w, h) = self.dimensions();
        let reach = half + 1.0;
        let min_x = (ax.min(bx) - reach).floor().clamp(0.0, w as f32) as u32;
        let max_x = (ax.max(bx) + reach).ceil().clamp(0.0, w as f32) as u32;
        let min_y = (ay.min(by) - reach).floor().clamp(0.0, h as f32) as u32;
        let max_y = (ay.max(by) + reach).ceil().clamp(0.0, h as f32) as u32;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let (px, py) = (x as f32 + 0.5 - ax, y as f32 + 0.5 - ay);
                let coverage = match stroke.cap {
                    LineCap::Round => {
                        let t = if length == 0.0 {
                            0.0
                        } else {
                            ((px * dx + py * dy) / (length * length)).clamp(0.0, 1.0)
                        };
                        let (ex, ey) = (px - t * dx, py - t * dy);
                        half + 0.5 - (ex * ex + ey * ey).sqrt()
                    }
                    LineCap::Butt => {
                        let along = (px * dx + py * dy) / length;
                        let across = (px * dy - py * dx).abs() / length;
                        let beyond = (-along).max(along - length);
                        (half + 0.5 - across).min(0.5 - beyond)
                    }
                };
                self.blend(x, y, stroke.color, coverage.clamp(0.0, 1.0));
            }
        }
    }

    fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32) {
        *self = Self::new(width, height, pixel_ratio);
    }
}
