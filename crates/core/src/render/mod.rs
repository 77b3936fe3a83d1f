//! Drawing of trails onto a [`Surface`].
//!
//! Everything is built from one primitive, [`Renderer::draw_glowing_line`],
//! which strokes a single straight segment three times: a wide translucent
//! glow, the solid trail color, and a thin white core.

mod raster;

pub use raster::RasterSurface;

use crate::{
    capture::Point,
    config::{AppConfig, GlowConfig},
    palette::Rgba,
    store::RecordingStore,
    timeline::SharedTimeline,
    Result,
};

/// Opacity of stored recordings in the idle gallery.
pub const GALLERY_ALPHA: f32 = 0.3;
/// Opacity multiplier of the trail being recorded.
pub const LIVE_TRAIL_ALPHA: f32 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: Rgba,
    pub width: f32,
    pub cap: LineCap,
}

/// 2D raster target. Coordinates are logical pixels; implementations apply
/// their own device pixel ratio.
pub trait Surface {
    fn logical_size(&self) -> (f32, f32);
    fn fill_rect(&mut self, rect: Rect, color: Rgba);
    fn stroke_line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &Stroke);
    fn resize(&mut self, width: f32, height: f32, pixel_ratio: f32);
}

/// Opacity of segment `index` (1-based) of a recording with `point_count`
/// points during replay. Earlier segments are brighter.
pub fn replay_segment_alpha(index: usize, point_count: usize) -> f32 {
    let position = index as f32 / point_count as f32;
    ((1.0 - position) * 2.0 + 0.3).clamp(0.0, 1.0)
}

/// Opacity of segment `index` of the trail being recorded.
pub fn live_segment_alpha(index: usize, total: usize) -> f32 {
    (index as f32 / total as f32 * 2.0).min(1.0) * LIVE_TRAIL_ALPHA
}

/// What a replay frame put on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayFrame {
    pub progress: f64,
    /// Visible point count per recording, in store order.
    pub visible: Vec<usize>,
}

impl ReplayFrame {
    pub fn is_complete(&self) -> bool {
        self.progress >= 1.0
    }
}

#[derive(Debug, Clone)]
pub struct Renderer {
    background: Rgba,
    glow: GlowConfig,
    fade_alpha: f32,
    idle_clear_alpha: f32,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            background: Rgba::from_rgba8([15, 23, 42, 255]),
            glow: GlowConfig::default(),
            fade_alpha: 0.1,
            idle_clear_alpha: 1.0,
        }
    }
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Ok(Self {
            background: Rgba::parse(&config.canvas.background)?,
            glow: config.glow.clone(),
            fade_alpha: config.replay.fade_alpha,
            idle_clear_alpha: config.replay.idle_clear_alpha,
        })
    }

    /// Paints the background over the whole surface at `alpha`.
    pub fn wash<S: Surface + ?Sized>(&self, surface: &mut S, alpha: f32) {
        let (width, height) = surface.logical_size();
        surface.fill_rect(
            Rect::new(0.0, 0.0, width, height),
            self.background.with_alpha(alpha),
        );
    }

    pub fn draw_glowing_line<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        from: &Point,
        to: &Point,
        color: Rgba,
        alpha: f32,
    ) {
        let (a, b) = ((from.x, from.y), (to.x, to.y));
        let layers = [
            (color.with_alpha_byte(self.glow.outer_alpha_byte), self.glow.outer_width),
            (color, self.glow.inner_width),
            (Rgba::WHITE, self.glow.core_width),
        ];
        for (layer_color, width) in layers {
            surface.stroke_line(
                a,
                b,
                &Stroke {
                    color: layer_color.fade(alpha),
                    width,
                    cap: LineCap::Round,
                },
            );
        }
    }

    /// Idle frame: clear, the trail being recorded (if any), then every stored
    /// recording at gallery opacity.
    pub fn draw_live_frame<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        in_progress: Option<(&[Point], Rgba)>,
        store: &RecordingStore,
    ) {
        self.wash(surface, self.idle_clear_alpha);

        if let Some((points, color)) = in_progress {
            let total = points.len();
            for (i, pair) in points.windows(2).enumerate() {
                let alpha = live_segment_alpha(i + 1, total);
                self.draw_glowing_line(surface, &pair[0], &pair[1], color, alpha);
            }
        }

        for recording in store {
            let color = recording.color().rgba;
            for pair in recording.points().windows(2) {
                self.draw_glowing_line(surface, &pair[0], &pair[1], color, GALLERY_ALPHA);
            }
        }
    }

    /// One replay step at `elapsed_ms` on the shared timeline. The previous
    /// frame is only faded, not cleared, so trails persist for a while.
    pub fn draw_replay_frame<S: Surface + ?Sized>(
        &self,
        surface: &mut S,
        store: &RecordingStore,
        timeline: &SharedTimeline,
        elapsed_ms: f64,
    ) -> ReplayFrame {
        self.wash(surface, self.fade_alpha);

        let visible = store
            .iter()
            .map(|recording| {
                let points = recording.points();
                let count = timeline.visible_points(recording, elapsed_ms);
                if points.len() < 2 {
                    return count;
                }
                let color = recording.color().rgba;
                for i in 1..count {
                    let alpha = replay_segment_alpha(i, points.len());
                    self.draw_glowing_line(surface, &points[i - 1], &points[i], color, alpha);
                }
                count
            })
            .collect();

        ReplayFrame {
            progress: timeline.progress(elapsed_ms),
            visible,
        }
    }
}


#[cfg(test)]
mod tests {
    use super::testing::TraceSurface;
    use super::*;
    use crate::palette::TrailColor;

    fn store_with(points: &[(f32, f32, u64)]) -> RecordingStore {
        let mut store = RecordingStore::new();
        let points = points.iter().map(|&(x, y, t)| Point::new(x, y, t)).collect();
        store.commit(points, TrailColor::default(), 1);
        store
    }

    #[test]
    fn glow_uses_three_layers() {
        let renderer = Renderer::new();
        let mut surface = TraceSurface::new(100.0, 100.0);
        let color = Rgba::parse("#ff6b6b").unwrap();
        renderer.draw_glowing_line(
            &mut surface,
            &Point::new(0.0, 0.0, 0),
            &Point::new(10.0, 10.0, 1),
            color,
            0.5,
        );

        let widths: Vec<f32> = surface.strokes.iter().map(|(_, _, s)| s.width).collect();
        assert_eq!(widths, vec![8.0, 3.0, 1.0]);
        let (_, _, outer) = surface.strokes[0];
        assert!((outer.color.a - 64.0 / 255.0 * 0.5).abs() < 1e-6);
        let (_, _, core) = surface.strokes[2];
        assert_eq!(core.color, Rgba::WHITE.with_alpha(0.5));
        assert!(surface.strokes.iter().all(|(_, _, s)| s.cap == LineCap::Round));
    }

    #[test]
    fn replay_alpha_fades_toward_the_tail() {
        assert_eq!(replay_segment_alpha(1, 10), 1.0);
        assert!((replay_segment_alpha(9, 10) - 0.5).abs() < 1e-6);
        assert!(replay_segment_alpha(8, 10) > replay_segment_alpha(9, 10));
    }

    #[test]
    fn live_alpha_grows_toward_the_newest_point() {
        assert!((live_segment_alpha(1, 10) - 0.14).abs() < 1e-6);
        assert!((live_segment_alpha(5, 10) - 0.7).abs() < 1e-6);
        assert!((live_segment_alpha(9, 10) - 0.7).abs() < 1e-6);
    }

    #[test]
    fn live_frame_clears_then_draws_trail_and_gallery() {
        let renderer = Renderer::new();
        let store = store_with(&[(0.0, 0.0, 0), (1.0, 1.0, 10), (2.0, 2.0, 20)]);
        let trail = [Point::new(5.0, 5.0, 0), Point::new(6.0, 6.0, 5)];
        let mut surface = TraceSurface::new(40.0, 30.0);

        renderer.draw_live_frame(&mut surface, Some((&trail, Rgba::WHITE)), &store);

        assert_eq!(surface.fills.len(), 1);
        assert_eq!(surface.fills[0].0, Rect::new(0.0, 0.0, 40.0, 30.0));
        assert_eq!(surface.fills[0].1.a, 1.0);
        assert_eq!(surface.segments(), 1 + 2);
        // Gallery core stroke at 0.3.
        let (_, _, last) = surface.strokes.last().unwrap();
        assert!((last.color.a - GALLERY_ALPHA).abs() < 1e-6);
    }

    #[test]
    fn replay_frame_fades_instead_of_clearing() {
        let renderer = Renderer::new();
        let store = store_with(&[(0.0, 0.0, 100), (10.0, 10.0, 200), (20.0, 5.0, 300)]);
        let timeline = SharedTimeline::compute(&store, 3000.0).unwrap();
        let mut surface = TraceSurface::new(40.0, 30.0);

        let frame = renderer.draw_replay_frame(&mut surface, &store, &timeline, 0.0);
        assert_eq!(frame.visible, vec![0]);
        assert_eq!(surface.segments(), 0);
        assert!((surface.fills[0].1.a - 0.1).abs() < 1e-6);

        surface.clear_log();
        let frame = renderer.draw_replay_frame(&mut surface, &store, &timeline, 1500.0);
        assert_eq!(frame.progress, 0.5);
        assert_eq!(frame.visible, vec![3]);
        assert_eq!(surface.segments(), 2);
        assert!(!frame.is_complete());
    }
}
