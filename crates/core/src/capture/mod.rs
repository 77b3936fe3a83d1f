use std::cell::Cell;

use crate::config::CanvasLayout;

/// A single cursor sample in surface-local logical coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl Point {
    pub fn new(x: f32, y: f32, timestamp: u64) -> Self {
        Self { x, y, timestamp }
    }
}

/// Source of capture timestamps.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Wall clock backed by `chrono`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Clock that only moves when told to. Used by tests and the synthetic demo.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Cell<u64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, now_ms: u64) {
        self.now.set(now_ms);
    }

    pub fn advance(&self, delta_ms: u64) {
        self.now.set(self.now.get().saturating_add(delta_ms));
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Translates viewport pointer coordinates into surface-local coordinates.
pub fn to_surface_space(layout: &CanvasLayout, client_x: f32, client_y: f32) -> (f32, f32) {
    (client_x - layout.left, client_y - layout.top)
}

/// The in-progress point sequence and whether capture is active.
#[derive(Debug, Default, Clone)]
pub struct Capture {
    points: Vec<Point>,
    active: bool,
}

impl Capture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn begin(&mut self) {
        self.points.clear();
        self.active = true;
    }

    /// Appends a sample. Returns `false` when capture is not active.
    ///
    /// A timestamp older than the previous sample is clamped so the sequence
    /// stays chronologically non-decreasing.
    pub fn sample(&mut self, x: f32, y: f32, now_ms: u64) -> bool {
        if !self.active {
            return false;
        }
        let timestamp = self
            .points
            .last()
            .map_or(now_ms, |last| now_ms.max(last.timestamp));
        self.points.push(Point::new(x, y, timestamp));
        true
    }

    /// Stops capture and hands back whatever was collected.
    pub fn end(&mut self) -> Vec<Point> {
        self.active = false;
        std::mem::take(&mut self.points)
    }

    pub fn reset(&mut self) {
        self.active = false;
        self.points.clear();
    }
}
