//! Frame-driven driver tying session state, surface and scheduler together.
//!
//! Exactly one frame is pending at any time. Idle frames re-request an idle
//! frame; replay frames re-request a replay frame until the shared timeline
//! is exhausted and then hand control back to the idle loop.

use std::path::Path;

use crate::{
    capture::{to_surface_space, Clock},
    config::{AppConfig, CanvasLayout, ReplayConfig},
    export,
    render::{RasterSurface, Renderer, Surface},
    scheduler::{FrameHandle, FrameScheduler, FrameTask},
    session::{Controls, SessionState, StatusLine},
    store::Recording,
    ChoreographyError, Result,
};

pub struct Choreographer<S, F, C> {
    state: SessionState,
    surface: S,
    scheduler: F,
    clock: C,
    renderer: Renderer,
    layout: CanvasLayout,
    replay_config: ReplayConfig,
    pending: Option<FrameHandle>,
}

impl<S, F, C> Choreographer<S, F, C>
where
    S: Surface,
    F: FrameScheduler,
    C: Clock,
{
    /// Sizes `surface` to the configured layout and queues the first idle
    /// frame.
    pub fn new(config: &AppConfig, mut surface: S, scheduler: F, clock: C) -> Result<Self> {
        config.validate()?;
        let layout = config.canvas.layout;
        surface.resize(layout.width, layout.height, layout.pixel_ratio);
        let mut choreographer = Self {
            state: SessionState::new(),
            surface,
            scheduler,
            clock,
            renderer: Renderer::from_config(config)?,
            layout,
            replay_config: config.replay.clone(),
            pending: None,
        };
        choreographer.request(FrameTask::Live);
        Ok(choreographer)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn scheduler(&self) -> &F {
        &self.scheduler
    }

    pub fn layout(&self) -> &CanvasLayout {
        &self.layout
    }

    pub fn status(&self) -> StatusLine {
        self.state.status()
    }

    pub fn controls(&self) -> Controls {
        self.state.controls()
    }

    pub fn select_color(&mut self, css: &str) -> Result<()> {
        self.state.select_color(css)
    }

    pub fn start_recording(&mut self) -> bool {
        self.state.start_recording()
    }

    /// Feeds a viewport pointer position. Only sampled while recording.
    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) -> bool {
        let (x, y) = to_surface_space(&self.layout, client_x, client_y);
        self.state.record_sample(x, y, self.clock.now_ms())
    }

    pub fn stop_recording(&mut self) -> Option<&Recording> {
        let now = self.clock.now_ms();
        self.state.stop_recording(now)
    }

    /// Starts the synchronized replay. The pending idle frame is replaced by
    /// the first replay frame.
    pub fn replay(&mut self) -> bool {
        if !self.state.begin_replay(self.replay_config.min_duration_ms) {
            return false;
        }
        self.request(FrameTask::Replay);
        true
    }

    /// Empties everything and cancels any pending replay frame so nothing is
    /// drawn from the discarded state.
    pub fn clear_all(&mut self) {
        self.state.clear_all();
        self.request(FrameTask::Live);
    }

    /// Moves or resizes the surface. The buffer is reallocated, as a canvas
    /// resize would.
    pub fn resize(&mut self, layout: CanvasLayout) {
        self.layout = layout;
        self.surface
            .resize(layout.width, layout.height, layout.pixel_ratio);
        tracing::debug!(?layout, "surface resized");
    }

    /// Runs the next scheduled frame at timestamp `now_ms`. Returns `false`
    /// when nothing was pending.
    pub fn run_frame(&mut self, now_ms: f64) -> bool {
        let Some(task) = self.scheduler.next_frame() else {
            return false;
        };
        self.pending = None;
        match task {
            FrameTask::Live => self.live_frame(),
            FrameTask::Replay => self.replay_frame(now_ms),
        }
        true
    }

    /// Drives frames `frame_interval_ms` apart, starting at `start_ms`, until
    /// the current replay has finished. Returns the number of replay frames
    /// run.
    ///
    /// A non-positive interval would never move a wall-clock replay forward,
    /// so no frames are run in that case.
    pub fn replay_to_end(&mut self, start_ms: f64, frame_interval_ms: f64) -> usize {
        if !(frame_interval_ms.is_finite() && frame_interval_ms > 0.0) {
            tracing::warn!(
                frame_interval_ms,
                "refusing to drive replay with a stalled frame interval"
            );
            return 0;
        }
        let mut frames = 0;
        let mut now = start_ms;
        while self.state.is_replaying() && self.run_frame(now) {
            frames += 1;
            now += frame_interval_ms;
        }
        frames
    }

    fn request(&mut self, task: FrameTask) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.pending = Some(self.scheduler.schedule_frame(task));
    }

    fn live_frame(&mut self) {
        let color = self.state.selected_color().rgba;
        let in_progress = self
            .state
            .is_recording()
            .then(|| (self.state.current_points(), color));
        self.renderer
            .draw_live_frame(&mut self.surface, in_progress, self.state.store());
        self.request(FrameTask::Live);
    }

    fn replay_frame(&mut self, now_ms: f64) {
        let Some((timeline, elapsed)) = self
            .state
            .advance_replay(now_ms, &self.replay_config.stepping)
        else {
            self.request(FrameTask::Live);
            return;
        };

        let frame =
            self.renderer
                .draw_replay_frame(&mut self.surface, self.state.store(), &timeline, elapsed);
        self.state.set_replay_progress(frame.progress);
        tracing::trace!(elapsed, progress = frame.progress, "replay frame");

        if frame.is_complete() {
            self.state.finish_replay();
            self.request(FrameTask::Live);
        } else {
            self.request(FrameTask::Replay);
        }
    }
}

impl<F, C> Choreographer<RasterSurface, F, C> {
    pub fn encode_image(&self) -> Result<Vec<u8>> {
        if self.state.store().is_empty() {
            return Err(ChoreographyError::NothingRecorded);
        }
        export::encode_png(&self.surface)
    }

    /// Saves the current surface content as a PNG.
    pub fn save_image(&self, path: impl AsRef<Path>) -> Result<()> {
        if self.state.store().is_empty() {
            return Err(ChoreographyError::NothingRecorded);
        }
        export::save_png(&self.surface, path)
    }
}
