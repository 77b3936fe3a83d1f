//! Explicit session state and the pure operations that update it.

mod status;

pub use status::{Controls, StatusLine};

use crate::{
    capture::{Capture, Point},
    config::ReplayStepping,
    palette::TrailColor,
    store::{Recording, RecordingStore},
    timeline::{PlaybackClock, SharedTimeline},
    Result,
};

/// Replay in flight.
#[derive(Debug, Clone)]
pub struct ReplayState {
    pub timeline: SharedTimeline,
    pub clock: PlaybackClock,
    /// Timestamp of the previous replay frame callback.
    pub last_frame_at: Option<f64>,
    pub progress: f64,
}

impl ReplayState {
    fn new(timeline: SharedTimeline) -> Self {
        Self {
            timeline,
            clock: PlaybackClock::default(),
            last_frame_at: None,
            progress: 0.0,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct SessionState {
    capture: Capture,
    store: RecordingStore,
    selected_color: TrailColor,
    replay: Option<ReplayState>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_recording(&self) -> bool {
        self.capture.is_active()
    }

    pub fn is_replaying(&self) -> bool {
        self.replay.is_some()
    }

    pub fn current_points(&self) -> &[Point] {
        self.capture.points()
    }

    pub fn store(&self) -> &RecordingStore {
        &self.store
    }

    pub fn selected_color(&self) -> &TrailColor {
        &self.selected_color
    }

    pub fn replay(&self) -> Option<&ReplayState> {
        self.replay.as_ref()
    }

    /// Fraction of the shared timeline elapsed; 0 when not replaying.
    pub fn replay_progress(&self) -> f64 {
        self.replay.as_ref().map_or(0.0, |replay| replay.progress)
    }

    pub fn select_color(&mut self, css: &str) -> Result<()> {
        self.selected_color = TrailColor::parse(css)?;
        Ok(())
    }

    /// Clears the in-progress sequence and starts capturing. Ignored while a
    /// replay is running.
    pub fn start_recording(&mut self) -> bool {
        if self.is_replaying() {
            tracing::debug!("ignoring record request during replay");
            return false;
        }
        self.capture.begin();
        tracing::info!(color = %self.selected_color, "recording started");
        true
    }

    pub fn record_sample(&mut self, x: f32, y: f32, now_ms: u64) -> bool {
        self.capture.sample(x, y, now_ms)
    }

    /// Ends capture. A non-empty sequence becomes a new recording with the
    /// selected color.
    pub fn stop_recording(&mut self, now_ms: u64) -> Option<&Recording> {
        let points = self.capture.end();
        if points.is_empty() {
            tracing::debug!("recording stopped with no samples");
            return None;
        }
        let recording = self
            .store
            .commit(points, self.selected_color.clone(), now_ms)?;
        tracing::info!(
            name = recording.name(),
            points = recording.points().len(),
            "recording saved"
        );
        Some(recording)
    }

    pub fn clear_all(&mut self) {
        self.store.clear();
        self.capture.reset();
        self.replay = None;
        tracing::info!("cleared all recordings");
    }

    /// Lays the store out on a shared timeline and enters replay. Ignored when
    /// already replaying, while recording, or with nothing to replay.
    pub fn begin_replay(&mut self, min_duration_ms: f64) -> bool {
        if self.is_replaying() || self.is_recording() {
            tracing::debug!(
                replaying = self.is_replaying(),
                recording = self.is_recording(),
                "ignoring replay request"
            );
            return false;
        }
        let Some(timeline) = SharedTimeline::compute(&self.store, min_duration_ms) else {
            tracing::debug!("nothing to replay");
            return false;
        };
        tracing::info!(
            recordings = self.store.len(),
            duration_ms = timeline.duration_ms,
            "replay started"
        );
        self.replay = Some(ReplayState::new(timeline));
        true
    }

    /// Advances the replay clock for a frame at `now_ms` and returns the
    /// timeline and the elapsed time to draw. The first frame draws at 0.
    pub fn advance_replay(
        &mut self,
        now_ms: f64,
        stepping: &ReplayStepping,
    ) -> Option<(SharedTimeline, f64)> {
        let replay = self.replay.as_mut()?;
        if let Some(previous) = replay.last_frame_at {
            replay.clock.advance(stepping.delta(previous, now_ms));
        }
        replay.last_frame_at = Some(now_ms);
        Some((replay.timeline, replay.clock.elapsed_ms))
    }

    pub fn set_replay_progress(&mut self, progress: f64) {
        if let Some(replay) = self.replay.as_mut() {
            replay.progress = progress;
        }
    }

    pub fn finish_replay(&mut self) {
        if self.replay.take().is_some() {
            tracing::info!("replay finished");
        }
    }

    pub fn status(&self) -> StatusLine {
        StatusLine::of(self)
    }

    pub fn controls(&self) -> Controls {
        Controls::of(self)
    }
}
