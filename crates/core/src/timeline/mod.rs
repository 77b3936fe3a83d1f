//! Shared replay clock.
//!
//! Every recording keeps its own capture timestamps. For replay they are laid
//! out on a single timeline that runs from the earliest to the latest sample
//! across the whole store, so dances recorded at different moments play back
//! with their original relative timing.

use crate::store::Recording;

/// Shortest replay, in milliseconds, regardless of how brief the recordings are.
pub const MIN_DURATION_MS: f64 = 3000.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SharedTimeline {
    /// Earliest timestamp across all recordings.
    pub start_time: u64,
    /// Latest timestamp across all recordings.
    pub end_time: u64,
    pub duration_ms: f64,
}

impl SharedTimeline {
    /// Lays every recording onto one clock. `None` when there is nothing to
    /// replay.
    pub fn compute<'a, I>(recordings: I, min_duration_ms: f64) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Recording>,
    {
        let (start_time, end_time) = recordings
            .into_iter()
            .flat_map(|recording| recording.points())
            .map(|point| point.timestamp)
            .fold(None, |bounds, t| match bounds {
                None => Some((t, t)),
                Some((lo, hi)) => Some((u64::min(lo, t), u64::max(hi, t))),
            })?;

        let span = (end_time - start_time) as f64;
        Some(Self {
            start_time,
            end_time,
            duration_ms: span.max(min_duration_ms),
        })
    }

    /// Fraction of the shared timeline elapsed, capped at 1.
    pub fn progress(&self, elapsed_ms: f64) -> f64 {
        (elapsed_ms / self.duration_ms).min(1.0)
    }

    /// How far `recording` has played at `elapsed_ms`, in `0.0..=1.0`.
    pub fn recording_progress(&self, recording: &Recording, elapsed_ms: f64) -> f64 {
        let offset = recording.first_timestamp() as f64 - self.start_time as f64;
        let span = (recording.last_timestamp() - recording.first_timestamp()) as f64;
        if span == 0.0 {
            return if elapsed_ms > offset { 1.0 } else { 0.0 };
        }
        ((elapsed_ms - offset) / span).clamp(0.0, 1.0)
    }

    /// Number of leading points of `recording` on screen at `elapsed_ms`.
    pub fn visible_points(&self, recording: &Recording, elapsed_ms: f64) -> usize {
        let progress = self.recording_progress(recording, elapsed_ms);
        if progress <= 0.0 {
            return 0;
        }
        (recording.points().len() as f64 * progress).floor() as usize
    }
}

/// Logical replay time in milliseconds.
#[derive(Debug, Default, Clone)]
pub struct PlaybackClock {
    pub elapsed_ms: f64,
}

impl PlaybackClock {
    pub fn reset(&mut self) {
        self.elapsed_ms = 0.0;
    }

    pub fn advance(&mut self, delta_ms: f64) {
        self.elapsed_ms = (self.elapsed_ms + delta_ms).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{capture::Point, palette::TrailColor};

    fn recording(id: u64, timestamps: &[u64]) -> Recording {
        let points = timestamps
            .iter()
            .map(|&t| Point::new(t as f32, 0.0, t))
            .collect();
        Recording::new(id, points, TrailColor::default(), "Dance").unwrap()
    }

    #[test]
    fn no_recordings_no_timeline() {
        let none: [Recording; 0] = [];
        assert!(SharedTimeline::compute(&none, MIN_DURATION_MS).is_none());
    }

    #[test]
    fn short_spans_use_minimum_duration() {
        let r = recording(1, &[1_000, 1_100, 1_200]);
        let timeline = SharedTimeline::compute([&r], MIN_DURATION_MS).unwrap();
        assert_eq!(timeline.start_time, 1_000);
        assert_eq!(timeline.end_time, 1_200);
        assert_eq!(timeline.duration_ms, 3000.0);
    }

    #[test]
    fn long_spans_cover_every_recording() {
        let a = recording(1, &[0, 2_000]);
        let b = recording(2, &[1_500, 6_500]);
        let timeline = SharedTimeline::compute([&a, &b], MIN_DURATION_MS).unwrap();
        assert_eq!(timeline.duration_ms, 6_500.0);
        assert!(timeline.duration_ms >= (timeline.end_time - timeline.start_time) as f64);
    }

    #[test]
    fn nothing_visible_at_start() {
        let a = recording(1, &[0, 100, 200]);
        let b = recording(2, &[50, 80]);
        let timeline = SharedTimeline::compute([&a, &b], MIN_DURATION_MS).unwrap();
        assert_eq!(timeline.visible_points(&a, 0.0), 0);
        assert_eq!(timeline.visible_points(&b, 0.0), 0);
    }

    #[test]
    fn everything_visible_at_end() {
        let a = recording(1, &[0, 100, 200, 4_000]);
        let b = recording(2, &[3_000, 3_500]);
        let timeline = SharedTimeline::compute([&a, &b], MIN_DURATION_MS).unwrap();
        let end = timeline.duration_ms;
        assert_eq!(timeline.visible_points(&a, end), 4);
        assert_eq!(timeline.visible_points(&b, end), 2);
        assert_eq!(timeline.progress(end), 1.0);
    }

    #[test]
    fn progress_is_capped() {
        let a = recording(1, &[0, 10]);
        let timeline = SharedTimeline::compute([&a], MIN_DURATION_MS).unwrap();
        assert_eq!(timeline.progress(1_500.0), 0.5);
        assert_eq!(timeline.progress(10_000.0), 1.0);
    }

    #[test]
    fn overlapping_recordings_are_timed_independently() {
        let a = recording(1, &[0, 1_000, 2_000, 3_000, 4_000]);
        let b = recording(2, &[2_000, 2_100]);
        let both = SharedTimeline::compute([&a, &b], MIN_DURATION_MS).unwrap();

        // b starts 2000ms into the shared clock and spans 100ms.
        assert_eq!(both.recording_progress(&b, 1_999.0), 0.0);
        assert_eq!(both.recording_progress(&b, 2_050.0), 0.5);
        assert_eq!(both.visible_points(&b, 2_100.0), 2);
        // a is unaffected by b's presence.
        let alone = SharedTimeline::compute([&a], MIN_DURATION_MS).unwrap();
        for elapsed in [0.0, 500.0, 2_000.0, 3_999.0] {
            assert_eq!(both.visible_points(&a, elapsed), alone.visible_points(&a, elapsed));
        }
        assert_eq!(both.visible_points(&a, 2_000.0), 2);
    }

    #[test]
    fn zero_span_recording_appears_after_its_offset() {
        let a = recording(1, &[0, 500]);
        let b = recording(2, &[200, 200]);
        let timeline = SharedTimeline::compute([&a, &b], MIN_DURATION_MS).unwrap();
        assert_eq!(timeline.visible_points(&b, 200.0), 0);
        assert_eq!(timeline.visible_points(&b, 216.0), 2);
    }

    #[test]
    fn clock_never_goes_negative() {
        let mut clock = PlaybackClock::default();
        clock.advance(16.0);
        clock.advance(-40.0);
        assert_eq!(clock.elapsed_ms, 0.0);
        clock.advance(32.0);
        clock.reset();
        assert_eq!(clock.elapsed_ms, 0.0);
    }
}
