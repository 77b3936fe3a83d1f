use std::f32::consts::TAU;

use cursor_choreography_core::{Clock, ManualClock, Result, COLORS};

use crate::{Session, FRAME_INTERVAL_MS};

const SAMPLES_PER_DANCE: usize = 150;
/// Gap between the start of consecutive dances; shorter than a dance so they overlap.
const STAGGER_MS: u64 = 900;

/// Records `dances` rose curves of increasing petal count, each in the next
/// palette color, with overlapping capture times.
pub fn perform(session: &mut Session<'_>, clock: &ManualClock, dances: usize) -> Result<()> {
    let layout = *session.layout();
    let (cx, cy) = (layout.width / 2.0, layout.height / 2.0);
    let radius = layout.width.min(layout.height) * 0.4;
    let base = clock.now_ms();

    for dance in 0..dances {
        session.select_color(COLORS[dance % COLORS.len()])?;
        clock.set(base + dance as u64 * STAGGER_MS);
        session.start_recording();

        let petals = (dance + 2) as f32;
        let phase = dance as f32 * 0.7;
        for i in 0..SAMPLES_PER_DANCE {
            let theta = i as f32 / SAMPLES_PER_DANCE as f32 * TAU + phase;
            let r = radius * (petals * theta).cos();
            let x = layout.left + cx + r * theta.cos();
            let y = layout.top + cy + r * theta.sin();
            session.pointer_move(x, y);
            session.run_frame(clock.now_ms() as f64);
            clock.advance(FRAME_INTERVAL_MS as u64);
        }

        if let Some(recording) = session.stop_recording() {
            tracing::debug!(name = recording.name(), "demo dance recorded");
        }
    }
    Ok(())
}
