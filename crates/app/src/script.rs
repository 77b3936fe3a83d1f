use std::path::{Path, PathBuf};

use cursor_choreography_core::{CanvasLayout, Clock, ManualClock, Result};
use serde::Deserialize;

use crate::{Session, FRAME_INTERVAL_MS};

/// One step of a scripted session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Color { color: String },
    Record,
    /// Pointer position in viewport coordinates.
    Move { x: f32, y: f32 },
    /// Let time pass, rendering idle frames meanwhile.
    Wait { ms: u64 },
    Stop,
    Replay,
    Clear,
    Resize {
        width: f32,
        height: f32,
        #[serde(default)]
        pixel_ratio: Option<f32>,
    },
    Save { path: PathBuf },
}

pub fn load(path: &Path) -> Result<Vec<Action>> {
    let text = std::fs::read_to_string(path)?;
    parse(&text)
}

pub fn parse(text: &str) -> Result<Vec<Action>> {
    Ok(serde_json::from_str(text)?)
}

/// Plays `actions` against `session`. Returns whether the script saved an
/// image itself.
pub fn run(session: &mut Session<'_>, clock: &ManualClock, actions: &[Action]) -> Result<bool> {
    let mut saved = false;
    for action in actions {
        tracing::debug!(?action, "script step");
        match action {
            Action::Color { color } => session.select_color(color)?,
            Action::Record => {
                session.start_recording();
            }
            Action::Move { x, y } => {
                session.pointer_move(*x, *y);
            }
            Action::Wait { ms } => {
                let mut remaining = *ms;
                while remaining > 0 {
                    let step = remaining.min(FRAME_INTERVAL_MS as u64);
                    clock.advance(step);
                    remaining -= step;
                    session.run_frame(clock.now_ms() as f64);
                }
                continue;
            }
            Action::Stop => {
                session.stop_recording();
            }
            Action::Replay => {
                // The replay takes real session time, so the clock moves with
                // every frame.
                if session.replay() {
                    while session.state().is_replaying()
                        && session.run_frame(clock.now_ms() as f64)
                    {
                        clock.advance(FRAME_INTERVAL_MS as u64);
                    }
                }
            }
            Action::Clear => session.clear_all(),
            Action::Resize {
                width,
                height,
                pixel_ratio,
            } => {
                let layout = *session.layout();
                session.resize(CanvasLayout {
                    width: *width,
                    height: *height,
                    pixel_ratio: pixel_ratio.unwrap_or(layout.pixel_ratio),
                    ..layout
                });
            }
            Action::Save { path } => {
                session.save_image(path)?;
                saved = true;
            }
        }
        session.run_frame(clock.now_ms() as f64);
    }
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use cursor_choreography_core::{
        AppConfig, Choreographer, ManualScheduler, RasterSurface, StatusLine,
    };

    use super::*;

    fn session(clock: &ManualClock) -> Session<'_> {
        let mut config = AppConfig::default();
        config.canvas.layout.width = 64.0;
        config.canvas.layout.height = 48.0;
        Choreographer::new(
            &config,
            RasterSurface::new(0.0, 0.0, 1.0),
            ManualScheduler::new(),
            clock,
        )
        .unwrap()
    }

    #[test]
    fn parses_tagged_actions() {
        let actions = parse(
            r##"[
                { "action": "color", "color": "#4ecdc4" },
                { "action": "record" },
                { "action": "move", "x": 1.5, "y": 2 },
                { "action": "resize", "width": 320, "height": 200 }
            ]"##,
        )
        .unwrap();

        assert_eq!(actions[0], Action::Color { color: "#4ecdc4".into() });
        assert_eq!(actions[2], Action::Move { x: 1.5, y: 2.0 });
        assert_eq!(
            actions[3],
            Action::Resize {
                width: 320.0,
                height: 200.0,
                pixel_ratio: None
            }
        );
    }

    #[test]
    fn scripted_dance_is_recorded_and_replayed() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let actions = vec![
            Action::Color { color: "#5f27cd".into() },
            Action::Record,
            Action::Move { x: 10.0, y: 10.0 },
            Action::Wait { ms: 32 },
            Action::Move { x: 40.0, y: 20.0 },
            Action::Stop,
            Action::Replay,
        ];

        let saved = run(&mut session, &clock, &actions).unwrap();

        assert!(!saved);
        let recordings = session.state().store().recordings();
        assert_eq!(recordings.len(), 1);
        assert_eq!(recordings[0].points().len(), 2);
        assert_eq!(recordings[0].points()[1].timestamp, 32);
        assert_eq!(recordings[0].color().css, "#5f27cd");
        assert!(!session.state().is_replaying());
        assert_eq!(session.status(), StatusLine::Summary { count: 1 });
    }

    #[test]
    fn waits_advance_the_clock_exactly() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let actions = vec![
            Action::Record,
            Action::Move { x: 0.0, y: 0.0 },
            Action::Wait { ms: 100 },
            Action::Move { x: 5.0, y: 5.0 },
            Action::Wait { ms: 1 },
            Action::Move { x: 9.0, y: 2.0 },
            Action::Stop,
        ];

        run(&mut session, &clock, &actions).unwrap();

        let timestamps: Vec<u64> = session.state().store().recordings()[0]
            .points()
            .iter()
            .map(|p| p.timestamp)
            .collect();
        assert_eq!(timestamps, vec![0, 100, 101]);
    }

    #[test]
    fn replay_takes_session_time() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let dance = [
            Action::Record,
            Action::Move { x: 0.0, y: 0.0 },
            Action::Wait { ms: 50 },
            Action::Move { x: 5.0, y: 5.0 },
            Action::Stop,
        ];
        let mut actions = dance.to_vec();
        actions.push(Action::Replay);
        actions.extend(dance.iter().cloned());

        run(&mut session, &clock, &actions).unwrap();

        let recordings = session.state().store().recordings();
        assert_eq!(recordings.len(), 2);
        assert_eq!(recordings[0].last_timestamp(), 50);
        assert!(recordings[1].first_timestamp() >= 50 + 3000);
    }

    #[test]
    fn save_writes_the_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let actions = vec![
            Action::Record,
            Action::Move { x: 1.0, y: 1.0 },
            Action::Stop,
            Action::Save { path: path.clone() },
        ];

        assert!(run(&mut session, &clock, &actions).unwrap());
        assert!(path.exists());
    }

    #[test]
    fn bad_color_aborts_the_script() {
        let clock = ManualClock::new(0);
        let mut session = session(&clock);
        let actions = vec![Action::Color { color: "sparkly".into() }];
        assert!(run(&mut session, &clock, &actions).is_err());
    }
}
