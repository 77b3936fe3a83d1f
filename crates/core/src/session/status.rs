use std::fmt;

use super::SessionState;

/// One-line description of what the session is doing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StatusLine {
    Recording,
    Replaying { progress: f64 },
    Summary { count: usize },
    Empty,
}

impl StatusLine {
    pub fn of(state: &SessionState) -> Self {
        if state.is_recording() {
            Self::Recording
        } else if state.is_replaying() {
            Self::Replaying {
                progress: state.replay_progress(),
            }
        } else if state.store().is_empty() {
            Self::Empty
        } else {
            Self::Summary {
                count: state.store().len(),
            }
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Recording => f.write_str("Recording... Move your cursor to create art"),
            Self::Replaying { progress } => write!(f, "Replaying {:.0}%", progress * 100.0),
            Self::Summary { count: 1 } => f.write_str("1 dance recorded"),
            Self::Summary { count } => write!(f, "{count} dances recorded"),
            Self::Empty => f.write_str("Create Your Cursor Art"),
        }
    }
}

/// Which actions are currently available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub record: bool,
    pub replay: bool,
    pub clear: bool,
    pub save: bool,
}

impl Controls {
    pub fn of(state: &SessionState) -> Self {
        let replaying = state.is_replaying();
        let has_recordings = !state.store().is_empty();
        Self {
            record: !replaying,
            replay: has_recordings && !replaying,
            clear: !replaying,
            save: has_recordings,
        }
    }
}
