//! Core library for Cursor Choreography.
//!
//! Cursor paths are captured as timestamped points, kept as immutable
//! recordings, and replayed together on one shared clock with a layered glow
//! stroke. Each module owns one piece of that pipeline; [`Choreographer`]
//! wires them to a drawing surface and a frame scheduler.

pub mod capture;
pub mod choreographer;
pub mod config;
pub mod error;
pub mod export;
pub mod palette;
pub mod render;
pub mod scheduler;
pub mod session;
pub mod store;
pub mod timeline;

pub use capture::{Capture, Clock, ManualClock, Point, SystemClock};
pub use choreographer::Choreographer;
pub use config::{AppConfig, CanvasConfig, CanvasLayout, GlowConfig, ReplayConfig, ReplayStepping};
pub use error::{ChoreographyError, Result};
pub use export::{encode_png, save_png, DEFAULT_FILE_NAME};
pub use palette::{Rgba, TrailColor, COLORS};
pub use render::{RasterSurface, Renderer, ReplayFrame, Surface};
pub use scheduler::{FrameHandle, FrameScheduler, FrameTask, ManualScheduler};
pub use session::{Controls, SessionState, StatusLine};
pub use store::{Recording, RecordingStore};
pub use timeline::{PlaybackClock, SharedTimeline, MIN_DURATION_MS};
