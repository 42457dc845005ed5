//! Core domain logic for player online-time accounting.
//!
//! The pipeline runs one file at a time:
//! - Line parsing: clock prefix and login/logout markers
//! - Session building: pairing logins with logouts per player
//! - Duration aggregation: seconds per player, merged across files
//! - Reporting: the longest-online player and a per-player listing

pub mod duration;
pub mod line;
pub mod report;
pub mod session;
pub mod source;

pub use duration::{
    PlayerDurations, aggregate_file, durations_for_text, merge_durations, session_seconds,
};
pub use line::{EventKind, LogLine, PlayerEvent, is_system_id};
pub use report::{Report, max_player};
pub use session::{PlayerSessionLog, Session, SessionBuilder, build_sessions};
pub use source::{Encodings, Extensions, LogSource, SourceError, SourceKind};
