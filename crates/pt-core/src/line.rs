//! Line-level parsing of server log output.
//!
//! A server log line looks like
//!
//! ```text
//! [12:00:00] [Server thread/INFO]: Alice[/127.0.0.1:51234] logged in with entity id 123 at (0.5, 64.0, 0.5)
//! [12:30:00] [Server thread/INFO]: Alice lost connection: Disconnected
//! ```
//!
//! Only the clock prefix and the two session markers matter here; everything
//! else in a log is noise and is skipped without error.

use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveTime;
use regex::Regex;

/// Text that marks a player joining the server.
pub const LOGIN_MARKER: &str = "logged in with entity id";

/// Text that marks a player leaving the server.
pub const LOGOUT_MARKER: &str = "lost connection";

/// Bracketed clock prefix, e.g. `[12:00:00]` or `[12:00:00 INFO]`.
static TIME_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[(\d{2}):(\d{2}):(\d{2})\b").unwrap());

/// Midnight, used wherever a session boundary falls outside the visible log.
pub const MIDNIGHT: NaiveTime = NaiveTime::MIN;

/// What a log line says about a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Login,
    Logout,
    Other,
}

impl EventKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Logout => "logout",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A login or logout attributed to a player id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerEvent<'a> {
    pub kind: EventKind,
    pub player_id: &'a str,
}

/// The derived view of one raw log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogLine<'a> {
    pub timestamp: Option<NaiveTime>,
    pub event: Option<PlayerEvent<'a>>,
}

impl<'a> LogLine<'a> {
    pub fn player_id(&self) -> Option<&'a str> {
        self.event.map(|e| e.player_id)
    }

    pub fn event_kind(&self) -> EventKind {
        self.event.map_or(EventKind::Other, |e| e.kind)
    }
}

/// Parses both the timestamp and the player event of a line.
pub fn parse_line(line: &str) -> LogLine<'_> {
    LogLine {
        timestamp: extract_time(line),
        event: extract_event(line),
    }
}

/// Returns the clock time of a line starting with `[HH:MM:SS`.
///
/// Lines without the prefix, or with an impossible clock value, have no time.
pub fn extract_time(line: &str) -> Option<NaiveTime> {
    let caps = TIME_PREFIX_RE.captures(line)?;
    let hour = caps[1].parse().ok()?;
    let min = caps[2].parse().ok()?;
    let sec = caps[3].parse().ok()?;
    NaiveTime::from_hms_opt(hour, min, sec)
}

/// Returns the player id of a login or logout line.
pub fn extract_player_id(line: &str) -> Option<&str> {
    extract_event(line).map(|e| e.player_id)
}

/// Finds a login or logout marker in the message part of a line.
///
/// The message part is whatever follows the third colon, which skips the
/// `HH:MM:SS` prefix and the `[thread/LEVEL]:` source tag.
pub fn extract_event(line: &str) -> Option<PlayerEvent<'_>> {
    if !line.starts_with('[') {
        return None;
    }
    let message = line.splitn(4, ':').nth(3)?.trim_start();

    let (kind, player_id) = if message.contains(LOGIN_MARKER) {
        // The login line carries the connection address glued to the name
        let name = message.split('[').next().unwrap_or_default();
        (EventKind::Login, first_token(name)?)
    } else if message.contains(LOGOUT_MARKER) {
        (EventKind::Logout, first_token(message)?)
    } else {
        return None;
    };

    Some(PlayerEvent { kind, player_id })
}

fn first_token(s: &str) -> Option<&str> {
    s.split_whitespace().next()
}

/// Returns true for ids that name a server component rather than a player.
///
/// The marker heuristic also matches lines such as
/// `com.mojang.authlib.GameProfile@1a2b (/10.0.0.1:5000) lost connection`,
/// so anything starting with `com` or containing a `.` is discarded. This
/// also rejects genuine players called e.g. `comet`.
pub fn is_system_id(id: &str) -> bool {
    id.starts_with("com") || id.contains('.')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn extract_time_reads_bracketed_prefix() {
        assert_eq!(extract_time("[12:00:00] [Server thread/INFO]: hi"), Some(t(12, 0, 0)));
        assert_eq!(extract_time("[23:59:59 INFO]: Done"), Some(t(23, 59, 59)));
    }

    #[test]
    fn extract_time_absent_without_prefix() {
        assert_eq!(extract_time("at java.lang.Thread.run(Thread.java:750)"), None);
        assert_eq!(extract_time(" [12:00:00] indented"), None);
        assert_eq!(extract_time("[Server thread/INFO]: no clock"), None);
        assert_eq!(extract_time(""), None);
    }

    #[test]
    fn extract_time_rejects_impossible_clock() {
        assert_eq!(extract_time("[25:00:00] late"), None);
        assert_eq!(extract_time("[12:61:00] odd"), None);
        assert_eq!(extract_time("[12:00:001] too many digits"), None);
    }

    #[test]
    fn login_with_address_suffix() {
        let line = "[12:00:00] [Server thread/INFO]: Alice[/127.0.0.1:51234] logged in with entity id 123 at (0.5, 64.0, 0.5)";
        assert_eq!(
            extract_event(line),
            Some(PlayerEvent {
                kind: EventKind::Login,
                player_id: "Alice"
            })
        );
    }

    #[test]
    fn login_without_address_suffix() {
        let line = "[12:00:00] [Server thread/INFO]: Alice logged in with entity id 123 at (...)";
        assert_eq!(extract_player_id(line), Some("Alice"));
        assert_eq!(parse_line(line).event_kind(), EventKind::Login);
    }

    #[test]
    fn logout_takes_first_token() {
        let line = "[12:30:00] [Server thread/INFO]: Alice lost connection: Disconnected";
        let parsed = parse_line(line);
        assert_eq!(parsed.timestamp, Some(t(12, 30, 0)));
        assert_eq!(parsed.player_id(), Some("Alice"));
        assert_eq!(parsed.event_kind(), EventKind::Logout);
    }

    #[test]
    fn too_few_colon_segments_yield_nothing() {
        assert_eq!(extract_event("[12:00] Alice lost connection"), None);
    }

    #[test]
    fn unbracketed_line_yields_nothing() {
        assert_eq!(extract_event("Alice lost connection: timed out"), None);
    }

    #[test]
    fn unrelated_message_is_other() {
        let line = "[12:00:00] [Server thread/INFO]: Starting minecraft server version 1.20.1";
        let parsed = parse_line(line);
        assert_eq!(parsed.event_kind(), EventKind::Other);
        assert_eq!(parsed.player_id(), None);
        assert!(parsed.timestamp.is_some());
    }

    #[test]
    fn empty_id_is_absent() {
        assert_eq!(extract_event("[12:00:00] [Server thread/INFO]:    "), None);
        assert_eq!(
            extract_event("[12:00:00] [Server thread/INFO]: [/1.2.3.4:5] logged in with entity id 1"),
            None
        );
    }

    #[test]
    fn system_ids_are_filtered() {
        assert!(is_system_id("com.mojang.authlib.GameProfile@6f1c2a"));
        assert!(is_system_id("comet"));
        assert!(is_system_id("Player.One"));
        assert!(is_system_id("/127.0.0.1"));
        assert!(!is_system_id("Alice"));
        assert!(!is_system_id("Com_Player"));
        assert!(!is_system_id("xcom"));
    }

    #[test]
    fn game_profile_logout_parses_as_system_id() {
        let line = "[12:00:00] [Server thread/INFO]: com.mojang.authlib.GameProfile@1a2b[id=<null>] (/10.0.0.1:5000) lost connection: Disconnected";
        let id = extract_player_id(line).unwrap();
        assert!(is_system_id(id));
    }
}
