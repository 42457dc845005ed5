//! Pairing of login and logout events into per-player sessions.
//!
//! Logs are frequently rotated mid-session, so a file may start with players
//! already online and end with players still online. Both cases are handled
//! by leaving the unknown boundary empty:
//!
//! - a logout with no matching login starts at `00:00:00`
//! - a login with no matching logout ends at the last timestamp in the file

use chrono::NaiveTime;
use indexmap::IndexMap;

use crate::line::{self, EventKind, MIDNIGHT};

/// One contiguous online interval for a player.
///
/// At least one end is always known; a session with neither end cannot be
/// constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    start: Option<NaiveTime>,
    end: Option<NaiveTime>,
}

impl Session {
    /// A session opened by a login whose logout has not been seen yet.
    pub const fn opened_at(start: NaiveTime) -> Self {
        Self {
            start: Some(start),
            end: None,
        }
    }

    /// A session closed by a logout whose login is outside the visible log.
    pub const fn closed_at(end: NaiveTime) -> Self {
        Self {
            start: None,
            end: Some(end),
        }
    }

    /// A session with both ends known.
    pub const fn between(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub const fn start(&self) -> Option<NaiveTime> {
        self.start
    }

    pub const fn end(&self) -> Option<NaiveTime> {
        self.end
    }

    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// Start time, treating an unknown start as midnight.
    pub fn effective_start(&self) -> NaiveTime {
        self.start.unwrap_or(MIDNIGHT)
    }

    /// End time, treating an unknown end as `last_seen`.
    pub fn effective_end(&self, last_seen: NaiveTime) -> NaiveTime {
        self.end.unwrap_or(last_seen)
    }

    fn close(&mut self, end: NaiveTime) {
        self.end = Some(end);
    }
}

/// Sessions per player for a single log file, in order of first appearance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerSessionLog {
    players: IndexMap<String, Vec<Session>>,
    /// Last timestamp seen anywhere in the file.
    last_seen: NaiveTime,
}

impl PlayerSessionLog {
    pub fn get(&self, player_id: &str) -> Option<&[Session]> {
        self.players.get(player_id).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Session])> {
        self.players
            .iter()
            .map(|(id, sessions)| (id.as_str(), sessions.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub const fn last_seen(&self) -> NaiveTime {
        self.last_seen
    }
}

/// Incremental session pairing over the lines of one file.
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    log: PlayerSessionLog,
    skipped: usize,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            log: PlayerSessionLog::default(),
            skipped: 0,
        }
    }

    /// Feeds one raw line, in file order.
    pub fn feed(&mut self, raw: &str) {
        let parsed = line::parse_line(raw);
        if let Some(time) = parsed.timestamp {
            self.log.last_seen = time;
        }

        let Some(event) = parsed.event else {
            return;
        };
        let Some(time) = parsed.timestamp else {
            self.skip(raw, "event without timestamp");
            return;
        };
        if line::is_system_id(event.player_id) {
            self.skip(raw, "system id");
            return;
        }

        tracing::trace!(player = event.player_id, kind = %event.kind, %time, "session event");
        match event.kind {
            EventKind::Login => self.login(event.player_id, time),
            EventKind::Logout => self.logout(event.player_id, time),
            EventKind::Other => {}
        }
    }

    fn login(&mut self, player_id: &str, time: NaiveTime) {
        self.log
            .players
            .entry(player_id.to_string())
            .or_default()
            .push(Session::opened_at(time));
    }

    fn logout(&mut self, player_id: &str, time: NaiveTime) {
        let sessions = self.log.players.entry(player_id.to_string()).or_default();
        match sessions.last_mut() {
            Some(last) if last.is_open() => last.close(time),
            Some(_) => {
                tracing::debug!(player = player_id, %time, "logout after a closed session");
                sessions.push(Session::closed_at(time));
            }
            None => sessions.push(Session::closed_at(time)),
        }
    }

    fn skip(&mut self, raw: &str, reason: &str) {
        self.skipped += 1;
        tracing::trace!(line = raw, reason, "skipping line");
    }

    /// Number of event lines ignored so far.
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    /// Closes every still-open session at the last timestamp of the file.
    pub fn finish(mut self) -> PlayerSessionLog {
        let last_seen = self.log.last_seen;
        for sessions in self.log.players.values_mut() {
            if let Some(last) = sessions.last_mut().filter(|s| s.is_open()) {
                last.close(last_seen);
            }
        }
        self.log
    }
}

/// Builds the session log for a whole file's text.
pub fn build_sessions(text: &str) -> PlayerSessionLog {
    let mut builder = SessionBuilder::new();
    for raw in text.lines() {
        builder.feed(raw);
    }
    builder.finish()
}
