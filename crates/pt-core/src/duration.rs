//! Conversion of sessions into online seconds, and merging across files.

use indexmap::IndexMap;
use serde::Serialize;

use crate::session::{PlayerSessionLog, Session, build_sessions};

/// Cumulative online seconds per player, in order of first appearance.
///
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PlayerDurations(IndexMap<String, f64>);

impl PlayerDurations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: &str) -> Option<f64> {
        self.0.get(player_id).copied()
    }

    /// Adds `seconds` to a player's total, inserting the player if needed.
    pub fn add(&mut self, player_id: &str, seconds: f64) {
        match self.0.get_mut(player_id) {
            Some(total) => *total += seconds,
            None => {
                self.0.insert(player_id.to_string(), seconds);
            }
        }
    }

    /// Adds every entry of `other` into `self`.
    pub fn absorb(&mut self, other: Self) {
        for (player_id, seconds) in other.0 {
            *self.0.entry(player_id).or_insert(0.0) += seconds;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, secs)| (id.as_str(), *secs))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for PlayerDurations {
    fn from_iter<I: IntoIterator<Item = (S, f64)>>(iter: I) -> Self {
        let mut durations = Self::new();
        for (id, secs) in iter {
            let id: String = id.into();
            durations.add(&id, secs);
        }
        durations
    }
}

/// Length of a session in seconds.
///
/// An unknown start counts from midnight and an unknown end runs to
/// `last_seen`. Sessions that cross midnight come out negative; logs are
/// expected to cover a single day and this is not corrected.
#[expect(
    clippy::cast_precision_loss,
    reason = "a clock difference is at most 86400 seconds"
)]
pub fn session_seconds(session: &Session, last_seen: chrono::NaiveTime) -> f64 {
    let start = session.effective_start();
    let end = session.effective_end(last_seen);
    end.signed_duration_since(start).num_seconds() as f64
}

/// Sums session lengths per player for one file.
pub fn aggregate_file(log: &PlayerSessionLog) -> PlayerDurations {
    let last_seen = log.last_seen();
    let mut durations = PlayerDurations::new();
    for (player_id, sessions) in log.iter() {
        let total = sessions
            .iter()
            .map(|s| session_seconds(s, last_seen))
            .sum::<f64>();
        durations.add(player_id, total);
    }
    durations
}

/// Online seconds per player for the full text of one log file.
pub fn durations_for_text(text: &str) -> PlayerDurations {
    aggregate_file(&build_sessions(text))
}

/// Pointwise sum over the union of players; a missing player counts as zero.
pub fn merge_durations(mut a: PlayerDurations, b: &PlayerDurations) -> PlayerDurations {
    for (player_id, seconds) in b.iter() {
        a.add(player_id, seconds);
    }
    a
}
