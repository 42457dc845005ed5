//! Final report: the longest-online player and a per-player listing.

use std::fmt::Write;

use serde::Serialize;

use crate::duration::PlayerDurations;

/// First line of the report file.
pub const REPORT_HEADER: &str = "player_id:online_seconds";

/// Returns the player with the most online time.
///
/// Only totals strictly above zero can win, and ties keep the first player
/// encountered. An empty map gives `(None, 0.0)`.
pub fn max_player(durations: &PlayerDurations) -> (Option<&str>, f64) {
    let mut best = (None, 0.0);
    for (player_id, seconds) in durations.iter() {
        if seconds > best.1 {
            best = (Some(player_id), seconds);
        }
    }
    best
}

/// Formats seconds as a float with at least one fractional digit.
pub fn format_seconds(seconds: f64) -> String {
    format!("{seconds:?}")
}

/// Summary of a whole run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub player_count: usize,
    pub top_player: Option<String>,
    pub top_seconds: f64,
    pub players: PlayerDurations,
}

impl Report {
    pub fn from_durations(durations: PlayerDurations) -> Self {
        let (top, top_seconds) = max_player(&durations);
        let top_player = top.map(str::to_string);
        Self {
            player_count: durations.len(),
            top_player,
            top_seconds,
            players: durations,
        }
    }

    /// Renders the report file: a header, then `player_id:seconds` per line.
    pub fn render_file(&self) -> String {
        let mut out = String::from(REPORT_HEADER);
        out.push('\n');
        for (player_id, seconds) in self.players.iter() {
            writeln!(out, "{player_id}:{}", format_seconds(seconds)).unwrap();
        }
        out
    }

    /// Renders the console summary.
    pub fn render_summary(&self) -> String {
        let mut out = format!("Players: {}\n", self.player_count);
        match &self.top_player {
            Some(player_id) => {
                write!(
                    out,
                    "Longest online: {player_id} ({} seconds)",
                    format_seconds(self.top_seconds)
                )
                .unwrap();
            }
            None => out.push_str("Longest online: none"),
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    fn durations(entries: &[(&str, f64)]) -> PlayerDurations {
        entries.iter().map(|(id, secs)| (*id, *secs)).collect()
    }

    #[test]
    fn max_player_of_empty_map() {
        assert_eq!(max_player(&PlayerDurations::new()), (None, 0.0));
    }

    #[test]
    fn max_player_picks_greatest() {
        let d = durations(&[("Alice", 10.0), ("Bob", 30.0), ("Carol", 20.0)]);
        assert_eq!(max_player(&d), (Some("Bob"), 30.0));
    }

    #[test]
    fn max_player_ties_keep_first() {
        let d = durations(&[("Alice", 10.0), ("Bob", 30.0), ("Carol", 30.0)]);
        assert_eq!(max_player(&d), (Some("Bob"), 30.0));
    }

    #[test]
    fn max_player_ignores_non_positive_totals() {
        let d = durations(&[("Alice", 0.0), ("Bob", -5.0)]);
        assert_eq!(max_player(&d), (None, 0.0));
    }

    #[test]
    fn seconds_keep_fractional_digit() {
        assert_eq!(format_seconds(1800.0), "1800.0");
        assert_eq!(format_seconds(0.0), "0.0");
        assert_eq!(format_seconds(-60.0), "-60.0");
        assert_eq!(format_seconds(1.5), "1.5");
    }

    #[test]
    fn report_file_lists_players_in_order() {
        let report = Report::from_durations(durations(&[("Alice", 1800.0), ("Bob", 28800.0)]));
        assert_eq!(
            report.render_file(),
            "player_id:online_seconds\nAlice:1800.0\nBob:28800.0\n"
        );
    }

    #[test]
    fn empty_report_has_only_header() {
        let report = Report::from_durations(PlayerDurations::new());
        assert_eq!(report.player_count, 0);
        assert_eq!(report.render_file(), "player_id:online_seconds\n");
    }

    #[test]
    fn summary_names_top_player() {
        let report = Report::from_durations(durations(&[("Alice", 1800.0), ("Bob", 28800.0)]));
        assert_snapshot!(report.render_summary(), @r"
        Players: 2
        Longest online: Bob (28800.0 seconds)
        ");
    }

    #[test]
    fn summary_without_players() {
        let report = Report::from_durations(PlayerDurations::new());
        assert_snapshot!(report.render_summary(), @r"
        Players: 0
        Longest online: none
        ");
    }

    #[test]
    fn report_serializes_players_as_map() {
        let report = Report::from_durations(durations(&[("Alice", 60.0)]));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "player_count": 1,
                "top_player": "Alice",
                "top_seconds": 60.0,
                "players": { "Alice": 60.0 }
            })
        );
    }
}
