//! JSON projections of league and tournament state for the host UI layer.
//! Name indices are passed through as integers; resolving them to display
//! names is the host's job.

use crate::league::League;
use crate::table::{PreviousEntry, TableEntry};
use crate::tournament::Tournament;
use serde::Serialize;

/// One league ranking table, in final order.
#[derive(Debug, Serialize)]
pub struct LeagueTableView {
    pub season: i32,
    pub iteration: i32,
    pub max_iterations: i32,
    pub entries: Vec<TableEntry>,
}

/// Final standings of a completed season.
#[derive(Debug, Serialize)]
pub struct PreviousResultsView {
    pub season: i32,
    pub entries: Vec<PreviousEntry>,
}

/// Bracket snapshot: all four tiers plus progress markers.
#[derive(Debug, Serialize)]
pub struct BracketView {
    pub id: i32,
    pub round: i32,
    pub winner: i32,
    pub current_best: i32,
    pub mulligans_remaining: i32,
    pub tiers: [Vec<i32>; 4],
}

/// The current standings as JSON, tracked participant included.
pub fn league_table_json(league: &League, player_level: i32) -> Result<String, serde_json::Error> {
    let view = LeagueTableView {
        season: league.current_season(),
        iteration: league.current_iteration(),
        max_iterations: league.max_iterations(),
        entries: league.table(player_level),
    };
    serde_json::to_string(&view)
}

/// The previous season's final table as JSON; entries are empty before the
/// first rollover.
pub fn previous_results_json(league: &League) -> Result<String, serde_json::Error> {
    let view = PreviousResultsView {
        season: league.current_season() - 1,
        entries: league.previous_results(),
    };
    serde_json::to_string(&view)
}

/// The full bracket state as JSON.
pub fn bracket_json(tournament: &Tournament) -> Result<String, serde_json::Error> {
    let view = BracketView {
        id: tournament.id(),
        round: tournament.round(),
        winner: tournament.winner(),
        current_best: tournament.current_best(),
        mulligans_remaining: tournament.mulligan_count(),
        tiers: [
            tournament.tier0().to_vec(),
            tournament.tier1().to_vec(),
            tournament.tier2().to_vec(),
            tournament.tier3().to_vec(),
        ],
    };
    serde_json::to_string(&view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::LeagueId;
    use crate::scoring::ClubSet;
    use crate::table::PLAYER_ID;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use tempfile::TempDir;

    #[test]
    fn league_table_serialises_every_row() {
        let dir = TempDir::new().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let league = League::new(LeagueId::Club, dir.path(), ClubSet::Novice, &mut rng);

        let json = league_table_json(&league, 10).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["season"], 1);
        let entries = value["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 16);
        assert!(entries.iter().any(|e| e["name_index"] == PLAYER_ID));
    }

    #[test]
    fn previous_results_are_empty_on_a_fresh_league() {
        let dir = TempDir::new().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let league = League::new(LeagueId::Career(2), dir.path(), ClubSet::Expert, &mut rng);

        let json = previous_results_json(&league).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["season"], 0);
        assert!(value["entries"].as_array().unwrap().is_empty());
    }

    #[test]
    fn bracket_view_carries_all_four_tiers() {
        let dir = TempDir::new().unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let tournament = Tournament::new(0, dir.path(), ClubSet::Pro, &mut rng);

        let json = bracket_json(&tournament).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let tiers = value["tiers"].as_array().unwrap();
        assert_eq!(tiers[0].as_array().unwrap().len(), 16);
        assert_eq!(tiers[1].as_array().unwrap().len(), 8);
        assert_eq!(tiers[2].as_array().unwrap().len(), 4);
        assert_eq!(tiers[3].as_array().unwrap().len(), 2);
        assert_eq!(value["winner"], -2);
    }
}
