//! # links_core - Golf League and Tournament Simulation Core
//!
//! This library drives the off-course career ladder of a golf game: a
//! multi-season league of simulated competitors the tracked participant
//! plays against, plus single-elimination bracket tournaments, with both
//! persisted between sessions.
//!
//! ## Features
//! - Skill-model per-hole stroke simulation with clubset handicaps
//! - Stableford-ranked league seasons with difficulty feedback
//! - 16-slot bracket tournaments with automatic resolution
//! - Versioned fixed-layout save files with legacy migration
//! - JSON projections for the host UI layer

// Loop style - can fix incrementally
#![allow(clippy::needless_range_loop)]

pub mod api;
pub mod constants;
pub mod league;
pub mod player;
pub mod save;
pub mod scoring;
pub mod table;
pub mod tournament;

pub use api::{bracket_json, league_table_json, previous_results_json};
pub use league::{League, LeagueId, NoRewards, RewardSink};
pub use player::{LeaguePlayer, Standing};
pub use save::{OpponentRef, SaveError};
pub use scoring::{stableford, ClubSet, ScoreCalculator};
pub use table::{PreviousEntry, TableEntry, PLAYER_ID};
pub use tournament::{Tournament, EMPTY_SLOT};
