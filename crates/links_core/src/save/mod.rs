//! Versioned fixed-layout persistence shared by the league and tournament
//! aggregates: explicit little-endian field order, size-based schema
//! detection, and corruption recovery by owner reset.

pub mod codec;
pub mod error;
pub mod history;
pub mod league_file;
pub mod tournament_file;

pub use error::SaveError;
pub use league_file::{LeagueFile, LEAGUE_VERSION};
pub use tournament_file::{OpponentRef, TournamentFile, TOURNAMENT_VERSION};
