//! Simulated competitor records and roster rolling.

use crate::constants::{MAX_CURVE, MIN_QUALITY, PLAYER_COUNT, SKILL_CENTRE};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Rank movement since the previous round. Encoded as 0/1/2 on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Standing {
    Fell,
    #[default]
    Held,
    Rose,
}

impl Standing {
    pub fn as_i32(self) -> i32 {
        match self {
            Standing::Fell => 0,
            Standing::Held => 1,
            Standing::Rose => 2,
        }
    }

    /// Out-of-range values (a hand-edited save, say) fall back to `Held`.
    pub fn from_i32(value: i32) -> Self {
        match value {
            0 => Standing::Fell,
            2 => Standing::Rose,
            _ => Standing::Held,
        }
    }

    /// Movement implied by going from `previous` rank to `current` rank.
    pub fn from_ranks(previous: usize, current: usize) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => Standing::Rose,
            std::cmp::Ordering::Equal => Standing::Held,
            std::cmp::Ordering::Greater => Standing::Fell,
        }
    }
}

/// One simulated league competitor.
///
/// `skill` is an ability index where lower is better; `curve` selects the
/// easing applied to shot quality; `outlier` is the chance out of 50 of a
/// mistake on any hole; `quality` caps best-case performance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LeaguePlayer {
    pub skill: i32,
    pub curve: i32,
    pub outlier: i32,
    pub quality: f32,
    pub name_index: i32,
    pub current_score: i32,
    pub previous_position: Standing,
}

impl LeaguePlayer {
    /// Handicap proxy used for ranking tie-breaks only.
    pub fn handicap(&self) -> i32 {
        self.outlier + self.curve
    }

    /// Clamp every field into its documented domain. Applied to freshly
    /// loaded data before anything else looks at it.
    pub fn sanitise(&mut self) {
        self.skill = self.skill.clamp(1, 20);
        self.curve = self.curve.clamp(0, MAX_CURVE);
        self.outlier = self.outlier.clamp(1, 10);
        self.quality = self.quality.clamp(MIN_QUALITY, 1.0);
        self.name_index = self.name_index.clamp(0, PLAYER_COUNT as i32 - 1);
    }
}

/// Roll a fresh roster. Ability degrades along the roster index so the
/// early entries are the strongest; `quality_boost` lifts the whole field
/// for league identities which start harder.
pub fn roll_players(rng: &mut impl Rng, quality_boost: f32) -> [LeaguePlayer; PLAYER_COUNT] {
    std::array::from_fn(|i| {
        let name_index = i as i32;
        let dist = i as f32 / PLAYER_COUNT as f32;

        let skill = (dist * (SKILL_CENTRE - 1) as f32).round() as i32 + 1;
        let mut curve = (dist * MAX_CURVE as f32).round() as i32 + (skill % 2);
        curve += rng.gen_range(-1..=1);

        // quality starts small and rises as the league difficulty is
        // increased between seasons
        let quality = (0.87 - (0.01 * (name_index / 2) as f32)) + quality_boost;

        LeaguePlayer {
            skill,
            curve: curve.clamp(0, MAX_CURVE),
            outlier: rng.gen_range(1..=10),
            quality: quality.min(1.0),
            name_index,
            current_score: 0,
            previous_position: Standing::Held,
        }
    })
}
