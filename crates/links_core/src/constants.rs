//! Fixed rule data for the league and tournament simulation.

/// Simulated competitors per league roster.
pub const PLAYER_COUNT: usize = 15;

/// Roster plus the tracked participant.
pub const TABLE_SIZE: usize = PLAYER_COUNT + 1;

/// Holes per course.
pub const HOLE_COUNT: usize = 18;

/// Rounds in a full Club league season. Career leagues run a quarter of this.
pub const MAX_ITERATIONS: i32 = 24;

/// Club league plus twelve career rounds.
pub const LEAGUE_COUNT: usize = 13;

/// Bracket tournaments shipped with the game.
pub const TOURNAMENT_COUNT: usize = 2;

pub const MAX_CURVE: i32 = 5;
pub const MIN_QUALITY: f32 = 0.8;

/// Centre index of the aim/power lookup tables.
pub const SKILL_CENTRE: i32 = 8;

/// After this many difficulty increments the skills stop getting better -
/// just shift around.
pub const SKILL_ROOF: i32 = 10;

/// Offset from perfect aim, indexed by `SKILL_CENTRE` plus a random skill
/// offset. Symmetric about the centre.
pub const AIM_SKILL: [f32; 17] = [
    0.49, 0.436, 0.37, 0.312, 0.25, 0.187, 0.125, 0.062,
    0.0,
    0.062, 0.125, 0.187, 0.25, 0.312, 0.375, 0.437, 0.49,
];

/// Offset from perfect power, same shape as `AIM_SKILL`.
pub const POWER_SKILL: [f32; 17] = [
    0.49, 0.436, 0.37, 0.312, 0.25, 0.187, 0.125, 0.062,
    0.0,
    0.062, 0.125, 0.187, 0.25, 0.312, 0.375, 0.437, 0.49,
];

/// Quality boost applied when rolling a roster, per league identity. Career
/// rosters start progressively stronger than the Club league.
pub const INITIAL_QUALITY: [f32; LEAGUE_COUNT] = [
    0.0, 0.005, 0.01, 0.015, 0.02, 0.025, 0.03, 0.035, 0.04, 0.045, 0.05, 0.055, 0.06,
];

/// Pars for bracket rounds the tracked participant does not play, indexed
/// `[tournament][round][hole]`.
pub const REFERENCE_PARS: [[[i32; HOLE_COUNT]; 4]; TOURNAMENT_COUNT] = [
    [
        [4, 3, 4, 5, 4, 3, 4, 4, 5, 4, 4, 3, 5, 4, 4, 3, 4, 5],
        [4, 4, 3, 5, 4, 4, 3, 4, 5, 4, 3, 4, 5, 4, 3, 4, 4, 5],
        [5, 4, 3, 4, 4, 3, 5, 4, 4, 3, 4, 4, 5, 3, 4, 4, 5, 4],
        [4, 5, 4, 3, 4, 4, 5, 3, 4, 4, 4, 5, 3, 4, 4, 3, 5, 4],
    ],
    [
        [3, 4, 4, 5, 4, 4, 3, 5, 4, 4, 4, 3, 4, 5, 3, 4, 4, 5],
        [4, 4, 5, 3, 4, 4, 4, 3, 5, 4, 5, 4, 3, 4, 4, 3, 4, 5],
        [4, 3, 5, 4, 4, 4, 3, 4, 5, 3, 4, 4, 4, 5, 4, 3, 4, 5],
        [5, 4, 4, 3, 4, 5, 4, 3, 4, 4, 3, 4, 5, 4, 4, 3, 4, 5],
    ],
];

/// Season placement rewards, `[placement]` for the Club league. Career
/// leagues pay a reduced amount.
pub const CLUB_PLACEMENT_XP: [i32; 3] = [1000, 500, 250];
pub const CAREER_PLACEMENT_XP: [i32; 3] = [400, 200, 100];

pub const LEAGUE_FILE: &str = "lea.gue";
pub const PREVIOUS_FILE: &str = "last.gue";
pub const HISTORY_FILE: &str = "db.dat";
