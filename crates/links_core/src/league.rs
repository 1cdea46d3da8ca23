//! Season state machine: a fixed roster of simulated competitors, the
//! tracked participant's running score, and the difficulty adjustments
//! applied between seasons.

use crate::constants::{
    CAREER_PLACEMENT_XP, CLUB_PLACEMENT_XP, HOLE_COUNT, INITIAL_QUALITY, LEAGUE_COUNT,
    LEAGUE_FILE, MAX_ITERATIONS, MIN_QUALITY, PLAYER_COUNT, PREVIOUS_FILE, SKILL_ROOF, TABLE_SIZE,
};
use crate::player::{roll_players, LeaguePlayer, Standing};
use crate::save::history::{self, HoleScores};
use crate::save::{league_file, LeagueFile};
use crate::scoring::{stableford, ClubSet, ScoreCalculator};
use crate::table::{self, PlayerSeed, PreviousEntry, TableEntry, PLAYER_ID};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Which ladder this is: the main Club league or one of the twelve career
/// rounds. Career seasons are a quarter the length and start with stronger
/// rosters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeagueId {
    Club,
    /// Career round number, 1 through 12. `Career(0)` is not a valid
    /// identity; it would alias `Club`'s files and history block.
    Career(u8),
}

impl LeagueId {
    /// Index into the shared hole-history database.
    pub fn index(self) -> usize {
        match self {
            LeagueId::Club => 0,
            LeagueId::Career(n) => {
                debug_assert!((1..LEAGUE_COUNT as u8).contains(&n));
                n as usize
            }
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(LeagueId::Club),
            n if n < LEAGUE_COUNT => Some(LeagueId::Career(n as u8)),
            _ => None,
        }
    }

    pub fn max_iterations(self) -> i32 {
        match self {
            LeagueId::Club => MAX_ITERATIONS,
            LeagueId::Career(_) => MAX_ITERATIONS / 4,
        }
    }

    fn roster_file(self) -> String {
        match self {
            LeagueId::Club => LEAGUE_FILE.to_string(),
            LeagueId::Career(n) => format!("lea{:02}.gue", n),
        }
    }

    fn previous_file(self) -> String {
        match self {
            LeagueId::Club => PREVIOUS_FILE.to_string(),
            LeagueId::Career(n) => format!("last{:02}.gue", n),
        }
    }

    /// Reward amount for a podium finish.
    pub fn placement_xp(self, placement: usize) -> i32 {
        let amounts = match self {
            LeagueId::Club => CLUB_PLACEMENT_XP,
            LeagueId::Career(_) => CAREER_PLACEMENT_XP,
        };
        amounts.get(placement).copied().unwrap_or(0)
    }
}

/// Receives experience/achievement awards when a season closes with the
/// tracked participant on the podium. The host owns what an award means.
pub trait RewardSink {
    fn award(&mut self, placement: usize, xp: i32);
}

/// Swallows every award.
pub struct NoRewards;

impl RewardSink for NoRewards {
    fn award(&mut self, _placement: usize, _xp: i32) {}
}

/// One league ladder. Owns its roster, the tracked participant's season
/// bookkeeping, and its slot in the shared hole-history database.
#[derive(Debug)]
pub struct League {
    id: LeagueId,
    data_dir: PathBuf,
    calculator: ScoreCalculator,
    players: [LeaguePlayer; PLAYER_COUNT],
    hole_scores: HoleScores,
    player_score: i32,
    current_iteration: i32,
    current_season: i32,
    increase_count: i32,
    current_best: i32,
    current_position: i32,
    last_iteration_position: i32,
    previous_position: Standing,
}

impl League {
    /// Load the league for `id` from `data_dir`, or roll a fresh one when
    /// there is nothing (or nothing usable) on disk.
    pub fn new(id: LeagueId, data_dir: &Path, club_set: ClubSet, rng: &mut impl Rng) -> Self {
        let mut league = Self {
            id,
            data_dir: data_dir.to_path_buf(),
            calculator: ScoreCalculator::new(club_set),
            players: roll_players(rng, INITIAL_QUALITY[id.index()]),
            hole_scores: [[0; HOLE_COUNT]; PLAYER_COUNT],
            player_score: 0,
            current_iteration: 0,
            current_season: 1,
            increase_count: 0,
            current_best: TABLE_SIZE as i32,
            current_position: TABLE_SIZE as i32 - 1,
            last_iteration_position: TABLE_SIZE as i32 - 1,
            previous_position: Standing::Held,
        };
        league.read(rng);
        league
    }

    pub fn id(&self) -> LeagueId {
        self.id
    }

    pub fn max_iterations(&self) -> i32 {
        self.id.max_iterations()
    }

    pub fn current_iteration(&self) -> i32 {
        self.current_iteration
    }

    pub fn current_season(&self) -> i32 {
        self.current_season
    }

    pub fn current_score(&self) -> i32 {
        self.player_score
    }

    pub fn current_position(&self) -> i32 {
        self.current_position
    }

    pub fn current_best(&self) -> i32 {
        self.current_best
    }

    pub fn players(&self) -> &[LeaguePlayer; PLAYER_COUNT] {
        &self.players
    }

    pub fn club_set(&self) -> ClubSet {
        self.calculator.club_set()
    }

    pub fn set_club_set(&mut self, club_set: ClubSet) {
        self.calculator.set_club_set(club_set);
    }

    /// The current standings, tracked participant included.
    pub fn table(&self, player_level: i32) -> Vec<TableEntry> {
        table::build(&self.players, self.player_seed(player_level))
    }

    /// The participant's closest ranking rival, if any.
    pub fn nemesis(&self, player_level: i32) -> Option<i32> {
        table::nemesis(&self.table(player_level))
    }

    /// Final standings of the previous season, empty before the first
    /// rollover.
    pub fn previous_results(&self) -> Vec<PreviousEntry> {
        match league_file::load_previous(&self.previous_path()) {
            Ok(entries) => entries,
            Err(e) => {
                if !e.is_first_run() {
                    log::warn!("could not read previous season results: {}", e);
                }
                Vec::new()
            }
        }
    }

    /// Re-roll the roster and drop every season counter back to a fresh
    /// first run. Persists immediately.
    pub fn reset(&mut self, rng: &mut impl Rng) {
        self.players = roll_players(rng, INITIAL_QUALITY[self.id.index()]);
        self.hole_scores = [[0; HOLE_COUNT]; PLAYER_COUNT];
        self.player_score = 0;
        self.current_iteration = 0;
        self.current_season = 1;
        self.increase_count = 0;
        self.current_best = TABLE_SIZE as i32;
        self.current_position = TABLE_SIZE as i32 - 1;
        self.last_iteration_position = TABLE_SIZE as i32 - 1;
        self.previous_position = Standing::Held;

        league_file::delete_previous(&self.previous_path());
        if let Err(e) = history::clear(&self.data_dir, self.id.index()) {
            log::warn!("could not clear hole history: {}", e);
        }
        self.write();
        log::info!("league {:?} reset", self.id);
    }

    /// Simulate one hole for the whole roster. `was_over_par` is whether
    /// the tracked participant's previous hole went over, which makes the
    /// field wobble in sympathy; `wind_chance` percent adds a penalty
    /// stroke. Persists the hole history only.
    pub fn update_hole_scores(
        &mut self,
        rng: &mut impl Rng,
        hole_index: usize,
        par: i32,
        was_over_par: bool,
        wind_chance: i32,
    ) {
        debug_assert!(hole_index < HOLE_COUNT);
        let wind = wind_chance.clamp(1, 100);

        for i in 0..PLAYER_COUNT {
            let player = self.players[i];
            self.calculator.calculate(
                rng,
                &player,
                &mut self.hole_scores[i],
                hole_index,
                par,
                was_over_par,
            );
            if rng.gen_range(0..100) < wind {
                self.hole_scores[i][hole_index] += 1;
            }
        }

        if let Err(e) = history::store(&self.data_dir, self.id.index(), &self.hole_scores) {
            log::warn!("could not store hole history: {}", e);
        }
    }

    /// Close out one completed round: fold the accumulated hole history and
    /// the participant's scorecard into Stableford totals, re-sort the
    /// table, and advance the season state machine. Rolls the season over
    /// when this was the final round.
    pub fn iterate(
        &mut self,
        rng: &mut impl Rng,
        par_vals: &[i32; HOLE_COUNT],
        player_holes: &[u8],
        hole_count: usize,
        player_level: i32,
        rewards: &mut dyn RewardSink,
    ) {
        debug_assert!(matches!(hole_count, 6 | 9 | 12 | 18));
        debug_assert!(player_holes.len() >= hole_count);

        for i in 0..PLAYER_COUNT {
            let mut total = 0;
            for h in 0..hole_count {
                // a zero means the hole was never simulated
                let strokes = self.hole_scores[i][h];
                if strokes > 0 {
                    total += stableford(strokes, par_vals[h]);
                }
            }
            self.players[i].current_score += total;
        }

        self.player_score += (0..hole_count)
            .map(|h| stableford(player_holes[h] as i32, par_vals[h]))
            .sum::<i32>();

        let entries = self.sort_table(player_level);
        self.current_iteration += 1;

        if self.current_iteration == self.max_iterations() {
            self.finish_season(rng, &entries, rewards);
            self.sort_table(player_level);
        }

        self.hole_scores = [[0; HOLE_COUNT]; PLAYER_COUNT];
        if let Err(e) = history::clear(&self.data_dir, self.id.index()) {
            log::warn!("could not clear hole history: {}", e);
        }
        self.write();
    }

    fn player_seed(&self, player_level: i32) -> PlayerSeed {
        PlayerSeed {
            score: self.player_score,
            handicap: player_level / 2,
            previous_rank: self.current_position as usize,
        }
    }

    /// Sort the roster into table order, updating every position-change
    /// marker and the participant's rank bookkeeping.
    fn sort_table(&mut self, player_level: i32) -> Vec<TableEntry> {
        let entries = table::build(&self.players, self.player_seed(player_level));

        let mut reordered = Vec::with_capacity(PLAYER_COUNT);
        for (rank, entry) in entries.iter().enumerate() {
            if entry.name_index == PLAYER_ID {
                self.last_iteration_position = self.current_position;
                self.current_position = rank as i32;
                self.previous_position = entry.position_change;
                continue;
            }
            match self.players.iter().copied().find(|p| p.name_index == entry.name_index) {
                Some(mut player) => {
                    player.previous_position = entry.position_change;
                    reordered.push(player);
                }
                None => debug_assert!(false, "table entry references unknown competitor"),
            }
        }
        if let Ok(players) = reordered.try_into() {
            self.players = players;
        }

        entries
    }

    /// Season rollover: standings, rewards, previous-season snapshot, and
    /// one of the three difficulty-transition policies.
    fn finish_season(
        &mut self,
        rng: &mut impl Rng,
        entries: &[TableEntry],
        rewards: &mut dyn RewardSink,
    ) {
        let player_pos = entries
            .iter()
            .position(|e| e.name_index == PLAYER_ID)
            .unwrap_or(TABLE_SIZE - 1);

        if player_pos < 3 {
            rewards.award(player_pos, self.id.placement_xp(player_pos));
        }
        self.current_best = self.current_best.min(player_pos as i32);

        let snapshot: Vec<PreviousEntry> = entries
            .iter()
            .map(|e| PreviousEntry {
                score: e.score,
                handicap: e.handicap,
                name_index: e.name_index,
            })
            .collect();
        if let Err(e) = league_file::store_previous(&self.previous_path(), &snapshot) {
            log::warn!("could not write previous season results: {}", e);
        }

        if player_pos < 2 && self.increase_count < SKILL_ROOF {
            // raise the whole field, with the biggest gains near the bottom
            for (i, player) in self.players.iter_mut().enumerate() {
                player.quality = (player.quality + (0.02 * i as f32) / 10.0).min(1.0);

                let nudge = if i < PLAYER_COUNT / 2 {
                    rng.gen_range(0..=1)
                } else {
                    rng.gen_range(-1..=0)
                };
                player.outlier = (player.outlier + nudge).clamp(1, 10);
            }
            self.increase_count += 1;
        } else if self.current_best > 3 {
            // the participant has never made the top four; back the field
            // off, more so the further from the podium they have been
            let reps = ((self.current_best - 2).max(1) / 4 + 1) as usize;
            for _ in 0..reps {
                for player in self.players.iter_mut() {
                    player.quality = (player.quality - rng.gen_range(0.0..0.05)).max(MIN_QUALITY);
                    player.skill = (player.skill + rng.gen_range(0..=1)).clamp(1, 20);
                }
            }
        } else {
            for player in self.players.iter_mut() {
                let jitter = rng.gen_range(0.0..0.11);
                if player.quality > 0.89 {
                    player.quality -= jitter;
                } else {
                    player.quality += jitter;
                }
                player.quality = player.quality.clamp(MIN_QUALITY, 1.0);
            }
        }

        self.current_iteration = 0;
        self.current_season += 1;
        self.player_score = 0;
        for player in self.players.iter_mut() {
            player.current_score = 0;
            player.previous_position = Standing::Held;
        }
        self.previous_position = Standing::Held;
        log::info!("league {:?} rolled over to season {}", self.id, self.current_season);
    }

    fn roster_path(&self) -> PathBuf {
        self.data_dir.join(self.id.roster_file())
    }

    fn previous_path(&self) -> PathBuf {
        self.data_dir.join(self.id.previous_file())
    }

    fn read(&mut self, rng: &mut impl Rng) {
        match league_file::load(&self.roster_path()) {
            Ok((file, needs_migration)) => {
                self.adopt(file);
                if needs_migration {
                    // the legacy layout never stored these; re-derive and
                    // rewrite in the current format
                    self.current_best = TABLE_SIZE as i32;
                    self.last_iteration_position = self.current_position;
                    log::info!("migrated legacy league file {:?}", self.roster_path());
                    self.write();
                }
            }
            Err(e) if e.triggers_reset() => {
                if e.is_first_run() {
                    log::info!("no league file at {:?}, starting fresh", self.roster_path());
                } else {
                    log::warn!("discarding league file {:?}: {}", self.roster_path(), e);
                }
                self.reset(rng);
            }
            Err(e) => {
                // unreadable but present; keep the fresh in-memory state
                // and leave the file alone for this session
                log::warn!("could not read {:?}: {}", self.roster_path(), e);
            }
        }
    }

    fn adopt(&mut self, file: LeagueFile) {
        self.current_iteration = file.current_iteration.rem_euclid(self.max_iterations());
        self.current_season = file.current_season.max(1);
        self.player_score = file.player_score;
        self.increase_count = file.increase_count;
        self.current_best = file.current_best.clamp(0, TABLE_SIZE as i32);
        self.last_iteration_position = file.last_iteration_position.clamp(0, TABLE_SIZE as i32 - 1);
        self.current_position = self.last_iteration_position;
        self.players = file.players;
        for player in self.players.iter_mut() {
            player.sanitise();
        }
        self.hole_scores = history::load(&self.data_dir, self.id.index());
    }

    fn write(&self) {
        let file = LeagueFile {
            current_iteration: self.current_iteration,
            current_season: self.current_season,
            player_score: self.player_score,
            increase_count: self.increase_count,
            current_best: self.current_best,
            last_iteration_position: self.last_iteration_position,
            players: self.players,
        };
        if let Err(e) = league_file::store(&self.roster_path(), &file) {
            // in-memory state stays usable; the next launch just won't see
            // this round
            log::warn!("could not write {:?}: {}", self.roster_path(), e);
        }
    }
}
