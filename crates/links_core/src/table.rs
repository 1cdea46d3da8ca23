//! Ranking table projection: ordering, position deltas and the nemesis
//! relation. Pure functions over an already-validated snapshot.

use crate::player::{LeaguePlayer, Standing};
use serde::{Deserialize, Serialize};

/// Sentinel identity of the tracked participant in table entries and
/// bracket slots.
pub const PLAYER_ID: i32 = -1;

/// One row of the ranking table, recomputed on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableEntry {
    pub score: i32,
    pub handicap: i32,
    pub name_index: i32,
    pub position_change: Standing,
}

/// Persisted end-of-season row for the previous-season review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousEntry {
    pub score: i32,
    pub handicap: i32,
    pub name_index: i32,
}

/// The tracked participant's contribution to the table. The handicap proxy
/// is supplied externally (host level / 2); `previous_rank` is their table
/// index after the last sort.
#[derive(Debug, Clone, Copy)]
pub struct PlayerSeed {
    pub score: i32,
    pub handicap: i32,
    pub previous_rank: usize,
}

/// Full ordering: score descending, handicap proxy descending, the tracked
/// participant ahead of a CPU on an exact tie. `players` is expected in its
/// previously sorted order, which is what position deltas are measured
/// against.
pub fn build(players: &[LeaguePlayer], player: PlayerSeed) -> Vec<TableEntry> {
    struct Scratch {
        entry: TableEntry,
        previous_rank: usize,
    }

    let mut rows: Vec<Scratch> = players
        .iter()
        .enumerate()
        .map(|(i, p)| Scratch {
            entry: TableEntry {
                score: p.current_score,
                handicap: p.handicap(),
                name_index: p.name_index,
                position_change: Standing::Held,
            },
            previous_rank: i,
        })
        .collect();
    rows.push(Scratch {
        entry: TableEntry {
            score: player.score,
            handicap: player.handicap,
            name_index: PLAYER_ID,
            position_change: Standing::Held,
        },
        previous_rank: player.previous_rank,
    });

    rows.sort_by(|a, b| {
        b.entry
            .score
            .cmp(&a.entry.score)
            .then_with(|| b.entry.handicap.cmp(&a.entry.handicap))
            .then_with(|| (b.entry.name_index == PLAYER_ID).cmp(&(a.entry.name_index == PLAYER_ID)))
    });

    rows.iter_mut().enumerate().for_each(|(rank, row)| {
        row.entry.position_change = Standing::from_ranks(row.previous_rank, rank);
    });

    rows.into_iter().map(|row| row.entry).collect()
}

/// The ranking-adjacent rival closest in score to the tracked participant:
/// the entry above when tied or one point ahead, otherwise the entry below
/// when tied or one point behind. `None` when no such rival exists.
pub fn nemesis(entries: &[TableEntry]) -> Option<i32> {
    let pos = entries.iter().position(|e| e.name_index == PLAYER_ID)?;

    if pos > 0 && entries[pos - 1].score - entries[pos].score <= 1 {
        return Some(entries[pos - 1].name_index);
    }
    if pos + 1 < entries.len() && entries[pos].score - entries[pos + 1].score <= 1 {
        return Some(entries[pos + 1].name_index);
    }
    None
}
