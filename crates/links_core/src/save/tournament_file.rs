//! Binary layout of a tournament bracket file. The source of this format
//! was a raw struct dump; here every field is written explicitly, in
//! declared order, so the layout no longer depends on compiler whims.

use super::codec::{pack_version, unpack_version, ByteReader, ByteWriter};
use super::error::SaveError;
use crate::constants::{HOLE_COUNT, PLAYER_COUNT};
use std::fs;
use std::path::Path;

pub const TOURNAMENT_VERSION: u8 = 1;

// 8 header ints, 30 tier slots, two 18-hole scorecards
const FILE_LEN: usize = (8 + 30 + HOLE_COUNT * 2) * 4;

/// Who the tracked participant is currently playing against. The source
/// stored this as a single reinterpreted integer; the tag keeps the two
/// uses apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpponentRef {
    #[default]
    None,
    /// A roster competitor, by name index.
    Roster(i32),
    /// A host-defined challenge round.
    Challenge(i32),
}

impl OpponentRef {
    fn encode(self) -> (i32, i32) {
        match self {
            OpponentRef::None => (0, 0),
            OpponentRef::Roster(id) => (1, id),
            OpponentRef::Challenge(id) => (2, id),
        }
    }

    fn decode(tag: i32, payload: i32) -> Result<Self, SaveError> {
        match tag {
            0 => Ok(OpponentRef::None),
            1 => Ok(OpponentRef::Roster(payload)),
            2 => Ok(OpponentRef::Challenge(payload)),
            _ => Err(SaveError::Corrupted),
        }
    }
}

/// The persisted portion of a tournament bracket.
#[derive(Debug, Clone, PartialEq)]
pub struct TournamentFile {
    pub id: i32,
    pub round: i32,
    pub winner: i32,
    pub current_best: i32,
    pub mulligan_count: i32,
    pub opponent: OpponentRef,
    pub tier0: [i32; 16],
    pub tier1: [i32; 8],
    pub tier2: [i32; 4],
    pub tier3: [i32; 2],
    pub scores: [i32; HOLE_COUNT],
    pub opponent_scores: [i32; HOLE_COUNT],
}

pub fn encode(file: &TournamentFile) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(FILE_LEN);
    w.write_i32(file.id);
    w.write_i32(file.round);
    w.write_i32(file.winner);
    w.write_i32(file.current_best);
    w.write_i32(file.mulligan_count);
    let (tag, payload) = file.opponent.encode();
    w.write_i32(tag);
    w.write_i32(payload);
    w.write_i32(pack_version(TOURNAMENT_VERSION));

    for &slot in file.tier0.iter().chain(&file.tier1).chain(&file.tier2).chain(&file.tier3) {
        w.write_i32(slot);
    }
    for &score in file.scores.iter().chain(&file.opponent_scores) {
        w.write_i32(score);
    }
    w.finish()
}

pub fn decode(data: &[u8]) -> Result<TournamentFile, SaveError> {
    if data.len() != FILE_LEN {
        return Err(SaveError::UnexpectedSize { found: data.len() });
    }

    let mut r = ByteReader::new(data);
    let id = r.read_i32()?;
    let round = r.read_i32()?;
    let winner = r.read_i32()?;
    let current_best = r.read_i32()?;
    let mulligan_count = r.read_i32()?;
    let tag = r.read_i32()?;
    let payload = r.read_i32()?;

    let (version, reserved) = unpack_version(r.read_i32()?);
    if version != TOURNAMENT_VERSION {
        return Err(SaveError::UnknownVersion(version));
    }
    if reserved != 0 {
        return Err(SaveError::Corrupted);
    }

    let file = TournamentFile {
        id,
        round,
        winner,
        current_best,
        mulligan_count,
        opponent: OpponentRef::decode(tag, payload)?,
        tier0: read_slots(&mut r)?,
        tier1: read_slots(&mut r)?,
        tier2: read_slots(&mut r)?,
        tier3: read_slots(&mut r)?,
        scores: read_slots(&mut r)?,
        opponent_scores: read_slots(&mut r)?,
    };
    validate(&file)?;
    Ok(file)
}

pub fn load(path: &Path) -> Result<TournamentFile, SaveError> {
    let data = fs::read(path)?;
    decode(&data)
}

pub fn store(path: &Path, file: &TournamentFile) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let data = encode(file);
    let temp = path.with_extension("tmp");
    fs::write(&temp, &data)?;
    fs::rename(&temp, path)?;
    log::debug!("wrote {} bytes to {:?}", data.len(), path);
    Ok(())
}

fn read_slots<const N: usize>(r: &mut ByteReader) -> Result<[i32; N], SaveError> {
    let mut slots = [0i32; N];
    for slot in &mut slots {
        *slot = r.read_i32()?;
    }
    Ok(slots)
}

fn validate(file: &TournamentFile) -> Result<(), SaveError> {
    if !(0..=3).contains(&file.round) {
        return Err(SaveError::Corrupted);
    }

    let max_id = PLAYER_COUNT as i32 - 1;
    let slot_ok = |s: i32| (-2..=max_id).contains(&s);
    let tiers = file
        .tier0
        .iter()
        .chain(&file.tier1)
        .chain(&file.tier2)
        .chain(&file.tier3)
        .chain(std::iter::once(&file.winner));
    for &slot in tiers {
        if !slot_ok(slot) {
            return Err(SaveError::Corrupted);
        }
    }
    Ok(())
}
