//! Versioned binary layout of a league roster file, plus the
//! previous-season snapshot.
//!
//! Two on-disk layouts are accepted: the legacy 4-int header and the
//! current 8-int header. Each historical schema carries its own decoder
//! which upgrades into the current in-memory shape; any other file size is
//! corruption.

use super::codec::{pack_version, unpack_version, ByteReader, ByteWriter};
use super::error::SaveError;
use crate::constants::{PLAYER_COUNT, TABLE_SIZE};
use crate::player::{LeaguePlayer, Standing};
use crate::table::PreviousEntry;
use std::fs;
use std::path::Path;

pub const LEAGUE_VERSION: u8 = 1;

const PLAYER_RECORD_LEN: usize = 7 * 4;
const CURRENT_LEN: usize = 8 * 4 + PLAYER_COUNT * PLAYER_RECORD_LEN;
const LEGACY_LEN: usize = 4 * 4 + PLAYER_COUNT * PLAYER_RECORD_LEN;
const PREVIOUS_LEN: usize = TABLE_SIZE * 3 * 4;

/// The persisted portion of a league, decoded into current shape.
#[derive(Debug, Clone, PartialEq)]
pub struct LeagueFile {
    pub current_iteration: i32,
    pub current_season: i32,
    pub player_score: i32,
    pub increase_count: i32,
    pub current_best: i32,
    pub last_iteration_position: i32,
    pub players: [LeaguePlayer; PLAYER_COUNT],
}

struct Schema {
    byte_len: usize,
    needs_migration: bool,
    decode: fn(&[u8]) -> Result<LeagueFile, SaveError>,
}

/// Historical layouts, newest first.
const SCHEMAS: [Schema; 2] = [
    Schema { byte_len: CURRENT_LEN, needs_migration: false, decode: decode_current },
    Schema { byte_len: LEGACY_LEN, needs_migration: true, decode: decode_legacy },
];

/// Decode a roster file of any known vintage. The boolean is the
/// needs-migration flag: the caller must re-derive state the old layout
/// never stored, then rewrite.
pub fn decode(data: &[u8]) -> Result<(LeagueFile, bool), SaveError> {
    let schema = SCHEMAS
        .iter()
        .find(|s| s.byte_len == data.len())
        .ok_or(SaveError::UnexpectedSize { found: data.len() })?;

    Ok(((schema.decode)(data)?, schema.needs_migration))
}

/// Encode in the current layout. Old formats are never written.
pub fn encode(file: &LeagueFile) -> Vec<u8> {
    let mut w = ByteWriter::with_capacity(CURRENT_LEN);
    w.write_i32(file.current_iteration);
    w.write_i32(file.current_season);
    w.write_i32(file.player_score);
    w.write_i32(file.increase_count);
    w.write_i32(file.current_best);
    w.write_i32(file.last_iteration_position);
    w.write_i32(pack_version(LEAGUE_VERSION));
    w.write_i32(0); // padding
    for player in &file.players {
        write_player(&mut w, player);
    }
    w.finish()
}

pub fn load(path: &Path) -> Result<(LeagueFile, bool), SaveError> {
    let data = fs::read(path)?;
    decode(&data)
}

pub fn store(path: &Path, file: &LeagueFile) -> Result<(), SaveError> {
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

fn decode_current(data: &[u8]) -> Result<LeagueFile, SaveError> {
    let mut r = ByteReader::new(data);
    let current_iteration = r.read_i32()?;
    let current_season = r.read_i32()?;
    let player_score = r.read_i32()?;
    let increase_count = r.read_i32()?;
    let current_best = r.read_i32()?;
    let last_iteration_position = r.read_i32()?;

    let (version, reserved) = unpack_version(r.read_i32()?);
    if version != LEAGUE_VERSION {
        return Err(SaveError::UnknownVersion(version));
    }
    if reserved != 0 {
        return Err(SaveError::Corrupted);
    }
    let _padding = r.read_i32()?;

    Ok(LeagueFile {
        current_iteration,
        current_season,
        player_score,
        increase_count,
        current_best,
        last_iteration_position,
        players: read_players(&mut r)?,
    })
}

fn decode_legacy(data: &[u8]) -> Result<LeagueFile, SaveError> {
    let mut r = ByteReader::new(data);
    let current_iteration = r.read_i32()?;
    let current_season = r.read_i32()?;
    let player_score = r.read_i32()?;
    let increase_count = r.read_i32()?;

    // fields the legacy layout never stored; the owner re-derives them
    Ok(LeagueFile {
        current_iteration,
        current_season,
        player_score,
        increase_count,
        current_best: 0,
        last_iteration_position: 0,
        players: read_players(&mut r)?,
    })
}

fn read_players(r: &mut ByteReader) -> Result<[LeaguePlayer; PLAYER_COUNT], SaveError> {
    let mut players = [LeaguePlayer {
        skill: 1,
        curve: 0,
        outlier: 1,
        quality: 1.0,
        name_index: 0,
        current_score: 0,
        previous_position: Standing::Held,
    }; PLAYER_COUNT];

    for player in &mut players {
        player.skill = r.read_i32()?;
        player.curve = r.read_i32()?;
        player.outlier = r.read_i32()?;
        player.name_index = r.read_i32()?;
        player.quality = r.read_f32()?;
        player.current_score = r.read_i32()?;
        player.previous_position = Standing::from_i32(r.read_i32()?);
    }
    Ok(players)
}

fn write_player(w: &mut ByteWriter, player: &LeaguePlayer) {
    w.write_i32(player.skill);
    w.write_i32(player.curve);
    w.write_i32(player.outlier);
    w.write_i32(player.name_index);
    w.write_f32(player.quality);
    w.write_i32(player.current_score);
    w.write_i32(player.previous_position.as_i32());
}

/// Write the end-of-season standings for the previous-season review.
pub fn store_previous(path: &Path, entries: &[PreviousEntry]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut w = ByteWriter::with_capacity(entries.len() * 12);
    for entry in entries {
        w.write_i32(entry.score);
        w.write_i32(entry.handicap);
        w.write_i32(entry.name_index);
    }
    fs::write(path, w.finish())?;
    Ok(())
}

pub fn load_previous(path: &Path) -> Result<Vec<PreviousEntry>, SaveError> {
    let data = fs::read(path)?;
    if data.len() != PREVIOUS_LEN {
        return Err(SaveError::UnexpectedSize { found: data.len() });
    }

    let mut r = ByteReader::new(&data);
    let mut entries = Vec::with_capacity(TABLE_SIZE);
    for _ in 0..TABLE_SIZE {
        entries.push(PreviousEntry {
            score: r.read_i32()?,
            handicap: r.read_i32()?,
            name_index: r.read_i32()?,
        });
    }
    Ok(entries)
}

pub fn delete_previous(path: &Path) {
    if path.exists() {
        if let Err(e) = fs::remove_file(path) {
            log::warn!("could not remove {:?}: {}", path, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::roll_players;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn sample_file() -> LeagueFile {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        LeagueFile {
            current_iteration: 7,
            current_season: 3,
            player_score: 212,
            increase_count: 2,
            current_best: 4,
            last_iteration_position: 6,
            players: roll_players(&mut rng, 0.0),
        }
    }

    #[test]
    fn current_layout_round_trips() {
        let file = sample_file();
        let bytes = encode(&file);
        assert_eq!(bytes.len(), CURRENT_LEN);

        let (decoded, needs_migration) = decode(&bytes).unwrap();
        assert!(!needs_migration);
        assert_eq!(decoded, file);
    }

    #[test]
    fn legacy_layout_is_upgraded() {
        let file = sample_file();

        // legacy file: 4 header ints then the roster block
        let mut w = ByteWriter::default();
        w.write_i32(file.current_iteration);
        w.write_i32(file.current_season);
        w.write_i32(file.player_score);
        w.write_i32(file.increase_count);
        for player in &file.players {
            write_player(&mut w, player);
        }
        let bytes = w.finish();
        assert_eq!(bytes.len(), LEGACY_LEN);

        let (decoded, needs_migration) = decode(&bytes).unwrap();
        assert!(needs_migration);
        assert_eq!(decoded.current_iteration, file.current_iteration);
        assert_eq!(decoded.current_best, 0);
        assert_eq!(decoded.last_iteration_position, 0);
        assert_eq!(decoded.players, file.players);
    }

    #[test]
    fn unknown_sizes_are_rejected() {
        let err = decode(&[0u8; 100]).unwrap_err();
        assert!(matches!(err, SaveError::UnexpectedSize { found: 100 }));
        assert!(err.triggers_reset());
    }

    #[test]
    fn future_versions_are_rejected() {
        let mut bytes = encode(&sample_file());
        bytes[6 * 4] = LEAGUE_VERSION + 1;
        assert!(matches!(decode(&bytes), Err(SaveError::UnknownVersion(_))));
    }

    #[test]
    fn reserved_bits_must_be_zero() {
        let mut bytes = encode(&sample_file());
        bytes[6 * 4 + 2] = 1;
        assert!(matches!(decode(&bytes), Err(SaveError::Corrupted)));
    }

    #[test]
    fn previous_snapshot_round_trips() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("last.gue");

        let entries: Vec<PreviousEntry> = (0..TABLE_SIZE)
            .map(|i| PreviousEntry {
                score: 100 - i as i32,
                handicap: i as i32,
                name_index: i as i32 - 1,
            })
            .collect();

        store_previous(&path, &entries).unwrap();
        assert_eq!(load_previous(&path).unwrap(), entries);

        delete_previous(&path);
        assert!(load_previous(&path).unwrap_err().is_first_run());
    }

    #[test]
    fn file_round_trip_through_disk() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("lea.gue");

        let file = sample_file();
        store(&path, &file).unwrap();
        let (loaded, needs_migration) = load(&path).unwrap();
        assert!(!needs_migration);
        assert_eq!(loaded, file);
    }
}
