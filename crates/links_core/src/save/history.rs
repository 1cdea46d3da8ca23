//! Shared per-hole history database. One fixed-size block per league
//! identity, updated by read-modify-write of the whole file; callers must
//! keep to a single-writer discipline.

use super::codec::{ByteReader, ByteWriter};
use super::error::SaveError;
use crate::constants::{HISTORY_FILE, HOLE_COUNT, LEAGUE_COUNT, PLAYER_COUNT};
use std::fs;
use std::path::Path;

/// One round of stroke counts for a whole roster.
pub type HoleScores = [[i32; HOLE_COUNT]; PLAYER_COUNT];

const BLOCK_LEN: usize = PLAYER_COUNT * HOLE_COUNT * 4;
const FILE_LEN: usize = LEAGUE_COUNT * BLOCK_LEN;

/// Load one league's block. A missing or wrong-size database is treated as
/// empty rather than an error; it is rebuilt on the next store.
pub fn load(dir: &Path, league_index: usize) -> HoleScores {
    debug_assert!(league_index < LEAGUE_COUNT);

    let path = dir.join(HISTORY_FILE);
    let data = match fs::read(&path) {
        Ok(data) => data,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("could not read {:?}: {}", path, e);
            }
            return [[0; HOLE_COUNT]; PLAYER_COUNT];
        }
    };

    if data.len() != FILE_LEN {
        log::warn!("{:?} is {} bytes, expected {} - discarding", path, data.len(), FILE_LEN);
        return [[0; HOLE_COUNT]; PLAYER_COUNT];
    }

    let mut r = ByteReader::new(&data[league_index * BLOCK_LEN..(league_index + 1) * BLOCK_LEN]);
    let mut scores = [[0; HOLE_COUNT]; PLAYER_COUNT];
    for row in &mut scores {
        for hole in row.iter_mut() {
            // cannot fail, the slice length was checked above
            *hole = r.read_i32().unwrap_or(0);
        }
    }
    scores
}

/// Store one league's block, preserving every other identity's bytes.
pub fn store(dir: &Path, league_index: usize, scores: &HoleScores) -> Result<(), SaveError> {
    debug_assert!(league_index < LEAGUE_COUNT);

    fs::create_dir_all(dir)?;
    let path = dir.join(HISTORY_FILE);

    let mut data = match fs::read(&path) {
        Ok(data) if data.len() == FILE_LEN => data,
        Ok(data) => {
            log::warn!("{:?} is {} bytes, expected {} - rebuilding", path, data.len(), FILE_LEN);
            vec![0; FILE_LEN]
        }
        Err(_) => vec![0; FILE_LEN],
    };

    let mut w = ByteWriter::with_capacity(BLOCK_LEN);
    for row in scores {
        for &hole in row {
            w.write_i32(hole);
        }
    }
    data[league_index * BLOCK_LEN..(league_index + 1) * BLOCK_LEN].copy_from_slice(&w.finish());

    fs::write(&path, data)?;
    Ok(())
}

/// Zero one league's block.
pub fn clear(dir: &Path, league_index: usize) -> Result<(), SaveError> {
    store(dir, league_index, &[[0; HOLE_COUNT]; PLAYER_COUNT])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn blocks_are_disjoint() {
        let dir = TempDir::new().unwrap();

        let mut first = [[0; HOLE_COUNT]; PLAYER_COUNT];
        first[0][0] = 3;
        first[14][17] = 5;
        let mut second = [[0; HOLE_COUNT]; PLAYER_COUNT];
        second[7][9] = 4;

        store(dir.path(), 0, &first).unwrap();
        store(dir.path(), 12, &second).unwrap();

        assert_eq!(load(dir.path(), 0), first);
        assert_eq!(load(dir.path(), 12), second);
        assert_eq!(load(dir.path(), 5), [[0; HOLE_COUNT]; PLAYER_COUNT]);

        // the file holds every identity at full size
        let len = std::fs::metadata(dir.path().join(HISTORY_FILE)).unwrap().len();
        assert_eq!(len as usize, FILE_LEN);
    }

    #[test]
    fn missing_database_reads_empty() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load(dir.path(), 3), [[0; HOLE_COUNT]; PLAYER_COUNT]);
    }

    #[test]
    fn wrong_size_database_is_rebuilt() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(HISTORY_FILE), [1u8; 10]).unwrap();

        assert_eq!(load(dir.path(), 0), [[0; HOLE_COUNT]; PLAYER_COUNT]);

        let mut scores = [[0; HOLE_COUNT]; PLAYER_COUNT];
        scores[1][1] = 7;
        store(dir.path(), 1, &scores).unwrap();
        assert_eq!(load(dir.path(), 1), scores);
    }

    #[test]
    fn clear_zeroes_only_one_block() {
        let dir = TempDir::new().unwrap();
        let mut scores = [[2; HOLE_COUNT]; PLAYER_COUNT];
        scores[3][3] = 9;

        store(dir.path(), 2, &scores).unwrap();
        store(dir.path(), 4, &scores).unwrap();
        clear(dir.path(), 2).unwrap();

        assert_eq!(load(dir.path(), 2), [[0; HOLE_COUNT]; PLAYER_COUNT]);
        assert_eq!(load(dir.path(), 4), scores);
    }
}
