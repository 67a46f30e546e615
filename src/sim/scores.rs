/// High score table and its on-disk form.
///
/// ## File format (`scores.dat`):
///   A flat stream of 7-byte records, best first:
///     bytes 0..3  name (three raw bytes, initials A-Z)
///     bytes 3..7  score (i32, little-endian)
///   At most MAX_SCORES records. A truncated trailing record is ignored.
///
/// Failures never stop the game: a missing or unreadable file loads as an
/// empty table, and a failed save leaves the file as it was.

use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};

pub const MAX_SCORES: usize = 8;
pub const NAME_LEN: usize = 3;
const RECORD_LEN: usize = NAME_LEN + 4;

// ══════════════════════════════════════════════════════════════
// Records
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PlayerRecord {
    name: [u8; NAME_LEN],
    score: i32,
}

impl PlayerRecord {
    pub fn new(name: [u8; NAME_LEN], score: i32) -> Self {
        PlayerRecord { name, score }
    }

    pub fn name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.name);
        out.extend_from_slice(&self.score.to_le_bytes());
    }

    fn decode(chunk: &[u8]) -> Option<Self> {
        if chunk.len() < RECORD_LEN { return None; }
        let name = [chunk[0], chunk[1], chunk[2]];
        let score = i32::from_le_bytes([chunk[3], chunk[4], chunk[5], chunk[6]]);
        Some(PlayerRecord { name, score })
    }
}

// ══════════════════════════════════════════════════════════════
// Table
// ══════════════════════════════════════════════════════════════

#[derive(Clone, Debug, Default)]
pub struct ScoreTable {
    records: Vec<PlayerRecord>,
}

impl ScoreTable {
    pub fn new() -> Self {
        ScoreTable::default()
    }

    /// Insert before the first strictly lower score, so ties keep the
    /// older record on top. The table never grows past MAX_SCORES.
    pub fn insert(&mut self, record: PlayerRecord) {
        let at = self.records
            .iter()
            .position(|r| r.score < record.score)
            .unwrap_or(self.records.len());
        self.records.insert(at, record);
        self.records.truncate(MAX_SCORES);
    }

    /// Records, best first.
    pub fn iter(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn best(&self) -> Option<i32> {
        self.records.first().map(|r| r.score)
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.records.len() * RECORD_LEN);
        for r in self.records.iter().take(MAX_SCORES) {
            r.encode(&mut out);
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Self {
        let mut table = ScoreTable::new();
        for chunk in bytes.chunks(RECORD_LEN) {
            if let Some(r) = PlayerRecord::decode(chunk) {
                table.insert(r);
            }
        }
        table
    }

    // ── File I/O ──

    /// Load from `path`; any failure yields an empty table.
    pub fn load(path: &Path) -> Self {
        match std::fs::read(path) {
            Ok(bytes) => {
                let table = ScoreTable::decode(&bytes);
                info!("loaded {} high scores from {}", table.len(), path.display());
                table
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => ScoreTable::new(),
            Err(e) => {
                warn!("cannot read high scores from {}: {}", path.display(), e);
                ScoreTable::new()
            }
        }
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.encode())
    }
}

// ══════════════════════════════════════════════════════════════
// Paths
// ══════════════════════════════════════════════════════════════

/// Where a data file (scores, log) lives. Relative names resolve against
/// the first writable data directory.
pub fn data_path(file: &str) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        return p.to_path_buf();
    }
    data_dir().join(p)
}

fn data_dir() -> PathBuf {
    // 1. Exe directory, when writable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            let test_path = parent.join(".write_test_pyramid_hop");
            if std::fs::write(&test_path, "").is_ok() {
                let _ = std::fs::remove_file(&test_path);
                return parent.to_path_buf();
            }
        }
    }

    // 2. ~/.local/share/pyramid-hop for system installs
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/pyramid-hop");
        if std::fs::create_dir_all(&xdg).is_ok() {
            return xdg;
        }
    }

    // 3. CWD
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, score: i32) -> PlayerRecord {
        let b = name.as_bytes();
        PlayerRecord::new([b[0], b[1], b[2]], score)
    }

    fn scores(t: &ScoreTable) -> Vec<i32> {
        t.iter().map(|r| r.score()).collect()
    }

    #[test]
    fn iterates_best_first() {
        let mut t = ScoreTable::new();
        t.insert(rec("AAA", 50));
        t.insert(rec("BBB", 200));
        t.insert(rec("CCC", 10));
        assert_eq!(scores(&t), vec![200, 50, 10]);
        assert_eq!(t.best(), Some(200));
    }

    #[test]
    fn ties_keep_older_first() {
        let mut t = ScoreTable::new();
        t.insert(rec("OLD", 100));
        t.insert(rec("NEW", 100));
        let names: Vec<String> = t.iter().map(|r| r.name()).collect();
        assert_eq!(names, vec!["OLD", "NEW"]);
    }

    #[test]
    fn capped_at_max() {
        let mut t = ScoreTable::new();
        for s in 0..12 {
            t.insert(rec("XYZ", s * 10));
        }
        assert_eq!(t.len(), MAX_SCORES);
        assert_eq!(scores(&t)[0], 110);
        assert_eq!(*scores(&t).last().unwrap(), 40);
        assert_eq!(t.encode().len(), MAX_SCORES * 7);
    }

    #[test]
    fn record_layout() {
        let mut t = ScoreTable::new();
        t.insert(rec("JOE", 0x0102_0304));
        assert_eq!(t.encode(), vec![b'J', b'O', b'E', 0x04, 0x03, 0x02, 0x01]);
    }

    #[test]
    fn decode_ignores_trailing_bytes() {
        let mut bytes = ScoreTable::decode(&[]).encode();
        assert!(bytes.is_empty());
        bytes.extend_from_slice(&[b'A', b'B', b'C', 100, 0, 0, 0]);
        bytes.extend_from_slice(&[b'D', b'E', b'F', 50, 0, 0, 0]);
        bytes.extend_from_slice(&[b'G', b'H']);
        let t = ScoreTable::decode(&bytes);
        assert_eq!(t.len(), 2);
        assert_eq!(t.iter().next().map(|r| r.name()), Some("ABC".to_string()));
        assert_eq!(scores(&t), vec![100, 50]);
    }

    #[test]
    fn negative_scores_survive() {
        let mut t = ScoreTable::new();
        t.insert(rec("NEG", -5));
        let back = ScoreTable::decode(&t.encode());
        assert_eq!(scores(&back), vec![-5]);
    }

    #[test]
    fn missing_file_loads_empty() {
        let path = std::env::temp_dir().join("pyramid_hop_no_such_scores.dat");
        let _ = std::fs::remove_file(&path);
        assert!(ScoreTable::load(&path).is_empty());
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("pyramid_hop_scores_{}.dat", std::process::id()));
        let mut t = ScoreTable::new();
        t.insert(rec("AAA", 300));
        t.insert(rec("BBB", 700));
        t.save(&path).unwrap();
        let back = ScoreTable::load(&path);
        let _ = std::fs::remove_file(&path);
        assert_eq!(scores(&back), vec![700, 300]);
    }

    #[test]
    fn absolute_path_kept() {
        let abs = std::env::temp_dir().join("x.dat");
        assert_eq!(data_path(abs.to_str().unwrap()), abs);
    }

    #[test]
    fn log_and_scores_share_a_directory() {
        let log = data_path("pyramid-hop.log");
        let scores = data_path("scores.dat");
        assert!(log.ends_with("pyramid-hop.log"));
        assert_eq!(log.parent(), scores.parent());
    }
}
