/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the current
/// directory or `~/.local/share/pyramid-hop`, first match wins.
/// Falls back to defaults if the file is missing or incomplete.
///
/// ```toml
/// [speed]
/// tick_rate_ms = 16
///
/// [general]
/// scores_file = "scores.dat"
/// seed = 1234            # optional: reproducible enemy behaviour
/// log_file = "pyramid-hop.log"
/// log_level = "info"
///
/// [audio]
/// enabled = true
/// ```

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    pub scores_file: String,
    pub seed: Option<u64>,
    pub log_file: String,
    pub log_level: String,
    pub audio_enabled: bool,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
}

impl SpeedConfig {
    /// Fixed simulation step in seconds.
    pub fn dt(&self) -> f32 {
        self.tick_rate_ms as f32 / 1000.0
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    general: TomlGeneral,
    #[serde(default)]
    audio: TomlAudio,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default = "default_scores_file")]
    scores_file: String,
    #[serde(default)]
    seed: Option<u64>,
    #[serde(default = "default_log_file")]
    log_file: String,
    #[serde(default = "default_log_level")]
    log_level: String,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_audio_enabled")]
    enabled: bool,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 16 }   // ~60 Hz
fn default_scores_file() -> String { "scores.dat".into() }
fn default_log_file() -> String { "pyramid-hop.log".into() }
fn default_log_level() -> String { "info".into() }
fn default_audio_enabled() -> bool { true }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed { tick_rate_ms: default_tick_rate() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            scores_file: default_scores_file(),
            seed: None,
            log_file: default_log_file(),
            log_level: default_log_level(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio { enabled: default_audio_enabled() }
    }
}

impl From<TomlConfig> for GameConfig {
    fn from(t: TomlConfig) -> Self {
        GameConfig {
            // A zero step would spin the loop without advancing time.
            speed: SpeedConfig { tick_rate_ms: t.speed.tick_rate_ms.max(1) },
            scores_file: t.general.scores_file,
            seed: t.general.seed,
            log_file: t.general.log_file,
            log_level: t.general.log_level,
            audio_enabled: t.audio.enabled,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        TomlConfig::default().into()
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Missing file or missing keys gracefully fall back to defaults.
    /// Problems found along the way are returned for the caller to report
    /// once logging is up.
    pub fn load() -> (Self, Vec<String>) {
        load_from(&candidate_dirs())
    }

    /// Parse config text. Missing keys take their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<TomlConfig>(text).map(Into::into)
    }
}

/// Candidate directories to search: exe dir, CWD, data home (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. ~/.local/share/pyramid-hop
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/pyramid-hop");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

fn load_from(search_dirs: &[PathBuf]) -> (GameConfig, Vec<String>) {
    let mut problems = Vec::new();
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if !path.exists() { continue; }
        match std::fs::read_to_string(&path) {
            Ok(text) => match GameConfig::from_toml_str(&text) {
                Ok(cfg) => return (cfg, problems),
                Err(e) => {
                    problems.push(format!(
                        "{} parse error, using default settings: {}",
                        path.display(), e
                    ));
                    return (GameConfig::default(), problems);
                }
            },
            Err(e) => problems.push(format!("could not read {}: {}", path.display(), e)),
        }
    }
    (GameConfig::default(), problems)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> GameConfig {
        GameConfig::from_toml_str(text).unwrap()
    }

    /// Fresh scratch directory under the system temp dir.
    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir()
            .join(format!("pyramid-hop-{}-{}", name, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn empty_file_gives_defaults() {
        let c = parse("");
        assert_eq!(c.speed.tick_rate_ms, 16);
        assert_eq!(c.scores_file, "scores.dat");
        assert_eq!(c.seed, None);
        assert_eq!(c.log_level, "info");
        assert!(c.audio_enabled);
    }

    #[test]
    fn partial_sections() {
        let c = parse("[general]\nseed = 99\n\n[audio]\nenabled = false\n");
        assert_eq!(c.seed, Some(99));
        assert!(!c.audio_enabled);
        assert_eq!(c.log_file, "pyramid-hop.log");
        assert_eq!(c.speed.tick_rate_ms, 16);
    }

    #[test]
    fn bad_toml_is_an_error() {
        assert!(GameConfig::from_toml_str("[speed\ntick_rate_ms = ").is_err());
    }

    #[test]
    fn bad_file_falls_back_and_reports() {
        let dir = scratch_dir("bad");
        std::fs::write(dir.join("config.toml"), "[speed\ntick_rate_ms = ").unwrap();
        let (c, problems) = load_from(&[dir.clone()]);
        assert_eq!(c.speed.tick_rate_ms, 16);
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("parse error"));
        assert!(problems[0].contains("config.toml"));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn first_good_file_wins_quietly() {
        let empty = scratch_dir("empty");
        let good = scratch_dir("good");
        std::fs::write(good.join("config.toml"), "[speed]\ntick_rate_ms = 20\n").unwrap();
        let (c, problems) = load_from(&[empty.clone(), good.clone()]);
        assert_eq!(c.speed.tick_rate_ms, 20);
        assert!(problems.is_empty());
        let _ = std::fs::remove_dir_all(&empty);
        let _ = std::fs::remove_dir_all(&good);
    }

    #[test]
    fn zero_tick_rate_is_clamped() {
        let c = parse("[speed]\ntick_rate_ms = 0\n");
        assert_eq!(c.speed.tick_rate_ms, 1);
        assert!(c.speed.dt() > 0.0);
    }

    #[test]
    fn dt_in_seconds() {
        let c = parse("[speed]\ntick_rate_ms = 20\n");
        assert!((c.speed.dt() - 0.02).abs() < 1e-6);
    }
}
