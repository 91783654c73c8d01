//! Search configuration and opponent presets.
//!
//! A [`SearchConfig`] is built once per game or opponent level and read-only
//! during search. It can come from a numbered preset ([`SearchConfig::level`])
//! or from JSON ([`SearchConfig::from_json`]). Anything missing or unknown
//! falls back to the safe default: a shallow fixed-depth material search.
//!
//! ## JSON format
//!
//! ```json
//! {
//!   "level": 100,
//!   "algorithm": "iterative",
//!   "depth": 4,
//!   "depth_table": [{ "max_empty": 20, "depth": 6 }],
//!   "time_limit_ms": 500,
//!   "max_depth": 10,
//!   "simulations": 200,
//!   "exploration": 1.41,
//!   "seed": 7,
//!   "endgame": { "max_empty": 12, "use_pruning": true },
//!   "evaluator": { "kind": "composite", "features": { "stable_bonus": 4 } },
//!   "cache_capacity": 100000
//! }
//! ```
//!
//! Every field is optional; `level` selects the preset the other fields
//! override.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    CACHE_CAPACITY, DEFAULT_DEPTH, DEFAULT_TIME_LIMIT_MS, DYNAMIC_FALLBACK_DEPTH,
    ENDGAME_MAX_EMPTY, MAX_SEARCH_DEPTH, MCTS_EXPLORATION, MCTS_SEED,
    MCTS_SIMULATIONS,
};
use crate::eval::Evaluator;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which search drives move selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    FixedDepth,
    Iterative,
    Mcts,
}

impl Algorithm {
    fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fixed_depth" | "fixed" | "minimax" => Some(Algorithm::FixedDepth),
            "iterative" => Some(Algorithm::Iterative),
            "mcts" => Some(Algorithm::Mcts),
            _ => None,
        }
    }
}

/// One row of a dynamic depth table: use `depth` when at most `max_empty`
/// cells are empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthRow {
    pub max_empty: usize,
    pub depth: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DepthPolicy {
    Fixed(u32),
    /// Rows are tried in order; the first matching row wins.
    Dynamic(Vec<DepthRow>),
}

impl DepthPolicy {
    pub fn depth_for(&self, empty: usize) -> u32 {
        match self {
            DepthPolicy::Fixed(d) => *d,
            DepthPolicy::Dynamic(table) => table
                .iter()
                .find(|row| empty <= row.max_empty)
                .map(|row| row.depth)
                .unwrap_or(DYNAMIC_FALLBACK_DEPTH),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MctsParams {
    /// Playouts per root move.
    pub simulations: usize,
    /// UCT exploration constant.
    pub exploration: f64,
    pub seed: u64,
}

impl Default for MctsParams {
    fn default() -> Self {
        Self {
            simulations: MCTS_SIMULATIONS,
            exploration: MCTS_EXPLORATION,
            seed: MCTS_SEED,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndgameParams {
    /// The exact solver runs at or below this many empty cells.
    pub max_empty: usize,
    /// Stop expanding siblings once the maximum margin is reached.
    pub use_pruning: bool,
}

impl Default for EndgameParams {
    fn default() -> Self {
        Self {
            max_empty: ENDGAME_MAX_EMPTY,
            use_pruning: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchConfig {
    pub algorithm: Algorithm,
    pub depth: DepthPolicy,
    /// Wall-clock budget for iterative deepening and MCTS.
    pub time_limit: Duration,
    /// Iterative deepening never goes deeper than this.
    pub max_depth: u32,
    pub mcts: MctsParams,
    /// `None` disables the exact endgame solver.
    pub endgame: Option<EndgameParams>,
    pub evaluator: Evaluator,
    pub cache_capacity: usize,
}

impl Default for SearchConfig {
    /// Shallow fixed-depth material search.
    fn default() -> Self {
        Self {
            algorithm: Algorithm::FixedDepth,
            depth: DepthPolicy::Fixed(DEFAULT_DEPTH),
            time_limit: Duration::from_millis(DEFAULT_TIME_LIMIT_MS),
            max_depth: MAX_SEARCH_DEPTH,
            mcts: MctsParams::default(),
            endgame: None,
            evaluator: Evaluator::default(),
            cache_capacity: CACHE_CAPACITY,
        }
    }
}

/// Dynamic depth table used by the level 100 preset.
pub fn default_depth_table() -> Vec<DepthRow> {
    vec![
        DepthRow { max_empty: 12, depth: 8 },
        DepthRow { max_empty: 24, depth: 6 },
        DepthRow { max_empty: 44, depth: 4 },
        DepthRow { max_empty: 64, depth: 3 },
    ]
}

impl SearchConfig {
    /// Numbered opponent presets. Unknown levels fall back to level 1.
    ///
    /// | level | search                                  | evaluator  |
    /// |-------|-----------------------------------------|------------|
    /// | 1-3   | fixed depth 1-3                         | material   |
    /// | 4     | fixed depth 6                           | material   |
    /// | 99    | fixed depth 6, endgame solver           | composite  |
    /// | 100   | dynamic depth table, endgame solver     | composite  |
    /// | 101   | iterative deepening, 1 s, endgame solver| composite  |
    /// | 102   | MCTS, 100 playouts per move, 1 s        | final count|
    pub fn level(level: u32) -> Self {
        let base = Self::default();
        match level {
            1..=3 => Self {
                depth: DepthPolicy::Fixed(level),
                ..base
            },
            4 => Self {
                depth: DepthPolicy::Fixed(6),
                ..base
            },
            99 => Self {
                depth: DepthPolicy::Fixed(6),
                endgame: Some(EndgameParams::default()),
                evaluator: Evaluator::strategic(),
                ..base
            },
            100 => Self {
                depth: DepthPolicy::Dynamic(default_depth_table()),
                endgame: Some(EndgameParams::default()),
                evaluator: Evaluator::strategic(),
                ..base
            },
            101 => Self {
                algorithm: Algorithm::Iterative,
                endgame: Some(EndgameParams::default()),
                evaluator: Evaluator::strategic(),
                ..base
            },
            102 => Self {
                algorithm: Algorithm::Mcts,
                evaluator: Evaluator::Material { corner_bonus: None },
                ..base
            },
            other => {
                log::warn!("unknown opponent level {other}, using level 1");
                Self::level(1)
            }
        }
    }

    /// Parse a JSON configuration. Only malformed JSON is an error; unknown
    /// names and missing fields fall back to defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(text)?;
        Ok(raw.resolve())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Depth for a fixed-depth search at the given empty-cell count.
    pub fn depth_for(&self, empty: usize) -> u32 {
        self.depth.depth_for(empty)
    }

    /// Whether the exact solver should handle a position with `empty` cells left.
    pub fn use_endgame(&self, empty: usize) -> bool {
        self.endgame.is_some_and(|e| empty <= e.max_empty)
    }
}

/// On-disk shape of a configuration; every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawConfig {
    level: Option<u32>,
    algorithm: Option<String>,
    depth: Option<u32>,
    depth_table: Option<Vec<DepthRow>>,
    time_limit_ms: Option<u64>,
    max_depth: Option<u32>,
    simulations: Option<usize>,
    exploration: Option<f64>,
    seed: Option<u64>,
    endgame: Option<EndgameParams>,
    evaluator: Option<serde_json::Value>,
    cache_capacity: Option<usize>,
}

impl RawConfig {
    fn resolve(self) -> SearchConfig {
        let mut cfg = self.level.map(SearchConfig::level).unwrap_or_default();

        if let Some(name) = self.algorithm {
            cfg.algorithm = Algorithm::parse(&name).unwrap_or_else(|| {
                log::warn!("unknown algorithm {name:?}, using fixed-depth search");
                Algorithm::FixedDepth
            });
        }
        if let Some(table) = self.depth_table.filter(|t| !t.is_empty()) {
            cfg.depth = DepthPolicy::Dynamic(table);
        }
        if let Some(depth) = self.depth {
            if depth == 0 {
                log::warn!("depth 0 requested, using {DEFAULT_DEPTH}");
            }
            cfg.depth = DepthPolicy::Fixed(depth.max(DEFAULT_DEPTH));
        }
        if let Some(ms) = self.time_limit_ms {
            cfg.time_limit = Duration::from_millis(ms);
        }
        if let Some(max_depth) = self.max_depth {
            cfg.max_depth = max_depth.max(1);
        }
        if let Some(n) = self.simulations {
            cfg.mcts.simulations = n.max(1);
        }
        if let Some(c) = self.exploration.filter(|c| c.is_finite() && *c >= 0.0) {
            cfg.mcts.exploration = c;
        }
        if let Some(seed) = self.seed {
            cfg.mcts.seed = seed;
        }
        if self.endgame.is_some() {
            cfg.endgame = self.endgame;
        }
        if let Some(value) = self.evaluator {
            cfg.evaluator = serde_json::from_value(value).unwrap_or_else(|err| {
                log::warn!("unusable evaluator ({err}), using material");
                Evaluator::default()
            });
        }
        if let Some(cap) = self.cache_capacity {
            cfg.cache_capacity = cap.max(1);
        }
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::Features;

    #[test]
    fn test_default_is_shallow_material() {
        let cfg = SearchConfig::default();
        assert_eq!(cfg.algorithm, Algorithm::FixedDepth);
        assert_eq!(cfg.depth_for(60), 1);
        assert_eq!(cfg.evaluator, Evaluator::default());
        assert!(cfg.endgame.is_none());
    }

    #[test]
    fn test_unknown_level_falls_back() {
        assert_eq!(SearchConfig::level(42), SearchConfig::level(1));
    }

    #[test]
    fn test_dynamic_depth_table() {
        let policy = DepthPolicy::Dynamic(default_depth_table());
        assert_eq!(policy.depth_for(10), 8);
        assert_eq!(policy.depth_for(12), 8);
        assert_eq!(policy.depth_for(30), 4);
        assert_eq!(policy.depth_for(64), 3);
        assert_eq!(policy.depth_for(100), DYNAMIC_FALLBACK_DEPTH);
    }

    #[test]
    fn test_empty_json_is_default() {
        let cfg = SearchConfig::from_json("{}").unwrap();
        assert_eq!(cfg, SearchConfig::default());
    }

    #[test]
    fn test_json_overrides_preset() {
        let cfg = SearchConfig::from_json(
            r#"{
                "level": 101,
                "time_limit_ms": 250,
                "evaluator": { "kind": "composite", "features": { "parity_bonus": 5 } }
            }"#,
        )
        .unwrap();
        assert_eq!(cfg.algorithm, Algorithm::Iterative);
        assert_eq!(cfg.time_limit, Duration::from_millis(250));
        match &cfg.evaluator {
            Evaluator::Composite { features, .. } => assert_eq!(
                features,
                &Features {
                    parity_bonus: Some(5),
                    ..Features::default()
                }
            ),
            other => panic!("unexpected evaluator {other:?}"),
        }
        assert!(cfg.use_endgame(12));
        assert!(!cfg.use_endgame(13));
    }

    #[test]
    fn test_unknown_names_fail_closed() {
        let cfg = SearchConfig::from_json(
            r#"{ "algorithm": "quantum", "evaluator": { "kind": "oracle" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.algorithm, Algorithm::FixedDepth);
        assert_eq!(cfg.evaluator, Evaluator::default());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(matches!(
            SearchConfig::from_json("{ not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SearchConfig::load("/nonexistent/othello.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
