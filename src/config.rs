use std::time::Duration;

use crate::generators::TerrainDistribution;

/// Tunables for the engine. The defaults match the interactive visualizer.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub rows: usize,
    pub cols: usize,
    /// Seed for generation randomness. `None` seeds from the OS.
    pub seed: Option<u64>,
    /// Extra walls removed in weighted terrain mode
    pub loop_count: usize,
    pub terrain: TerrainDistribution,
    /// Carved passages per repaint during generation
    pub generation_batch: usize,
    pub generation_delay: Duration,
    /// Expanded cells per repaint during BFS/DFS
    pub search_batch: usize,
    pub search_delay: Duration,
    /// Settled cells per repaint during Dijkstra/A*
    pub weighted_search_batch: usize,
    pub weighted_search_delay: Duration,
    /// Delay per cell while the found path is revealed
    pub path_delay: Duration,
    pub weighted_path_delay: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rows: 30,
            cols: 40,
            seed: None,
            loop_count: 120,
            terrain: TerrainDistribution::default(),
            generation_batch: 15,
            generation_delay: Duration::from_millis(1),
            search_batch: 1,
            search_delay: Duration::from_millis(10),
            weighted_search_batch: 5,
            weighted_search_delay: Duration::from_millis(1),
            path_delay: Duration::from_millis(25),
            weighted_path_delay: Duration::from_millis(15),
        }
    }
}

impl EngineConfig {
    /// Same as the default but with no pacing delays, for headless runs and tests.
    pub fn fast() -> Self {
        Self::default().without_delays()
    }

    pub fn without_delays(self) -> Self {
        Self {
            generation_delay: Duration::ZERO,
            search_delay: Duration::ZERO,
            weighted_search_delay: Duration::ZERO,
            path_delay: Duration::ZERO,
            weighted_path_delay: Duration::ZERO,
            ..self
        }
    }

    pub fn with_size(self, rows: usize, cols: usize) -> Self {
        Self { rows, cols, ..self }
    }

    pub fn with_seed(self, seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..self
        }
    }
}

pub const USAGE: &str = "Usage: terramaze [--rows N] [--cols N] [--seed N] [--loops N] [--fast]";

/// Parses command line flags (without the executable name) on top of the defaults.
pub fn parse_args<I>(args: I) -> Result<EngineConfig, String>
where
    I: IntoIterator<Item = String>,
{
    let mut config = EngineConfig::default();
    let mut args = args.into_iter();

    fn value<T: std::str::FromStr>(flag: &str, raw: Option<String>) -> Result<T, String> {
        let raw = raw.ok_or_else(|| format!("Missing value for {}", flag))?;
        raw.parse::<T>()
            .map_err(|_| format!("Invalid value for {}: {:?}", flag, raw))
    }

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--rows" => config.rows = value("--rows", args.next())?,
            "--cols" => config.cols = value("--cols", args.next())?,
            "--seed" => config.seed = Some(value("--seed", args.next())?),
            "--loops" => config.loop_count = value("--loops", args.next())?,
            "--fast" => config = config.without_delays(),
            "-h" | "--help" => return Err(USAGE.to_string()),
            other => return Err(format!("Unknown argument {:?}\n{}", other, USAGE)),
        }
    }

    if config.rows < 2 || config.cols < 2 {
        return Err(format!(
            "Maze must be at least 2x2, got {}x{}",
            config.rows, config.cols
        ));
    }
    Ok(config)
}
