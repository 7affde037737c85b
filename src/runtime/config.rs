use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::search::{GeneticConfig, MaxPaths, SearchAlgorithm, SearchStrategyConfig};

/// Search settings read from a YAML file, plus the topology to search when
/// the file names one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchConfig {
    pub strategy: SearchStrategyConfig,
    pub topology: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawMaxPaths {
    Count(usize),
    Keyword(String),
}

#[derive(Debug, Deserialize, Default)]
struct RawGenetic {
    generations: Option<usize>,
    population_size: Option<usize>,
    mutation_probability: Option<f64>,
    seed: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct RawSearchConfig {
    algorithm: Option<String>,
    max_paths: Option<RawMaxPaths>,
    genetic: Option<RawGenetic>,
    topology: Option<String>,
}

pub fn load_search_config(path: &Path) -> Result<SearchConfig> {
    let raw_text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_search_config(&raw_text)
}

pub fn parse_search_config(raw_text: &str) -> Result<SearchConfig> {
    let raw_cfg: RawSearchConfig = if raw_text.trim().is_empty() {
        RawSearchConfig::default()
    } else {
        serde_yaml::from_str(raw_text).context("failed to parse search config yaml")?
    };

    let algorithm = match raw_cfg.algorithm {
        Some(name) => name.parse::<SearchAlgorithm>()?,
        None => SearchAlgorithm::default(),
    };
    let max_paths = match raw_cfg.max_paths {
        None => MaxPaths::All,
        Some(raw) => parse_max_paths(raw)?,
    };

    let defaults = GeneticConfig::default();
    let genetic_raw = raw_cfg.genetic.unwrap_or_default();
    let genetic = GeneticConfig {
        generations: genetic_raw.generations.unwrap_or(defaults.generations),
        population_size: genetic_raw
            .population_size
            .unwrap_or(defaults.population_size),
        mutation_probability: genetic_raw
            .mutation_probability
            .unwrap_or(defaults.mutation_probability),
        seed: genetic_raw.seed.unwrap_or(defaults.seed),
    };
    if !(0.0..=1.0).contains(&genetic.mutation_probability) {
        bail!(
            "genetic.mutation_probability must be within [0, 1], got {}",
            genetic.mutation_probability
        );
    }

    Ok(SearchConfig {
        strategy: SearchStrategyConfig {
            algorithm,
            max_paths,
            genetic,
        },
        topology: raw_cfg
            .topology
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty()),
    })
}

fn parse_max_paths(raw: RawMaxPaths) -> Result<MaxPaths> {
    match raw {
        RawMaxPaths::Count(0) => bail!("max_paths must be positive"),
        RawMaxPaths::Count(limit) => Ok(MaxPaths::Bounded(limit)),
        RawMaxPaths::Keyword(word) if word.trim().eq_ignore_ascii_case("all") => Ok(MaxPaths::All),
        RawMaxPaths::Keyword(word) => {
            let limit = word
                .trim()
                .parse::<usize>()
                .with_context(|| format!("invalid max_paths: {word}"))?;
            parse_max_paths(RawMaxPaths::Count(limit))
        }
    }
}
