use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::engines::generation::evolution_engine::{check_unit_rate, EvolutionConfig as EngineConfig};
use crate::engines::generation::genome::encode_solution;
use crate::engines::generation::mutation::MutationStrategy;
use crate::error::EvoError;
use clap::ValueEnum;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub solution: String,
    /// Fraction of the ranked population carried over unchanged
    pub elitism: f64,
    /// Per-individual probability, per strategy, of being mutated
    pub mutation_rate: f64,
    pub tournament_size: usize,
    #[serde(deserialize_with = "deserialize_strategies")]
    pub mutation_strategies: Vec<MutationStrategy>,
    pub protect_elites: bool,
    /// Lowest code a random draw may produce (inclusive)
    pub gene_min: u32,
    /// Highest code a random draw may produce (inclusive)
    pub gene_max: u32,
    pub seed: Option<u64>,
}

/// Accepts a list (files) or a comma-separated string (environment variables).
fn deserialize_strategies<'de, D>(deserializer: D) -> Result<Vec<MutationStrategy>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Strategies {
        List(Vec<MutationStrategy>),
        Joined(String),
    }

    match Strategies::deserialize(deserializer)? {
        Strategies::List(list) => Ok(list),
        Strategies::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| MutationStrategy::from_str(name, true).map_err(serde::de::Error::custom))
            .collect(),
    }
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 10000,
            generations: 100,
            solution: "Hello world!".to_string(),
            elitism: 0.1,
            mutation_rate: 0.1,
            tournament_size: 64,
            mutation_strategies: MutationStrategy::ALL.to_vec(),
            protect_elites: false,
            gene_min: 0,
            gene_max: 255,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elitism).floor() as usize
    }

    /// Build the engine's view of this section. Call `validate` first.
    pub fn to_engine_config(&self) -> EngineConfig {
        let solution = encode_solution(&self.solution);
        let gene_range = self.gene_min..self.gene_max + 1;

        if let Some(code) = solution.iter().find(|code| !gene_range.contains(code)) {
            log::warn!(
                "Solution code {} lies outside the gene range {}..={}, an exact match is unreachable",
                code,
                self.gene_min,
                self.gene_max
            );
        }

        EngineConfig {
            population_size: self.population_size,
            generations: self.generations,
            solution,
            gene_range,
            elitism_rate: self.elitism,
            mutation_rate: self.mutation_rate,
            tournament_size: self.tournament_size,
            mutation_strategies: self.mutation_strategies.clone(),
            protect_elites: self.protect_elites,
            seed: self.seed,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), EvoError> {
        check_unit_rate("Elitism", self.elitism)?;
        check_unit_rate("Mutation rate", self.mutation_rate)?;
        let elite_count = self.elite_count();
        if self.population_size == 0 || elite_count >= self.population_size {
            return Err(EvoError::EmptyPopulation {
                population_size: self.population_size,
                elite_count,
            });
        }
        let breeding_pool = self.population_size - elite_count;
        if self.tournament_size < 2 || self.tournament_size > breeding_pool {
            return Err(EvoError::SampleSize {
                requested: self.tournament_size,
                available: breeding_pool,
            });
        }
        if self.solution.is_empty() {
            return Err(EvoError::Configuration(
                "Solution must not be empty".to_string()
            ));
        }
        if self.gene_min > self.gene_max || self.gene_max == u32::MAX {
            return Err(EvoError::Configuration(
                "Gene range must satisfy gene_min <= gene_max < u32::MAX".to_string()
            ));
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Evolution".to_string(),
            fields: vec![
                FieldManifest {
                    name: "population_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(self.population_size),
                    min: Some(1.0),
                    max: None,
                    description: "Number of genomes kept alive each generation".to_string(),
                },
                FieldManifest {
                    name: "generations".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(self.generations),
                    min: Some(0.0),
                    max: None,
                    description: "Maximum number of generations before giving up".to_string(),
                },
                FieldManifest {
                    name: "solution".to_string(),
                    field_type: "string".to_string(),
                    default: serde_json::json!(self.solution),
                    min: None,
                    max: None,
                    description: "Target string the population evolves towards".to_string(),
                },
                FieldManifest {
                    name: "elitism".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(self.elitism),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Fraction of best genomes copied into the next generation".to_string(),
                },
                FieldManifest {
                    name: "mutation_rate".to_string(),
                    field_type: "float".to_string(),
                    default: serde_json::json!(self.mutation_rate),
                    min: Some(0.0),
                    max: Some(1.0),
                    description: "Chance per genome and strategy of being mutated".to_string(),
                },
                FieldManifest {
                    name: "tournament_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(self.tournament_size),
                    min: Some(2.0),
                    max: None,
                    description: "Genomes sampled per tournament; the best two become parents".to_string(),
                },
                FieldManifest {
                    name: "mutation_strategies".to_string(),
                    field_type: "list".to_string(),
                    default: serde_json::json!(self.mutation_strategies),
                    min: None,
                    max: None,
                    description: "Ordered mutation passes: complete, single-char, scramble".to_string(),
                },
                FieldManifest {
                    name: "protect_elites".to_string(),
                    field_type: "boolean".to_string(),
                    default: serde_json::json!(self.protect_elites),
                    min: None,
                    max: None,
                    description: "Skip the mutation pass for carried-over elites".to_string(),
                },
                FieldManifest {
                    name: "gene_min".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(self.gene_min),
                    min: Some(0.0),
                    max: None,
                    description: "Lowest character code drawn at random".to_string(),
                },
                FieldManifest {
                    name: "gene_max".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(self.gene_max),
                    min: Some(0.0),
                    max: None,
                    description: "Highest character code drawn at random".to_string(),
                },
                FieldManifest {
                    name: "seed".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(self.seed),
                    min: Some(0.0),
                    max: None,
                    description: "Random seed; unset draws one from the OS".to_string(),
                },
            ],
        }
    }
}
