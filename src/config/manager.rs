use super::{evolution::EvolutionConfig, traits::ConfigSection};
use crate::error::EvoError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix of environment overrides, e.g. `STRINGEVO__EVOLUTION__POPULATION_SIZE=500`
pub const ENV_PREFIX: &str = "STRINGEVO";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub evolution: EvolutionConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), EvoError> {
        self.evolution.validate()?;
        Ok(())
    }
}

pub struct ConfigManager {
    config: AppConfig,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Layer an optional TOML/JSON file and `STRINGEVO__*` environment variables over
    /// the defaults.
    pub fn load(&mut self, path: Option<&Path>) -> Result<(), EvoError> {
        self.load_with_prefix(path, ENV_PREFIX)
    }

    /// Values stay strings; typed fields convert them on deserialization, so a
    /// numeric-looking `solution` such as `007` is kept verbatim.
    fn load_with_prefix(&mut self, path: Option<&Path>, env_prefix: &str) -> Result<(), EvoError> {
        let mut builder = ::config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(::config::File::from(path).required(true));
        }
        builder = builder.add_source(
            ::config::Environment::with_prefix(env_prefix).separator("__"),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        log::debug!("Loaded configuration: {:?}", config);
        self.config = config;
        Ok(())
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<(), EvoError> {
        self.load(Some(path.as_ref()))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), EvoError> {
        let toml_str = toml::to_string_pretty(&self.config)?;

        std::fs::write(path, toml_str)?;

        Ok(())
    }

    pub fn get(&self) -> AppConfig {
        self.config.clone()
    }

    /// Apply `f` and keep the result only if it still validates.
    pub fn update<F>(&mut self, f: F) -> Result<(), EvoError>
    where
        F: FnOnce(&mut AppConfig),
    {
        let mut config = self.config.clone();
        f(&mut config);
        config.validate()?;
        self.config = config;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::mutation::MutationStrategy;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("stringevo-{}-{}", std::process::id(), name))
    }

    #[test]
    fn test_save_then_load_file() {
        let path = temp_path("saved.toml");
        let mut manager = ConfigManager::new();
        manager
            .update(|c| {
                c.evolution.population_size = 200;
                c.evolution.tournament_size = 8;
                c.evolution.solution = "rust".to_string();
                c.evolution.mutation_strategies = vec![MutationStrategy::Scramble];
                c.evolution.seed = Some(99);
            })
            .unwrap();
        manager.save_to_file(&path).unwrap();

        let mut loaded = ConfigManager::new();
        loaded.load_from_file(&path).unwrap();
        let config = loaded.get();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.evolution.population_size, 200);
        assert_eq!(config.evolution.solution, "rust");
        assert_eq!(config.evolution.mutation_strategies, vec![MutationStrategy::Scramble]);
        assert_eq!(config.evolution.seed, Some(99));
    }

    #[test]
    fn test_partial_file_falls_back_to_defaults() {
        let path = temp_path("partial.toml");
        std::fs::write(&path, "[evolution]\nsolution = \"partial\"\n").unwrap();

        let mut manager = ConfigManager::new();
        manager.load_from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let config = manager.get();
        assert_eq!(config.evolution.solution, "partial");
        assert_eq!(config.evolution.population_size, 10000);
        assert_eq!(config.evolution.mutation_strategies, MutationStrategy::ALL.to_vec());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let path = temp_path("invalid.toml");
        std::fs::write(&path, "[evolution]\npopulation_size = 0\n").unwrap();

        let mut manager = ConfigManager::new();
        let result = manager.load_from_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(EvoError::EmptyPopulation { .. })));
        assert_eq!(manager.get(), AppConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let mut manager = ConfigManager::new();
        let result = manager.load_from_file(temp_path("does-not-exist.toml"));
        assert!(matches!(result, Err(EvoError::ConfigSource(_))));
    }

    #[test]
    fn test_environment_overrides() {
        std::env::set_var("STRINGEVO_NUMERIC__EVOLUTION__GENERATIONS", "7");
        std::env::set_var("STRINGEVO_NUMERIC__EVOLUTION__MUTATION_RATE", "0.25");
        std::env::set_var("STRINGEVO_NUMERIC__EVOLUTION__SEED", "5");

        let mut manager = ConfigManager::new();
        let result = manager.load_with_prefix(None, "STRINGEVO_NUMERIC");
        std::env::remove_var("STRINGEVO_NUMERIC__EVOLUTION__GENERATIONS");
        std::env::remove_var("STRINGEVO_NUMERIC__EVOLUTION__MUTATION_RATE");
        std::env::remove_var("STRINGEVO_NUMERIC__EVOLUTION__SEED");
        result.unwrap();

        let config = manager.get();
        assert_eq!(config.evolution.generations, 7);
        assert_eq!(config.evolution.mutation_rate, 0.25);
        assert_eq!(config.evolution.seed, Some(5));
    }

    #[test]
    fn test_numeric_looking_solution_is_kept_verbatim() {
        std::env::set_var("STRINGEVO_VERBATIM__EVOLUTION__SOLUTION", "007");
        std::env::set_var(
            "STRINGEVO_VERBATIM__EVOLUTION__MUTATION_STRATEGIES",
            "scramble, single-char",
        );

        let mut manager = ConfigManager::new();
        let result = manager.load_with_prefix(None, "STRINGEVO_VERBATIM");
        std::env::remove_var("STRINGEVO_VERBATIM__EVOLUTION__SOLUTION");
        std::env::remove_var("STRINGEVO_VERBATIM__EVOLUTION__MUTATION_STRATEGIES");
        result.unwrap();

        let config = manager.get();
        assert_eq!(config.evolution.solution, "007");
        assert_eq!(
            config.evolution.mutation_strategies,
            vec![MutationStrategy::Scramble, MutationStrategy::SingleChar]
        );
    }

    #[test]
    fn test_unknown_strategy_in_environment_is_rejected() {
        std::env::set_var("STRINGEVO_UNKNOWN__EVOLUTION__MUTATION_STRATEGIES", "complete,invert");

        let mut manager = ConfigManager::new();
        let result = manager.load_with_prefix(None, "STRINGEVO_UNKNOWN");
        std::env::remove_var("STRINGEVO_UNKNOWN__EVOLUTION__MUTATION_STRATEGIES");

        assert!(matches!(result, Err(EvoError::ConfigSource(_))));
    }

    #[test]
    fn test_update_keeps_old_config_on_failure() {
        let mut manager = ConfigManager::new();
        let result = manager.update(|c| c.evolution.mutation_rate = 2.0);
        assert!(result.is_err());
        assert_eq!(manager.get().evolution.mutation_rate, 0.1);
    }
}
