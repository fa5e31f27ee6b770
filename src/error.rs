use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvoError {
    #[error("Length mismatch: expected {expected} codes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Sample size error: cannot draw {requested} individuals from {available}")]
    SampleSize { requested: usize, available: usize },

    #[error("Empty population: size {population_size} with {elite_count} elites leaves no room for breeding")]
    EmptyPopulation {
        population_size: usize,
        elite_count: usize,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config source error: {0}")]
    ConfigSource(#[from] ::config::ConfigError),

    #[error("TOML error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Serde error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EvoError>;
