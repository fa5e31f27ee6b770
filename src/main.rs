//! stringevo: evolve a population of random strings towards a target string.
//!
//! Settings come from defaults, an optional TOML/JSON file, `STRINGEVO__*` environment
//! variables and finally the flags below, in that order.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use stringevo::config::traits::ConfigSection;
use stringevo::config::{AppConfig, ConfigManager};
use stringevo::engines::generation::{ConsoleProgressCallback, EvolutionEngine, MutationStrategy};

#[derive(Parser)]
#[command(name = "stringevo")]
#[command(author, version, about = "Genetic algorithm that evolves strings towards a target", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    /// Configuration file (TOML or JSON)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: Overrides,
}

#[derive(Subcommand)]
enum Command {
    /// Run the evolution (default)
    Run,
    /// Print the configuration manifest as JSON
    Manifest,
    /// Write the effective configuration to a TOML file
    InitConfig {
        /// Destination file
        path: PathBuf,
    },
}

#[derive(Args, Default)]
struct Overrides {
    /// Number of genomes per generation
    #[arg(long, global = true)]
    population_size: Option<usize>,
    /// Maximum number of generations
    #[arg(long, global = true)]
    generations: Option<usize>,
    /// Target string
    #[arg(short, long, global = true)]
    solution: Option<String>,
    /// Fraction of best genomes carried over unchanged
    #[arg(long, global = true)]
    elitism: Option<f64>,
    /// Per-genome mutation probability
    #[arg(long, global = true)]
    mutation_rate: Option<f64>,
    /// Genomes sampled per tournament
    #[arg(long, global = true)]
    tournament_size: Option<usize>,
    /// Mutation passes, applied in the given order
    #[arg(long = "mutation", value_enum, num_args = 1.., global = true)]
    mutations: Option<Vec<MutationStrategy>>,
    /// Do not mutate carried-over elites
    #[arg(long, global = true)]
    protect_elites: bool,
    /// Random seed for reproducible runs
    #[arg(long, global = true)]
    seed: Option<u64>,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        let evolution = &mut config.evolution;
        if let Some(v) = self.population_size {
            evolution.population_size = v;
        }
        if let Some(v) = self.generations {
            evolution.generations = v;
        }
        if let Some(v) = self.solution {
            evolution.solution = v;
        }
        if let Some(v) = self.elitism {
            evolution.elitism = v;
        }
        if let Some(v) = self.mutation_rate {
            evolution.mutation_rate = v;
        }
        if let Some(v) = self.tournament_size {
            evolution.tournament_size = v;
        }
        if let Some(v) = self.mutations {
            evolution.mutation_strategies = v;
        }
        if self.protect_elites {
            evolution.protect_elites = true;
        }
        if let Some(v) = self.seed {
            evolution.seed = Some(v);
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let mut manager = ConfigManager::new();
    manager
        .load(cli.config.as_deref())
        .context("Failed to load configuration")?;
    manager
        .update(|config| cli.overrides.apply(config))
        .context("Invalid command line settings")?;
    let config = manager.get();

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let mut engine = EvolutionEngine::new(config.evolution.to_engine_config())?;
            let outcome = engine.run(ConsoleProgressCallback)?;
            Ok(if outcome.solution_found() {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(1)
            })
        }
        Command::Manifest => {
            let manifest = config.evolution.to_manifest();
            println!("{}", serde_json::to_string_pretty(&manifest)?);
            Ok(ExitCode::SUCCESS)
        }
        Command::InitConfig { path } => {
            manager
                .save_to_file(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            log::info!("Configuration written to {}", path.display());
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_accepted_after_subcommand() {
        let cli = Cli::try_parse_from([
            "stringevo",
            "run",
            "--seed",
            "1",
            "--mutation",
            "scramble",
            "single-char",
            "--protect-elites",
        ])
        .unwrap();

        assert!(matches!(cli.command, Some(Command::Run)));
        let mut config = AppConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.evolution.seed, Some(1));
        assert!(config.evolution.protect_elites);
        assert_eq!(
            config.evolution.mutation_strategies,
            vec![MutationStrategy::Scramble, MutationStrategy::SingleChar]
        );
    }

    #[test]
    fn test_overrides_accepted_before_subcommand() {
        let cli = Cli::try_parse_from(["stringevo", "--solution", "007", "--generations", "3"]).unwrap();

        assert!(cli.command.is_none());
        let mut config = AppConfig::default();
        cli.overrides.apply(&mut config);
        assert_eq!(config.evolution.solution, "007");
        assert_eq!(config.evolution.generations, 3);
    }
}
