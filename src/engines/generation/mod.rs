pub mod evolution_engine;
pub mod fitness;
pub mod genome;
pub mod mutation;
pub mod operators;
pub mod progress;

pub use genome::Genome;
pub use evolution_engine::{EvolutionEngine, EvolutionConfig, EvolutionOutcome, ProgressCallback, Termination};
pub use fitness::{genome_error, rank_population};
pub use mutation::MutationStrategy;
pub use operators::{crossbreed, random_genome, tournament_selection};
pub use progress::{best_scorer_line, final_line, ConsoleProgressCallback, SilentProgressCallback};
