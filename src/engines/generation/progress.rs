use super::evolution_engine::{EvolutionOutcome, ProgressCallback, Termination};
use super::genome::genome_to_string;

/// `Best scorer for gen <N>: <genome> (<error>)`
pub fn best_scorer_line(generation: usize, best: &[u32], best_error: u64) -> String {
    format!(
        "Best scorer for gen {}: {} ({})",
        generation,
        genome_to_string(best),
        best_error
    )
}

/// Closing line of a run: the solved banner, or the best scorer of the final population.
pub fn final_line(outcome: &EvolutionOutcome) -> String {
    match outcome.status {
        Termination::Solved => "Solution found!".to_string(),
        Termination::Exhausted => best_scorer_line(outcome.generation, &outcome.best, outcome.best_error),
    }
}

/// Prints one line per generation to stdout.
pub struct ConsoleProgressCallback;

impl ProgressCallback for ConsoleProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}

    fn on_generation_complete(&mut self, generation: usize, best: &[u32], best_error: u64) {
        println!("{}", best_scorer_line(generation, best, best_error));
    }

    fn on_finished(&mut self, outcome: &EvolutionOutcome) {
        println!("{}", final_line(outcome));
    }
}

/// Discards all progress; for library callers that only want the outcome.
pub struct SilentProgressCallback;

impl ProgressCallback for SilentProgressCallback {
    fn on_generation_start(&mut self, _generation: usize) {}
    fn on_generation_complete(&mut self, _generation: usize, _best: &[u32], _best_error: u64) {}
    fn on_finished(&mut self, _outcome: &EvolutionOutcome) {}
}
