use crate::engines::generation::{
    fitness::rank_population,
    genome::{genome_to_string, Genome},
    mutation::{apply_mutations, MutationStrategy},
    operators::{crossbreed, random_genome, tournament_selection},
};
use crate::error::{EvoError, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub struct EvolutionConfig {
    pub population_size: usize,
    pub generations: usize,
    pub solution: Genome,
    pub gene_range: std::ops::Range<u32>,
    pub elitism_rate: f64,
    pub mutation_rate: f64,
    pub tournament_size: usize,
    pub mutation_strategies: Vec<MutationStrategy>,
    /// Keep carried-over elites out of the mutation pass
    pub protect_elites: bool,
    pub seed: Option<u64>,
}

/// Rates are probabilities or fractions; NaN is rejected along with anything outside [0, 1].
pub fn check_unit_rate(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(EvoError::Configuration(format!(
            "{} must be between 0 and 1, got {}",
            name, value
        )))
    }
}

impl EvolutionConfig {
    pub fn elite_count(&self) -> usize {
        (self.population_size as f64 * self.elitism_rate).floor() as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The best individual matched the solution exactly
    Solved,
    /// Ran out of generations
    Exhausted,
}

#[derive(Debug, Clone)]
pub struct EvolutionOutcome {
    pub status: Termination,
    pub generation: usize,
    pub best: Genome,
    pub best_error: u64,
    /// Best error of every reported generation, in order
    pub best_errors: Vec<u64>,
}

impl EvolutionOutcome {
    pub fn solution_found(&self) -> bool {
        self.status == Termination::Solved
    }
}

pub trait ProgressCallback {
    fn on_generation_start(&mut self, generation: usize);
    fn on_generation_complete(&mut self, generation: usize, best: &[u32], best_error: u64);
    fn on_finished(&mut self, outcome: &EvolutionOutcome);
}

impl<C: ProgressCallback + ?Sized> ProgressCallback for &mut C {
    fn on_generation_start(&mut self, generation: usize) {
        (**self).on_generation_start(generation);
    }

    fn on_generation_complete(&mut self, generation: usize, best: &[u32], best_error: u64) {
        (**self).on_generation_complete(generation, best, best_error);
    }

    fn on_finished(&mut self, outcome: &EvolutionOutcome) {
        (**self).on_finished(outcome);
    }
}

pub struct EvolutionEngine {
    config: EvolutionConfig,
    elite_count: usize,
    rng: StdRng,
}

impl EvolutionEngine {
    pub fn new(config: EvolutionConfig) -> Result<Self> {
        check_unit_rate("Elitism", config.elitism_rate)?;
        check_unit_rate("Mutation rate", config.mutation_rate)?;

        let elite_count = config.elite_count();

        if config.population_size == 0 || elite_count >= config.population_size {
            return Err(EvoError::EmptyPopulation {
                population_size: config.population_size,
                elite_count,
            });
        }
        let breeding_pool = config.population_size - elite_count;
        if config.tournament_size < 2 || config.tournament_size > breeding_pool {
            return Err(EvoError::SampleSize {
                requested: config.tournament_size,
                available: breeding_pool,
            });
        }
        if config.solution.is_empty() {
            return Err(EvoError::Configuration("Solution must not be empty".to_string()));
        }
        if config.gene_range.is_empty() {
            return Err(EvoError::Configuration("Gene range must not be empty".to_string()));
        }

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            config,
            elite_count,
            rng,
        })
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    /// Run the evolution process
    pub fn run<C: ProgressCallback>(&mut self, mut callback: C) -> Result<EvolutionOutcome> {
        log::info!(
            "Evolving {} individuals towards \"{}\" for up to {} generations",
            self.config.population_size,
            genome_to_string(&self.config.solution),
            self.config.generations
        );

        let mut population = self.initialize_population();
        let mut best_errors = Vec::with_capacity(self.config.generations + 1);

        for generation in 0..self.config.generations {
            callback.on_generation_start(generation);

            let ranked = rank_population(population, &self.config.solution)?;
            let (best, best_error) = ranked[0].clone();
            best_errors.push(best_error);
            callback.on_generation_complete(generation, &best, best_error);

            if best_error == 0 {
                let outcome = EvolutionOutcome {
                    status: Termination::Solved,
                    generation,
                    best,
                    best_error,
                    best_errors,
                };
                log::info!("Solved at generation {}", generation);
                callback.on_finished(&outcome);
                return Ok(outcome);
            }

            population = self.create_next_generation(ranked)?;
        }

        let ranked = rank_population(population, &self.config.solution)?;
        let (best, best_error) = ranked[0].clone();
        best_errors.push(best_error);

        // Only an in-loop match counts as solved; the final population is just reported
        let outcome = EvolutionOutcome {
            status: Termination::Exhausted,
            generation: self.config.generations,
            best,
            best_error,
            best_errors,
        };
        log::info!(
            "Stopped after {} generations, best error {}",
            self.config.generations,
            outcome.best_error
        );
        callback.on_finished(&outcome);
        Ok(outcome)
    }

    fn initialize_population(&mut self) -> Vec<Genome> {
        (0..self.config.population_size)
            .map(|_| {
                random_genome(
                    self.config.solution.len(),
                    self.config.gene_range.clone(),
                    &mut self.rng,
                )
            })
            .collect()
    }

    /// Elites first, then one crossbred child per remaining slot, then the mutation pass.
    fn create_next_generation(&mut self, ranked: Vec<(Genome, u64)>) -> Result<Vec<Genome>> {
        let mut sorted: Vec<Genome> = ranked.into_iter().map(|(genome, _)| genome).collect();
        let breeding_pool = sorted.split_off(self.elite_count);
        let mut next_generation = sorted;

        log::debug!(
            "{} elites carried over, breeding {} children",
            next_generation.len(),
            breeding_pool.len()
        );

        for _ in 0..(self.config.population_size - self.elite_count) {
            let (parent1, parent2) = tournament_selection(
                &breeding_pool,
                self.config.tournament_size,
                &self.config.solution,
                &mut self.rng,
            )?;
            next_generation.push(crossbreed(&parent1, &parent2, &mut self.rng)?);
        }

        if self.config.protect_elites {
            let children = next_generation.split_off(self.elite_count);
            let children = self.mutate(children);
            next_generation.extend(children);
            Ok(next_generation)
        } else {
            Ok(self.mutate(next_generation))
        }
    }

    fn mutate(&mut self, population: Vec<Genome>) -> Vec<Genome> {
        apply_mutations(
            &self.config.mutation_strategies,
            population,
            self.config.mutation_rate,
            self.config.gene_range.clone(),
            &mut self.rng,
        )
    }
}
