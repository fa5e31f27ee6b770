use crate::engines::generation::genome::Genome;
use crate::engines::generation::operators::random_genome;
use clap::ValueEnum;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// The three mutation passes. Each one runs an independent Bernoulli trial per
/// individual and leaves population size and genome lengths untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum MutationStrategy {
    /// Replace the whole genome with a fresh random one
    Complete,
    /// Redraw one randomly chosen code
    SingleChar,
    /// Randomly permute the genome's own codes
    Scramble,
}

impl MutationStrategy {
    pub const ALL: [MutationStrategy; 3] = [
        MutationStrategy::Complete,
        MutationStrategy::SingleChar,
        MutationStrategy::Scramble,
    ];

    pub fn apply<R: Rng + ?Sized>(
        self,
        population: Vec<Genome>,
        mutation_rate: f64,
        gene_range: Range<u32>,
        rng: &mut R,
    ) -> Vec<Genome> {
        match self {
            MutationStrategy::Complete => mutate_complete(population, mutation_rate, gene_range, rng),
            MutationStrategy::SingleChar => mutate_char(population, mutation_rate, gene_range, rng),
            MutationStrategy::Scramble => mutate_scramble(population, mutation_rate, rng),
        }
    }
}

impl fmt::Display for MutationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MutationStrategy::Complete => "complete",
            MutationStrategy::SingleChar => "single-char",
            MutationStrategy::Scramble => "scramble",
        };
        f.write_str(name)
    }
}

/// Replace each selected genome with a freshly generated one of the same length.
pub fn mutate_complete<R: Rng + ?Sized>(
    mut population: Vec<Genome>,
    mutation_rate: f64,
    gene_range: Range<u32>,
    rng: &mut R,
) -> Vec<Genome> {
    let mut mutation_count = 0;

    for genome in population.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            mutation_count += 1;
            *genome = random_genome(genome.len(), gene_range.clone(), rng);
        }
    }

    log::debug!("complete mutation: {}/{} individuals", mutation_count, population.len());
    population
}

/// Redraw one uniformly chosen position of each selected genome.
pub fn mutate_char<R: Rng + ?Sized>(
    mut population: Vec<Genome>,
    mutation_rate: f64,
    gene_range: Range<u32>,
    rng: &mut R,
) -> Vec<Genome> {
    let mut mutation_count = 0;

    for genome in population.iter_mut() {
        if rng.gen::<f64>() < mutation_rate && !genome.is_empty() {
            mutation_count += 1;
            let idx = rng.gen_range(0..genome.len());
            genome[idx] = rng.gen_range(gene_range.clone());
        }
    }

    log::debug!("single-char mutation: {}/{} individuals", mutation_count, population.len());
    population
}

/// Shuffle the codes of each selected genome.
pub fn mutate_scramble<R: Rng + ?Sized>(
    mut population: Vec<Genome>,
    mutation_rate: f64,
    rng: &mut R,
) -> Vec<Genome> {
    let mut mutation_count = 0;

    for genome in population.iter_mut() {
        if rng.gen::<f64>() < mutation_rate {
            mutation_count += 1;
            genome.shuffle(rng);
        }
    }

    log::debug!("scramble mutation: {}/{} individuals", mutation_count, population.len());
    population
}

/// Run the strategies in order over the same population, compounding their effects.
pub fn apply_mutations<R: Rng + ?Sized>(
    strategies: &[MutationStrategy],
    population: Vec<Genome>,
    mutation_rate: f64,
    gene_range: Range<u32>,
    rng: &mut R,
) -> Vec<Genome> {
    strategies.iter().fold(population, |population, strategy| {
        strategy.apply(population, mutation_rate, gene_range.clone(), rng)
    })
}
