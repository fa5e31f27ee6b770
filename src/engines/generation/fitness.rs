use crate::engines::generation::genome::Genome;
use crate::error::{EvoError, Result};

/// Distance between a genome and the solution: sum of absolute per-position code
/// differences. Zero means an exact match; lower is better.
pub fn genome_error(genome: &[u32], solution: &[u32]) -> Result<u64> {
    if genome.len() != solution.len() {
        return Err(EvoError::LengthMismatch {
            expected: solution.len(),
            actual: genome.len(),
        });
    }

    Ok(genome
        .iter()
        .zip(solution)
        .map(|(&g, &s)| u64::from(g.abs_diff(s)))
        .sum())
}

/// Score every genome once and sort ascending by error. Ties keep population order.
pub fn rank_population(population: Vec<Genome>, solution: &[u32]) -> Result<Vec<(Genome, u64)>> {
    let mut ranked = population
        .into_iter()
        .map(|genome| -> Result<(Genome, u64)> {
            let error = genome_error(&genome, solution)?;
            Ok((genome, error))
        })
        .collect::<Result<Vec<_>>>()?;

    ranked.sort_by_key(|(_, error)| *error);
    Ok(ranked)
}
