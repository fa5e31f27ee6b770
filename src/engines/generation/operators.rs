use crate::engines::generation::fitness::genome_error;
use crate::engines::generation::genome::Genome;
use crate::error::{EvoError, Result};
use rand::seq::index;
use rand::Rng;

/// Tournament selection: sample `tournament_size` distinct individuals and return the
/// two with the lowest error, best first.
pub fn tournament_selection<R: Rng + ?Sized>(
    population: &[Genome],
    tournament_size: usize,
    solution: &[u32],
    rng: &mut R,
) -> Result<(Genome, Genome)> {
    if tournament_size < 2 || tournament_size > population.len() {
        return Err(EvoError::SampleSize {
            requested: tournament_size,
            available: population.len(),
        });
    }

    let mut contestants = index::sample(rng, population.len(), tournament_size)
        .into_iter()
        .map(|idx| -> Result<(usize, u64)> { Ok((idx, genome_error(&population[idx], solution)?)) })
        .collect::<Result<Vec<_>>>()?;

    // Stable, so equal errors keep sampling order
    contestants.sort_by_key(|(_, error)| *error);

    let first = population[contestants[0].0].clone();
    let second = population[contestants[1].0].clone();
    Ok((first, second))
}

/// Uniform crossover: copy `parent_a`, then overwrite exactly `len / 2` randomly chosen
/// positions with the codes `parent_b` has there.
pub fn crossbreed<R: Rng + ?Sized>(
    parent_a: &[u32],
    parent_b: &[u32],
    rng: &mut R,
) -> Result<Genome> {
    if parent_a.len() != parent_b.len() {
        return Err(EvoError::LengthMismatch {
            expected: parent_a.len(),
            actual: parent_b.len(),
        });
    }

    let mut child = parent_a.to_vec();
    for idx in index::sample(rng, parent_b.len(), parent_b.len() / 2).into_iter() {
        child[idx] = parent_b[idx];
    }

    Ok(child)
}

/// Generate random genome
pub fn random_genome<R: Rng + ?Sized>(
    length: usize,
    gene_range: std::ops::Range<u32>,
    rng: &mut R,
) -> Genome {
    (0..length)
        .map(|_| rng.gen_range(gene_range.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engines::generation::genome::encode_solution;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_random_genome_respects_length_and_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let genome = random_genome(12, 0..256, &mut rng);
            assert_eq!(genome.len(), 12);
            assert!(genome.iter().all(|&c| c < 256));
        }

        let narrow = random_genome(30, 65..66, &mut rng);
        assert!(narrow.iter().all(|&c| c == 65));
    }

    #[test]
    fn test_tournament_returns_sampled_parents_in_order() {
        let mut rng = StdRng::seed_from_u64(42);
        let solution = encode_solution("MMMM");
        let population: Vec<Genome> = (0..20).map(|_| random_genome(4, 0..256, &mut rng)).collect();

        for _ in 0..100 {
            let (first, second) = tournament_selection(&population, 5, &solution, &mut rng).unwrap();
            assert!(population.contains(&first));
            assert!(population.contains(&second));
            assert!(
                genome_error(&first, &solution).unwrap() <= genome_error(&second, &solution).unwrap()
            );
        }
    }

    #[test]
    fn test_full_tournament_picks_global_best() {
        let mut rng = StdRng::seed_from_u64(1);
        let solution = encode_solution("AA");
        let population = vec![
            encode_solution("ZZ"),
            encode_solution("AB"),
            encode_solution("AA"),
            encode_solution("CC"),
        ];

        let (first, second) = tournament_selection(&population, 4, &solution, &mut rng).unwrap();
        assert_eq!(first, encode_solution("AA"));
        assert_eq!(second, encode_solution("AB"));
    }

    #[test]
    fn test_tournament_rejects_oversized_sample() {
        let mut rng = StdRng::seed_from_u64(3);
        let population = vec![vec![1], vec![2], vec![3]];

        let result = tournament_selection(&population, 4, &[1], &mut rng);
        assert!(matches!(
            result,
            Err(EvoError::SampleSize { requested: 4, available: 3 })
        ));

        let result = tournament_selection(&population, 1, &[1], &mut rng);
        assert!(matches!(result, Err(EvoError::SampleSize { .. })));
    }

    #[test]
    fn test_crossbreed_takes_half_from_second_parent() {
        let mut rng = StdRng::seed_from_u64(9);
        let parent_a = vec![0; 10];
        let parent_b = vec![1; 10];

        for _ in 0..50 {
            let child = crossbreed(&parent_a, &parent_b, &mut rng).unwrap();
            assert_eq!(child.len(), 10);
            assert_eq!(child.iter().filter(|&&c| c == 1).count(), 5);
        }
    }

    #[test]
    fn test_crossbreed_odd_length_and_origin() {
        let mut rng = StdRng::seed_from_u64(11);
        let parent_a = encode_solution("abcdefg");
        let parent_b = encode_solution("ABCDEFG");

        for _ in 0..50 {
            let child = crossbreed(&parent_a, &parent_b, &mut rng).unwrap();
            assert_eq!(child.len(), 7);
            let mut from_b = 0;
            for (i, code) in child.iter().enumerate() {
                assert!(*code == parent_a[i] || *code == parent_b[i]);
                if *code == parent_b[i] {
                    from_b += 1;
                }
            }
            assert_eq!(from_b, 3);
        }
    }

    #[test]
    fn test_crossbreed_length_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let result = crossbreed(&[1, 2], &[1, 2, 3], &mut rng);
        assert!(matches!(result, Err(EvoError::LengthMismatch { .. })));
    }
}
