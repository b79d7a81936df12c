//! Permutation-preserving variation and selection operators.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::optimizer::Individual;

/// Uniformly random permutation of `0..len`.
pub fn random_permutation<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Vec<usize> {
    let mut genome: Vec<usize> = (0..len).collect();
    genome.shuffle(rng);
    genome
}

/// Order crossover (OX1).
///
/// Each child keeps a random slice of one parent in place and fills the remaining
/// positions, starting right after the slice and wrapping around, with the genes of the
/// other parent in the order they appear there (also starting after the slice).
pub fn ordered_crossover<R: Rng + ?Sized>(
    first: &[usize],
    second: &[usize],
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let size = first.len().min(second.len());
    if size < 2 {
        return (first.to_vec(), second.to_vec());
    }
    let a = rng.gen_range(0..size);
    let b = rng.gen_range(0..size);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    (
        ox_child(first, second, lo, hi),
        ox_child(second, first, lo, hi),
    )
}

fn ox_child(keep: &[usize], fill: &[usize], lo: usize, hi: usize) -> Vec<usize> {
    let size = keep.len();
    let mut child = vec![usize::MAX; size];
    let mut taken = vec![false; size];
    for i in lo..=hi {
        child[i] = keep[i];
        taken[keep[i]] = true;
    }

    let mut write = (hi + 1) % size;
    for offset in 0..size {
        let gene = fill[(hi + 1 + offset) % size];
        if taken[gene] {
            continue;
        }
        child[write] = gene;
        taken[gene] = true;
        write = (write + 1) % size;
    }
    child
}

/// Swap each position, with probability `indpb`, with another uniformly chosen position.
/// Returns whether the genome was touched.
pub fn shuffle_indexes<R: Rng + ?Sized>(genome: &mut [usize], indpb: f64, rng: &mut R) -> bool {
    let size = genome.len();
    if size < 2 {
        return false;
    }
    let mut touched = false;
    for i in 0..size {
        if rng.gen_bool(indpb) {
            let mut j = rng.gen_range(0..size - 1);
            if j >= i {
                j += 1;
            }
            genome.swap(i, j);
            touched = true;
        }
    }
    touched
}

/// Tournament selection with replacement: `count` winners, each the fittest of
/// `tournament_size` uniformly drawn aspirants.
pub fn tournament<R: Rng + ?Sized>(
    population: &[Individual],
    count: usize,
    tournament_size: usize,
    rng: &mut R,
) -> Vec<Individual> {
    (0..count)
        .filter_map(|_| {
            (0..tournament_size)
                .filter_map(|_| population.choose(rng))
                .max_by(|a, b| a.score().total_cmp(&b.score()))
                .cloned()
        })
        .collect()
}
