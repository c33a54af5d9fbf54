//! Minimum-weight perfect matching over odd-degree vertices.
//!
//! Inputs are a symmetric matrix of hop distances between the `k` odd
//! vertices (`k` even). Up to [`EXACT_MATCHING_LIMIT`] vertices the matching
//! is solved with a subset dynamic programme over matched sets, where ties
//! resolve towards the lower partner index. Larger instances go to the blossom
//! solver on the complete graph, with weights inverted so that a
//! maximum-weight perfect matching there is a minimum-weight one here. Both
//! paths are exact and depend only on the matrix.

use super::blossom::{WeightedEdge, max_weight_matching};

/// Largest odd-vertex count solved exactly.
pub const EXACT_MATCHING_LIMIT: usize = 20;

/// Pairs indices `0..distances.len()` so the summed distance is minimal.
///
/// Returned pairs are `(low, high)` and sorted.
pub(super) fn minimum_weight_matching(distances: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let count = distances.len();
    if count == 0 {
        return Vec::new();
    }
    let mut pairs = if count <= EXACT_MATCHING_LIMIT {
        exact_matching(distances)
    } else {
        blossom_matching(distances)
    };
    for pair in &mut pairs {
        *pair = (pair.0.min(pair.1), pair.0.max(pair.1));
    }
    pairs.sort_unstable();
    pairs
}

/// Sums the distances of `pairs`.
pub(super) fn matching_weight(distances: &[Vec<usize>], pairs: &[(usize, usize)]) -> usize {
    pairs.iter().map(|&(left, right)| distances[left][right]).sum()
}

fn exact_matching(distances: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let count = distances.len();
    let full = (1_usize << count) - 1;
    // cost[mask]: cheapest way to match every index outside `mask`.
    let mut cost = vec![usize::MAX; full + 1];
    let mut partner = vec![0_u8; full + 1];
    cost[full] = 0;

    for mask in (0..full).rev() {
        if mask.count_ones() % 2 == 1 {
            continue;
        }
        let first = mask.trailing_ones() as usize;
        let with_first = mask | (1 << first);
        for second in (first + 1)..count {
            if with_first & (1 << second) != 0 {
                continue;
            }
            let rest = cost[with_first | (1 << second)];
            if rest == usize::MAX {
                continue;
            }
            let candidate = distances[first][second].saturating_add(rest);
            if candidate < cost[mask] {
                cost[mask] = candidate;
                partner[mask] = second as u8;
            }
        }
    }

    let mut pairs = Vec::with_capacity(count / 2);
    let mut mask = 0_usize;
    while mask != full {
        let first = mask.trailing_ones() as usize;
        let second = usize::from(partner[mask]);
        pairs.push((first, second));
        mask |= (1 << first) | (1 << second);
    }
    pairs
}

fn blossom_matching(distances: &[Vec<usize>]) -> Vec<(usize, usize)> {
    let count = distances.len();
    let longest = distances.iter().flatten().copied().max().unwrap_or(0);
    let mut edges: Vec<WeightedEdge> = Vec::with_capacity(count * count.saturating_sub(1) / 2);
    for left in 0..count {
        for right in (left + 1)..count {
            // Even weights keep every dual update integral.
            let inverted =
                i64::try_from(longest - distances[left][right] + 1).unwrap_or(i64::MAX / 4);
            edges.push((left, right, 2 * inverted));
        }
    }
    max_weight_matching(count, &edges)
        .into_iter()
        .enumerate()
        .filter_map(|(vertex, mate)| {
            mate.filter(|&other| vertex < other)
                .map(|other| (vertex, other))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::{Rng, SeedableRng, rngs::SmallRng};
    use rstest::rstest;

    use super::super::paths::shortest_path_trees;

    fn line_metric(positions: &[usize]) -> Vec<Vec<usize>> {
        positions
            .iter()
            .map(|&a| positions.iter().map(|&b| a.abs_diff(b)).collect())
            .collect()
    }

    fn brute_force_weight(distances: &[Vec<usize>], unmatched: &mut Vec<usize>) -> usize {
        let Some(first) = unmatched.pop() else {
            return 0;
        };
        let mut best = usize::MAX;
        for index in 0..unmatched.len() {
            let second = unmatched.remove(index);
            let weight = distances[first][second] + brute_force_weight(distances, unmatched);
            best = best.min(weight);
            unmatched.insert(index, second);
        }
        unmatched.push(first);
        best
    }

    fn assert_perfect(count: usize, pairs: &[(usize, usize)]) {
        let mut seen: Vec<usize> = pairs.iter().flat_map(|&(a, b)| [a, b]).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..count).collect::<Vec<_>>());
    }

    #[test]
    fn empty_input_yields_no_pairs() {
        assert!(minimum_weight_matching(&[]).is_empty());
    }

    #[test]
    fn pairs_neighbours_on_a_line() {
        let distances = line_metric(&[0, 1, 10, 11]);
        let pairs = minimum_weight_matching(&distances);
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
        assert_eq!(matching_weight(&distances, &pairs), 2);
    }

    #[test]
    fn ties_prefer_lower_partner() {
        let distances = vec![vec![1; 4]; 4];
        let pairs = minimum_weight_matching(&distances);
        assert_eq!(pairs, vec![(0, 1), (2, 3)]);
    }

    #[rstest]
    #[case(2, 1)]
    #[case(6, 2)]
    #[case(8, 3)]
    #[case(10, 4)]
    fn exact_matching_agrees_with_brute_force(#[case] count: usize, #[case] seed: u64) {
        let distances = random_weights(count, seed);
        let pairs = minimum_weight_matching(&distances);
        assert_perfect(count, &pairs);
        let mut unmatched: Vec<usize> = (0..count).collect();
        assert_eq!(
            matching_weight(&distances, &pairs),
            brute_force_weight(&distances, &mut unmatched)
        );
    }

    fn random_weights(count: usize, seed: u64) -> Vec<Vec<usize>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut distances = vec![vec![0; count]; count];
        for left in 0..count {
            for right in (left + 1)..count {
                let weight = rng.gen_range(1..20);
                distances[left][right] = weight;
                distances[right][left] = weight;
            }
        }
        distances
    }

    /// Hop distances between the first `sources` vertices of a random tree on
    /// `vertex_count` vertices with a few extra chords.
    fn sparse_graph_metric(vertex_count: usize, sources: usize, seed: u64) -> Vec<Vec<usize>> {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut edges: Vec<(usize, usize)> =
            (1..vertex_count).map(|child| (rng.gen_range(0..child), child)).collect();
        for _ in 0..4 {
            let left = rng.gen_range(0..vertex_count);
            let right = rng.gen_range(0..vertex_count);
            if left != right {
                edges.push((left, right));
            }
        }
        let graph = crate::test_utils::graph(vertex_count, &edges);
        let roots: Vec<usize> = (0..sources).collect();
        shortest_path_trees(&graph, &roots)
            .iter()
            .map(|tree| {
                roots
                    .iter()
                    .map(|&to| tree.distance_to(to).expect("trees span every vertex"))
                    .collect()
            })
            .collect()
    }

    #[rstest]
    #[case(2, 5)]
    #[case(4, 6)]
    #[case(8, 7)]
    #[case(10, 8)]
    fn blossom_agrees_with_brute_force(#[case] count: usize, #[case] seed: u64) {
        let distances = random_weights(count, seed);
        let pairs = blossom_matching(&distances);
        assert_perfect(count, &pairs);
        let mut unmatched: Vec<usize> = (0..count).collect();
        assert_eq!(
            matching_weight(&distances, &pairs),
            brute_force_weight(&distances, &mut unmatched)
        );
    }

    #[test]
    fn blossom_agrees_with_subset_programme_on_random_weights() {
        let distances = random_weights(EXACT_MATCHING_LIMIT + 2, 17);
        let pairs = blossom_matching(&distances);
        assert_perfect(distances.len(), &pairs);
        assert_eq!(
            matching_weight(&distances, &pairs),
            matching_weight(&distances, &exact_matching(&distances))
        );
    }

    #[rstest]
    #[case(348)]
    #[case(1426)]
    #[case(2141)]
    fn large_instances_stay_optimal_on_graph_metrics(#[case] seed: u64) {
        let distances = sparse_graph_metric(28, EXACT_MATCHING_LIMIT + 2, seed);
        let pairs = minimum_weight_matching(&distances);
        assert_perfect(distances.len(), &pairs);
        assert_eq!(
            matching_weight(&distances, &pairs),
            matching_weight(&distances, &exact_matching(&distances))
        );
    }
}
