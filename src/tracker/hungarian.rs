//! Hungarian (Kuhn-Munkres) solver for the linear assignment problem.
//!
//! Runs in O(n³) using row/column potentials and Dijkstra-style augmenting
//! paths. The input must be square: the tracker pads rectangular
//! track-by-detection matrices with `COST_MAX` dummy rows or columns before
//! solving, and an unpadded non-square matrix produces undefined results.
//!
//! The solver knows nothing about gating semantics. An assignment whose cost
//! equals the padding value is a forced pairing, not a real match; callers
//! must re-check each returned pair against their own gate before using it.

use ndarray::Array2;

/// Minimum-total-cost one-to-one assignment for a square cost matrix.
///
/// Returns `(row_to_col, col_to_row)`, each a full permutation of
/// `0..n`: every row is paired with exactly one column and vice versa.
pub fn solve(cost: &Array2<f32>) -> (Vec<usize>, Vec<usize>) {
    let (rows, cols) = cost.dim();
    debug_assert_eq!(rows, cols, "cost matrix must be padded to square");

    let n = rows;
    if n == 0 {
        return (Vec::new(), Vec::new());
    }

    // 1-based internally: row/column 0 are virtual anchors for the
    // augmenting path, potentials accumulate in f64.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut assigned_row = vec![0usize; n + 1]; // row matched to column, 0 = free
    let mut way = vec![0usize; n + 1]; // previous column on the path

    for i in 1..=n {
        assigned_row[0] = i;
        let mut j0 = 0usize;
        let mut min_to = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        // Grow the path until a free column is reached.
        loop {
            used[j0] = true;
            let i0 = assigned_row[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[[i0 - 1, j - 1]] as f64 - u[i0] - v[j];
                if reduced < min_to[j] {
                    min_to[j] = reduced;
                    way[j] = j0;
                }
                if min_to[j] < delta {
                    delta = min_to[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[assigned_row[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_to[j] -= delta;
                }
            }

            j0 = j1;
            if assigned_row[j0] == 0 {
                break;
            }
        }

        // Flip assignments along the augmenting path.
        loop {
            let j1 = way[j0];
            assigned_row[j0] = assigned_row[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut row_to_col = vec![0usize; n];
    let mut col_to_row = vec![0usize; n];
    for j in 1..=n {
        let i = assigned_row[j];
        row_to_col[i - 1] = j - 1;
        col_to_row[j - 1] = i - 1;
    }
    (row_to_col, col_to_row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn total_cost(cost: &Array2<f32>, row_to_col: &[usize]) -> f64 {
        row_to_col
            .iter()
            .enumerate()
            .map(|(i, &j)| cost[[i, j]] as f64)
            .sum()
    }

    /// O(n!) reference: minimum assignment cost by trying all permutations.
    fn brute_force_min(cost: &Array2<f32>) -> f64 {
        fn recurse(cost: &Array2<f32>, row: usize, used: &mut [bool], acc: f64, best: &mut f64) {
            let n = cost.nrows();
            if row == n {
                *best = best.min(acc);
                return;
            }
            for j in 0..n {
                if !used[j] {
                    used[j] = true;
                    recurse(cost, row + 1, used, acc + cost[[row, j]] as f64, best);
                    used[j] = false;
                }
            }
        }
        let mut best = f64::INFINITY;
        recurse(cost, 0, &mut vec![false; cost.ncols()], 0.0, &mut best);
        best
    }

    fn pseudo_random_matrix(n: usize, seed: &mut u64) -> Array2<f32> {
        Array2::from_shape_fn((n, n), |_| {
            *seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((*seed >> 33) % 1000) as f32 / 100.0
        })
    }

    #[test]
    fn test_empty() {
        let cost = Array2::<f32>::zeros((0, 0));
        let (rows, cols) = solve(&cost);
        assert!(rows.is_empty());
        assert!(cols.is_empty());
    }

    #[test]
    fn test_single() {
        let cost = ndarray::arr2(&[[3.0f32]]);
        let (rows, cols) = solve(&cost);
        assert_eq!(rows, vec![0]);
        assert_eq!(cols, vec![0]);
    }

    #[test]
    fn test_known_optimum_3x3() {
        let cost = ndarray::arr2(&[
            [1.0f32, 2.0, 3.0],
            [4.0, 5.0, 6.0],
            [7.0, 8.0, 9.0],
        ]);
        let (rows, _) = solve(&cost);
        // Optimal: 0->2, 1->1, 2->0 = 3 + 5 + 7 = 15
        assert!((total_cost(&cost, &rows) - 15.0).abs() < 1e-6);
    }

    #[test]
    fn test_known_optimum_off_diagonal() {
        let cost = ndarray::arr2(&[
            [10.0f32, 5.0, 13.0],
            [3.0, 15.0, 8.0],
            [7.0, 4.0, 12.0],
        ]);
        let (rows, _) = solve(&cost);
        // Optimal: 0->1 (5), 1->0 (3), 2->2 (12) = 20
        assert!((total_cost(&cost, &rows) - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_mappings_agree() {
        let mut seed = 7u64;
        let cost = pseudo_random_matrix(5, &mut seed);
        let (rows, cols) = solve(&cost);
        for (i, &j) in rows.iter().enumerate() {
            assert_eq!(cols[j], i);
        }
    }

    #[test]
    fn test_matches_brute_force_small_sizes() {
        let mut seed = 0x9e3779b97f4a7c15u64;
        for n in 1..=6 {
            for _ in 0..10 {
                let cost = pseudo_random_matrix(n, &mut seed);
                let (rows, _) = solve(&cost);
                let got = total_cost(&cost, &rows);
                let want = brute_force_min(&cost);
                assert!(
                    (got - want).abs() < 1e-4,
                    "n={n}: solver found {got}, optimum is {want}"
                );
            }
        }
    }

    #[test]
    fn test_matches_lapjv() {
        let mut seed = 42u64;
        for n in [2usize, 5, 9, 16] {
            let cost = pseudo_random_matrix(n, &mut seed);
            let (rows, _) = solve(&cost);
            let got = total_cost(&cost, &rows);

            let cost64 = cost.mapv(|x| x as f64);
            let (lap_rows, _) = lapjv::lapjv(&cost64).expect("lapjv failed");
            let want: f64 = lap_rows
                .iter()
                .enumerate()
                .map(|(i, &j)| cost64[[i, j]])
                .sum();

            assert!(
                (got - want).abs() < 1e-6,
                "n={n}: solver found {got}, lapjv found {want}"
            );
        }
    }
}
