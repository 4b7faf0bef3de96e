use crate::graph::DistanceMatrix;

/// All-pairs shortest paths by repeated relaxation through every intermediate node.
///
/// For each intermediate `k` in index order, every pair `(i, j)` is relaxed
/// with `dist[i][j] = min(dist[i][j], dist[i][k] + dist[k][j])`. The input
/// matrix is left untouched; the relaxation runs on a copy which is returned.
///
/// Precondition: all weights are non-negative. Edge validation guarantees
/// this, so negative cycles cannot occur and are not checked for.
///
/// Path sums use plain `f64` addition. A path whose total exceeds `f64::MAX`
/// overflows to `+∞` and cannot be told apart from a missing path.
///
/// Runs in O(n³) time and O(n²) space.
pub fn all_pairs_shortest_paths(matrix: &DistanceMatrix) -> DistanceMatrix {
    let mut dist = matrix.clone();
    relax_in_place(&mut dist);
    dist
}

fn relax_in_place(dist: &mut DistanceMatrix) {
    let n = dist.size();
    if n == 0 {
        return;
    }

    // Row k does not change while k is the intermediate (dist[k][k] is 0),
    // so one copy per k lets every other row borrow it immutably.
    let mut via = vec![0.0; n];
    let cells = dist.cells_mut();

    for k in 0..n {
        via.copy_from_slice(&cells[k * n..(k + 1) * n]);

        for (i, row) in cells.chunks_exact_mut(n).enumerate() {
            if i == k {
                continue;
            }
            let to_k = row[k];
            if to_k == f64::INFINITY {
                continue;
            }
            for (cell, &from_k) in row.iter_mut().zip(via.iter()) {
                let candidate = to_k + from_k;
                if candidate < *cell {
                    *cell = candidate;
                }
            }
        }
    }
}
