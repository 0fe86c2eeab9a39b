//! Minimum spanning tree construction over weighted adjacency edges.
//!
//! Kruskal's algorithm with a union-find, sorted by `(cost, edge index)` so
//! that cost ties resolve by original edge-list order and the resulting tree
//! is reproducible across runs.

use crate::cost::CostEdge;
use crate::skater::RegionalizeError;
use petgraph::unionfind::UnionFind;

/// Build the minimum spanning tree of a graph with `num_nodes` nodes.
///
/// Returns exactly `num_nodes - 1` tree edges (in selection order), or
/// [`RegionalizeError::Disconnected`] when the edges do not span all nodes.
///
/// O(E log E); edges in the thousands are well within budget.
pub fn minimum_spanning_tree(
    num_nodes: usize,
    edges: &[CostEdge],
) -> Result<Vec<CostEdge>, RegionalizeError> {
    if num_nodes == 0 {
        return Ok(Vec::new());
    }

    let mut sorted: Vec<&CostEdge> = edges.iter().collect();
    sorted.sort_by(|a, b| {
        a.cost
            .partial_cmp(&b.cost)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index.cmp(&b.index))
    });

    let mut components = UnionFind::<usize>::new(num_nodes);
    let mut tree = Vec::with_capacity(num_nodes - 1);

    for edge in sorted {
        if components.union(edge.source, edge.target) {
            tree.push(*edge);
            if tree.len() == num_nodes - 1 {
                break;
            }
        }
    }

    if tree.len() + 1 < num_nodes {
        let islands = num_nodes - tree.len();
        return Err(RegionalizeError::Disconnected(islands));
    }

    Ok(tree)
}

/// Total edge cost of a tree (or any edge set).
pub fn total_cost(edges: &[CostEdge]) -> f64 {
    edges.iter().map(|e| e.cost).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(index: usize, source: usize, target: usize, cost: f64) -> CostEdge {
        CostEdge {
            index,
            source,
            target,
            cost,
        }
    }

    /// Exhaustive reference MST: try every (n-1)-subset of edges, keep the
    /// cheapest spanning one. Only usable for tiny graphs.
    fn brute_force_mst_cost(num_nodes: usize, edges: &[CostEdge]) -> Option<f64> {
        let need = num_nodes - 1;
        let m = edges.len();
        let mut best: Option<f64> = None;
        for mask in 0u32..(1 << m) {
            if mask.count_ones() as usize != need {
                continue;
            }
            let mut uf = UnionFind::<usize>::new(num_nodes);
            let mut cost = 0.0;
            for (i, e) in edges.iter().enumerate() {
                if mask & (1 << i) != 0 {
                    uf.union(e.source, e.target);
                    cost += e.cost;
                }
            }
            let root = uf.find(0);
            if (1..num_nodes).all(|v| uf.find(v) == root) {
                best = Some(match best {
                    Some(b) if b <= cost => b,
                    _ => cost,
                });
            }
        }
        best
    }

    #[test]
    fn test_triangle() {
        let edges = vec![
            edge(0, 0, 1, 1.0),
            edge(1, 1, 2, 2.0),
            edge(2, 0, 2, 3.0),
        ];
        let tree = minimum_spanning_tree(3, &edges).unwrap();
        assert_eq!(tree.len(), 2);
        assert!((total_cost(&tree) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_matches_brute_force() {
        // 6-node graph with enough cycles to make the choice non-trivial
        let edges = vec![
            edge(0, 0, 1, 4.0),
            edge(1, 0, 2, 3.0),
            edge(2, 1, 2, 1.0),
            edge(3, 1, 3, 2.0),
            edge(4, 2, 3, 4.0),
            edge(5, 2, 4, 5.0),
            edge(6, 3, 4, 7.0),
            edge(7, 3, 5, 1.5),
            edge(8, 4, 5, 0.5),
        ];
        let tree = minimum_spanning_tree(6, &edges).unwrap();
        assert_eq!(tree.len(), 5);
        let reference = brute_force_mst_cost(6, &edges).unwrap();
        assert!((total_cost(&tree) - reference).abs() < 1e-9);
    }

    #[test]
    fn test_tie_break_is_stable() {
        // Two equal-cost ways to connect node 2; the lower edge index wins.
        let edges = vec![
            edge(0, 0, 1, 1.0),
            edge(1, 1, 2, 2.0),
            edge(2, 0, 2, 2.0),
        ];
        let tree = minimum_spanning_tree(3, &edges).unwrap();
        assert!(tree.iter().any(|e| e.index == 1));
        assert!(!tree.iter().any(|e| e.index == 2));

        // Identical on repeat
        let again = minimum_spanning_tree(3, &edges).unwrap();
        let indices: Vec<_> = tree.iter().map(|e| e.index).collect();
        let indices_again: Vec<_> = again.iter().map(|e| e.index).collect();
        assert_eq!(indices, indices_again);
    }

    #[test]
    fn test_disconnected_rejected() {
        // Two separate pairs: {0,1} and {2,3}
        let edges = vec![edge(0, 0, 1, 1.0), edge(1, 2, 3, 1.0)];
        let result = minimum_spanning_tree(4, &edges);
        assert!(matches!(result, Err(RegionalizeError::Disconnected(2))));
    }

    #[test]
    fn test_trivial_sizes() {
        assert!(minimum_spanning_tree(0, &[]).unwrap().is_empty());
        assert!(minimum_spanning_tree(1, &[]).unwrap().is_empty());
    }
}
