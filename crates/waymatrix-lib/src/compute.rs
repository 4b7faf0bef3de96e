use crate::assemble::{assemble, ResultRecord, Weight};
use crate::edge::Edge;
use crate::error::Result;
use crate::graph::{
    build_adjacency_matrices_with_policy, DistanceMatrix, DuplicateEdgePolicy, NodeSet,
};
use crate::report::Reporter;
use crate::shortest_path::all_pairs_shortest_paths;

/// Options that influence how edges become matrices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComputeOptions {
    pub duplicate_edges: DuplicateEdgePolicy,
}

/// Converged all-pairs shortest paths for one computation.
#[derive(Debug, Clone)]
pub struct ShortestPaths {
    nodes: NodeSet,
    time: DistanceMatrix,
    distance: DistanceMatrix,
}

impl ShortestPaths {
    pub fn nodes(&self) -> &NodeSet {
        &self.nodes
    }

    /// Relaxed time matrix, indexed by [`NodeSet`] position.
    pub fn time_matrix(&self) -> &DistanceMatrix {
        &self.time
    }

    /// Relaxed distance matrix, indexed by [`NodeSet`] position.
    pub fn distance_matrix(&self) -> &DistanceMatrix {
        &self.distance
    }

    /// Shortest travel time between two cities, `None` if either is unknown.
    pub fn time(&self, origin: &str, destination: &str) -> Option<Weight> {
        self.lookup(&self.time, origin, destination)
    }

    /// Shortest distance between two cities, `None` if either is unknown.
    pub fn distance(&self, origin: &str, destination: &str) -> Option<Weight> {
        self.lookup(&self.distance, origin, destination)
    }

    fn lookup(&self, matrix: &DistanceMatrix, origin: &str, destination: &str) -> Option<Weight> {
        let i = self.nodes.index_of(origin)?;
        let j = self.nodes.index_of(destination)?;
        Some(Weight::from_distance(matrix.get(i, j)))
    }

    /// One record per ordered pair of distinct nodes.
    pub fn records(&self) -> Vec<ResultRecord> {
        assemble(&self.nodes, &self.time, &self.distance)
    }
}

/// Derive the node set from `edges`, build both matrices and relax them.
pub fn compute_shortest_paths(edges: &[Edge], options: ComputeOptions) -> Result<ShortestPaths> {
    let nodes = NodeSet::from_edges(edges);
    let (time, distance) =
        build_adjacency_matrices_with_policy(edges, &nodes, options.duplicate_edges)?;

    Ok(ShortestPaths {
        time: all_pairs_shortest_paths(&time),
        distance: all_pairs_shortest_paths(&distance),
        nodes,
    })
}

/// Result records of one computation and the number of nodes they cover.
#[derive(Debug, Clone, PartialEq)]
pub struct PathRecords {
    pub node_count: usize,
    pub records: Vec<ResultRecord>,
}

/// Full pipeline from validated edges to result records.
///
/// The finished computation is passed to `reporter`. An empty edge list
/// yields no nodes and no records.
pub fn compute_path_records(
    edges: &[Edge],
    options: ComputeOptions,
    reporter: &dyn Reporter,
) -> Result<PathRecords> {
    let paths = compute_shortest_paths(edges, options)?;
    let node_count = paths.nodes().len();
    let records = paths.records();
    reporter.computed(node_count, records.len());
    Ok(PathRecords {
        node_count,
        records,
    })
}

/// [`compute_path_records`] without the node count.
pub fn shortest_path_records(
    edges: &[Edge],
    options: ComputeOptions,
    reporter: &dyn Reporter,
) -> Result<Vec<ResultRecord>> {
    compute_path_records(edges, options, reporter).map(|computed| computed.records)
}
