use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::edge::Edge;
use crate::error::{Error, Result};

/// Ordered set of distinct city names with a stable name→index mapping.
///
/// Order is first appearance, so the same edge list always produces the
/// same row/column layout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeSet {
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl NodeSet {
    /// Collect every `city1`/`city2` value, in order of first appearance.
    pub fn from_edges(edges: &[Edge]) -> Self {
        Self::from_names(edges.iter().flat_map(|edge| [edge.city1(), edge.city2()]))
    }

    /// Build a node set from names; repeated names keep their first position.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = NodeSet::default();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    fn insert(&mut self, name: &str) {
        if self.index.contains_key(name) {
            return;
        }
        self.index.insert(name.to_string(), self.names.len());
        self.names.push(name.to_string());
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Matrix index of `name`, if present.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Name at matrix index `index`.
    pub fn name(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name).ok_or_else(|| Error::UnknownCity {
            city: name.to_string(),
        })
    }
}

/// Dense square matrix of weights stored row-major in one contiguous buffer.
///
/// `f64::INFINITY` marks the absence of a connection.
#[derive(Clone, PartialEq)]
pub struct DistanceMatrix {
    size: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    /// `size × size` matrix with `0` on the diagonal and `+∞` elsewhere.
    pub fn unconnected(size: usize) -> Self {
        let mut cells = vec![f64::INFINITY; size * size];
        for i in 0..size {
            cells[i * size + i] = 0.0;
        }
        Self { size, cells }
    }

    /// Build from explicit rows. Returns `None` when the rows are not square.
    pub fn from_rows(rows: &[Vec<f64>]) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            cells: rows.concat(),
        })
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.size + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.cells[row * self.size + col] = value;
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [f64] {
        &mut self.cells
    }
}

impl fmt::Debug for DistanceMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for row in 0..self.size {
            list.entry(&self.row(row));
        }
        list.finish()
    }
}

/// How to resolve several edges between the same pair of cities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEdgePolicy {
    /// The edge appearing later in the input overwrites earlier ones.
    #[default]
    LastWriteWins,
    /// The smallest weight per matrix is kept.
    KeepMinimum,
}

impl DuplicateEdgePolicy {
    fn apply(self, current: f64, candidate: f64) -> f64 {
        match self {
            DuplicateEdgePolicy::LastWriteWins => candidate,
            DuplicateEdgePolicy::KeepMinimum => current.min(candidate),
        }
    }
}

impl fmt::Display for DuplicateEdgePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            DuplicateEdgePolicy::LastWriteWins => "last",
            DuplicateEdgePolicy::KeepMinimum => "min",
        };
        f.write_str(value)
    }
}

impl std::str::FromStr for DuplicateEdgePolicy {
    type Err = String;

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "last" | "last_write_wins" => Ok(DuplicateEdgePolicy::LastWriteWins),
            "min" | "keep_minimum" => Ok(DuplicateEdgePolicy::KeepMinimum),
            other => Err(format!(
                "unknown duplicate edge policy '{other}', expected 'last' or 'min'"
            )),
        }
    }
}

/// Build the time and distance adjacency matrices with the default
/// last-write-wins duplicate policy.
pub fn build_adjacency_matrices(
    edges: &[Edge],
    nodes: &NodeSet,
) -> Result<(DistanceMatrix, DistanceMatrix)> {
    build_adjacency_matrices_with_policy(edges, nodes, DuplicateEdgePolicy::default())
}

/// Build the time and distance adjacency matrices.
///
/// Each edge supplies the weight for both directions. The distance matrix
/// uses `km` and falls back to `min` when the edge has no distance. Self
/// loops leave the diagonal at zero.
pub fn build_adjacency_matrices_with_policy(
    edges: &[Edge],
    nodes: &NodeSet,
    policy: DuplicateEdgePolicy,
) -> Result<(DistanceMatrix, DistanceMatrix)> {
    let mut time = DistanceMatrix::unconnected(nodes.len());
    let mut distance = DistanceMatrix::unconnected(nodes.len());

    for edge in edges {
        let i = nodes.require(edge.city1())?;
        let j = nodes.require(edge.city2())?;
        if i == j {
            continue;
        }

        let time_weight = policy.apply(time.get(i, j), edge.min());
        time.set(i, j, time_weight);
        time.set(j, i, time_weight);

        let distance_weight = policy.apply(distance.get(i, j), edge.distance_weight());
        distance.set(i, j, distance_weight);
        distance.set(j, i, distance_weight);
    }

    Ok((time, distance))
}
