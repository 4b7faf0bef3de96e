use std::fmt;

use serde::{Deserialize, Serialize};

use crate::graph::{DistanceMatrix, NodeSet};

/// Shortest-path weight that keeps unreachability explicit.
///
/// Serialized as a JSON number when finite and as `null` when no path
/// exists. Infinity is never turned into an arbitrary finite number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<f64>", into = "Option<f64>")]
pub enum Weight {
    Finite(f64),
    Unreachable,
}

impl Weight {
    /// Map a relaxed matrix cell to a weight; any non-finite value is unreachable.
    ///
    /// This includes a finite path whose sum overflowed to `+∞` during relaxation.
    pub fn from_distance(value: f64) -> Self {
        if value.is_finite() {
            Weight::Finite(value)
        } else {
            Weight::Unreachable
        }
    }

    /// Finite value, or `None` when unreachable.
    pub fn value(self) -> Option<f64> {
        match self {
            Weight::Finite(value) => Some(value),
            Weight::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Weight::Finite(_))
    }
}

impl From<Option<f64>> for Weight {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Weight::Unreachable, Weight::from_distance)
    }
}

impl From<Weight> for Option<f64> {
    fn from(weight: Weight) -> Self {
        weight.value()
    }
}

impl fmt::Display for Weight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Finite(value) => write!(f, "{value}"),
            Weight::Unreachable => f.write_str("unreachable"),
        }
    }
}

/// Shortest travel time and distance between two distinct cities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub city1: String,
    pub city2: String,
    pub min: Weight,
    pub km: Weight,
}

/// Flatten the relaxed time and distance matrices into one record per
/// ordered pair of distinct nodes.
///
/// Records are emitted row-major in node-index order: all destinations of
/// the first node, then of the second, and so on.
///
/// # Panics
///
/// Panics if either matrix does not match the size of `nodes`.
pub fn assemble(
    nodes: &NodeSet,
    time_dist: &DistanceMatrix,
    distance_dist: &DistanceMatrix,
) -> Vec<ResultRecord> {
    let n = nodes.len();
    assert_eq!(time_dist.size(), n, "time matrix does not match node set");
    assert_eq!(
        distance_dist.size(),
        n,
        "distance matrix does not match node set"
    );

    let mut records = Vec::with_capacity(n.saturating_mul(n.saturating_sub(1)));
    for (i, origin) in nodes.iter().enumerate() {
        for (j, destination) in nodes.iter().enumerate() {
            if i == j {
                continue;
            }
            records.push(ResultRecord {
                city1: origin.to_string(),
                city2: destination.to_string(),
                min: Weight::from_distance(time_dist.get(i, j)),
                km: Weight::from_distance(distance_dist.get(i, j)),
            });
        }
    }
    records
}
