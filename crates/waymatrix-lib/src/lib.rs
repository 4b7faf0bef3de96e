//! waymatrix library entry points.
//!
//! This crate validates locality edge records, builds dense time and distance
//! adjacency matrices over the cities they mention, and relaxes those
//! matrices into all-pairs shortest paths. Higher-level consumers (the HTTP
//! service and the CLI) should only depend on the functions exported here
//! instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod assemble;
pub mod compute;
pub mod edge;
pub mod error;
pub mod graph;
pub mod report;
pub mod shortest_path;
pub mod source;

pub use assemble::{assemble, ResultRecord, Weight};
pub use compute::{
    compute_path_records, compute_shortest_paths, shortest_path_records, ComputeOptions,
    PathRecords, ShortestPaths,
};
pub use edge::{parse_localities, parse_locality, Edge, ParsedLocalities, RawLocality};
pub use error::{Error, Result, ValidationError};
pub use graph::{
    build_adjacency_matrices, build_adjacency_matrices_with_policy, DistanceMatrix,
    DuplicateEdgePolicy, NodeSet,
};
pub use report::{CollectingReporter, ReportEvent, Reporter, TracingReporter};
pub use shortest_path::all_pairs_shortest_paths;
pub use source::{LocalitySource, SourceConfig, SourceLocation, DEFAULT_FETCH_TIMEOUT};
