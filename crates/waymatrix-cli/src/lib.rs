//! waymatrix CLI library.
//!
//! Rendering of shortest-path records for the command-line interface.

pub mod output;
