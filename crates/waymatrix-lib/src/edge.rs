use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ValidationError;
use crate::report::Reporter;

/// Incoming locality record as it appears on the wire, before validation.
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocality {
    pub city1: String,
    pub city2: String,
    pub min: f64,
    #[serde(default)]
    pub km: Option<f64>,
}

/// Validated, undirected road segment between two cities.
///
/// `min` is the travel time in minutes and `km` the optional distance in
/// kilometres. Both are finite and non-negative once constructed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Edge {
    city1: String,
    city2: String,
    min: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    km: Option<f64>,
}

impl Edge {
    /// Build an edge, rejecting negative or non-finite weights.
    pub fn new(
        city1: impl Into<String>,
        city2: impl Into<String>,
        min: f64,
        km: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let city1 = city1.into();
        let city2 = city2.into();
        check_weight("min", min)?;
        if let Some(km) = km {
            check_weight("km", km)?;
        }

        Ok(Self {
            city1,
            city2,
            min,
            km,
        })
    }

    pub fn city1(&self) -> &str {
        &self.city1
    }

    pub fn city2(&self) -> &str {
        &self.city2
    }

    /// Travel time weight.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Distance weight, when the source supplied one.
    pub fn km(&self) -> Option<f64> {
        self.km
    }

    /// Weight used for the distance matrix; falls back to time when `km` is absent.
    pub fn distance_weight(&self) -> f64 {
        self.km.unwrap_or(self.min)
    }

    /// `true` when both endpoints name the same city.
    pub fn is_self_loop(&self) -> bool {
        self.city1 == self.city2
    }
}

impl TryFrom<RawLocality> for Edge {
    type Error = ValidationError;

    fn try_from(raw: RawLocality) -> Result<Self, Self::Error> {
        Edge::new(raw.city1, raw.city2, raw.min, raw.km)
    }
}

fn check_weight(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteWeight { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeWeight { field, value });
    }
    Ok(())
}

/// Outcome of validating a batch of raw records.
#[derive(Debug, Clone, Default)]
pub struct ParsedLocalities {
    /// Records that passed validation, in input order.
    pub edges: Vec<Edge>,
    /// Number of records that were rejected.
    pub skipped: usize,
}

/// Parse one JSON value into an edge.
pub fn parse_locality(value: &Value) -> Result<Edge, ValidationError> {
    let raw = RawLocality::deserialize(value).map_err(|err| ValidationError::Malformed {
        message: err.to_string(),
    })?;
    Edge::try_from(raw)
}

/// Validate every raw record independently, skipping and reporting the bad ones.
pub fn parse_localities(raw: &[Value], reporter: &dyn Reporter) -> ParsedLocalities {
    let mut parsed = ParsedLocalities {
        edges: Vec::with_capacity(raw.len()),
        skipped: 0,
    };

    for (index, value) in raw.iter().enumerate() {
        match parse_locality(value) {
            Ok(edge) => parsed.edges.push(edge),
            Err(error) => {
                reporter.record_skipped(index, &error);
                parsed.skipped += 1;
            }
        }
    }

    parsed
}
