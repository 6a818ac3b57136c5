//! Error types for the rope dynamics core
//!
//! Numerical degeneracies are programming invariants, not user errors:
//! they abort the advance loop and name the offending segment together
//! with its deflection-point count. Clamped configuration values and
//! small rest lengths are side-channelled as warnings instead (see
//! `configuration` and `rope`).

use std::fmt;

/// Fatal numerical violations raised by the per-step rope passes.
#[derive(Debug, Clone, PartialEq)]
pub enum SimError {
    /// Two threaded points of a segment coincide; a sub-edge has zero length.
    DegenerateEdge { segment: usize, deflections: usize },
    /// A rest-length partition entry is exactly zero.
    ZeroRestLength { segment: usize, deflections: usize },
    /// The partition entries no longer sum to the segment's rest length.
    PartitionDrift {
        segment: usize,
        deflections: usize,
        expected: f64,
        actual: f64,
    },
    /// An interior partition (between two deflection points) outgrew the
    /// split bound; splitting there is not supported.
    UnsupportedSplit { segment: usize, deflections: usize },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::DegenerateEdge { segment, deflections } => write!(
                f,
                "zero-length sub-edge in segment {} ({} deflection points)",
                segment, deflections
            ),
            SimError::ZeroRestLength { segment, deflections } => write!(
                f,
                "zero rest-length partition in segment {} ({} deflection points)",
                segment, deflections
            ),
            SimError::PartitionDrift { segment, deflections, expected, actual } => write!(
                f,
                "partition sum {} drifted from rest length {} in segment {} ({} deflection points)",
                actual, expected, segment, deflections
            ),
            SimError::UnsupportedSplit { segment, deflections } => write!(
                f,
                "interior partition above the split bound in segment {} ({} deflection points); \
                 splitting between two deflections is not supported",
                segment, deflections
            ),
        }
    }
}

impl std::error::Error for SimError {}

/// A [`SimError`] annotated with the simulation time at which it occurred.
///
/// Produced by the advance loop; the snapshots captured before the failure
/// remain available on the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineError {
    pub time: f64, // simulation time in seconds
    pub kind: SimError,
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "simulation failed at t = {:.6} s: {}", self.time, self.kind)
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}
