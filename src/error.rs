//! Error types for circuit construction and simulation.

use thiserror::Error;

/// Result type alias for simulator operations.
pub type Result<T> = std::result::Result<T, SimError>;

/// Errors raised while building or running a circuit.
///
/// Every error is fatal for the current run; no partial result is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    /// Malformed input: qubit count below one, non-finite angle, wrong arity and so on.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A wire outside `0..n`, or a two-qubit gate whose wires coincide.
    #[error("Index out of range: {0}")]
    IndexOutOfRange(String),
}

impl SimError {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn qubit_out_of_range(index: usize, num_of_qbits: usize) -> Self {
        Self::IndexOutOfRange(format!(
            "qubit {} does not exist in a {}-qubit register",
            index, num_of_qbits
        ))
    }

    pub fn same_wire(index: usize) -> Self {
        Self::IndexOutOfRange(format!(
            "control and target qubits cannot be the same (both {})",
            index
        ))
    }

    pub fn non_finite_angle(angle: f64) -> Self {
        Self::InvalidArgument(format!("angle must be a finite real number, got {}", angle))
    }
}
