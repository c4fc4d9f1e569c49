//! State-vector simulation of small parameterised quantum circuits.
//!
//! A [`Circuit`] is a validated, ordered list of gate applications. It is
//! executed on a dense state vector that starts in `|0...0>`, and the result
//! is read out as the Pauli-Z expectation value of every qubit.
//!
//! ```
//! use pqc_sim::{run, Circuit};
//!
//! let circuit = Circuit::new(2).rx(0, std::f64::consts::PI)?.cnot(0, 1)?;
//! let expectations = run(circuit.operations(), circuit.num_of_qbits())?;
//!
//! assert!((expectations[1] + 1.0).abs() < 1e-10);
//! # Ok::<(), pqc_sim::SimError>(())
//! ```

pub mod builtin;
pub mod circuit;
pub mod config;
pub mod device;
pub mod error;
pub mod gates;
pub mod observable;
pub mod qstate;
pub mod simulator;

#[cfg(test)]
mod test_util;

use num_complex::Complex;

pub use circuit::{Circuit, GateKind, Operation};
pub use device::{Device, StateVectorDevice};
pub use error::{Result, SimError};
pub use observable::{Observable, Pauli};
pub use qstate::QState;
pub use simulator::run;

pub type Qbit = Complex<f64>;
