//! Circuits shipped with the binary.

use crate::circuit::Circuit;
use crate::error::Result;

pub const ENCODING_PQC_QUBITS: usize = 5;

/// Five-qubit variational classifier: an `RX`/`RZ` angle encoding of one data
/// point followed by a CNOT-entangled parameterised layer.
pub fn encoding_pqc() -> Result<Circuit> {
    let features = [1.01, 0.81, 0.81, 1.3e-2, 0.16];

    let mut circuit = Circuit::new(ENCODING_PQC_QUBITS);
    for (wire, &x) in features.iter().enumerate() {
        circuit = circuit.rx(wire, x)?;
    }
    for (wire, &x) in features.iter().enumerate() {
        circuit = circuit.rz(wire, x)?;
    }

    circuit
        .rx(0, 1.10)?
        .rz(0, 0.75)?
        .cnot(0, 1)?
        .rx(0, 0.82)?
        .rx(1, 0.84)?
        .rz(0, 0.53)?
        .rz(1, 0.81)?
        .cnot(1, 2)?
        .cnot(0, 1)?
        .rx(2, 0.60)?
        // second block
        .rx(1, 0.56)?
        .rz(2, 0.98)?
        .rz(1, 0.93)?
        .cnot(2, 3)?
        .cnot(1, 2)?
        .rx(3, 0.34)?
        // third block
        .rx(2, 0.21)?
        .rz(3, 1.20)?
        .rz(2, 8.7e-2)?
        .cnot(3, 4)?
        .cnot(2, 3)?
        .rx(4, 0.90)?
        // closing rotations
        .rx(3, -0.18)?
        .rz(4, 0.49)?
        .rz(3, 0.83)?
        .cnot(3, 4)?
        .rx(4, 0.72)?
        .rz(4, 87.0)
}
