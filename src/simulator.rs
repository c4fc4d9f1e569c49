//! Straight-line execution of an operation list on a fresh state vector.

use tracing::{debug, trace};

use crate::circuit::Operation;
use crate::error::Result;
use crate::qstate::{QState, DEFAULT_PARALLEL_THRESHOLD};

/// Prepares `|0...0>` and applies `operations` in order.
///
/// Every operation is validated against the register before anything is
/// applied, so a malformed circuit never yields a partially evolved state.
pub fn simulate(
    operations: &[Operation],
    num_of_qbits: usize,
    parallel_threshold: usize,
) -> Result<QState> {
    let mut state = QState::zero_state(num_of_qbits)?.with_parallel_threshold(parallel_threshold);

    for operation in operations {
        operation.validate(num_of_qbits)?;
    }

    for (step, operation) in operations.iter().enumerate() {
        trace!(step, %operation, "apply");
        operation.apply(&mut state)?;
    }

    debug!(norm = state.norm_sqr(), "simulation finished");
    Ok(state)
}

/// `<Z_q>` for every qubit `q` in `0..n`, in order.
pub fn expectations_z(state: &QState) -> Result<Vec<f64>> {
    (0..state.num_of_qbits())
        .map(|qubit| state.expectation_z(qubit))
        .collect()
}

/// Runs `operations` on `num_of_qbits` qubits and returns `<Z>` on each qubit.
pub fn run(operations: &[Operation], num_of_qbits: usize) -> Result<Vec<f64>> {
    let state = simulate(operations, num_of_qbits, DEFAULT_PARALLEL_THRESHOLD)?;
    expectations_z(&state)
}

#[cfg(test)]
mod tests {
    use std::f64::consts::PI;

    use super::*;
    use crate::assert_approx_eq;
    use crate::circuit::{Circuit, GateKind};
    use crate::error::SimError;

    #[test]
    fn test_identity_circuit() -> Result<()> {
        for n in 1..=5 {
            assert_eq!(run(&[], n)?, vec![1.0; n]);
        }
        Ok(())
    }

    #[test]
    fn test_rx_pi_single_qubit() -> Result<()> {
        let circuit = Circuit::new(1).rx(0, PI)?;
        let result = run(circuit.operations(), 1)?;
        assert_approx_eq!(-1.0, result[0]);
        Ok(())
    }

    #[test]
    fn test_cnot_flips_target() -> Result<()> {
        let before = run(Circuit::new(2).rx(0, PI)?.operations(), 2)?;
        assert_approx_eq!(1.0, before[1]);

        let after = run(Circuit::new(2).rx(0, PI)?.cnot(0, 1)?.operations(), 2)?;
        assert_approx_eq!(-1.0, after[0]);
        assert_approx_eq!(-1.0, after[1]);
        Ok(())
    }

    #[test]
    fn test_run_rejects_zero_qubits() {
        assert!(matches!(run(&[], 0), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_run_rejects_oversized_register() {
        assert!(matches!(run(&[], 62), Err(SimError::InvalidArgument(_))));
    }

    #[test]
    fn test_run_rejects_index_equal_to_n() -> Result<()> {
        let operations = vec![
            Operation::new(GateKind::RX(0.3), &[0])?,
            Operation::new(GateKind::H, &[3])?,
        ];
        assert_eq!(
            run(&operations, 3).unwrap_err(),
            SimError::qubit_out_of_range(3, 3)
        );

        let operations = vec![Operation::new(GateKind::CNot, &[1, 1])?];
        assert!(matches!(
            run(&operations, 3),
            Err(SimError::IndexOutOfRange(_))
        ));
        Ok(())
    }

    #[test]
    fn test_run_rejects_non_finite_angle() {
        let operations = vec![Operation {
            kind: GateKind::RZ(f64::NAN),
            index: crate::circuit::GateIndex::One(0),
        }];
        assert!(matches!(
            run(&operations, 1),
            Err(SimError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_determinism() -> Result<()> {
        let circuit = Circuit::new(3)
            .rx(0, 1.01)?
            .rz(1, 0.81)?
            .H(2)?
            .cnot(0, 1)?
            .crz(2, 0, 0.4)?
            .cz(1, 2)?;

        let first = run(circuit.operations(), 3)?;
        let second = run(circuit.operations(), 3)?;
        assert_eq!(first, second);

        let parallel = expectations_z(&simulate(circuit.operations(), 3, 0)?)?;
        assert_eq!(first, parallel);
        Ok(())
    }

    #[test]
    fn test_norm_preserved() -> Result<()> {
        let circuit = Circuit::new(4)
            .rx(0, 0.2)?
            .ry(1, 2.2)?
            .H(3)?
            .cnot(0, 3)?
            .swap(1, 2)?
            .crz(3, 1, 1.7)?
            .rz(2, -0.9)?;

        let state = simulate(circuit.operations(), 4, DEFAULT_PARALLEL_THRESHOLD)?;
        assert_approx_eq!(1.0, state.norm_sqr(), 1e-9);
        Ok(())
    }
}
