use nalgebra_sparse::convert::serial::convert_dense_csr;
use nalgebra_sparse::{coo::CooMatrix, csr::CsrMatrix};

use crate::error::{Result, SimError};
use crate::gates::{identity_matrix, x_matrix, y_matrix, z_matrix};
use crate::qstate::QState;
use crate::Qbit;

/// Weighted sum of Pauli strings, `sum_k c_k P_k`.
#[derive(Clone, Debug, Default)]
pub struct Observable {
    operators: Vec<PauliOperator>,
}

impl Observable {
    pub fn new() -> Self {
        Self {
            operators: Vec::new(),
        }
    }

    /// `Z` on a single qubit.
    pub fn z(index: usize) -> Self {
        Self {
            operators: vec![PauliOperator {
                coefficient: 1.0,
                ops: vec![PauliMatrix {
                    index,
                    kind: Pauli::Z,
                }],
            }],
        }
    }

    pub fn add_pauli_operator(&mut self, coefficient: f64, ops: &[(Pauli, usize)]) -> Result<()> {
        if !coefficient.is_finite() {
            return Err(SimError::invalid_argument(format!(
                "coefficient must be finite, got {}",
                coefficient
            )));
        }
        for (i, &(_, index)) in ops.iter().enumerate() {
            if ops[..i].iter().any(|&(_, other)| other == index) {
                return Err(SimError::invalid_argument(format!(
                    "qubit {} appears twice in one Pauli string",
                    index
                )));
            }
        }

        self.operators.push(PauliOperator {
            coefficient,
            ops: ops
                .iter()
                .map(|&(kind, index)| PauliMatrix { index, kind })
                .collect(),
        });
        Ok(())
    }

    pub fn terms(&self) -> impl Iterator<Item = (f64, &[PauliMatrix])> {
        self.operators
            .iter()
            .map(|operator| (operator.coefficient, operator.ops.as_slice()))
    }

    /// Only `I` and `Z` factors, so every term is measurable in the
    /// computational basis.
    pub fn is_diagonal(&self) -> bool {
        self.operators
            .iter()
            .flat_map(|operator| &operator.ops)
            .all(|op| matches!(op.kind, Pauli::I | Pauli::Z))
    }

    pub fn validate(&self, num_of_qbits: usize) -> Result<()> {
        for op in self.operators.iter().flat_map(|operator| &operator.ops) {
            if op.index >= num_of_qbits {
                return Err(SimError::qubit_out_of_range(op.index, num_of_qbits));
            }
        }
        Ok(())
    }

    /// `<psi|O|psi>`, evaluated through the full sparse operator of every term.
    pub fn expectation_value(&self, qstate: &QState) -> Result<f64> {
        let num_of_qbits = qstate.num_of_qbits();
        self.validate(num_of_qbits)?;

        let mut expectation = 0.0;

        for operator in &self.operators {
            let op = operator.to_sparse(num_of_qbits);
            let applied = &op * &qstate.state;
            expectation += operator.coefficient * qstate.state.dotc(&applied).re;
        }

        Ok(expectation)
    }
}

#[derive(Clone, Debug)]
struct PauliOperator {
    coefficient: f64,
    ops: Vec<PauliMatrix>,
}

impl PauliOperator {
    fn to_sparse(&self, num_of_qbits: usize) -> CsrMatrix<Qbit> {
        let mut kinds = vec![Pauli::I; num_of_qbits];
        for op in &self.ops {
            kinds[op.index] = op.kind;
        }

        // Qubit n-1 is the leftmost factor
        let mut matrix = CsrMatrix::identity(1);
        for kind in kinds.iter().rev() {
            matrix = kronecker_product(&matrix, &kind.sparse_matrix());
        }
        matrix
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PauliMatrix {
    pub index: usize,
    pub kind: Pauli,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pauli {
    I,
    X,
    Y,
    Z,
}

impl Pauli {
    fn sparse_matrix(&self) -> CsrMatrix<Qbit> {
        let dense = match self {
            Pauli::I => identity_matrix(),
            Pauli::X => x_matrix(),
            Pauli::Y => y_matrix(),
            Pauli::Z => z_matrix(),
        };
        convert_dense_csr(&dense)
    }
}

pub fn kronecker_product(x: &CsrMatrix<Qbit>, y: &CsrMatrix<Qbit>) -> CsrMatrix<Qbit> {
    let mut result = CooMatrix::new(x.nrows() * y.nrows(), x.ncols() * y.ncols());

    for (rx, cx, value_x) in x.triplet_iter() {
        for (ry, cy, value_y) in y.triplet_iter() {
            let new_row = rx * y.nrows() + ry;
            let new_col = cx * y.ncols() + cy;
            let new_value = value_x * value_y;
            result.push(new_row, new_col, new_value);
        }
    }

    CsrMatrix::from(&result)
}

#[cfg(test)]
mod tests {
    use nalgebra::Complex;

    use crate::{assert_approx_eq, Circuit};

    use super::*;

    #[test]
    fn test_1qbit_z_observable() -> Result<()> {
        let q0 = QState::from_str("0")?;

        let mut observable = Observable::new();
        observable.add_pauli_operator(1.0, &[(Pauli::Z, 0)])?;

        let expectation = observable.expectation_value(&q0)?;
        assert_approx_eq!(1.0, expectation);

        let q1 = Circuit::new(1).H(0)?.apply(&q0)?;
        let expectation = observable.expectation_value(&q1)?;
        assert_approx_eq!(0.0, expectation);

        let q2 = QState::new(&[
            Complex::new((2.0f64 / 3.0).sqrt(), 0.0),
            Complex::new((1.0f64 / 3.0).sqrt(), 0.0),
        ])?;
        let expectation = observable.expectation_value(&q2)?;
        assert_approx_eq!(1.0 / 3.0, expectation);

        Ok(())
    }

    #[test]
    fn test_1qbit_x_observable() -> Result<()> {
        let q0 = QState::from_str("0")?;

        let mut observable = Observable::new();
        observable.add_pauli_operator(1.0, &[(Pauli::X, 0)])?;

        let expectation = observable.expectation_value(&q0)?;
        assert_approx_eq!(0.0, expectation);

        let q1 = Circuit::new(1).H(0)?.apply(&q0)?;
        let expectation = observable.expectation_value(&q1)?;
        assert_approx_eq!(1.0, expectation);

        Ok(())
    }

    #[test]
    fn test_1qbit_y_observable() -> Result<()> {
        // RX(-pi/2)|0> = (|0> + i|1>)/sqrt(2), the +1 eigenstate of Y
        let q = Circuit::new(1)
            .rx(0, -std::f64::consts::FRAC_PI_2)?
            .apply(&QState::from_str("0")?)?;

        let mut observable = Observable::new();
        observable.add_pauli_operator(1.0, &[(Pauli::Y, 0)])?;
        assert_approx_eq!(1.0, observable.expectation_value(&q)?);

        Ok(())
    }

    #[test]
    fn test_2qbit_xz_observable() -> Result<()> {
        let q0 = QState::from_str("00")?;

        let mut observable = Observable::new();
        observable.add_pauli_operator(1.0, &[(Pauli::X, 0), (Pauli::Z, 1)])?;

        let expectation = observable.expectation_value(&q0)?;
        assert_approx_eq!(0.0, expectation);

        let q1 = Circuit::new(q0.num_of_qbits()).H(0)?.apply(&q0)?;
        let expectation = observable.expectation_value(&q1)?;
        assert_approx_eq!(1.0, expectation);

        Ok(())
    }

    #[test]
    fn test_weighted_sum() -> Result<()> {
        // |10>: qubit 1 is set
        let q = QState::from_str("10")?;

        let mut observable = Observable::new();
        observable.add_pauli_operator(0.5, &[(Pauli::Z, 0)])?;
        observable.add_pauli_operator(2.0, &[(Pauli::Z, 1)])?;
        observable.add_pauli_operator(-1.0, &[(Pauli::Z, 0), (Pauli::Z, 1)])?;

        assert_approx_eq!(0.5 - 2.0 + 1.0, observable.expectation_value(&q)?);
        Ok(())
    }

    #[test]
    fn test_z_matches_direct_expectation() -> Result<()> {
        let q = Circuit::new(3)
            .rx(0, 1.01)?
            .ry(1, 0.3)?
            .cnot(0, 2)?
            .rz(2, 0.8)?
            .crz(1, 0, 2.0)?
            .apply(&QState::zero_state(3)?)?;

        for qubit in 0..3 {
            assert_approx_eq!(
                q.expectation_z(qubit)?,
                Observable::z(qubit).expectation_value(&q)?
            );
        }
        Ok(())
    }

    #[test]
    fn test_is_diagonal() -> Result<()> {
        assert!(Observable::z(3).is_diagonal());
        assert!(Observable::new().is_diagonal());

        let mut observable = Observable::new();
        observable.add_pauli_operator(1.0, &[(Pauli::Z, 0), (Pauli::I, 1)])?;
        assert!(observable.is_diagonal());
        observable.add_pauli_operator(0.5, &[(Pauli::X, 1)])?;
        assert!(!observable.is_diagonal());
        Ok(())
    }

    #[test]
    fn test_invalid_observables() -> Result<()> {
        let mut observable = Observable::new();
        assert!(observable
            .add_pauli_operator(f64::NAN, &[(Pauli::Z, 0)])
            .is_err());
        assert!(observable
            .add_pauli_operator(1.0, &[(Pauli::Z, 0), (Pauli::X, 0)])
            .is_err());

        let q = QState::zero_state(2)?;
        assert!(matches!(
            Observable::z(2).expectation_value(&q),
            Err(SimError::IndexOutOfRange(_))
        ));
        Ok(())
    }
}
