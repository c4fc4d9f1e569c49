//! Execution backends.
//!
//! A [`Device`] turns a circuit into expectation values. The only backend is
//! [`StateVectorDevice`], which is exact by default and switches to
//! sampling when a shot count is configured.

use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::circuit::Circuit;
use crate::config::DeviceConfig;
use crate::error::{Result, SimError};
use crate::gates::{h_matrix, phase_matrix};
use crate::observable::{Observable, Pauli, PauliMatrix};
use crate::qstate::{QState, DEFAULT_PARALLEL_THRESHOLD};
use crate::simulator::{expectations_z, simulate};

pub trait Device {
    fn name(&self) -> &str;

    /// Expectation value of each observable after running `circuit`.
    fn expval(&self, circuit: &Circuit, observables: &[Observable]) -> Result<Vec<f64>>;

    /// `<Z>` on every qubit of `circuit`, in qubit order.
    fn run(&self, circuit: &Circuit) -> Result<Vec<f64>> {
        let observables = (0..circuit.num_of_qbits())
            .map(Observable::z)
            .collect::<Vec<_>>();
        self.expval(circuit, &observables)
    }
}

#[derive(Clone, Debug)]
pub struct StateVectorDevice {
    shots: Option<usize>,
    seed: Option<u64>,
    parallel_threshold: usize,
}

impl Default for StateVectorDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl StateVectorDevice {
    pub fn new() -> Self {
        Self {
            shots: None,
            seed: None,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        }
    }

    pub fn from_config(config: &DeviceConfig) -> Result<Self> {
        let device = Self::new()
            .with_shots(config.shots)?
            .with_parallel_threshold(config.parallel_threshold);
        Ok(match config.seed {
            Some(seed) => device.with_seed(seed),
            None => device,
        })
    }

    /// `None` selects exact expectation values.
    pub fn with_shots(mut self, shots: Option<usize>) -> Result<Self> {
        if shots == Some(0) {
            return Err(SimError::invalid_argument("shots must be at least 1"));
        }
        self.shots = shots;
        Ok(self)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    pub fn shots(&self) -> Option<usize> {
        self.shots
    }

    /// Final state of `circuit` started from `|0...0>`.
    pub fn state(&self, circuit: &Circuit) -> Result<QState> {
        simulate(
            circuit.operations(),
            circuit.num_of_qbits(),
            self.parallel_threshold,
        )
    }

    /// Probability of each computational basis state. With shots configured
    /// these are observed frequencies.
    pub fn probs(&self, circuit: &Circuit) -> Result<Vec<f64>> {
        let state = self.state(circuit)?;
        let probabilities = state.probabilities();

        match self.shots {
            None => Ok(probabilities),
            Some(shots) => {
                let mut counts = vec![0_usize; probabilities.len()];
                for outcome in sample(&probabilities, shots, &mut self.rng())? {
                    counts[outcome] += 1;
                }
                Ok(counts
                    .into_iter()
                    .map(|count| count as f64 / shots as f64)
                    .collect())
            }
        }
    }

    fn rng(&self) -> StdRng {
        let seed = self.seed.unwrap_or_else(|| rand::rng().random());
        StdRng::seed_from_u64(seed)
    }

    fn estimate(
        &self,
        state: &QState,
        observable: &Observable,
        shots: usize,
        rng: &mut StdRng,
    ) -> Result<f64> {
        let mut estimate = 0.0;

        for (coefficient, ops) in observable.terms() {
            let measured = ops
                .iter()
                .filter(|op| op.kind != Pauli::I)
                .collect::<Vec<_>>();
            if measured.is_empty() {
                estimate += coefficient;
                continue;
            }

            // Rotate every measured qubit so that its Pauli becomes Z
            let mut rotated = state.clone();
            for op in &measured {
                match op.kind {
                    Pauli::X => rotated.apply_single_qubit_gate(&h_matrix(), op.index)?,
                    Pauli::Y => {
                        rotated.apply_single_qubit_gate(
                            &phase_matrix(-std::f64::consts::FRAC_PI_2),
                            op.index,
                        )?;
                        rotated.apply_single_qubit_gate(&h_matrix(), op.index)?;
                    }
                    Pauli::Z | Pauli::I => {}
                }
            }

            let outcomes = sample(&rotated.probabilities(), shots, rng)?;
            estimate += coefficient * parity_mean(&outcomes, pauli_mask(ops));
        }

        Ok(estimate)
    }
}

impl Device for StateVectorDevice {
    fn name(&self) -> &str {
        "default.qubit"
    }

    fn expval(&self, circuit: &Circuit, observables: &[Observable]) -> Result<Vec<f64>> {
        for observable in observables {
            observable.validate(circuit.num_of_qbits())?;
        }

        info!(
            device = self.name(),
            qubits = circuit.num_of_qbits(),
            operations = circuit.operations().len(),
            shots = ?self.shots,
            "executing circuit"
        );
        let state = self.state(circuit)?;

        match self.shots {
            None => observables
                .iter()
                .map(|observable| observable.expectation_value(&state))
                .collect(),
            Some(shots) => {
                let mut rng = self.rng();

                // Diagonal observables commute qubit-wise and are read from
                // one shared set of computational-basis outcomes
                let outcomes = if observables.iter().any(Observable::is_diagonal) {
                    sample(&state.probabilities(), shots, &mut rng)?
                } else {
                    Vec::new()
                };

                observables
                    .iter()
                    .map(|observable| {
                        if observable.is_diagonal() {
                            Ok(diagonal_estimate(observable, &outcomes))
                        } else {
                            self.estimate(&state, observable, shots, &mut rng)
                        }
                    })
                    .collect()
            }
        }
    }

    fn run(&self, circuit: &Circuit) -> Result<Vec<f64>> {
        if self.shots.is_some() {
            let observables = (0..circuit.num_of_qbits())
                .map(Observable::z)
                .collect::<Vec<_>>();
            return self.expval(circuit, &observables);
        }

        info!(
            device = self.name(),
            qubits = circuit.num_of_qbits(),
            operations = circuit.operations().len(),
            "executing circuit"
        );
        let state = self.state(circuit)?;
        let expectations = expectations_z(&state)?;
        debug!(?expectations, "readout");
        Ok(expectations)
    }
}

/// Bit mask of the qubits a Pauli string acts on non-trivially.
fn pauli_mask(ops: &[PauliMatrix]) -> usize {
    ops.iter()
        .filter(|op| op.kind != Pauli::I)
        .fold(0_usize, |mask, op| mask | (1 << op.index))
}

/// Mean of the eigenvalue product (+1 for even parity under `mask`, -1 for odd).
fn parity_mean(outcomes: &[usize], mask: usize) -> f64 {
    let total: i64 = outcomes
        .iter()
        .map(|outcome| if (outcome & mask).count_ones() % 2 == 0 { 1 } else { -1 })
        .sum();
    total as f64 / outcomes.len() as f64
}

fn diagonal_estimate(observable: &Observable, outcomes: &[usize]) -> f64 {
    observable
        .terms()
        .map(|(coefficient, ops)| coefficient * parity_mean(outcomes, pauli_mask(ops)))
        .sum()
}

fn sample(probabilities: &[f64], shots: usize, rng: &mut StdRng) -> Result<Vec<usize>> {
    let distribution = WeightedIndex::new(probabilities)
        .map_err(|e| SimError::invalid_argument(format!("cannot sample from state: {}", e)))?;
    Ok((0..shots).map(|_| distribution.sample(rng)).collect())
}
