use std::fmt::Display;

use nalgebra::{DVector, Matrix2, Matrix4};
use num_complex::Complex;
use rayon::prelude::*;

use crate::error::{Result, SimError};
use crate::Qbit;

/// Register dimension (in amplitudes) from which single-qubit gates are
/// applied with rayon.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 1 << 14;

/// Largest register the simulator will allocate: 2^30 amplitudes, 16 GiB.
pub const MAX_QUBITS: usize = 30;

/// Dense state vector over `n` qubits.
///
/// Bit `i` of an amplitude index is the value of qubit `i`, so qubit 0 is the
/// least significant bit.
#[derive(Clone, Debug)]
pub struct QState {
    pub(crate) state: DVector<Qbit>,
    parallel_threshold: usize,
}

impl QState {
    pub fn new(state: &[Qbit]) -> Result<Self> {
        let len = state.len();
        if len < 2 || (len & (len - 1)) != 0 {
            return Err(SimError::invalid_argument(format!(
                "state vector length must be a power of 2 of at least 2, got {}",
                len
            )));
        }

        Ok(Self {
            state: DVector::from_row_slice(state),
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// `|0...0>` over `num_of_qbits` qubits.
    pub fn zero_state(num_of_qbits: usize) -> Result<Self> {
        let size = Self::dimension_for(num_of_qbits)?;
        let mut state = DVector::zeros(size);
        state[0] = Complex::new(1.0, 0.0);
        Ok(Self {
            state,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Basis state from a bit string written most significant qubit first,
    /// e.g. `"01"` sets qubit 0.
    pub fn from_str(qbits: &str) -> Result<Self> {
        if !qbits.chars().all(|c| c == '0' || c == '1') {
            return Err(SimError::invalid_argument(format!(
                "basis state must be a string of 0 and 1, got {:?}",
                qbits
            )));
        }

        let size = Self::dimension_for(qbits.len())?;
        let index = usize::from_str_radix(qbits, 2)
            .map_err(|e| SimError::invalid_argument(e.to_string()))?;
        let mut state = DVector::zeros(size);
        state[index] = Complex::new(1.0, 0.0);

        Ok(Self {
            state,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    fn dimension_for(num_of_qbits: usize) -> Result<usize> {
        if num_of_qbits < 1 {
            return Err(SimError::invalid_argument(
                "number of qubits must be at least 1",
            ));
        }
        if num_of_qbits > MAX_QUBITS {
            return Err(SimError::invalid_argument(format!(
                "{} qubits exceed the maximum of {}",
                num_of_qbits, MAX_QUBITS
            )));
        }
        1_usize
            .checked_shl(num_of_qbits as u32)
            .filter(|size| {
                size.checked_mul(std::mem::size_of::<Qbit>())
                    .is_some_and(|bytes| bytes <= isize::MAX as usize)
            })
            .ok_or_else(|| {
                SimError::invalid_argument(format!(
                    "{} qubits cannot be addressed on this platform",
                    num_of_qbits
                ))
            })
    }

    pub fn with_parallel_threshold(mut self, parallel_threshold: usize) -> Self {
        self.parallel_threshold = parallel_threshold;
        self
    }

    pub fn num_of_qbits(&self) -> usize {
        self.state.len().ilog2() as usize
    }

    pub fn amplitudes(&self) -> &[Qbit] {
        self.state.as_slice()
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        let num_of_qbits = self.num_of_qbits();
        if index >= num_of_qbits {
            return Err(SimError::qubit_out_of_range(index, num_of_qbits));
        }
        Ok(())
    }

    fn check_pair(&self, first: usize, second: usize) -> Result<()> {
        self.check_index(first)?;
        self.check_index(second)?;
        if first == second {
            return Err(SimError::same_wire(first));
        }
        Ok(())
    }

    /// Applies `gate` to every amplitude pair that differs only in `qubit`.
    pub fn apply_single_qubit_gate(&mut self, gate: &Matrix2<Qbit>, qubit: usize) -> Result<()> {
        self.check_index(qubit)?;

        let (g00, g01, g10, g11) = (gate[(0, 0)], gate[(0, 1)], gate[(1, 0)], gate[(1, 1)]);
        let update = move |(a0, a1): (&mut Qbit, &mut Qbit)| {
            let (x, y) = (*a0, *a1);
            *a0 = g00 * x + g01 * y;
            *a1 = g10 * x + g11 * y;
        };

        let stride = 1_usize << qubit;
        let parallel = self.state.len() >= self.parallel_threshold;
        let amps = self.state.as_mut_slice();

        if parallel {
            amps.par_chunks_mut(2 * stride).for_each(|chunk| {
                let (lo, hi) = chunk.split_at_mut(stride);
                lo.par_iter_mut().zip(hi.par_iter_mut()).for_each(update);
            });
        } else {
            amps.chunks_mut(2 * stride).for_each(|chunk| {
                let (lo, hi) = chunk.split_at_mut(stride);
                lo.iter_mut().zip(hi.iter_mut()).for_each(update);
            });
        }

        Ok(())
    }

    /// Applies a 4x4 `gate` on `(first, second)`. `first` is the most
    /// significant bit of the gate's local basis.
    pub fn apply_two_qubit_gate(
        &mut self,
        gate: &Matrix4<Qbit>,
        first: usize,
        second: usize,
    ) -> Result<()> {
        self.check_pair(first, second)?;

        let m0 = 1_usize << first;
        let m1 = 1_usize << second;
        let amps = self.state.as_mut_slice();

        for base in (0..amps.len()).filter(|i| i & (m0 | m1) == 0) {
            let indices = [base, base | m1, base | m0, base | m0 | m1];
            let old = indices.map(|i| amps[i]);
            for (row, &i) in indices.iter().enumerate() {
                amps[i] = (0..4).map(|col| gate[(row, col)] * old[col]).sum();
            }
        }

        Ok(())
    }

    pub fn apply_cnot(&mut self, control: usize, target: usize) -> Result<()> {
        self.check_pair(control, target)?;

        let mc = 1_usize << control;
        let mt = 1_usize << target;
        let amps = self.state.as_mut_slice();

        for i in 0..amps.len() {
            if i & mc != 0 && i & mt == 0 {
                amps.swap(i, i | mt);
            }
        }

        Ok(())
    }

    /// `<Z>` on `qubit`.
    pub fn expectation_z(&self, qubit: usize) -> Result<f64> {
        self.check_index(qubit)?;

        let mask = 1_usize << qubit;
        let expectation: f64 = self
            .state
            .iter()
            .enumerate()
            .map(|(i, a)| if i & mask == 0 { a.norm_sqr() } else { -a.norm_sqr() })
            .sum();

        Ok(expectation.clamp(-1.0, 1.0))
    }

    pub fn probabilities(&self) -> Vec<f64> {
        self.state.iter().map(|a| a.norm_sqr()).collect()
    }

    pub fn norm_sqr(&self) -> f64 {
        self.state.iter().map(|a| a.norm_sqr()).sum()
    }
}

impl Display for QState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bin_width = self.num_of_qbits();

        for (i, value) in self.state.iter().enumerate() {
            writeln!(f, "|{:0width$b}>: {}", i, value, width = bin_width)?;
        }

        Ok(())
    }
}
