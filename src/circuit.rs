use std::fmt::Display;
use std::path::Path;

use anyhow::Context;
use nalgebra::{Matrix2, Matrix4};
use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::gates::{
    crz_matrix, cz_matrix, h_matrix, phase_matrix, rx_matrix, ry_matrix, rz_matrix, s_matrix,
    swap_matrix, t_matrix, x_matrix, y_matrix, z_matrix,
};
use crate::qstate::QState;
use crate::Qbit;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateKind {
    H,
    X,
    Y,
    Z,
    S,
    T,
    RX(f64),
    RY(f64),
    RZ(f64),
    Phase(f64),

    CNot,
    CZ,
    Swap,
    CRZ(f64),
}

impl GateKind {
    /// Builds a gate from its name as written in circuit files. Names are
    /// case-insensitive; rotations require an angle and fixed gates reject one.
    pub fn from_name(name: &str, angle: Option<f64>) -> Result<Self> {
        let kind = match (name.to_ascii_uppercase().as_str(), angle) {
            ("H" | "HADAMARD", None) => GateKind::H,
            ("X" | "PAULIX", None) => GateKind::X,
            ("Y" | "PAULIY", None) => GateKind::Y,
            ("Z" | "PAULIZ", None) => GateKind::Z,
            ("S", None) => GateKind::S,
            ("T", None) => GateKind::T,
            ("RX", Some(angle)) => GateKind::RX(angle),
            ("RY", Some(angle)) => GateKind::RY(angle),
            ("RZ", Some(angle)) => GateKind::RZ(angle),
            ("PHASE" | "PHASESHIFT", Some(angle)) => GateKind::Phase(angle),
            ("CNOT" | "CX", None) => GateKind::CNot,
            ("CZ", None) => GateKind::CZ,
            ("SWAP", None) => GateKind::Swap,
            ("CRZ", Some(angle)) => GateKind::CRZ(angle),
            ("RX" | "RY" | "RZ" | "PHASE" | "PHASESHIFT" | "CRZ", None) => {
                return Err(SimError::invalid_argument(format!(
                    "gate {} requires an angle",
                    name
                )))
            }
            ("H" | "HADAMARD" | "X" | "PAULIX" | "Y" | "PAULIY" | "Z" | "PAULIZ" | "S" | "T"
            | "CNOT" | "CX" | "CZ" | "SWAP", Some(_)) => {
                return Err(SimError::invalid_argument(format!(
                    "gate {} does not take an angle",
                    name
                )))
            }
            _ => {
                return Err(SimError::invalid_argument(format!(
                    "unknown gate {:?}",
                    name
                )))
            }
        };
        Ok(kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::T => "T",
            GateKind::RX(_) => "RX",
            GateKind::RY(_) => "RY",
            GateKind::RZ(_) => "RZ",
            GateKind::Phase(_) => "Phase",
            GateKind::CNot => "CNOT",
            GateKind::CZ => "CZ",
            GateKind::Swap => "SWAP",
            GateKind::CRZ(_) => "CRZ",
        }
    }

    pub fn angle(&self) -> Option<f64> {
        match *self {
            GateKind::RX(angle)
            | GateKind::RY(angle)
            | GateKind::RZ(angle)
            | GateKind::Phase(angle)
            | GateKind::CRZ(angle) => Some(angle),
            _ => None,
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        match self {
            GateKind::CNot | GateKind::CZ | GateKind::Swap | GateKind::CRZ(_) => 2,
            _ => 1,
        }
    }

    fn single_matrix(&self) -> Option<Matrix2<Qbit>> {
        let matrix = match *self {
            GateKind::H => h_matrix(),
            GateKind::X => x_matrix(),
            GateKind::Y => y_matrix(),
            GateKind::Z => z_matrix(),
            GateKind::S => s_matrix(),
            GateKind::T => t_matrix(),
            GateKind::RX(angle) => rx_matrix(angle),
            GateKind::RY(angle) => ry_matrix(angle),
            GateKind::RZ(angle) => rz_matrix(angle),
            GateKind::Phase(angle) => phase_matrix(angle),
            _ => return None,
        };
        Some(matrix)
    }

    fn two_qubit_matrix(&self) -> Option<Matrix4<Qbit>> {
        let matrix = match *self {
            GateKind::CZ => cz_matrix(),
            GateKind::Swap => swap_matrix(),
            GateKind::CRZ(angle) => crz_matrix(angle),
            _ => return None,
        };
        Some(matrix)
    }
}

impl Display for GateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.angle() {
            Some(angle) => write!(f, "{}({})", self.name(), angle),
            None => write!(f, "{}", self.name()),
        }
    }
}

/// Wires an operation acts on. For controlled gates the first wire is the control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GateIndex {
    One(usize),
    Two(usize, usize),
}

impl GateIndex {
    fn from_wires(wires: &[usize]) -> Result<Self> {
        match *wires {
            [index] => Ok(GateIndex::One(index)),
            [first, second] => Ok(GateIndex::Two(first, second)),
            _ => Err(SimError::invalid_argument(format!(
                "a gate acts on one or two wires, got {}",
                wires.len()
            ))),
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        match self {
            GateIndex::One(_) => 1,
            GateIndex::Two(..) => 2,
        }
    }
}

/// One entry of a circuit: a gate and the wires it acts on.
#[derive(Clone, Debug, PartialEq)]
pub struct Operation {
    pub kind: GateKind,
    pub index: GateIndex,
}

impl Operation {
    pub fn new(kind: GateKind, wires: &[usize]) -> Result<Self> {
        let operation = Self {
            kind,
            index: GateIndex::from_wires(wires)?,
        };
        operation.check_shape()?;
        Ok(operation)
    }

    fn check_shape(&self) -> Result<()> {
        if self.kind.num_of_qbits() != self.index.num_of_qbits() {
            return Err(SimError::invalid_argument(format!(
                "gate {} acts on {} wire(s), got {}",
                self.kind.name(),
                self.kind.num_of_qbits(),
                self.index.num_of_qbits()
            )));
        }
        if let Some(angle) = self.kind.angle() {
            if !angle.is_finite() {
                return Err(SimError::non_finite_angle(angle));
            }
        }
        Ok(())
    }

    /// Checks arity, angle and wires against a register of `num_of_qbits`.
    pub fn validate(&self, num_of_qbits: usize) -> Result<()> {
        self.check_shape()?;

        let check = |index: usize| {
            if index >= num_of_qbits {
                Err(SimError::qubit_out_of_range(index, num_of_qbits))
            } else {
                Ok(())
            }
        };
        match self.index {
            GateIndex::One(index) => check(index),
            GateIndex::Two(first, second) => {
                check(first)?;
                check(second)?;
                if first == second {
                    return Err(SimError::same_wire(first));
                }
                Ok(())
            }
        }
    }

    pub fn apply(&self, state: &mut QState) -> Result<()> {
        self.check_shape()?;

        match (self.kind, self.index) {
            (GateKind::CNot, GateIndex::Two(control, target)) => state.apply_cnot(control, target),
            (kind, GateIndex::One(index)) => match kind.single_matrix() {
                Some(matrix) => state.apply_single_qubit_gate(&matrix, index),
                None => Err(SimError::invalid_argument(format!(
                    "{} is not a single-qubit gate",
                    kind.name()
                ))),
            },
            (kind, GateIndex::Two(first, second)) => match kind.two_qubit_matrix() {
                Some(matrix) => state.apply_two_qubit_gate(&matrix, first, second),
                None => Err(SimError::invalid_argument(format!(
                    "{} is not a two-qubit gate",
                    kind.name()
                ))),
            },
        }
    }
}

impl Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.index {
            GateIndex::One(index) => write!(f, "{} [{}]", self.kind, index),
            GateIndex::Two(first, second) => write!(f, "{} [{}, {}]", self.kind, first, second),
        }
    }
}

/// An ordered list of operations over a fixed number of qubits.
#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    operations: Vec<Operation>,
    num_of_qbits: usize,
}

impl Circuit {
    pub fn new(num_of_qbits: usize) -> Self {
        Self {
            operations: Vec::new(),
            num_of_qbits,
        }
    }

    pub fn num_of_qbits(&self) -> usize {
        self.num_of_qbits
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn add_operation(&mut self, operation: Operation) -> Result<()> {
        operation.validate(self.num_of_qbits)?;
        self.operations.push(operation);
        Ok(())
    }

    pub fn add_gate(&mut self, kind: GateKind, wires: &[usize]) -> Result<()> {
        self.add_operation(Operation::new(kind, wires)?)
    }

    pub fn gate_at(mut self, index: usize, kind: GateKind) -> Result<Self> {
        self.add_gate(kind, &[index])?;
        Ok(self)
    }

    #[allow(non_snake_case)]
    pub fn H(self, index: usize) -> Result<Self> {
        self.gate_at(index, GateKind::H)
    }

    pub fn rx(self, index: usize, angle: f64) -> Result<Self> {
        self.gate_at(index, GateKind::RX(angle))
    }

    pub fn ry(self, index: usize, angle: f64) -> Result<Self> {
        self.gate_at(index, GateKind::RY(angle))
    }

    pub fn rz(self, index: usize, angle: f64) -> Result<Self> {
        self.gate_at(index, GateKind::RZ(angle))
    }

    pub fn cnot(mut self, control: usize, target: usize) -> Result<Self> {
        self.add_gate(GateKind::CNot, &[control, target])?;
        Ok(self)
    }

    pub fn cz(mut self, control: usize, target: usize) -> Result<Self> {
        self.add_gate(GateKind::CZ, &[control, target])?;
        Ok(self)
    }

    pub fn crz(mut self, control: usize, target: usize, angle: f64) -> Result<Self> {
        self.add_gate(GateKind::CRZ(angle), &[control, target])?;
        Ok(self)
    }

    pub fn swap(mut self, index1: usize, index2: usize) -> Result<Self> {
        self.add_gate(GateKind::Swap, &[index1, index2])?;
        Ok(self)
    }

    pub fn apply(&self, state: &QState) -> Result<QState> {
        if state.num_of_qbits() != self.num_of_qbits {
            return Err(SimError::invalid_argument(format!(
                "circuit acts on {} qubits but the state has {}",
                self.num_of_qbits,
                state.num_of_qbits()
            )));
        }

        let mut result = state.clone();
        for operation in &self.operations {
            operation.apply(&mut result)?;
        }
        Ok(result)
    }

    pub fn from_description(description: &CircuitDescription) -> Result<Self> {
        if description.num_qubits < 1 {
            return Err(SimError::invalid_argument(
                "number of qubits must be at least 1",
            ));
        }

        let mut circuit = Circuit::new(description.num_qubits);
        for gate in &description.gates {
            let kind = GateKind::from_name(&gate.gate, gate.angle)?;
            circuit.add_gate(kind, &gate.wires)?;
        }
        Ok(circuit)
    }

    pub fn from_toml_str(text: &str) -> anyhow::Result<Self> {
        let description: CircuitDescription =
            toml::from_str(text).context("Failed to parse circuit description")?;
        Ok(Self::from_description(&description)?)
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read circuit file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid circuit file {}", path.display()))
    }
}

impl Display for Circuit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{} qubits, {} operations", self.num_of_qbits, self.operations.len())?;
        for operation in &self.operations {
            writeln!(f, "  {}", operation)?;
        }
        Ok(())
    }
}

/// On-disk form of a circuit.
///
/// ```toml
/// num_qubits = 2
///
/// [[gates]]
/// gate = "RX"
/// angle = 1.01
/// wires = [0]
///
/// [[gates]]
/// gate = "CNOT"
/// wires = [0, 1]
/// ```
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CircuitDescription {
    pub num_qubits: usize,
    #[serde(default)]
    pub gates: Vec<GateDescription>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GateDescription {
    pub gate: String,
    #[serde(default)]
    pub angle: Option<f64>,
    pub wires: Vec<usize>,
}
