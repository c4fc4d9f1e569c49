use nalgebra::{Matrix2, Matrix4};
use num_complex::Complex;

use crate::Qbit;

const ONE: Qbit = Complex::new(1.0, 0.0);
const ZERO: Qbit = Complex::new(0.0, 0.0);
const I: Qbit = Complex::new(0.0, 1.0);

pub fn identity_matrix() -> Matrix2<Qbit> {
    Matrix2::identity()
}

pub fn h_matrix() -> Matrix2<Qbit> {
    let root2 = 2.0_f64.sqrt();
    Matrix2::from_row_slice(&[ONE / root2, ONE / root2, ONE / root2, -ONE / root2])
}

pub fn x_matrix() -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[ZERO, ONE, ONE, ZERO])
}

pub fn y_matrix() -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[ZERO, -I, I, ZERO])
}

pub fn z_matrix() -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[ONE, ZERO, ZERO, -ONE])
}

pub fn s_matrix() -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[ONE, ZERO, ZERO, I])
}

pub fn t_matrix() -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[
        ONE,
        ZERO,
        ZERO,
        Complex::from_polar(1.0, std::f64::consts::FRAC_PI_4),
    ])
}

pub fn rx_matrix(angle: f64) -> Matrix2<Qbit> {
    let cos = Complex::new((angle / 2.0).cos(), 0.0);
    let sin = Complex::new(0.0, -(angle / 2.0).sin());
    Matrix2::from_row_slice(&[cos, sin, sin, cos])
}

pub fn ry_matrix(angle: f64) -> Matrix2<Qbit> {
    let cos = Complex::new((angle / 2.0).cos(), 0.0);
    let sin = Complex::new((angle / 2.0).sin(), 0.0);
    Matrix2::from_row_slice(&[cos, -sin, sin, cos])
}

pub fn rz_matrix(angle: f64) -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[
        Complex::from_polar(1.0, -angle / 2.0),
        ZERO,
        ZERO,
        Complex::from_polar(1.0, angle / 2.0),
    ])
}

pub fn phase_matrix(angle: f64) -> Matrix2<Qbit> {
    Matrix2::from_row_slice(&[ONE, ZERO, ZERO, Complex::from_polar(1.0, angle)])
}

/// Lifts a single-qubit gate into a controlled gate on `[control, target]`,
/// with the control wire as the most significant bit of the local basis.
pub fn controlled_matrix(gate: &Matrix2<Qbit>) -> Matrix4<Qbit> {
    let mut matrix = Matrix4::identity();
    matrix.fixed_view_mut::<2, 2>(2, 2).copy_from(gate);
    matrix
}

pub fn cnot_matrix() -> Matrix4<Qbit> {
    controlled_matrix(&x_matrix())
}

pub fn cz_matrix() -> Matrix4<Qbit> {
    controlled_matrix(&z_matrix())
}

pub fn crz_matrix(angle: f64) -> Matrix4<Qbit> {
    controlled_matrix(&rz_matrix(angle))
}

pub fn swap_matrix() -> Matrix4<Qbit> {
    let mut matrix = Matrix4::zeros();
    matrix[(0, 0)] = ONE;
    matrix[(1, 2)] = ONE;
    matrix[(2, 1)] = ONE;
    matrix[(3, 3)] = ONE;
    matrix
}
