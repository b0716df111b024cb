//! Equations of motion for the double pendulum, advanced with a unit-step
//! semi-implicit Euler scheme.
//!
//! The step is one "tick" rather than a physical time, so the simulation speed
//! is tied to the frame rate. Nothing here guards against non-finite results:
//! a vanishing denominator or a runaway velocity turns the state into NaN/inf
//! permanently. Detection lives in `pendulum::guard`.

use nalgebra::Vector2;

use crate::core::ode_solvers::semi_implicit_euler_step;
use crate::pendulum::params::PhysicalParams;
use crate::pendulum::state::PendulumState;

pub const TIME_STEP: f64 = 1.0;

/// Closed-form Lagrangian accelerations `(acc1, acc2)` of both angles.
///
/// The evaluation order of every product is kept fixed so that runs are
/// reproducible bit for bit.
pub fn angular_accelerations(
    physical: &PhysicalParams,
    angles: &Vector2<f64>,
    velocities: &Vector2<f64>,
) -> Vector2<f64> {
    let PhysicalParams { g, m1, m2, r1, r2 } = *physical;
    let (a1, a2) = (angles[0], angles[1]);
    let (v1, v2) = (velocities[0], velocities[1]);

    // Shared by both denominators: 2*m1 + m2 - m2*cos(2*a1 - 2*a2)
    let inertia = 2.0 * m1 + m2 - m2 * (2.0 * a1 - 2.0 * a2).cos();

    let acc1 = {
        let num1 = -1.0 * g * (2.0 * m1 + m2) * a1.sin();
        let num2 = -1.0 * m2 * g * (a1 - 2.0 * a2).sin();
        let num3 = -2.0 * (a1 - a2).sin() * m2;
        let num4 = v2 * v2 * r2 + v1 * v1 * r1 * (a1 - a2).cos();
        (num1 + num2 + num3 * num4) / (r1 * inertia)
    };

    let acc2 = {
        let num1 = 2.0 * (a1 - a2).sin();
        let num2 = v1 * v1 * r1 * (m1 + m2);
        let num3 = g * (m1 + m2) * a1.cos();
        let num4 = v2 * v2 * r2 * m2 * (a1 - a2).cos();
        (num1 * (num2 + num3 + num4)) / (r2 * inertia)
    };

    Vector2::new(acc1, acc2)
}

/// Advances the angles and angular velocities by one tick, in place.
pub fn advance(state: &mut PendulumState) {
    let physical = state.physical;
    let dynamics = move |angles: &Vector2<f64>, velocities: &Vector2<f64>| {
        angular_accelerations(&physical, angles, velocities)
    };
    semi_implicit_euler_step(
        TIME_STEP,
        &mut state.angles,
        &mut state.velocities,
        &dynamics,
    );
}
