//! Mechanical energy of the double pendulum, used as a diagnostic only.
//!
//! Units follow the simulation: pixels for length and ticks for time. The
//! potential reference is the pivot, with `y` measured downward, so the
//! hanging rest state has the most negative potential energy.

use nalgebra::Vector2;

use crate::pendulum::params::PhysicalParams;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyReport {
    pub kinetic: f64,
    pub potential: f64,
}

impl EnergyReport {
    pub fn total(&self) -> f64 {
        self.kinetic + self.potential
    }
}

pub fn mechanical_energy(
    physical: &PhysicalParams,
    angles: &Vector2<f64>,
    velocities: &Vector2<f64>,
) -> EnergyReport {
    let PhysicalParams { g, m1, m2, r1, r2 } = *physical;
    let (a1, a2) = (angles[0], angles[1]);
    let (v1, v2) = (velocities[0], velocities[1]);

    let first_speed_sq = r1 * r1 * v1 * v1;
    let second_speed_sq =
        first_speed_sq + r2 * r2 * v2 * v2 + 2.0 * r1 * r2 * v1 * v2 * (a1 - a2).cos();
    let kinetic = 0.5 * m1 * first_speed_sq + 0.5 * m2 * second_speed_sq;

    let first_depth = r1 * a1.cos();
    let second_depth = first_depth + r2 * a2.cos();
    let potential = -g * (m1 * first_depth + m2 * second_depth);

    EnergyReport { kinetic, potential }
}
