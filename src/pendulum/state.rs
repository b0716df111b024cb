use nalgebra::Vector2;

use crate::error::ConfigError;
use crate::pendulum::params::{InitialConditions, PhysicalParams};

/// Screen-space snapshot of the pendulum, produced once per frame by
/// [`PendulumState::resolve_positions`] and consumed by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub pivot: Vector2<f64>,
    pub first_mass: Vector2<f64>,
    pub second_mass: Vector2<f64>,
    /// Where the second mass was on the previous frame. Start of the trail segment.
    pub previous_second_mass: Vector2<f64>,
}

/// Complete state of one double pendulum.
///
/// Angles and angular velocities are only written by the integrator
/// (`pendulum::integrator::advance`). The Cartesian positions are derived from
/// the angles, except for `previous_second_mass`, which caches the prior frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PendulumState {
    pub(crate) physical: PhysicalParams,
    pub(crate) angles: Vector2<f64>,
    pub(crate) velocities: Vector2<f64>,
    pivot: Vector2<f64>,
    first_mass: Vector2<f64>,
    second_mass: Vector2<f64>,
    previous_second_mass: Vector2<f64>,
}

/// Forward kinematics: angles measured from the downward vertical, with screen
/// `y` growing downwards.
pub fn mass_positions(
    pivot: &Vector2<f64>,
    physical: &PhysicalParams,
    angles: &Vector2<f64>,
) -> (Vector2<f64>, Vector2<f64>) {
    let first = pivot + physical.r1 * Vector2::new(angles[0].sin(), angles[0].cos());
    let second = first + physical.r2 * Vector2::new(angles[1].sin(), angles[1].cos());
    (first, second)
}

impl PendulumState {
    /// Validates the physical constants before anything can divide by them.
    pub fn new(
        physical: PhysicalParams,
        initial: InitialConditions,
        pivot: Vector2<f64>,
    ) -> Result<PendulumState, ConfigError> {
        physical.validate()?;
        initial.validate()?;
        let angles = Vector2::new(initial.a1, initial.a2);
        let (first_mass, second_mass) = mass_positions(&pivot, &physical, &angles);
        Ok(PendulumState {
            physical,
            angles,
            velocities: Vector2::new(initial.v1, initial.v2),
            pivot,
            first_mass,
            second_mass,
            previous_second_mass: second_mass,
        })
    }

    /// Caches the current second-mass position as "previous", then recomputes
    /// both mass positions from the current angles. Non-finite angles produce
    /// non-finite positions; nothing is caught here.
    pub fn resolve_positions(&mut self) -> Pose {
        self.previous_second_mass = self.second_mass;
        let (first_mass, second_mass) = mass_positions(&self.pivot, &self.physical, &self.angles);
        self.first_mass = first_mass;
        self.second_mass = second_mass;
        self.pose()
    }

    pub fn pose(&self) -> Pose {
        Pose {
            pivot: self.pivot,
            first_mass: self.first_mass,
            second_mass: self.second_mass,
            previous_second_mass: self.previous_second_mass,
        }
    }

    pub fn physical(&self) -> &PhysicalParams {
        &self.physical
    }

    pub fn angles(&self) -> Vector2<f64> {
        self.angles
    }

    pub fn velocities(&self) -> Vector2<f64> {
        self.velocities
    }

    pub fn is_finite(&self) -> bool {
        self.angles.iter().chain(self.velocities.iter()).all(|x| x.is_finite())
    }
}
