//! Detection hook for the one failure mode the integrator has: the state
//! becoming NaN or infinite. The default policy stays silent and lets the
//! corrupted state keep rendering; the other policies log, freeze or stop.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::pendulum::state::PendulumState;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NonFinitePolicy {
    /// Keep integrating and drawing whatever comes out.
    #[default]
    Ignore,
    /// Warn once, then behave like `Ignore`.
    Log,
    /// Warn once and freeze on the last frame.
    Pause,
    /// Stop the run with a `DomainError`.
    Halt,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GuardVerdict {
    Continue,
    Pause,
    Halt(DomainError),
}

#[derive(Debug, Clone)]
pub struct DomainGuard {
    policy: NonFinitePolicy,
    first_non_finite_step: Option<u64>,
}

impl DomainGuard {
    pub fn new(policy: NonFinitePolicy) -> DomainGuard {
        DomainGuard {
            policy,
            first_non_finite_step: None,
        }
    }

    pub fn policy(&self) -> NonFinitePolicy {
        self.policy
    }

    /// Step index at which the state was first seen to be non-finite.
    pub fn first_non_finite_step(&self) -> Option<u64> {
        self.first_non_finite_step
    }

    /// Call once after every integrator step. Only the first detection is
    /// reported; the state cannot recover, so later steps add nothing.
    pub fn inspect(&mut self, step: u64, state: &PendulumState) -> GuardVerdict {
        if self.first_non_finite_step.is_some() || state.is_finite() {
            return GuardVerdict::Continue;
        }
        self.first_non_finite_step = Some(step);

        let error = DomainError {
            step,
            angles: state.angles(),
            velocities: state.velocities(),
        };
        match self.policy {
            NonFinitePolicy::Ignore => GuardVerdict::Continue,
            NonFinitePolicy::Log => {
                log::warn!("{error}");
                GuardVerdict::Continue
            }
            NonFinitePolicy::Pause => {
                log::warn!("{error}; pausing simulation");
                GuardVerdict::Pause
            }
            NonFinitePolicy::Halt => {
                log::error!("{error}; halting simulation");
                GuardVerdict::Halt(error)
            }
        }
    }
}
