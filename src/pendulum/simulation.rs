use image::Rgba;

use crate::core::canvas::Canvas;
use crate::core::draw_target::DrawTarget;
use crate::error::{ConfigError, DomainError};
use crate::pendulum::{
    guard::{DomainGuard, GuardVerdict},
    integrator::advance,
    params::PendulumParams,
    state::{PendulumState, Pose},
    trail::{render_pose, PoseStyle},
};

/// Lifecycle of a run. `Frozen` is only entered through the `Pause` guard policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Frozen,
    Terminated,
}

/// One pendulum plus the layers it is drawn on.
///
/// Each running frame does, strictly in this order:
/// resolve positions -> render -> advance the integrator -> inspect.
/// The drawn pose is therefore always one integrator step behind the state.
pub struct Simulation {
    state: PendulumState,
    style: PoseStyle,
    trail: Canvas,   // persistent; accumulates every trail segment
    overlay: Canvas, // transient; holds the current rods and bobs only
    frame: Canvas,   // composed output
    background: Rgba<u8>,
    pivot_color: Rgba<u8>,
    pivot_radius: f64,
    guard: DomainGuard,
    phase: RunPhase,
    step_count: u64,
    last_intensity: u8,
}

impl Simulation {
    pub fn new(params: &PendulumParams) -> Result<Simulation, ConfigError> {
        params.validate()?;
        let display = &params.display;
        let state = PendulumState::new(params.physical, params.initial, display.pivot())?;
        let resolution = display.resolution;
        Ok(Simulation {
            state,
            style: PoseStyle::new(&params.physical, display),
            trail: Canvas::transparent(&resolution),
            overlay: Canvas::transparent(&resolution),
            frame: Canvas::new(&resolution, display.background_color()),
            background: display.background_color(),
            pivot_color: display.pivot_color(),
            pivot_radius: display.pivot_radius,
            guard: DomainGuard::new(params.domain_guard),
            phase: RunPhase::Idle,
            step_count: 0,
            last_intensity: 0,
        })
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn state(&self) -> &PendulumState {
        &self.state
    }

    pub fn guard(&self) -> &DomainGuard {
        &self.guard
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn last_intensity(&self) -> u8 {
        self.last_intensity
    }

    pub fn trail(&self) -> &Canvas {
        &self.trail
    }

    /// Idle -> Running. Ignored in any other phase.
    pub fn start(&mut self) {
        if self.phase == RunPhase::Idle {
            log::info!("simulation started");
            self.phase = RunPhase::Running;
        }
    }

    pub fn quit(&mut self) {
        if self.phase != RunPhase::Terminated {
            log::info!("simulation terminated after {} steps", self.step_count);
            self.phase = RunPhase::Terminated;
        }
    }

    /// Runs one frame if the simulation is running and returns the pose that
    /// was drawn. Returns `Ok(None)` in every other phase.
    ///
    /// Under the `Halt` policy, the first non-finite step terminates the run
    /// and is returned as an error.
    pub fn step_frame(&mut self) -> Result<Option<Pose>, DomainError> {
        if self.phase != RunPhase::Running {
            return Ok(None);
        }

        let pose = self.state.resolve_positions();
        self.last_intensity = render_pose(&pose, &self.style, &mut self.trail, &mut self.overlay);
        advance(&mut self.state);
        self.step_count += 1;

        match self.guard.inspect(self.step_count, &self.state) {
            GuardVerdict::Continue => {}
            GuardVerdict::Pause => self.phase = RunPhase::Frozen,
            GuardVerdict::Halt(error) => {
                self.phase = RunPhase::Terminated;
                return Err(error);
            }
        }
        Ok(Some(pose))
    }

    /// Background, then the trail, then the current pose, then the pivot marker.
    pub fn compose(&mut self) -> &Canvas {
        self.frame.clear(self.background);
        self.trail.composite_onto(&mut self.frame);
        self.overlay.composite_onto(&mut self.frame);
        let pivot = self.state.pose().pivot;
        self.frame.fill_circle(&pivot, self.pivot_radius, self.pivot_color);
        &self.frame
    }
}
