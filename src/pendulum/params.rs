use image::Rgba;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pendulum::guard::NonFinitePolicy;

/// Values of `g` above this have been observed to blow up into NaN after a
/// while. Empirical, not a proven bound.
pub const EMPIRICAL_GRAVITY_LIMIT: f64 = 1.3;

/// Fixed for the lifetime of a simulation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct PhysicalParams {
    pub g: f64,  // gravitational acceleration, pixels per tick^2
    pub m1: f64, // mass of the first bob; also sets its drawn radius
    pub m2: f64,
    pub r1: f64, // rod length, pixels
    pub r2: f64,
}

/// Angles are measured from the downward vertical, in radians, and are never
/// wrapped.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct InitialConditions {
    pub a1: f64,
    pub a2: f64,
    pub v1: f64,
    pub v2: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct DisplayParams {
    pub resolution: Vector2<u32>,
    // Screen-space anchor of the first rod. Defaults to the screen center.
    #[serde(default)]
    pub pivot: Option<Vector2<f64>>,
    pub trail_color: [u8; 3],
    pub pivot_color: [u8; 3],
    pub background_color: [u8; 3],
    pub trail_width: u32,
    pub rod_width: u32,
    pub pivot_radius: f64,
    pub frame_rate: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PendulumParams {
    pub physical: PhysicalParams,
    pub initial: InitialConditions,
    pub display: DisplayParams,
    #[serde(default)]
    pub domain_guard: NonFinitePolicy,
}

impl Default for PhysicalParams {
    fn default() -> Self {
        PhysicalParams {
            g: 1.0,
            m1: 50.0,
            m2: 75.0,
            r1: 100.0,
            r2: 250.0,
        }
    }
}

impl Default for InitialConditions {
    fn default() -> Self {
        const THREE_QUARTER_PI: f64 = 0.75 * std::f64::consts::PI;
        InitialConditions {
            a1: THREE_QUARTER_PI,
            a2: THREE_QUARTER_PI,
            v1: 0.0,
            v2: 0.0,
        }
    }
}

impl Default for DisplayParams {
    fn default() -> Self {
        DisplayParams {
            resolution: Vector2::new(900, 800),
            pivot: None,
            trail_color: [255, 193, 37], // goldenrod1
            pivot_color: [139, 90, 43],  // tan4
            background_color: [0, 0, 0],
            trail_width: 2,
            rod_width: 5,
            pivot_radius: 5.0,
            frame_rate: 60,
        }
    }
}

impl Default for PendulumParams {
    fn default() -> Self {
        PendulumParams {
            physical: PhysicalParams::default(),
            initial: InitialConditions::default(),
            display: DisplayParams::default(),
            domain_guard: NonFinitePolicy::default(),
        }
    }
}

fn require_positive(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { name, value })
    }
}

fn require_finite(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::NonFiniteInitialCondition { name, value })
    }
}

impl PhysicalParams {
    /// Rejects any configuration that would divide by zero in the equations of
    /// motion. A large-but-finite `g` is allowed through with a warning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("m1", self.m1)?;
        require_positive("m2", self.m2)?;
        require_positive("r1", self.r1)?;
        require_positive("r2", self.r2)?;
        if !self.g.is_finite() || self.g < 0.0 {
            return Err(ConfigError::InvalidGravity(self.g));
        }
        if self.g > EMPIRICAL_GRAVITY_LIMIT {
            log::warn!(
                "g = {} exceeds the empirically stable limit of {}; expect non-finite values eventually",
                self.g,
                EMPIRICAL_GRAVITY_LIMIT
            );
        }
        Ok(())
    }
}

impl InitialConditions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_finite("a1", self.a1)?;
        require_finite("a2", self.a2)?;
        require_finite("v1", self.v1)?;
        require_finite("v2", self.v2)
    }
}

impl DisplayParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.resolution[0] == 0 || self.resolution[1] == 0 {
            return Err(ConfigError::EmptyResolution {
                width: self.resolution[0],
                height: self.resolution[1],
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if self.trail_width == 0 {
            return Err(ConfigError::ZeroLineWidth("trail_width"));
        }
        if self.rod_width == 0 {
            return Err(ConfigError::ZeroLineWidth("rod_width"));
        }
        Ok(())
    }

    pub fn pivot(&self) -> Vector2<f64> {
        self.pivot.unwrap_or_else(|| {
            Vector2::new(
                0.5 * self.resolution[0] as f64,
                0.5 * self.resolution[1] as f64,
            )
        })
    }

    pub fn trail_color(&self) -> Rgba<u8> {
        opaque(self.trail_color)
    }

    pub fn pivot_color(&self) -> Rgba<u8> {
        opaque(self.pivot_color)
    }

    pub fn background_color(&self) -> Rgba<u8> {
        opaque(self.background_color)
    }
}

impl PendulumParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.physical.validate()?;
        self.initial.validate()?;
        self.display.validate()
    }

    pub fn from_json_str(text: &str) -> Result<PendulumParams, crate::error::AppError> {
        let params: PendulumParams = serde_json::from_str(text)?;
        params.validate()?;
        Ok(params)
    }
}

pub fn opaque(rgb: [u8; 3]) -> Rgba<u8> {
    Rgba([rgb[0], rgb[1], rgb[2], 255])
}
