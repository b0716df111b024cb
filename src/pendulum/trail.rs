use image::Rgba;

use crate::core::canvas::TRANSPARENT;
use crate::core::draw_target::DrawTarget;
use crate::pendulum::params::{DisplayParams, PhysicalParams};
use crate::pendulum::state::Pose;

const BASE_INTENSITY: f64 = 50.0;
const INTENSITY_PER_PIXEL: f64 = 4.0;

/// Everything about the look of the pendulum that does not change per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseStyle {
    pub color: Rgba<u8>,
    pub trail_width: u32,
    pub rod_width: u32,
    pub first_mass_radius: f64,
    pub second_mass_radius: f64,
}

impl PoseStyle {
    /// Bob radii are a quarter of the masses.
    pub fn new(physical: &PhysicalParams, display: &DisplayParams) -> PoseStyle {
        PoseStyle {
            color: display.trail_color(),
            trail_width: display.trail_width,
            rod_width: display.rod_width,
            first_mass_radius: physical.m1 / 4.0,
            second_mass_radius: physical.m2 / 4.0,
        }
    }
}

/// Grey level of the rods: brighter when the second mass moved further during
/// the last step. `50 + 4 * round(distance)`, clamped to `[0, 255]`.
///
/// A NaN distance maps to zero.
pub fn trail_intensity(distance: f64) -> u8 {
    let raw = BASE_INTENSITY + INTENSITY_PER_PIXEL * distance.round();
    raw.clamp(0.0, 255.0) as u8
}

pub fn rod_color(intensity: u8) -> Rgba<u8> {
    Rgba([intensity, intensity, intensity, 255])
}

/// Draws one frame of the pendulum.
///
/// The trail segment from the previous to the current second-mass position is
/// added to `trail`, which is never cleared. `overlay` is cleared and then gets
/// both rods (grey, by speed) and both bobs (fixed color), so it only ever shows
/// the current pose.
///
/// Returns the rod intensity used for this frame.
pub fn render_pose<T, O>(pose: &Pose, style: &PoseStyle, trail: &mut T, overlay: &mut O) -> u8
where
    T: DrawTarget,
    O: DrawTarget,
{
    let distance = (pose.second_mass - pose.previous_second_mass).norm();
    let intensity = trail_intensity(distance);

    trail.draw_line(
        &pose.previous_second_mass,
        &pose.second_mass,
        style.color,
        style.trail_width,
    );

    overlay.clear(TRANSPARENT);
    let rods = rod_color(intensity);
    overlay.draw_line(&pose.pivot, &pose.first_mass, rods, style.rod_width);
    overlay.draw_line(&pose.first_mass, &pose.second_mass, rods, style.rod_width);
    overlay.fill_circle(&pose.first_mass, style.first_mass_radius, style.color);
    overlay.fill_circle(&pose.second_mass, style.second_mass_radius, style.color);

    intensity
}
