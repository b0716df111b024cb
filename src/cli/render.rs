use std::io::Write;

use crate::core::file_io::{serialize_to_json, FilePrefix};
use crate::core::stopwatch::Stopwatch;
use crate::error::{AppError, DomainError};
use crate::pendulum::energy::{mechanical_energy, EnergyReport};
use crate::pendulum::params::PendulumParams;
use crate::pendulum::simulation::Simulation;

/// What a headless run did, written next to the image as `<base>_diagnostics.txt`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub frames_requested: u64,
    pub frames_run: u64,
    pub first_non_finite_step: Option<u64>,
    pub initial_energy: EnergyReport,
    pub final_energy: EnergyReport,
    /// Set when the `Halt` policy stopped the run early.
    pub halted: Option<DomainError>,
}

impl RenderSummary {
    pub fn display<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "frames requested: {}", self.frames_requested)?;
        writeln!(writer, "frames run: {}", self.frames_run)?;
        match self.first_non_finite_step {
            Some(step) => writeln!(writer, "first non-finite step: {}", step)?,
            None => writeln!(writer, "first non-finite step: none")?,
        }
        writeln!(
            writer,
            "initial energy: {} (kinetic {}, potential {})",
            self.initial_energy.total(),
            self.initial_energy.kinetic,
            self.initial_energy.potential
        )?;
        writeln!(
            writer,
            "final energy: {} (kinetic {}, potential {})",
            self.final_energy.total(),
            self.final_energy.kinetic,
            self.final_energy.potential
        )?;
        if let Some(error) = &self.halted {
            writeln!(writer, "halted: {}", error)?;
        }
        Ok(())
    }
}

fn energy_of(simulation: &Simulation) -> EnergyReport {
    let state = simulation.state();
    mechanical_energy(state.physical(), &state.angles(), &state.velocities())
}

/// Runs `frames` frames without a window, then writes the composed frame, the
/// parameters and a diagnostics report using `file_prefix`.
///
/// A `Halt` of the domain guard ends the loop early but the files are still
/// written; the caller decides what to do with `RenderSummary::halted`.
pub fn render_pendulum(
    params: &PendulumParams,
    frames: u64,
    file_prefix: FilePrefix,
) -> Result<RenderSummary, AppError> {
    let mut stopwatch = Stopwatch::new("Double Pendulum Render".to_owned());

    let mut simulation = Simulation::new(params)?;
    let initial_energy = energy_of(&simulation);
    stopwatch.record_split("setup".to_owned());

    simulation.start();
    let mut halted = None;
    for _ in 0..frames {
        match simulation.step_frame() {
            Ok(Some(_)) => {}
            // Frozen by the `Pause` policy; nothing more will change.
            Ok(None) => break,
            Err(error) => {
                halted = Some(error);
                break;
            }
        }
    }
    stopwatch.record_split("simulation".to_owned());

    let frames_run = simulation.step_count();
    let summary = RenderSummary {
        frames_requested: frames,
        frames_run,
        first_non_finite_step: simulation.guard().first_non_finite_step(),
        initial_energy,
        final_energy: energy_of(&simulation),
        halted,
    };

    let image_path = file_prefix.with_suffix(".png");
    simulation.compose().save_png(&image_path)?;
    log::info!("wrote image to {}", image_path.display());
    stopwatch.record_split("write image".to_owned());

    serialize_to_json(&file_prefix.with_suffix(".json"), params)?;

    let mut diagnostics = file_prefix.create_file_with_suffix("_diagnostics.txt")?;
    summary.display(&mut diagnostics)?;
    stopwatch.display(&mut diagnostics)?;
    diagnostics.flush()?;

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pendulum::guard::NonFinitePolicy;
    use nalgebra::Vector2;
    use std::path::PathBuf;

    fn scratch_prefix(name: &str) -> FilePrefix {
        let directory_path: PathBuf =
            std::env::temp_dir().join(format!("double_pendulum_render_{}", name));
        let _ = std::fs::remove_dir_all(&directory_path);
        std::fs::create_dir_all(&directory_path).unwrap();
        FilePrefix {
            directory_path,
            file_base: "params".to_owned(),
        }
    }

    fn small_params() -> PendulumParams {
        let mut params = PendulumParams::default();
        params.display.resolution = Vector2::new(300, 280);
        params.physical.g = 0.4;
        params.physical.r1 = 40.0;
        params.physical.r2 = 100.0;
        params
    }

    #[test]
    fn test_render_writes_all_outputs() {
        let prefix = scratch_prefix("outputs");
        let summary = render_pendulum(&small_params(), 40, prefix.clone()).unwrap();
        assert_eq!(summary.frames_run, 40);
        assert!(summary.halted.is_none());

        let image = image::open(prefix.with_suffix(".png")).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (300, 280));

        let text = std::fs::read_to_string(prefix.with_suffix(".json")).unwrap();
        assert_eq!(PendulumParams::from_json_str(&text).unwrap(), small_params());

        let diagnostics = std::fs::read_to_string(prefix.with_suffix("_diagnostics.txt")).unwrap();
        assert!(diagnostics.contains("frames run: 40"));
        assert!(diagnostics.contains("first non-finite step: none"));
        assert!(diagnostics.contains("Stopwatch: Double Pendulum Render"));
    }

    #[test]
    fn test_render_stops_on_halt() {
        let prefix = scratch_prefix("halt");
        let mut params = small_params();
        params.physical.g = 50.0;
        params.domain_guard = NonFinitePolicy::Halt;
        let summary = render_pendulum(&params, 500, prefix.clone()).unwrap();

        let halted = summary.halted.clone().unwrap();
        assert_eq!(Some(halted.step), summary.first_non_finite_step);
        assert_eq!(summary.frames_run, halted.step);
        assert!(summary.frames_run < 500);
        assert!(prefix.with_suffix(".png").exists());
    }

    #[test]
    fn test_render_rejects_invalid_params() {
        let prefix = scratch_prefix("invalid");
        let mut params = small_params();
        params.physical.m1 = -1.0;
        assert!(matches!(
            render_pendulum(&params, 10, prefix),
            Err(AppError::Config(_))
        ));
    }
}
