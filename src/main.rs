use std::path::Path;

use clap::Parser;
use double_pendulum::cli::args::{CommandsEnum, PendulumArgs};
use double_pendulum::cli::explore::{explore_pendulum, HALT_EXIT_CODE};
use double_pendulum::cli::render::render_pendulum;
use double_pendulum::core::file_io::{
    build_output_path_with_date_time, extract_base_name, maybe_date_time_string, FilePrefix,
};
use double_pendulum::error::AppError;
use double_pendulum::pendulum::params::PendulumParams;

const OUTPUT_ROOT: &str = "out";

fn load_params(path: &str) -> Result<PendulumParams, AppError> {
    let params = PendulumParams::from_json_str(&std::fs::read_to_string(path)?)?;
    log::info!("loaded parameters from {}", path);
    Ok(params)
}

fn run(args: &PendulumArgs) -> Result<(), AppError> {
    match &args.command {
        Some(CommandsEnum::Render(render_args)) => {
            let params = load_params(&render_args.params_path)?;
            let file_prefix = FilePrefix {
                directory_path: build_output_path_with_date_time(
                    Path::new(OUTPUT_ROOT),
                    &render_args.params_path,
                    "render",
                    &maybe_date_time_string(render_args.date_time_out),
                )?,
                file_base: extract_base_name(&render_args.params_path).to_owned(),
            };
            let summary = render_pendulum(&params, render_args.frames, file_prefix)?;
            match summary.halted {
                Some(error) => Err(error.into()),
                None => Ok(()),
            }
        }

        Some(CommandsEnum::Explore(path)) => explore_pendulum(&load_params(&path.params_path)?),

        None => {
            log::info!("no command given; exploring the default pendulum");
            explore_pendulum(&PendulumParams::default())
        }
    }
}

fn main() {
    env_logger::init();
    let args: PendulumArgs = PendulumArgs::parse();

    if let Err(error) = run(&args) {
        log::error!("{}", error);
        let code = match error {
            AppError::Domain(_) => HALT_EXIT_CODE,
            _ => 1,
        };
        std::process::exit(code);
    }
}
