use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
pub struct PendulumArgs {
    /// With no subcommand, the default pendulum is opened in an interactive window.
    #[command(subcommand)]
    pub command: Option<CommandsEnum>,
}

#[derive(Debug, Subcommand)]
pub enum CommandsEnum {
    /// Open a window; hold Space to start the simulation, Escape to quit.
    Explore(ParameterFilePath),
    /// Run a fixed number of frames without a window and write the result to `out/render`.
    Render(RenderArgs),
}

#[derive(Debug, Args)]
pub struct ParameterFilePath {
    pub params_path: String,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    pub params_path: String,

    /// Number of frames (and therefore integrator steps) to simulate.
    #[clap(long, short, default_value_t = 600)]
    pub frames: u64,

    #[clap(long, short)]
    pub date_time_out: bool,
}
