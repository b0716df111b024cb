pub mod canvas;
pub mod draw_target;
pub mod file_io;
pub mod frame_limiter;
pub mod ode_solvers;
pub mod stopwatch;
