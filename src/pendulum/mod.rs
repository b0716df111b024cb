pub mod energy;
pub mod guard;
pub mod integrator;
pub mod params;
pub mod simulation;
pub mod state;
pub mod trail;
