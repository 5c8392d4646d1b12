//! Voxbreak Core - frame timing and randomness
//!
//! The simulation is single-threaded and advances in explicit fixed steps.
//! Nothing here reads the wall clock: [`Clock`] is advanced by the frame
//! loop, [`Stopwatch`] is polled against it, and [`SimRng`] is seeded once
//! per world so a run is reproducible from its seed.

pub mod rng;
pub mod time;

pub use rng::SimRng;
pub use time::{Clock, Stopwatch};
