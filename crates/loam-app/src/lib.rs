//! Headless driver for the terrain streamer.
//!
//! Runs the streaming controller under a fixed-timestep loop while a
//! scripted observer walks across the terrain.

pub mod driver;
pub mod game_loop;
pub mod observer;
