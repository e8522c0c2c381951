pub mod app;
pub mod brush;
pub mod camera;
pub mod cell;
pub mod cell_set;
pub mod config;
pub mod cursor;
pub mod events;
pub mod parse_rle;
pub mod rule_set;
pub mod simulation;
pub mod tally;
pub mod viewport;
pub mod world;

mod parse_util;

/// Simulation-space coordinate
pub type CellOffset = i16;

/// View-space coordinate, in screen pixels
pub type ViewOffset = i32;
