//! Trident Stats - batted-ball analytics dashboard
//!
//! Loads three pre-aggregated hitter tables and turns them into chart
//! specifications, drawn interactively with egui or exported as PNG.

pub mod charts;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod gui;
pub mod logging;
pub mod stats;
