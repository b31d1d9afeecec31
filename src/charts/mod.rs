//! Charts module - chart specifications and rendering

mod builders;
pub mod palette;
mod plotter;
mod renderer;
pub mod spec;

pub use builders::{ChartError, ChartFactory};
pub use plotter::ChartPlotter;
pub use renderer::{RenderError, StaticChartRenderer};
pub use spec::{ChartId, ChartKind, ChartSpec};
