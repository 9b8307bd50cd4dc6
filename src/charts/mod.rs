pub mod aggregate;
pub mod render;

pub use aggregate::*;
pub use render::{ChartPaths, render_charts};
