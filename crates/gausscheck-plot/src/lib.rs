//! Declarative plotting recipes for GP-like objects.
//!
//! No rendering happens here: each recipe is a pure function from a
//! [`Process`] and a style configuration to a serializable series
//! description (x-coordinates, y-values, style attributes) that a drawing
//! backend can consume.

mod series;
mod style;

pub use series::{mean_ribbon_series, sample_path_series, RibbonSeries, SampleSeries};
pub use style::{MarkerShape, MarkerStyle, RibbonStyle, SampleStyle};
