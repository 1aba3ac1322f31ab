//! models — layers and the sediment column.
//!
//! - [`Layer`]: one stratigraphic band (biomass + inert pools).
//! - [`SedimentCore`]: the ordered stack of layers and the step-forward
//!   algorithm.
pub mod column;
pub mod layer;

pub use self::{
    column::{PROFILE_COLUMNS, SedimentCore, StepOutcome},
    layer::{Amount, Layer, LayerSummary},
};
