//! storage — constants files in, column snapshots in and out.
//!
//! - [`constants`]: the `[core]` / `[layer]` / `[stocks]` TOML layout and its
//!   conversion into a validated
//!   [`ParameterBundle`](crate::accretion::core::params::ParameterBundle).
//! - [`snapshot`]: JSON persistence of a
//!   [`SedimentCore`](crate::accretion::models::column::SedimentCore) as an
//!   ordered list of layer records plus the constants it was built from.
//! - [`errors`]: [`StorageError`] and [`StorageResult`].
pub mod constants;
pub mod errors;
pub mod snapshot;

pub use self::{
    constants::ConstantsFile,
    errors::{StorageError, StorageResult},
    snapshot::ColumnSnapshot,
};
