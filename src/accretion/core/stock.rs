//! Stocks — tagged sediment pools with dual weight/length readout.
//!
//! Purpose
//! -------
//! Represent every pool in a layer (live biomass, the three active inert
//! pools, and their out-of-system trackers) as one closed tagged type,
//! [`Stock`], behind the [`Measured`] capability trait. Variant-specific
//! behavior (which pools decay, which material they are made of) is an
//! explicit `match` on [`StockTag`].
//!
//! Key behaviors
//! -------------
//! - A stock stores a single amount in its own [`Measurement`] and carries
//!   the fixed weight → length constant of its material, so both readouts are
//!   always available without the parameter bundle.
//! - [`Stock::outflow`] gives the per-step loss for Labile (decomposition)
//!   and Inorganic (ash uptake); every other variant returns zero.
//! - [`Flows`] is the (labile, refractory, inorganic) triple moved between
//!   biomass and the inert pools.
//!
//! Invariants & assumptions
//! ------------------------
//! - Amounts are finite and ≥ 0. [`Stock::withdraw`] clamps at zero and
//!   reports what was actually moved.
//! - `weight_to_length > 0` (guaranteed by a validated bundle).
use serde::{Deserialize, Serialize};

use crate::accretion::{
    core::{
        params::ParameterBundle,
        units::{Material, Measurement},
        validation::{validate_measurement, validate_non_negative},
    },
    errors::{AccretionError, AccretionResult},
};

/// Variant of a sediment pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTag {
    Biomass,
    Labile,
    Refractory,
    Inorganic,
    BiomassOut,
    LabileOut,
    RefractoryOut,
    InorganicOut,
}

impl StockTag {
    /// Material used to convert this pool between weight and length.
    pub fn material(self) -> Material {
        match self {
            StockTag::Inorganic | StockTag::InorganicOut => Material::Inorganic,
            _ => Material::Organic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            StockTag::Biomass => "biomass",
            StockTag::Labile => "labile",
            StockTag::Refractory => "refractory",
            StockTag::Inorganic => "inorganic",
            StockTag::BiomassOut => "biomass_out",
            StockTag::LabileOut => "labile_out",
            StockTag::RefractoryOut => "refractory_out",
            StockTag::InorganicOut => "inorganic_out",
        }
    }
}

/// Capability shared by every pool: an amount readable in either unit.
pub trait Measured {
    fn tag(&self) -> StockTag;

    /// Unit the amount is stored in.
    fn measurement(&self) -> Measurement;

    /// Stored amount in [`Measured::measurement`] units.
    fn amount(&self) -> f64;

    /// Centimetres of column occupied by one gram of this pool.
    fn weight_to_length(&self) -> f64;

    /// Amount in grams.
    fn weight(&self) -> f64 {
        match self.measurement() {
            Measurement::Weight => self.amount(),
            Measurement::Length => self.amount() / self.weight_to_length(),
        }
    }

    /// Amount in centimetres of column height.
    fn length(&self) -> f64 {
        match self.measurement() {
            Measurement::Weight => self.amount() * self.weight_to_length(),
            Measurement::Length => self.amount(),
        }
    }

    /// Amount in the requested unit.
    fn amount_in(&self, measurement: Measurement) -> f64 {
        match measurement {
            Measurement::Weight => self.weight(),
            Measurement::Length => self.length(),
        }
    }
}

/// One sediment pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    tag: StockTag,
    measurement: Measurement,
    amount: f64,
    weight_to_length: f64,
}

impl Stock {
    /// Build a pool holding `amount` (in `measurement` units).
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` for an invalid
    ///   amount.
    pub fn new(
        params: &ParameterBundle, tag: StockTag, measurement: Measurement, amount: f64,
    ) -> AccretionResult<Self> {
        let amount = validate_non_negative(tag.name(), amount)?;
        Ok(Self::with_amount(params, tag, measurement, amount))
    }

    /// Build an empty pool.
    pub fn empty(params: &ParameterBundle, tag: StockTag, measurement: Measurement) -> Self {
        Self::with_amount(params, tag, measurement, 0.0)
    }

    fn with_amount(
        params: &ParameterBundle, tag: StockTag, measurement: Measurement, amount: f64,
    ) -> Self {
        Self { tag, measurement, amount, weight_to_length: params.weight_to_length(tag.material()) }
    }

    /// Check a stored pool against the slot it was read into and recompute
    /// its conversion constant from `params`.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::StockTagMismatch` / `MeasurementMismatch` if the
    ///   record belongs to another slot.
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` for a bad amount.
    pub(crate) fn revalidate(
        &mut self, params: &ParameterBundle, tag: StockTag, measurement: Measurement,
    ) -> AccretionResult<()> {
        if self.tag != tag {
            return Err(AccretionError::StockTagMismatch { expected: tag, actual: self.tag });
        }
        validate_measurement(measurement, self.measurement)?;
        validate_non_negative(tag.name(), self.amount)?;
        self.weight_to_length = params.weight_to_length(tag.material());
        Ok(())
    }

    /// Express `value` given in `unit` in this stock's own unit.
    fn to_own_unit(&self, value: f64, unit: Measurement) -> f64 {
        match (unit, self.measurement) {
            (Measurement::Weight, Measurement::Length) => value * self.weight_to_length,
            (Measurement::Length, Measurement::Weight) => value / self.weight_to_length,
            _ => value,
        }
    }

    /// Add `value` (in `unit`) to the pool.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` / `NonFiniteValue`; the pool is not
    ///   changed.
    pub fn deposit(&mut self, value: f64, unit: Measurement) -> AccretionResult<()> {
        let value = validate_non_negative(self.tag.name(), value)?;
        self.amount += self.to_own_unit(value, unit);
        Ok(())
    }

    /// Remove up to `value` (in `unit`) and return the amount actually
    /// removed, in `unit`.
    pub fn withdraw(&mut self, value: f64, unit: Measurement) -> f64 {
        let requested = self.to_own_unit(value.max(0.0), unit);
        let taken = requested.min(self.amount);
        self.amount -= taken;
        match (self.measurement, unit) {
            (Measurement::Length, Measurement::Weight) => taken / self.weight_to_length,
            (Measurement::Weight, Measurement::Length) => taken * self.weight_to_length,
            _ => taken,
        }
    }

    /// Loss in grams for one transfer, for pools with an outflow.
    ///
    /// Notes
    /// -----
    /// - Labile: decomposition `weight × k`.
    /// - Inorganic: ash uptake `weight × k3 × wa_to_rl`.
    /// - Refractory and the trackers: no outflow.
    pub fn outflow(&self, params: &ParameterBundle) -> f64 {
        let rate = match self.tag {
            StockTag::Labile => params.labile_decay_rate,
            StockTag::Inorganic => params.ash_fraction * params.aboveground_to_root,
            _ => return 0.0,
        };
        self.weight() * rate
    }
}

impl Measured for Stock {
    fn tag(&self) -> StockTag {
        self.tag
    }

    fn measurement(&self) -> Measurement {
        self.measurement
    }

    fn amount(&self) -> f64 {
        self.amount
    }

    fn weight_to_length(&self) -> f64 {
        self.weight_to_length
    }
}

/// Mass moved into the (labile, refractory, inorganic) pools.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Flows {
    pub labile: f64,
    pub refractory: f64,
    pub inorganic: f64,
}

impl Flows {
    pub fn new(labile: f64, refractory: f64, inorganic: f64) -> Self {
        Self { labile, refractory, inorganic }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self::new(self.labile * factor, self.refractory * factor, self.inorganic * factor)
    }

    pub fn total(&self) -> f64 {
        self.labile + self.refractory + self.inorganic
    }

    /// Convert gram flows into `measurement`, using the organic constant for
    /// labile/refractory and the inorganic constant for ash.
    pub fn into_measurement(self, params: &ParameterBundle, measurement: Measurement) -> Self {
        let convert = |grams: f64, material| {
            params.convert(grams, Measurement::Weight, measurement, material)
        };
        Self::new(
            convert(self.labile, Material::Organic),
            convert(self.refractory, Material::Organic),
            convert(self.inorganic, Material::Inorganic),
        )
    }
}

impl std::ops::Add for Flows {
    type Output = Flows;

    fn add(self, rhs: Flows) -> Flows {
        Flows::new(
            self.labile + rhs.labile,
            self.refractory + rhs.refractory,
            self.inorganic + rhs.inorganic,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Dual weight/length readout for every variant.
    // - Deposit/withdraw arithmetic across units.
    // - Variant-specific outflows.
    // - Flow conversion and arithmetic.
    // -------------------------------------------------------------------------

    const ALL_TAGS: [StockTag; 8] = [
        StockTag::Biomass,
        StockTag::Labile,
        StockTag::Refractory,
        StockTag::Inorganic,
        StockTag::BiomassOut,
        StockTag::LabileOut,
        StockTag::RefractoryOut,
        StockTag::InorganicOut,
    ];

    #[test]
    // Purpose
    // -------
    // Weight → length → weight returns the original amount for every variant.
    //
    // Given
    // -----
    // - Each tag stored in WEIGHT with 0.37 g.
    //
    // Expect
    // ------
    // - A LENGTH stock built from the reported length reads back 0.37 g.
    fn weight_length_readout_round_trips_for_every_variant() {
        // Arrange
        let params = ParameterBundle::morris_bowden();

        for tag in ALL_TAGS {
            // Act
            let by_weight = Stock::new(&params, tag, Measurement::Weight, 0.37).unwrap();
            let by_length =
                Stock::new(&params, tag, Measurement::Length, by_weight.length()).unwrap();

            // Assert
            assert_relative_eq!(by_length.weight(), 0.37, epsilon = 1e-12);
            assert_relative_eq!(
                by_weight.length(),
                params.grams_to_cm(0.37, tag.material()),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let params = ParameterBundle::morris_bowden();
        let err = Stock::new(&params, StockTag::Labile, Measurement::Length, -0.1).unwrap_err();
        assert_eq!(err, AccretionError::NegativeValue { name: "labile", value: -0.1 });
    }

    #[test]
    // Purpose
    // -------
    // Deposits in grams land in a LENGTH stock as centimetres, and
    // withdrawals clamp at the stored amount.
    //
    // Given
    // -----
    // - An empty inorganic LENGTH stock.
    //
    // Expect
    // ------
    // - Depositing `bi` grams adds 1 cm; withdrawing 5 cm removes only 1 cm.
    fn deposit_and_withdraw_convert_units_and_clamp() {
        // Arrange
        let params = ParameterBundle::morris_bowden();
        let mut stock = Stock::empty(&params, StockTag::Inorganic, Measurement::Length);

        // Act
        stock.deposit(params.inorganic_bulk_density, Measurement::Weight).unwrap();
        let taken = stock.withdraw(5.0, Measurement::Length);

        // Assert
        assert_relative_eq!(taken, 1.0, epsilon = 1e-12);
        assert_eq!(stock.amount(), 0.0);
        assert!(stock.deposit(-1.0, Measurement::Length).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Only labile and inorganic pools have an outflow.
    //
    // Given
    // -----
    // - 1 g in each active pool.
    //
    // Expect
    // ------
    // - Labile loses `k`, inorganic loses `k3 * wa_to_rl`, refractory nothing.
    fn outflow_dispatches_on_tag() {
        // Arrange
        let params = ParameterBundle::morris_bowden();
        let stock = |tag| Stock::new(&params, tag, Measurement::Weight, 1.0).unwrap();

        // Act / Assert
        assert_relative_eq!(stock(StockTag::Labile).outflow(&params), 0.5);
        assert_relative_eq!(stock(StockTag::Inorganic).outflow(&params), 0.05);
        assert_eq!(stock(StockTag::Refractory).outflow(&params), 0.0);
        assert_eq!(stock(StockTag::LabileOut).outflow(&params), 0.0);
    }

    #[test]
    fn flows_convert_per_destination_material() {
        let params = ParameterBundle::morris_bowden();
        let grams = Flows::new(0.085, 0.17, 1.99);

        let cm = grams.into_measurement(&params, Measurement::Length);

        assert_relative_eq!(cm.labile, 1.0, epsilon = 1e-12);
        assert_relative_eq!(cm.refractory, 2.0, epsilon = 1e-12);
        assert_relative_eq!(cm.inorganic, 1.0, epsilon = 1e-12);
        assert_eq!(grams.into_measurement(&params, Measurement::Weight), grams);
        assert_relative_eq!((grams + grams.scaled(2.0)).total(), 3.0 * grams.total());
    }
}
