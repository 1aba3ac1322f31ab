//! Inert stock group: the dead organic and mineral pools of one layer.
//!
//! Purpose
//! -------
//! Hold the three active pools (labile, refractory, inorganic) sized from a
//! layer's deposition, plus the out-of-system trackers that receive
//! decomposed organic matter and ash taken up by roots.
//!
//! Key behaviors
//! -------------
//! - [`InertStockGroup::new`] splits a deposition depth `D` into
//!   `D·fo·fl`, `D·fo·fc`, and `D·fi` cm.
//! - [`InertStockGroup::transfer`] runs, in order: labile decomposition into
//!   `labile_out`, ash uptake into `inorganic_out`, then adds the inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - All six pools share the group's measurement type; inputs in any other
//!   unit are rejected before anything moves.
//! - Out-of-system pools never feed back into the active pools.
use serde::{Deserialize, Serialize};

use crate::accretion::{
    core::{
        params::ParameterBundle,
        stock::{Flows, Measured, Stock, StockTag},
        units::Measurement,
        validation::{validate_measurement, validate_non_negative},
    },
    errors::AccretionResult,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InertStockGroup {
    measurement: Measurement,
    labile: Stock,
    refractory: Stock,
    inorganic: Stock,
    labile_out: Stock,
    refractory_out: Stock,
    inorganic_out: Stock,
}

impl InertStockGroup {
    /// Build the pools for `deposition` cm of fresh sediment.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` for an invalid
    ///   deposition.
    pub fn new(
        params: &ParameterBundle, deposition: f64, measurement: Measurement,
    ) -> AccretionResult<Self> {
        let deposition = validate_non_negative("deposition", deposition)?;
        let organic = deposition * params.organic_fraction;
        let pool = |tag: StockTag, cm: f64| {
            let amount = params.convert(cm, Measurement::Length, measurement, tag.material());
            Stock::new(params, tag, measurement, amount)
        };

        Ok(Self {
            measurement,
            labile: pool(StockTag::Labile, organic * params.labile_fraction)?,
            refractory: pool(StockTag::Refractory, organic * params.refractory_fraction)?,
            inorganic: pool(StockTag::Inorganic, deposition * params.inorganic_fraction)?,
            labile_out: Stock::empty(params, StockTag::LabileOut, measurement),
            refractory_out: Stock::empty(params, StockTag::RefractoryOut, measurement),
            inorganic_out: Stock::empty(params, StockTag::InorganicOut, measurement),
        })
    }

    /// Check every stored pool against its slot and the group's measurement,
    /// recomputing conversion constants from `params`.
    pub(crate) fn revalidate(&mut self, params: &ParameterBundle) -> AccretionResult<()> {
        let measurement = self.measurement;
        let slots = [
            (&mut self.labile, StockTag::Labile),
            (&mut self.refractory, StockTag::Refractory),
            (&mut self.inorganic, StockTag::Inorganic),
            (&mut self.labile_out, StockTag::LabileOut),
            (&mut self.refractory_out, StockTag::RefractoryOut),
            (&mut self.inorganic_out, StockTag::InorganicOut),
        ];
        for (stock, tag) in slots {
            stock.revalidate(params, tag, measurement)?;
        }
        Ok(())
    }

    pub fn measurement(&self) -> Measurement {
        self.measurement
    }

    pub fn labile(&self) -> &Stock {
        &self.labile
    }

    pub fn refractory(&self) -> &Stock {
        &self.refractory
    }

    pub fn inorganic(&self) -> &Stock {
        &self.inorganic
    }

    /// Active pools in (labile, refractory, inorganic) order.
    pub fn active(&self) -> [&Stock; 3] {
        [&self.labile, &self.refractory, &self.inorganic]
    }

    /// Out-of-system trackers in (labile, refractory, inorganic) order.
    pub fn exported(&self) -> [&Stock; 3] {
        [&self.labile_out, &self.refractory_out, &self.inorganic_out]
    }

    /// Column height occupied by the active pools.
    pub fn length(&self) -> f64 {
        self.active().iter().map(|s| s.length()).sum()
    }

    /// Apply one step of decay, ash uptake, and inputs.
    ///
    /// Parameters
    /// ----------
    /// - `inputs`: flows into (labile, refractory, inorganic), each ≥ 0.
    /// - `input_type`: unit of `inputs`; must equal the group's measurement.
    ///
    /// Errors
    /// ------
    /// - `AccretionError::MeasurementMismatch` if `input_type` differs.
    /// - `AccretionError::NegativeValue` / `NonFiniteValue` for invalid
    ///   inputs.
    ///
    /// All checks run before any pool changes.
    pub fn transfer(
        &mut self, params: &ParameterBundle, inputs: Flows, input_type: Measurement,
    ) -> AccretionResult<()> {
        validate_measurement(self.measurement, input_type)?;
        validate_non_negative("labile input", inputs.labile)?;
        validate_non_negative("refractory input", inputs.refractory)?;
        validate_non_negative("inorganic input", inputs.inorganic)?;

        let decomposed = self.labile.outflow(params);
        let moved = self.labile.withdraw(decomposed, Measurement::Weight);
        self.labile_out.deposit(moved, Measurement::Weight)?;

        let uptake = self.inorganic.outflow(params);
        let moved = self.inorganic.withdraw(uptake, Measurement::Weight);
        self.inorganic_out.deposit(moved, Measurement::Weight)?;

        self.labile.deposit(inputs.labile, input_type)?;
        self.refractory.deposit(inputs.refractory, input_type)?;
        self.inorganic.deposit(inputs.inorganic, input_type)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accretion::errors::AccretionError;
    use approx::assert_relative_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Sizing of fresh pools from a deposition depth.
    // - Ordering of decay, uptake, and inputs in `transfer`.
    // - Rejection of mismatched or invalid inputs without mutation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Fresh pools split the deposition exactly.
    //
    // Given
    // -----
    // - `D = 2.5` cm, `fo = 0.1`, `fc = 0.2`.
    //
    // Expect
    // ------
    // - labile + refractory = D·fo and all three sum to D, in both units.
    fn fresh_pools_conserve_deposition() {
        // Arrange
        let params = ParameterBundle::morris_bowden();

        for measurement in [Measurement::Length, Measurement::Weight] {
            // Act
            let group = InertStockGroup::new(&params, 2.5, measurement).unwrap();

            // Assert
            assert_relative_eq!(
                group.labile().length() + group.refractory().length(),
                2.5 * 0.1,
                epsilon = 1e-12
            );
            assert_relative_eq!(group.refractory().length(), 2.5 * 0.1 * 0.2, epsilon = 1e-12);
            assert_relative_eq!(group.length(), 2.5, epsilon = 1e-12);
            assert!(group.exported().iter().all(|s| s.amount() == 0.0));
        }
    }

    #[test]
    // Purpose
    // -------
    // Decay and uptake act on the existing pools before inputs are added.
    //
    // Given
    // -----
    // - A group from 1 cm of deposition; inputs of 0.3 cm to each pool.
    //
    // Expect
    // ------
    // - labile = L0·(1 - k) + 0.3, labile_out = L0·k;
    //   inorganic = I0·(1 - k3·wa_to_rl) + 0.3; refractory = R0 + 0.3.
    fn transfer_decays_then_adds_inputs() {
        // Arrange
        let params = ParameterBundle::morris_bowden();
        let mut group = InertStockGroup::new(&params, 1.0, Measurement::Length).unwrap();
        let (l0, r0, i0) =
            (group.labile().length(), group.refractory().length(), group.inorganic().length());

        // Act
        group.transfer(&params, Flows::new(0.3, 0.3, 0.3), Measurement::Length).unwrap();

        // Assert
        assert_relative_eq!(group.labile().length(), l0 * 0.5 + 0.3, epsilon = 1e-12);
        assert_relative_eq!(group.exported()[0].length(), l0 * 0.5, epsilon = 1e-12);
        assert_relative_eq!(group.refractory().length(), r0 + 0.3, epsilon = 1e-12);
        assert_eq!(group.exported()[1].amount(), 0.0);
        assert_relative_eq!(group.inorganic().length(), i0 * 0.95 + 0.3, epsilon = 1e-12);
        assert_relative_eq!(group.exported()[2].length(), i0 * 0.05, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Invalid inputs leave every pool untouched.
    //
    // Given
    // -----
    // - A LENGTH group; WEIGHT inputs, then a negative input.
    //
    // Expect
    // ------
    // - MeasurementMismatch and NegativeValue; group unchanged.
    fn invalid_transfer_does_not_mutate() {
        // Arrange
        let params = ParameterBundle::morris_bowden();
        let mut group = InertStockGroup::new(&params, 1.0, Measurement::Length).unwrap();
        let before = group.clone();

        // Act
        let mismatch = group.transfer(&params, Flows::default(), Measurement::Weight);
        let negative = group.transfer(&params, Flows::new(0.0, -0.1, 0.0), Measurement::Length);

        // Assert
        assert!(matches!(mismatch, Err(AccretionError::MeasurementMismatch { .. })));
        assert!(matches!(negative, Err(AccretionError::NegativeValue { .. })));
        assert_eq!(group, before);
    }
}
