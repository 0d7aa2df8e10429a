use thiserror::Error;

use super::types::TimeSlice;

/// Parameter validation errors.
///
/// Raised fail-fast when a model build is attempted with a malformed
/// parameter set; values are never silently clamped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("scheduling horizon is empty")]
    EmptyHorizon,
    #[error("timeslice duration must be positive, got {0} h")]
    NonPositiveTimeslice(f64),
    #[error("{field} must be non-negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("demand forecast has {got} entries but the horizon has {expected} slices")]
    DemandLength { expected: usize, got: usize },
    #[error("no demand forecast configured")]
    MissingDemand,
}

/// The fixed physical and financial constants for one optimisation run,
/// plus the per-slice demand forecast. Immutable once constructed.
///
/// The horizon length is derived from the demand vector: one slice per
/// entry, indexed from 1.
#[derive(Debug, Clone)]
pub struct ParameterSet {
    /// Duration of one slice in hours.
    pub timeslice_hours: f64,
    /// Renewable generation cap per slice (kW).
    pub max_renewable_generation_kw: f64,
    /// Battery charge rate cap (kW).
    pub max_battery_charge_rate_kw: f64,
    /// Battery discharge rate cap (kW).
    pub max_battery_discharge_rate_kw: f64,
    /// Battery energy capacity (kWh).
    pub max_battery_capacity_kwh: f64,
    /// Grid import price (£/kWh).
    pub unit_price_grid: f64,
    /// Battery discharge price (£/kWh).
    pub unit_price_battery: f64,
    /// Renewable generation price (£/kWh).
    pub unit_price_renewable: f64,
    /// Battery-to-grid sale price (£/kWh).
    pub unit_price_battery_sale: f64,
    /// Whether the renewable cap is scaled by the slice duration.
    ///
    /// The source formulation compares total generation (kWh per slice)
    /// directly against the kW cap; the battery rate limits do scale.
    /// Off by default to match that behaviour.
    pub scale_renewable_cap_by_timeslice: bool,
    /// House demand per slice (kWh), one entry per slice.
    pub demand_kwh: Vec<f64>,
}

impl ParameterSet {
    pub fn num_slices(&self) -> u32 {
        self.demand_kwh.len() as u32
    }

    /// Ordered iterator over the horizon, slice 1 first.
    pub fn horizon(&self) -> impl Iterator<Item = TimeSlice> {
        (1..=self.num_slices()).map(TimeSlice)
    }

    /// Demand for a slice. Panics if the slice is outside the horizon.
    pub fn demand(&self, slice: TimeSlice) -> f64 {
        self.demand_kwh[(slice.index() - 1) as usize]
    }

    /// Effective renewable generation cap on the per-slice total.
    pub fn renewable_cap(&self) -> f64 {
        if self.scale_renewable_cap_by_timeslice {
            self.max_renewable_generation_kw * self.timeslice_hours
        } else {
            self.max_renewable_generation_kw
        }
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.demand_kwh.is_empty() {
            return Err(ParameterError::EmptyHorizon);
        }
        if !(self.timeslice_hours > 0.0) {
            return Err(ParameterError::NonPositiveTimeslice(self.timeslice_hours));
        }
        let fields = [
            ("max_renewable_generation_kw", self.max_renewable_generation_kw),
            ("max_battery_charge_rate_kw", self.max_battery_charge_rate_kw),
            (
                "max_battery_discharge_rate_kw",
                self.max_battery_discharge_rate_kw,
            ),
            ("max_battery_capacity_kwh", self.max_battery_capacity_kwh),
            ("unit_price_grid", self.unit_price_grid),
            ("unit_price_battery", self.unit_price_battery),
            ("unit_price_renewable", self.unit_price_renewable),
            ("unit_price_battery_sale", self.unit_price_battery_sale),
        ];
        for (field, value) in fields {
            if !(value >= 0.0) {
                return Err(ParameterError::Negative { field, value });
            }
        }
        for &value in &self.demand_kwh {
            if !(value >= 0.0) {
                return Err(ParameterError::Negative {
                    field: "demand_kwh",
                    value,
                });
            }
        }
        Ok(())
    }
}
