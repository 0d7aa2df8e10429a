use std::path::PathBuf;

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use validator::Validate;

use crate::domain::{ParameterError, ParameterSet};

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    pub horizon: HorizonConfig,
    #[validate(nested)]
    pub renewable: RenewableConfig,
    #[validate(nested)]
    pub battery: BatteryConfig,
    #[validate(nested)]
    pub prices: PricesConfig,
    pub demand: DemandConfig,
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HorizonConfig {
    #[validate(range(min = 1))]
    pub num_slices: u32,
    #[validate(range(min = 0.0))]
    pub timeslice_hours: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RenewableConfig {
    #[validate(range(min = 0.0))]
    pub max_generation_kw: f64,
    /// Scale the generation cap by the slice duration. Off by default;
    /// see `ParameterSet::renewable_cap`.
    #[serde(default)]
    pub scale_cap_by_timeslice: bool,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct BatteryConfig {
    #[validate(range(min = 0.0))]
    pub max_charge_rate_kw: f64,
    #[validate(range(min = 0.0))]
    pub max_discharge_rate_kw: f64,
    #[validate(range(min = 0.0))]
    pub capacity_kwh: f64,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PricesConfig {
    #[validate(range(min = 0.0))]
    pub grid_kwh: f64,
    #[validate(range(min = 0.0))]
    pub battery_kwh: f64,
    #[validate(range(min = 0.0))]
    pub renewable_kwh: f64,
    #[validate(range(min = 0.0))]
    pub battery_sale_kwh: f64,
}

/// Demand forecast: either one constant applied to every slice or an
/// explicit per-slice vector (which wins when both are present).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DemandConfig {
    pub constant_kwh: Option<f64>,
    pub per_slice_kwh: Option<Vec<f64>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    /// Where the LP model file is written.
    pub model_path: PathBuf,
    /// Optional JSON run-summary output.
    pub summary_path: Option<PathBuf>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let figment = Figment::new()
            .merge(Toml::file("config/default.toml"))
            .merge(Env::prefixed("DISPATCH__").split("__"));
        let cfg: Config = figment.extract().context("failed to read configuration")?;
        cfg.validate().context("invalid configuration")?;
        Ok(cfg)
    }

    /// Resolves the configuration into the immutable parameter set for
    /// one run.
    pub fn parameters(&self) -> Result<ParameterSet, ParameterError> {
        let n = self.horizon.num_slices as usize;
        let demand_kwh = match (&self.demand.per_slice_kwh, self.demand.constant_kwh) {
            (Some(per_slice), _) => {
                if per_slice.len() != n {
                    return Err(ParameterError::DemandLength {
                        expected: n,
                        got: per_slice.len(),
                    });
                }
                per_slice.clone()
            }
            (None, Some(constant)) => vec![constant; n],
            (None, None) => return Err(ParameterError::MissingDemand),
        };

        let params = ParameterSet {
            timeslice_hours: self.horizon.timeslice_hours,
            max_renewable_generation_kw: self.renewable.max_generation_kw,
            max_battery_charge_rate_kw: self.battery.max_charge_rate_kw,
            max_battery_discharge_rate_kw: self.battery.max_discharge_rate_kw,
            max_battery_capacity_kwh: self.battery.capacity_kwh,
            unit_price_grid: self.prices.grid_kwh,
            unit_price_battery: self.prices.battery_kwh,
            unit_price_renewable: self.prices.renewable_kwh,
            unit_price_battery_sale: self.prices.battery_sale_kwh,
            scale_renewable_cap_by_timeslice: self.renewable.scale_cap_by_timeslice,
            demand_kwh,
        };
        params.validate()?;
        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            horizon: HorizonConfig {
                num_slices: 4,
                timeslice_hours: 0.5,
            },
            renewable: RenewableConfig {
                max_generation_kw: 10.0,
                scale_cap_by_timeslice: false,
            },
            battery: BatteryConfig {
                max_charge_rate_kw: 5.0,
                max_discharge_rate_kw: 5.0,
                capacity_kwh: 100.0,
            },
            prices: PricesConfig {
                grid_kwh: 0.3,
                battery_kwh: 0.0,
                renewable_kwh: 0.0,
                battery_sale_kwh: 0.1,
            },
            demand: DemandConfig {
                constant_kwh: Some(100.0),
                per_slice_kwh: None,
            },
            export: ExportConfig {
                model_path: PathBuf::from("BatteryDispatch.lp"),
                summary_path: None,
            },
        }
    }

    #[test]
    fn constant_demand_fills_the_horizon() {
        let params = config().parameters().unwrap();
        assert_eq!(params.demand_kwh, vec![100.0; 4]);
    }

    #[test]
    fn per_slice_demand_wins_over_constant() {
        let mut cfg = config();
        cfg.demand.per_slice_kwh = Some(vec![1.0, 2.0, 3.0, 4.0]);
        let params = cfg.parameters().unwrap();
        assert_eq!(params.demand_kwh, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn per_slice_length_must_match_the_horizon() {
        let mut cfg = config();
        cfg.demand.per_slice_kwh = Some(vec![1.0, 2.0]);
        let err = cfg.parameters().unwrap_err();
        assert_eq!(
            err,
            ParameterError::DemandLength {
                expected: 4,
                got: 2
            }
        );
    }

    #[test]
    fn missing_demand_is_an_error() {
        let mut cfg = config();
        cfg.demand = DemandConfig::default();
        assert_eq!(cfg.parameters().unwrap_err(), ParameterError::MissingDemand);
    }
}
