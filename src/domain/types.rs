use std::fmt;

use strum::{Display, EnumIter};

/// 1-based index of one scheduling interval within the daily horizon.
///
/// Slices are ordered; slice 1 is the horizon start and carries the
/// battery boundary condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeSlice(pub u32);

impl TimeSlice {
    pub fn index(self) -> u32 {
        self.0
    }

    /// The preceding slice, or `None` at the horizon start.
    pub fn previous(self) -> Option<TimeSlice> {
        (self.0 > 1).then(|| TimeSlice(self.0 - 1))
    }
}

impl fmt::Display for TimeSlice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The flow families a decision variable can belong to.
///
/// One variable exists per `(family, slice)` pair. Energy flows are
/// measured in kWh over the slice, cost families in £.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum FlowFamily {
    RenewableToHouse,
    RenewableToBattery,
    TotalRenewableGeneration,
    BatteryToHouse,
    BatteryToGrid,
    ElectricityToBattery,
    GridToHouse,
    GridToBattery,
    BatterySoc,
    BatteryDegradation,
    GridCost,
    BatteryCost,
    RenewableCost,
    BatteryToGridRevenue,
}

impl FlowFamily {
    /// kWh flow families reported in the run summary.
    pub fn is_energy_flow(self) -> bool {
        matches!(
            self,
            FlowFamily::RenewableToHouse
                | FlowFamily::RenewableToBattery
                | FlowFamily::TotalRenewableGeneration
                | FlowFamily::BatteryToHouse
                | FlowFamily::BatteryToGrid
                | FlowFamily::ElectricityToBattery
                | FlowFamily::GridToHouse
                | FlowFamily::GridToBattery
        )
    }

    /// £ families that feed the objective.
    pub fn is_cost(self) -> bool {
        matches!(
            self,
            FlowFamily::GridCost
                | FlowFamily::BatteryCost
                | FlowFamily::RenewableCost
                | FlowFamily::BatteryToGridRevenue
        )
    }
}

/// Stable identity of a decision variable: its family and time slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarKey {
    pub family: FlowFamily,
    pub slice: TimeSlice,
}

impl VarKey {
    pub fn new(family: FlowFamily, slice: TimeSlice) -> Self {
        Self { family, slice }
    }
}

impl fmt::Display for VarKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.family, self.slice)
    }
}
