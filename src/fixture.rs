//! Fixtures for tests

use crate::commodity::Commodity;
use crate::input::time_series::HOURS_PER_YEAR;
use crate::input::{
    COMMODITY_SHEET, DEMAND_SHEET, PROCESS_COMMODITY_SHEET, PROCESS_SHEET, SITE_SHEET,
    SUPPLY_SHEET, ScenarioDataset, Sheet,
};
use crate::process::{FlowDirection, Process, ProcessCommodity};
use crate::scenario::Scenario;
use crate::storage::Storage;
use crate::transmission::Transmission;
use crate::year::{SimulationPeriod, Timestamp};
use rstest::fixture;

/// Assert that an error with the given message occurs
macro_rules! assert_error {
    ($result:expr, $msg:expr) => {
        assert_eq!(
            $result.unwrap_err().chain().next().unwrap().to_string(),
            $msg
        );
    };
}
pub(crate) use assert_error;

/// Create a flow row for the process-commodity sheet
pub fn flow(
    process: &str,
    commodity: &str,
    direction: FlowDirection,
    ratio: f64,
) -> ProcessCommodity {
    ProcessCommodity {
        process_id: process.into(),
        site: None,
        commodity_id: commodity.into(),
        direction,
        ratio,
    }
}

/// Create a sheet from rows of comma-separated cells, the first of which is the header
pub fn sheet(name: &str, rows: &[&str]) -> Sheet {
    Sheet::from_rows(
        name,
        rows.iter()
            .map(|row| row.split(',').map(ToString::to_string).collect::<Vec<_>>()),
    )
}

/// Create a time series sheet with a constant value for every hour
pub fn constant_series_sheet(name: &str, columns: &[&str], value: f64) -> Sheet {
    let header = std::iter::once("t".to_string()).chain(columns.iter().map(ToString::to_string));
    let rows = (1..=HOURS_PER_YEAR).map(|hour| {
        std::iter::once(hour.to_string())
            .chain(columns.iter().map(|_| value.to_string()))
            .collect::<Vec<_>>()
    });
    Sheet::from_rows(name, std::iter::once(header.collect::<Vec<_>>()).chain(rows))
}

/// A scenario with a single wind power plant at a single site and no storage or transmission
#[fixture]
pub fn scenario_dataset() -> ScenarioDataset {
    ScenarioDataset::new(
        "base",
        [
            sheet(SITE_SHEET, &["Name", "North"]),
            sheet(
                COMMODITY_SHEET,
                &[
                    "Site,Commodity,Type,price,max",
                    "North,Wind,SupIm,,",
                    "North,Gas,Stock,0.03,",
                    "North,Elec,Demand,,",
                ],
            ),
            sheet(
                PROCESS_SHEET,
                &[
                    "Site,Process,inst-cap,inv-cost,fix-cost,depreciation",
                    "North,Wind power plant,2000,1000,10,25",
                ],
            ),
            sheet(
                PROCESS_COMMODITY_SHEET,
                &[
                    "Process,Commodity,Direction,ratio",
                    "Wind power plant,Wind,In,1",
                    "Wind power plant,Elec,Out,1",
                ],
            ),
            constant_series_sheet(DEMAND_SHEET, &["North.Elec"], 1.0),
            constant_series_sheet(SUPPLY_SHEET, &["North.Wind"], 0.5),
        ],
    )
}

/// The scenario in [`scenario_dataset`], deserialised
#[fixture]
pub fn scenario(scenario_dataset: ScenarioDataset) -> Scenario {
    Scenario::from_dataset(&scenario_dataset).unwrap()
}

#[fixture]
pub fn period() -> SimulationPeriod {
    SimulationPeriod::new(2020, 2020).unwrap()
}

#[fixture]
pub fn start(period: SimulationPeriod) -> Timestamp {
    *period.start()
}

#[fixture]
pub fn process() -> Process {
    Process {
        id: "Gas plant".into(),
        site: "North".into(),
        investment_cost: 1000.0,
        fixed_cost: 10.0,
        depreciation: 25.0,
        installed_capacity: None,
        efficiency_new: None,
    }
}

#[fixture]
pub fn commodity() -> Commodity {
    Commodity {
        id: "Gas".into(),
        site: "North".into(),
        price: None,
        max: None,
    }
}

#[fixture]
pub fn storage() -> Storage {
    Storage {
        id: "Pump storage".into(),
        site: "North".into(),
        investment_cost_power: Some(500.0),
        fixed_cost_power: Some(10.0),
        investment_cost_capacity: Some(200.0),
        fixed_cost_capacity: Some(10.0),
        charge_efficiency: Some(0.9),
        discharge: Some(0.01),
        depreciation: Some(50.0),
        installed_capacity: Some(1000.0),
    }
}

#[fixture]
pub fn transmission() -> Transmission {
    Transmission {
        site_in: "North".into(),
        site_out: "South East".into(),
        id: "hvac".into(),
        commodity_id: "Elec".into(),
        eff: 0.95,
        investment_cost: 1650.0,
        fixed_cost: 30.0,
        depreciation: 40.0,
        length: None,
        installed_capacity: Some(500.0),
    }
}
