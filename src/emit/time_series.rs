//! Files in the `TimeSeries` folder: demand profiles, supply tables and the fallback table for
//! unlimited primary energy resources.
use crate::block::{Record, ValueType, format_value, write_file};
use crate::demand::NormalisedDemand;
use crate::input::time_series::TimeSeries;
use crate::site::SiteID;
use crate::year::Timestamp;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The folder holding time series files
pub const TIME_SERIES_DIR: &str = "TimeSeries";

/// The name of the fallback table for primary energy resources without a supply series
pub const UNLIMITED_FILE_NAME: &str = "PrimaryEnergyUnlimited_minusOne.csv";

/// The interval of all hourly series
pub const HOURLY: &str = "1h";

/// The base of the cost table of supply series
const SUPPLY_BASE: f64 = 1e6;

/// The base of the fallback table, written as in existing engine input files
const UNLIMITED_BASE: &str = "1e15";

/// The value of the fallback table
const UNLIMITED_VALUE: f64 = -1.0;

/// The name of the file holding the demand profile for a commodity at a site
pub fn demand_file_name(site: &SiteID, commodity: &str) -> String {
    format!("{site}_demand_{commodity}.csv")
}

/// The name of the file holding a supply series
pub fn supply_file_name(site: &SiteID, commodity: &str) -> String {
    format!("{site}_{commodity}.csv")
}

/// The path of a time series file, relative to the scenario folder, as written in region files
pub fn relative_path(file_name: &str) -> String {
    format!("./{TIME_SERIES_DIR}/{file_name}")
}

/// The folder holding time series files in the scenario folder `dir`, created if needed
pub fn create_time_series_dir(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(TIME_SERIES_DIR);
    fs::create_dir_all(&path)
        .with_context(|| format!("Could not create folder {}", path.display()))?;
    Ok(path)
}

/// The records of a demand profile file: all values in a single record
pub fn demand_records(demand: &NormalisedDemand) -> Vec<Record> {
    vec![Record::new(demand.values.iter().copied().map(format_value))]
}

/// The records of a supply series file
pub fn supply_records(series: &TimeSeries, start: &Timestamp) -> Vec<Record> {
    vec![
        Record::section_comment("generation time series"),
        Record::attribute("base", ValueType::Constant, start, SUPPLY_BASE),
        Record::repeating_data("value", HOURLY, start, &series.values),
        Record::end_table(),
    ]
}

/// The records of the fallback table for unlimited primary energy resources
pub fn unlimited_records(start: &Timestamp) -> Vec<Record> {
    let start = start.to_string();
    vec![
        Record::comment("unlimited -1 primary ressource"),
        Record::new([
            "base",
            "#type",
            ValueType::Constant.to_string().as_str(),
            "#data",
            start.as_str(),
            UNLIMITED_BASE,
        ]),
        Record::new([
            "value",
            "#type",
            ValueType::Linear.to_string().as_str(),
            "#data",
            start.as_str(),
        ])
        .with([format_value(UNLIMITED_VALUE)]),
        Record::end_table(),
    ]
}

/// Write a demand profile file for each series
pub fn write_demand_files(dir: &Path, demands: &[NormalisedDemand]) -> Result<()> {
    let ts_dir = create_time_series_dir(dir)?;
    for demand in demands {
        let file_name = demand_file_name(&demand.site, demand.commodity.as_str());
        write_file(&ts_dir.join(file_name), &demand_records(demand))?;
    }

    Ok(())
}

/// Write a supply file for each series and the fallback table
pub fn write_supply_files(dir: &Path, supply: &[TimeSeries], start: &Timestamp) -> Result<()> {
    let ts_dir = create_time_series_dir(dir)?;
    for series in supply {
        let file_name = supply_file_name(&series.site, series.commodity.as_str());
        write_file(&ts_dir.join(file_name), &supply_records(series, start))?;
    }

    write_file(&ts_dir.join(UNLIMITED_FILE_NAME), &unlimited_records(start))
}
