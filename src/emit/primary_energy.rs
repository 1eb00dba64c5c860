//! The primary energy file: one resource with a cost table per commodity and site.
use crate::block::{Record, ValueType, component_file_records, write_file};
use crate::commodity::Commodity;
use crate::derive::derive_commodity;
use crate::year::Timestamp;
use anyhow::Result;
use std::path::Path;

/// The name of the primary energy file
pub const PRIMARY_ENERGY_FILE_NAME: &str = "PrimaryEnergy.csv";

/// The heading of the primary energy file
const TITLE: &str = "Primary Energy";

/// The base of the cost table of intermittent resources
const INTERMITTENT_BASE: f64 = 1.0;

/// The price of intermittent resources
const INTERMITTENT_PRICE: f64 = 0.0;

/// The block for a primary energy resource.
///
/// Availability of intermittent resources is given by their supply time series, so their cost
/// table only has a nominal entry.
pub fn primary_energy_block(commodity: &Commodity, start: &Timestamp) -> Vec<Record> {
    let params = derive_commodity(commodity);
    let (base, price) = if commodity.is_intermittent() {
        (INTERMITTENT_BASE, INTERMITTENT_PRICE)
    } else {
        (params.max, params.price)
    };

    vec![
        Record::header(&params.code),
        Record::new(["cost_table", "#type"]).with([ValueType::LookupTable.to_string()]),
        Record::attribute("base", ValueType::Constant, start, base),
        Record::attribute("value", ValueType::Constant, start, price),
        Record::end_table(),
        Record::end_block(),
    ]
}

/// All records of the primary energy file. Electricity is not a primary energy resource.
pub fn primary_energy_file_records(commodities: &[Commodity], start: &Timestamp) -> Vec<Record> {
    let blocks = commodities
        .iter()
        .filter(|commodity| !commodity.is_electricity())
        .map(|commodity| primary_energy_block(commodity, start))
        .collect();

    component_file_records(TITLE, blocks)
}

/// Write the primary energy file to `dir`
pub fn write_primary_energy_file(
    dir: &Path,
    commodities: &[Commodity],
    start: &Timestamp,
) -> Result<()> {
    write_file(
        &dir.join(PRIMARY_ENERGY_FILE_NAME),
        &primary_energy_file_records(commodities, start),
    )
}
