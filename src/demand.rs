//! Code for working with demand. Each demand series is written as a normalised hourly profile,
//! with the annual total carried separately.
use crate::commodity::{CommodityID, is_electricity};
use crate::input::time_series::TimeSeries;
use crate::site::SiteID;
use anyhow::{Result, ensure};

/// Divisor converting demand from MWh to GWh
pub const MWH_PER_GWH: f64 = 1e3;

/// Commodities containing this (case-insensitively) in their name are heat demands
const HEAT: &str = "heat";

/// A demand series normalised by its annual total
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedDemand {
    /// The site the demand applies to
    pub site: SiteID,
    /// The commodity demanded
    pub commodity: CommodityID,
    /// The hourly profile. Sums to 1, or 1/1000 when converting to GWh.
    pub values: Vec<f64>,
    /// The annual total, in GWh when converting to GWh
    pub annual: f64,
}

/// Normalise a demand series by its annual total.
///
/// # Returns
///
/// The normalised series or an error if the annual total is not positive.
pub fn normalise_demand(series: &TimeSeries, convert_to_gwh: bool) -> Result<NormalisedDemand> {
    let total: f64 = series.values.iter().sum();
    ensure!(
        total > 0.0,
        "Total annual demand for {} must be positive, but is {total}",
        series.column
    );

    let scale = if convert_to_gwh { MWH_PER_GWH } else { 1.0 };
    Ok(NormalisedDemand {
        site: series.site.clone(),
        commodity: series.commodity.clone(),
        values: series
            .values
            .iter()
            .map(|value| value / scale / total)
            .collect(),
        annual: total / scale,
    })
}

/// Whether the named commodity is a form of heat
fn is_heat(commodity: &str) -> bool {
    commodity.to_lowercase().contains(HEAT)
}

/// The annual demand of a single region
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RegionDemand {
    /// Annual electricity demand
    pub electric: f64,
    /// Annual heat demand
    pub heat: f64,
}

/// Look up the annual demand of a region.
///
/// Heat demand cannot be represented in the output, so any region with a nonzero heat demand is an
/// error.
#[allow(clippy::float_cmp)]
pub fn region_demand(demands: &[NormalisedDemand], site: &SiteID) -> Result<RegionDemand> {
    let mut demand = RegionDemand::default();
    for series in demands.iter().filter(|series| series.site == *site) {
        if is_electricity(series.commodity.as_str()) {
            demand.electric += series.annual;
        } else if is_heat(series.commodity.as_str()) {
            demand.heat += series.annual;
        }
    }

    ensure!(
        demand.heat == 0.0,
        "Region {site} has a heat demand of {}, but heat demand is not supported",
        demand.heat
    );

    Ok(demand)
}
