//! The in-memory representation of a scenario: every sheet deserialised into typed rows.
use crate::commodity::Commodity;
use crate::id::collect_by_id;
use crate::input::time_series::{TimeSeries, read_time_series};
use crate::input::{
    COMMODITY_SHEET, DEMAND_SHEET, PROCESS_COMMODITY_SHEET, PROCESS_SHEET, STORAGE_SHEET,
    SUPPLY_SHEET, ScenarioDataset, ScenarioSource, SITE_SHEET, TRANSMISSION_SHEET,
};
use crate::process::{Process, ProcessCommodity};
use crate::site::{Located, Site, SiteMap};
use crate::storage::Storage;
use crate::transmission::Transmission;
use anyhow::{Context, Result, ensure};
use log::warn;
use serde::de::DeserializeOwned;

/// A scenario loaded from its input sheets
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// The name of the scenario
    pub name: String,
    /// The sites, in input order
    pub sites: SiteMap,
    /// Rows of the `Commodity` sheet
    pub commodities: Vec<Commodity>,
    /// Rows of the `Process` sheet
    pub processes: Vec<Process>,
    /// Rows of the `Process-Commodity` sheet
    pub process_commodities: Vec<ProcessCommodity>,
    /// Rows of the `Storage` sheet, or `None` if the scenario has none
    pub storages: Option<Vec<Storage>>,
    /// Rows of the `Transmission` sheet, or `None` if the scenario has none
    pub transmissions: Option<Vec<Transmission>>,
    /// Hourly demand series
    pub demand: Vec<TimeSeries>,
    /// Hourly supply series for intermittent resources
    pub supply: Vec<TimeSeries>,
}

/// Deserialise the rows of a sheet which must be present
fn read_rows<T: DeserializeOwned>(dataset: &ScenarioDataset, sheet_name: &str) -> Result<Vec<T>> {
    dataset.sheet(sheet_name)?.deserialize()
}

/// Deserialise the rows of a sheet which may be absent.
///
/// A missing or empty sheet is logged, as the corresponding output file will be empty.
fn read_optional_rows<T: DeserializeOwned>(
    dataset: &ScenarioDataset,
    sheet_name: &str,
) -> Result<Option<Vec<T>>> {
    let Some(sheet) = dataset.optional_sheet(sheet_name) else {
        warn!(
            "No {sheet_name} sheet found in scenario {}",
            dataset.name()
        );
        return Ok(None);
    };

    if sheet.is_empty() {
        warn!("{sheet_name} sheet in scenario {} is empty", dataset.name());
    }

    sheet.deserialize().map(Some)
}

/// Warn about entities located at sites which are not in the `Site` sheet
fn check_sites<T: Located>(sites: &SiteMap, items: &[T], sheet_name: &str) {
    for site in items.iter().map(Located::site) {
        if !sites.contains_key(site) {
            warn!("Site {site} in sheet {sheet_name} is not listed in the {SITE_SHEET} sheet");
        }
    }
}

/// Check that both ends of every transmission link are listed in the `Site` sheet.
///
/// Unlike other entities, a link to an unknown site is an error, as the link would refer to a
/// region which is never written.
fn check_transmission_sites(sites: &SiteMap, transmissions: &[Transmission]) -> Result<()> {
    for transmission in transmissions {
        for site in [&transmission.site_in, &transmission.site_out] {
            ensure!(
                sites.contains_key(site),
                "Site {site} in sheet {TRANSMISSION_SHEET} is not listed in the {SITE_SHEET} sheet"
            );
        }
    }

    Ok(())
}

impl Scenario {
    /// Read a scenario from its input sheets
    pub fn from_dataset(dataset: &ScenarioDataset) -> Result<Self> {
        let sites: Vec<Site> = read_rows(dataset, SITE_SHEET)?;
        ensure!(
            !sites.is_empty(),
            "{SITE_SHEET} sheet must contain at least one site"
        );
        let sites: SiteMap =
            collect_by_id(sites).with_context(|| format!("Invalid {SITE_SHEET} sheet"))?;

        let scenario = Self {
            name: dataset.name().to_string(),
            commodities: read_rows(dataset, COMMODITY_SHEET)?,
            processes: read_rows(dataset, PROCESS_SHEET)?,
            process_commodities: read_rows(dataset, PROCESS_COMMODITY_SHEET)?,
            storages: read_optional_rows(dataset, STORAGE_SHEET)?,
            transmissions: read_optional_rows(dataset, TRANSMISSION_SHEET)?,
            demand: read_time_series(dataset.sheet(DEMAND_SHEET)?)?,
            supply: read_time_series(dataset.sheet(SUPPLY_SHEET)?)?,
            sites,
        };

        check_sites(&scenario.sites, &scenario.commodities, COMMODITY_SHEET);
        check_sites(&scenario.sites, &scenario.processes, PROCESS_SHEET);
        if let Some(storages) = &scenario.storages {
            check_sites(&scenario.sites, storages, STORAGE_SHEET);
        }
        if let Some(transmissions) = &scenario.transmissions {
            check_transmission_sites(&scenario.sites, transmissions)?;
        }

        Ok(scenario)
    }

    /// Read the scenario at the given location
    pub fn load(source: &ScenarioSource) -> Result<Self> {
        let dataset = ScenarioDataset::load(source)?;
        Self::from_dataset(&dataset)
    }

    /// The rows of the `Storage` sheet, empty if there is none
    pub fn storages(&self) -> &[Storage] {
        self.storages.as_deref().unwrap_or_default()
    }
}
