//! The region index and the per-region component files.
//!
//! Each region file holds the demand of the region followed by installation stubs referring to
//! every component located in the region, filtered by site independently for each kind of
//! component.
use super::installation;
use super::time_series::{
    HOURLY, UNLIMITED_FILE_NAME, demand_file_name, relative_path, supply_file_name,
};
use crate::block::{ComponentKind, Record, ValueType, write_file};
use crate::commodity::{Commodity, ELECTRICITY};
use crate::demand::{NormalisedDemand, RegionDemand, region_demand};
use crate::derive::{derive_process, derive_storage, scale_capacity};
use crate::process::{Process, StubKind};
use crate::scenario::Scenario;
use crate::site::{SiteID, iter_at_site};
use crate::year::Timestamp;
use anyhow::{Context, Result, ensure};
use std::fs;
use std::path::Path;

/// The name of the region index file
pub const REGION_FILE_NAME: &str = "Region.csv";

/// The folder holding the region files
pub const REGIONS_DIR: &str = "regions";

/// The name of the file for a region
fn region_file_name(site: &SiteID) -> String {
    format!("{site}.csv")
}

/// The records of the region index: an include directive for each region
pub fn region_index_records<'a, I>(sites: I) -> Vec<Record>
where
    I: IntoIterator<Item = &'a SiteID>,
{
    let mut records = vec![Record::blockwise()];
    records.extend(sites.into_iter().map(|site| {
        Record::include(&format!("./{REGIONS_DIR}/{}", region_file_name(site)))
    }));
    records
}

/// Write the region index to `dir`
pub fn write_region_index<'a, I>(dir: &Path, sites: I) -> Result<()>
where
    I: IntoIterator<Item = &'a SiteID>,
{
    write_file(&dir.join(REGION_FILE_NAME), &region_index_records(sites))
}

/// The demand records at the top of a region file
fn demand_records(site: &SiteID, demand: &RegionDemand, start: &Timestamp) -> Vec<Record> {
    vec![
        Record::header(&site.code()),
        Record::repeating_source(
            "demand_electric_dyn",
            HOURLY,
            start,
            &relative_path(&demand_file_name(site, ELECTRICITY)),
        ),
        Record::attribute(
            "demand_electric_per_a",
            ValueType::Linear,
            start,
            demand.electric,
        ),
    ]
}

/// The stub for a primary energy resource, referring to the table giving its availability
fn primary_energy_stub(commodity: &Commodity) -> [Record; 2] {
    let file_name = if commodity.is_intermittent() {
        supply_file_name(&commodity.site, commodity.id.as_str())
    } else {
        UNLIMITED_FILE_NAME.to_string()
    };

    [
        Record::stub(ComponentKind::PrimaryEnergy, &commodity.code()),
        Record::data_source(
            "potential",
            ValueType::LookupTable,
            &relative_path(&file_name),
        ),
    ]
}

/// An installation stub for a component
fn installation_stub(
    kind: ComponentKind,
    code: &str,
    capacity: f64,
    start: &Timestamp,
) -> [Record; 2] {
    [Record::stub(kind, code), installation(capacity, start)]
}

/// The stubs for processes with the given kind of stub
fn process_stubs<'a>(
    processes: impl Iterator<Item = &'a Process> + 'a,
    stub: StubKind,
    kind: ComponentKind,
    start: &'a Timestamp,
) -> impl Iterator<Item = Record> + 'a {
    processes
        .filter(move |process| process.region_stub() == Some(stub))
        .flat_map(move |process| {
            let params = derive_process(process);
            installation_stub(kind, &params.code, params.installation, start)
        })
}

/// All records of the file for a region
pub fn region_records(
    scenario: &Scenario,
    site: &SiteID,
    demand: &RegionDemand,
    start: &Timestamp,
) -> Vec<Record> {
    let storages = scenario.storages();
    let mut records = demand_records(site, demand, start);

    records.extend(
        iter_at_site(&scenario.commodities, site)
            .filter(|commodity| !commodity.is_electricity())
            .flat_map(primary_energy_stub),
    );
    records.extend(process_stubs(
        iter_at_site(&scenario.processes, site),
        StubKind::Converter,
        ComponentKind::Converter,
        start,
    ));
    records.extend(iter_at_site(storages, site).flat_map(|storage| {
        let params = derive_storage(storage);
        installation_stub(
            ComponentKind::Converter,
            &params.converter.code,
            params.converter.installation,
            start,
        )
    }));
    records.extend(process_stubs(
        iter_at_site(&scenario.processes, site),
        StubKind::MultiConverter,
        ComponentKind::MultiConverter,
        start,
    ));
    records.extend(iter_at_site(storages, site).flat_map(|storage| {
        installation_stub(
            ComponentKind::Storage,
            &storage.code(),
            scale_capacity(storage.installed_capacity),
            start,
        )
    }));
    records.push(Record::end_block());

    records
}

/// Check that every file referred to by `records` exists in the scenario folder `dir`
fn check_data_sources(dir: &Path, site: &SiteID, records: &[Record]) -> Result<()> {
    for path in records.iter().filter_map(Record::data_source_path) {
        let file_path = dir.join(path.trim_start_matches("./"));
        ensure!(
            file_path.is_file(),
            "Region {site} refers to {path}, which does not exist"
        );
    }

    Ok(())
}

/// Write the file for every region to the `regions` folder in `dir`.
///
/// The demand of every region is checked before any file is written, as a region with an
/// unsupported demand invalidates the whole scenario. Time series files referred to by the region
/// files must already have been written.
pub fn write_region_files(
    dir: &Path,
    scenario: &Scenario,
    demands: &[NormalisedDemand],
    start: &Timestamp,
) -> Result<()> {
    let region_demands = scenario
        .sites
        .keys()
        .map(|site| Ok((site, region_demand(demands, site)?)))
        .collect::<Result<Vec<_>>>()?;

    let regions_dir = dir.join(REGIONS_DIR);
    fs::create_dir_all(&regions_dir)
        .with_context(|| format!("Could not create folder {}", regions_dir.display()))?;

    for (site, demand) in region_demands {
        let records = region_records(scenario, site, &demand, start);
        check_data_sources(dir, site, &records)?;
        write_file(&regions_dir.join(region_file_name(site)), &records)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{assert_error, process, scenario, start, storage};
    use crate::storage::Storage;
    use rstest::rstest;
    use tempfile::tempdir;

    fn first_fields(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|record| record.fields()[0].as_str())
            .collect()
    }

    #[test]
    fn region_index() {
        let sites = [SiteID::new("North"), SiteID::new("South East")];
        assert_eq!(
            region_index_records(&sites),
            [
                Record::blockwise(),
                Record::include("./regions/North.csv"),
                Record::include("./regions/South East.csv"),
            ]
        );
    }

    #[rstest]
    fn wind_scenario_region(scenario: Scenario, start: Timestamp) {
        let site = SiteID::new("North");
        let demand = RegionDemand {
            electric: 8.76,
            heat: 0.0,
        };
        let records = region_records(&scenario, &site, &demand, &start);
        assert_eq!(
            first_fields(&records),
            [
                "#code",
                "demand_electric_dyn",
                "demand_electric_per_a",
                "#primary_energy",
                "potential",
                "#primary_energy",
                "potential",
                "#multi-converter",
                "installation",
                "#endblock"
            ]
        );
        assert_eq!(
            records[1].data_source_path(),
            Some("./TimeSeries/North_demand_Elec.csv")
        );
        assert_eq!(records[2].fields()[5], "8.76");
        assert_eq!(records[3].fields()[2], "Wind_North");
        assert_eq!(records[4].data_source_path(), Some("./TimeSeries/North_Wind.csv"));
        assert_eq!(records[5].fields()[2], "Gas_North");
        assert_eq!(
            records[6].data_source_path(),
            Some("./TimeSeries/PrimaryEnergyUnlimited_minusOne.csv")
        );
        assert_eq!(records[7].fields()[2], "Wind_power_plant_North");
        assert_eq!(records[8].fields()[5], "2");
    }

    #[rstest]
    fn region_stub_order(
        mut scenario: Scenario,
        process: Process,
        storage: Storage,
        start: Timestamp,
    ) {
        scenario.processes = vec![
            process.clone(),
            Process {
                id: "Photovoltaics".into(),
                ..process.clone()
            },
            Process {
                id: "Curtailment".into(),
                ..process.clone()
            },
            Process {
                site: "South".into(),
                ..process
            },
        ];
        scenario.storages = Some(vec![storage]);
        scenario.commodities.clear();

        let records = region_records(
            &scenario,
            &"North".into(),
            &RegionDemand::default(),
            &start,
        );
        let stubs: Vec<_> = records
            .iter()
            .filter(|record| record.fields().get(1).is_some_and(|f| f == "#code"))
            .map(|record| (record.fields()[0].as_str(), record.fields()[2].as_str()))
            .collect();
        assert_eq!(
            stubs,
            [
                ("#converter", "Photovoltaics_North"),
                ("#converter", "converter_Pump_storage_North"),
                ("#multi-converter", "Gas_plant_North"),
                ("#storage", "Pump_storage_North"),
            ]
        );
    }

    #[rstest]
    fn region_file_needs_time_series(scenario: Scenario, start: Timestamp) {
        let dir = tempdir().unwrap();
        let demands = [NormalisedDemand {
            site: "North".into(),
            commodity: "Elec".into(),
            values: vec![1.0],
            annual: 1.0,
        }];
        assert_error!(
            write_region_files(dir.path(), &scenario, &demands, &start),
            "Region North refers to ./TimeSeries/North_demand_Elec.csv, which does not exist"
        );
    }

    #[rstest]
    fn heat_demand_writes_no_region(scenario: Scenario, start: Timestamp) {
        let dir = tempdir().unwrap();
        let demands = [NormalisedDemand {
            site: "North".into(),
            commodity: "Heat".into(),
            values: vec![1.0],
            annual: 1.0,
        }];
        assert!(write_region_files(dir.path(), &scenario, &demands, &start).is_err());
        assert!(!dir.path().join(REGIONS_DIR).exists());
    }
}
