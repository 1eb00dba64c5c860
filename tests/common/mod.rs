//! Helpers for writing scenarios as folders of CSV sheets.
#![allow(dead_code)]
use genesys_input::input::ScenarioSource;
use itertools::Itertools;
use std::fs;
use std::path::{Path, PathBuf};

/// The number of hours in a year of time series data
pub const HOURS: usize = 8760;

/// Write a sheet with the given rows of comma-separated cells
pub fn write_sheet(dir: &Path, name: &str, rows: &[String]) {
    let contents = rows.iter().map(|row| format!("{row}\n")).collect::<String>();
    fs::write(dir.join(format!("{name}.csv")), contents).unwrap();
}

/// Write a time series sheet with a column of constant values for each site
pub fn write_series_sheet(dir: &Path, name: &str, commodity: &str, sites: &[&str], hours: usize) {
    let header = format!(
        "t,{}",
        sites.iter().map(|site| format!("{site}.{commodity}")).join(",")
    );
    let rows = (1..=hours).map(|hour| {
        let values = sites.iter().map(|_| "1").join(",");
        format!("{hour},{values}")
    });
    let rows: Vec<_> = std::iter::once(header).chain(rows).collect();
    write_sheet(dir, name, &rows);
}

/// Describes a scenario with a wind power plant and a gas plant at each site
pub struct ScenarioBuilder {
    name: String,
    sites: Vec<&'static str>,
    with_storage: bool,
    links: Option<Vec<(&'static str, &'static str)>>,
    header_only_optional_sheets: bool,
    demand_hours: usize,
}

impl ScenarioBuilder {
    /// A scenario with a single wind power plant at `North`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            sites: vec!["North"],
            with_storage: false,
            links: None,
            header_only_optional_sheets: false,
            demand_hours: HOURS,
        }
    }

    pub fn sites(mut self, sites: &[&'static str]) -> Self {
        self.sites = sites.to_vec();
        self
    }

    pub fn with_storage(mut self) -> Self {
        self.with_storage = true;
        self
    }

    /// Link each pair of neighbouring sites, listing every link forwards then backwards
    pub fn with_transmission(self) -> Self {
        let pairs: Vec<(&str, &str)> = self.sites.iter().copied().tuple_windows().collect();
        let backward: Vec<_> = pairs.iter().map(|&(a, b)| (b, a)).collect();
        self.links(&[pairs, backward].concat())
    }

    /// Write the given rows (site in, site out) to the transmission sheet
    pub fn links(mut self, links: &[(&'static str, &'static str)]) -> Self {
        self.links = Some(links.to_vec());
        self
    }

    /// Write storage and transmission sheets with a header but no rows
    pub fn header_only_optional_sheets(mut self) -> Self {
        self.header_only_optional_sheets = true;
        self
    }

    pub fn demand_hours(mut self, hours: usize) -> Self {
        self.demand_hours = hours;
        self
    }

    /// Whether this is the single-site scenario with only a wind power plant
    fn is_minimal(&self) -> bool {
        self.sites == ["North"] && !self.with_storage && self.links.is_none()
    }

    /// Write the scenario to a folder in `input_dir`
    pub fn write(&self, input_dir: &Path) -> ScenarioSource {
        let dir = input_dir.join(&self.name);
        fs::create_dir_all(&dir).unwrap();

        let sites: Vec<String> = std::iter::once("Name".to_string())
            .chain(self.sites.iter().map(ToString::to_string))
            .collect();
        write_sheet(&dir, "Site", &sites);

        let mut commodities = vec!["Site,Commodity,Type,price,max".to_string()];
        let mut processes = vec!["Site,Process,inst-cap,inv-cost,fix-cost,depreciation".to_string()];
        for site in &self.sites {
            commodities.push(format!("{site},Wind,SupIm,,"));
            commodities.push(format!("{site},Gas,Stock,0.03,"));
            commodities.push(format!("{site},Elec,Demand,,"));
            processes.push(format!("{site},Wind power plant,2000,1000,10,25"));
            if !self.is_minimal() {
                processes.push(format!("{site},Gas plant,500,800,16,30"));
            }
        }
        write_sheet(&dir, "Commodity", &commodities);
        write_sheet(&dir, "Process", &processes);

        let mut flows = vec![
            "Process,Commodity,Direction,ratio".to_string(),
            "Wind power plant,Wind,In,1".to_string(),
            "Wind power plant,Elec,Out,1".to_string(),
        ];
        if !self.is_minimal() {
            flows.push("Gas plant,Gas,In,1".to_string());
            flows.push("Gas plant,Elec,Out,0.6".to_string());
            flows.push("Gas plant,CO2,Out,0.2".to_string());
        }
        write_sheet(&dir, "Process-Commodity", &flows);

        let storage_header = "Site,Storage,inv-cost-p,fix-cost-p,inv-cost-c,fix-cost-c,eff-in,\
            discharge,depreciation,inst-cap-c";
        let transmission_header = "Site In,Site Out,Transmission,Commodity,eff,inv-cost,fix-cost,\
            depreciation,length,inst-cap";
        if self.header_only_optional_sheets {
            write_sheet(&dir, "Storage", &[storage_header.to_string()]);
            write_sheet(&dir, "Transmission", &[transmission_header.to_string()]);
        }

        if self.with_storage {
            let mut storages = vec![storage_header.to_string()];
            storages.extend(
                self.sites
                    .iter()
                    .map(|site| format!("{site},Pump storage,500,10,200,10,0.9,0.01,50,1000")),
            );
            write_sheet(&dir, "Storage", &storages);
        }

        if let Some(links) = &self.links {
            let mut rows = vec![transmission_header.to_string()];
            rows.extend(
                links
                    .iter()
                    .map(|(a, b)| format!("{a},{b},hvac,Elec,0.95,1650,30,40,100,500")),
            );
            write_sheet(&dir, "Transmission", &rows);
        }

        write_series_sheet(&dir, "Demand", "Elec", &self.sites, self.demand_hours);
        write_series_sheet(&dir, "SupIm", "Wind", &self.sites, HOURS);

        ScenarioSource::from_path(&dir).unwrap()
    }
}

/// Read every file in `dir` (recursively), keyed by path relative to `dir`
pub fn read_tree(dir: &Path) -> Vec<(PathBuf, Vec<u8>)> {
    let mut files = Vec::new();
    let mut dirs = vec![dir.to_path_buf()];
    while let Some(current) = dirs.pop() {
        for entry in fs::read_dir(&current).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                dirs.push(path);
            } else {
                let relative = path.strip_prefix(dir).unwrap().to_path_buf();
                files.push((relative, fs::read(&path).unwrap()));
            }
        }
    }

    files.sort();
    files
}
