//! Common routines for handling input data.
//!
//! A scenario dataset is a set of named sheets. Sheets are read either from the worksheets of a
//! workbook or from the CSV files in a folder and are then deserialised into typed rows through a
//! single code path.
use anyhow::{Context, Result, bail, ensure};
use csv::StringRecord;
use indexmap::IndexMap;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};

pub mod sheet_dir;
pub mod time_series;
pub mod workbook;

/// The sheet listing the sites of a scenario
pub const SITE_SHEET: &str = "Site";

/// The sheet listing the processes installed at each site
pub const PROCESS_SHEET: &str = "Process";

/// The sheet listing the commodity flows of each process
pub const PROCESS_COMMODITY_SHEET: &str = "Process-Commodity";

/// The sheet listing the commodities available at each site
pub const COMMODITY_SHEET: &str = "Commodity";

/// The (optional) sheet listing storage technologies
pub const STORAGE_SHEET: &str = "Storage";

/// The (optional) sheet listing transmission links
pub const TRANSMISSION_SHEET: &str = "Transmission";

/// The sheet with hourly demand time series
pub const DEMAND_SHEET: &str = "Demand";

/// The sheet with hourly supply (intermittent generation) time series
pub const SUPPLY_SHEET: &str = "SupIm";

/// The file extension of workbooks
const WORKBOOK_EXTENSION: &str = "xlsx";

/// Format an error message to include the file path. To be used with `anyhow::Context`.
pub fn input_err_msg<P: AsRef<Path>>(file_path: P) -> String {
    format!("Error reading {}", file_path.as_ref().display())
}

/// Parse a TOML file at the specified path.
///
/// # Arguments
///
/// * `file_path` - Path to the TOML file
///
/// # Returns
///
/// * The deserialised TOML data or an error if the file could not be read or parsed.
pub fn read_toml<T: DeserializeOwned>(file_path: &Path) -> Result<T> {
    let toml_str = fs::read_to_string(file_path).with_context(|| input_err_msg(file_path))?;
    let toml_data = toml::from_str(&toml_str).with_context(|| input_err_msg(file_path))?;
    Ok(toml_data)
}

/// Read an optional f64, treating NaN and infinite values as missing.
///
/// Sheets exported from spreadsheets hold `NaN` where a formula failed; these take the same
/// defaults as blank cells. Fields using this need `#[serde(default)]` so that absent columns
/// are also read as missing.
pub fn deserialise_optional_finite<'de, D>(deserialiser: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<f64> = Deserialize::deserialize(deserialiser)?;
    Ok(value.filter(|value| value.is_finite()))
}

/// Read an f64, checking that it is finite
pub fn deserialise_finite<'de, D>(deserialiser: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value: f64 = Deserialize::deserialize(deserialiser)?;
    if !value.is_finite() {
        Err(D::Error::custom("Value must be a finite number"))?;
    }

    Ok(value)
}

/// A table of string fields with a header row
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Sheet {
    /// Create a sheet from its header and data rows.
    ///
    /// Rows in which every field is empty are dropped.
    pub fn new<I>(name: &str, headers: StringRecord, records: I) -> Self
    where
        I: IntoIterator<Item = StringRecord>,
    {
        let records = records
            .into_iter()
            .filter(|record| record.iter().any(|field| !field.is_empty()))
            .collect();

        Self {
            name: name.to_string(),
            headers,
            records,
        }
    }

    /// Create a sheet from rows of cells, the first of which is the header
    pub fn from_rows<I, R>(name: &str, rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = String>,
    {
        let mut rows = rows
            .into_iter()
            .map(|row| row.into_iter().collect::<StringRecord>());
        let headers = rows.next().unwrap_or_default();
        Self::new(name, headers, rows)
    }

    /// The name of the sheet
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The column headers
    pub fn headers(&self) -> &StringRecord {
        &self.headers
    }

    /// The data rows, in input order
    pub fn records(&self) -> &[StringRecord] {
        &self.records
    }

    /// Whether the sheet has no data rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Deserialise every row of the sheet into a `T`, keyed by column header
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        self.records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                record.deserialize(Some(&self.headers)).with_context(|| {
                    // Row numbers as shown in a spreadsheet, counting the header
                    format!("Invalid data in row {} of sheet {}", idx + 2, self.name)
                })
            })
            .collect()
    }
}

/// All the sheets making up one scenario
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioDataset {
    name: String,
    sheets: IndexMap<String, Sheet>,
}

impl ScenarioDataset {
    /// Create a dataset from a collection of sheets
    pub fn new<I>(name: &str, sheets: I) -> Self
    where
        I: IntoIterator<Item = Sheet>,
    {
        let sheets = sheets
            .into_iter()
            .map(|sheet| (sheet.name().to_string(), sheet))
            .collect();

        Self {
            name: name.to_string(),
            sheets,
        }
    }

    /// Read a scenario from a workbook or a folder of CSV files
    pub fn load(source: &ScenarioSource) -> Result<Self> {
        let sheets = if source.path.is_dir() {
            sheet_dir::read_sheet_dir(&source.path)?
        } else {
            workbook::read_workbook(&source.path)?
        };

        Ok(Self::new(&source.name, sheets))
    }

    /// The name of the scenario
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get a sheet which must be present
    pub fn sheet(&self, name: &str) -> Result<&Sheet> {
        self.sheets
            .get(name)
            .with_context(|| format!("Scenario {} has no {name} sheet", self.name))
    }

    /// Get a sheet which may be absent
    pub fn optional_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Add a sheet, replacing any existing sheet with the same name
    pub fn with_sheet(mut self, sheet: Sheet) -> Self {
        self.sheets.insert(sheet.name().to_string(), sheet);
        self
    }

    /// Remove the named sheet, if present
    pub fn without_sheet(mut self, name: &str) -> Self {
        self.sheets.shift_remove(name);
        self
    }
}

/// The location of a scenario's input data
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ScenarioSource {
    /// The name of the scenario (the workbook's file stem or the folder's name)
    pub name: String,
    /// Path to the workbook or the folder of sheets
    pub path: PathBuf,
}

impl ScenarioSource {
    /// Describe the scenario at `path`
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path
            .file_stem()
            .with_context(|| format!("Invalid scenario path: {}", path.display()))?
            .to_str()
            .context("Invalid chars in scenario name")?;

        Ok(Self {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Whether the file name is that of a lock file left behind by an office suite
fn is_lock_file(file_name: &str) -> bool {
    file_name.starts_with("~$") || file_name.starts_with(".~")
}

/// List the scenarios in `input_dir`, sorted by name.
///
/// A scenario is either a workbook or a folder containing a `Site.csv` file.
pub fn discover_scenarios(input_dir: &Path) -> Result<Vec<ScenarioSource>> {
    ensure!(
        input_dir.is_dir(),
        "Input folder {} does not exist",
        input_dir.display()
    );

    let mut scenarios = Vec::new();
    for entry in fs::read_dir(input_dir).with_context(|| input_err_msg(input_dir))? {
        let path = entry?.path();
        let Some(file_name) = path.file_name().and_then(|name| name.to_str()) else {
            continue;
        };
        if is_lock_file(file_name) {
            continue;
        }

        let is_workbook = path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(WORKBOOK_EXTENSION));
        if is_workbook || sheet_dir::is_sheet_dir(&path) {
            scenarios.push(ScenarioSource::from_path(&path)?);
        }
    }

    scenarios.sort();
    Ok(scenarios)
}

/// Select scenarios by name, preserving the order in which they were requested
pub fn select_scenarios(
    scenarios: Vec<ScenarioSource>,
    names: &[String],
) -> Result<Vec<ScenarioSource>> {
    if names.is_empty() {
        return Ok(scenarios);
    }

    let mut by_name: IndexMap<_, _> = scenarios
        .into_iter()
        .map(|scenario| (scenario.name.clone(), scenario))
        .collect();

    names
        .iter()
        .map(|name| match by_name.shift_remove(name) {
            Some(scenario) => Ok(scenario),
            None => bail!("Scenario {name} not found"),
        })
        .collect()
}
