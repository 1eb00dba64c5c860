//! Code for loading program settings.
use crate::get_config_dir;
use crate::input::read_toml;
use crate::log::DEFAULT_LOG_LEVEL;
use crate::year::SimulationPeriod;
use anyhow::Result;
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

const DEFAULT_SETTINGS_FILE_HEADER: &str = "# This file contains the program settings for genesys-input.
# Uncomment a setting to change its value.
";

/// Get the path to where the settings file will be read from
pub fn get_settings_file_path() -> PathBuf {
    let mut path = get_config_dir();
    path.push(SETTINGS_FILE_NAME);

    path
}

/// Program settings from config file
#[derive(Debug, Clone, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// The default program log level
    pub log_level: String,
    /// Whether to overwrite existing scenario output folders by default
    pub overwrite: bool,
    /// The folder in which scenario output folders are created
    pub results_root: PathBuf,
    /// The first year of the simulation
    pub start_year: i32,
    /// The last year of the simulation (inclusive)
    pub end_year: i32,
    /// Whether to convert demand from MWh to GWh
    pub convert_to_gwh: bool,
    /// The optimisation algorithm used by the engine
    pub optimisation_algorithm: String,
    /// The interest rate used by the engine for annuities
    pub interest_rate: f64,
    /// Whether the engine randomises its starting points
    pub use_randomisation: bool,
    /// The operation algorithm used by the engine
    pub operation_algorithm: String,
    /// How long an operation sequence lasts (e.g. "100a")
    pub operation_sequence_duration: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
            results_root: PathBuf::from("output"),
            start_year: 2020,
            end_year: 2020,
            convert_to_gwh: true,
            optimisation_algorithm: "cma-es".to_string(),
            interest_rate: 0.07,
            use_randomisation: true,
            operation_algorithm: "hsm_total_cost_min".to_string(),
            operation_sequence_duration: "100a".to_string(),
        }
    }
}

impl Settings {
    /// Read the settings file from the user's config folder.
    ///
    /// If the file is not present, default values for settings will be used
    ///
    /// # Returns
    ///
    /// The program settings as a `Settings` struct or an error if the file is invalid
    pub fn load() -> Result<Settings> {
        Self::load_from_path(&get_settings_file_path())
    }

    /// Read from the specified path, falling back to defaults if the file does not exist
    fn load_from_path(file_path: &Path) -> Result<Settings> {
        if !file_path.is_file() {
            return Ok(Settings::default());
        }

        read_toml(file_path)
    }

    /// The simulation period given by the start and end years
    pub fn period(&self) -> Result<SimulationPeriod> {
        SimulationPeriod::new(self.start_year, self.end_year)
    }

    /// The contents of the default settings file
    pub fn default_file_contents() -> String {
        let settings_raw =
            toml::to_string(&Settings::default()).expect("Could not convert settings to TOML");

        // Comment out every setting, preceded by its documentation
        let mut out = DEFAULT_SETTINGS_FILE_HEADER.to_string();
        for line in settings_raw.split('\n') {
            if let Some(last) = line.find('=') {
                let field = line[..last].trim();
                let docs = Settings::get_field_docs(field).expect("Missing doc comment for field");
                for line in docs.split('\n') {
                    write!(&mut out, "\n# # {}\n", line.trim()).unwrap();
                }

                writeln!(&mut out, "# {}", line.trim()).unwrap();
            }
        }

        out
    }
}
