//! The scenario pipeline: writes every engine input file for a scenario, stage by stage.
//!
//! All files are first written to a staging folder next to the final output folder, which is only
//! moved into place once every stage has succeeded. A failing scenario therefore never leaves a
//! partially written output folder behind.
use crate::demand::normalise_demand;
use crate::emit::auxiliary::{
    EngineParameters, write_installation_list, write_program_settings, write_shell_script,
};
use crate::emit::converter::write_converter_file;
use crate::emit::link::{write_link_file, write_transmission_converter_file};
use crate::emit::multi_converter::write_multi_converter_file;
use crate::emit::primary_energy::write_primary_energy_file;
use crate::emit::region::{write_region_files, write_region_index};
use crate::emit::storage::write_storage_file;
use crate::emit::time_series::{write_demand_files, write_supply_files};
use crate::input::ScenarioSource;
use crate::output::get_output_dir;
use crate::process::Process;
use crate::resolve::{FlowIndex, resolve_links};
use crate::scenario::Scenario;
use crate::settings::Settings;
use crate::year::SimulationPeriod;
use anyhow::{Context, Result, ensure};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use strum::Display;
use tempfile::TempDir;

/// The prefix of staging folders
const STAGING_PREFIX: &str = ".staging-";

/// The stages of the pipeline, in the order in which they complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Stage {
    /// The input sheets have been read
    Loaded,
    /// The region index has been written
    RegionsWritten,
    /// Demand series have been normalised
    DemandComputed,
    /// Demand profiles, supply tables and the unlimited fallback table have been written
    TimeSeriesWritten,
    /// The per-region component files have been written
    ComponentsWritten,
    /// The converter and multi-converter files have been written
    ConvertersWritten,
    /// The link file has been written
    LinksWritten,
    /// The primary energy file has been written
    PrimaryEnergyWritten,
    /// The storage file has been written
    StorageWritten,
    /// The transmission converter file has been written
    TransmissionConvertersWritten,
    /// The engine settings, installation list and launch script have been written
    SettingsWritten,
}

/// Options controlling how a scenario is compiled
#[derive(Debug, Clone, PartialEq)]
pub struct CompileOptions {
    /// The simulation period. All attribute values are anchored at its start.
    pub period: SimulationPeriod,
    /// Whether to convert demand from MWh to GWh
    pub convert_to_gwh: bool,
    /// Parameters written to the engine settings file
    pub engine: EngineParameters,
}

impl CompileOptions {
    /// Take the options from the program settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            period: settings.period()?,
            convert_to_gwh: settings.convert_to_gwh,
            engine: EngineParameters::from_settings(settings),
        })
    }
}

/// Log the completion of a stage
fn stage_complete(scenario: &Scenario, stage: Stage) {
    debug!("Scenario {}: {stage}", scenario.name);
}

/// Warn about processes which will be written to both the converter and multi-converter files
fn warn_duplicate_converters(processes: &[Process]) {
    for process in processes
        .iter()
        .filter(|process| process.in_converter_file() && process.in_multi_converter_file())
    {
        warn!(
            "Process {} at {} is written to both the converter and multi-converter files",
            process.id, process.site
        );
    }
}

/// Write every engine input file for `scenario` to `dir`
pub fn write_scenario_files(
    dir: &Path,
    scenario: &Scenario,
    options: &CompileOptions,
) -> Result<()> {
    let start = options.period.start();
    let flows = FlowIndex::new(&scenario.process_commodities);
    flows.warn_site_conflicts(&scenario.processes);
    warn_duplicate_converters(&scenario.processes);
    let storages = scenario.storages();
    let links = resolve_links(scenario.transmissions.as_deref().unwrap_or_default());

    write_region_index(dir, scenario.sites.keys())?;
    stage_complete(scenario, Stage::RegionsWritten);

    let demands = scenario
        .demand
        .iter()
        .map(|series| normalise_demand(series, options.convert_to_gwh))
        .collect::<Result<Vec<_>>>()?;
    stage_complete(scenario, Stage::DemandComputed);

    write_demand_files(dir, &demands)?;
    write_supply_files(dir, &scenario.supply, start)?;
    stage_complete(scenario, Stage::TimeSeriesWritten);

    write_region_files(dir, scenario, &demands, start)?;
    stage_complete(scenario, Stage::ComponentsWritten);

    write_converter_file(dir, &scenario.processes, &flows, storages, start)?;
    write_multi_converter_file(dir, &scenario.processes, &flows, start)?;
    stage_complete(scenario, Stage::ConvertersWritten);

    write_link_file(dir, links, start)?;
    stage_complete(scenario, Stage::LinksWritten);

    write_primary_energy_file(dir, &scenario.commodities, start)?;
    stage_complete(scenario, Stage::PrimaryEnergyWritten);

    write_storage_file(dir, storages, start)?;
    stage_complete(scenario, Stage::StorageWritten);

    write_transmission_converter_file(dir, links, start)?;
    stage_complete(scenario, Stage::TransmissionConvertersWritten);

    write_program_settings(dir, &options.engine, &options.period)?;
    write_installation_list(dir)?;
    write_shell_script(dir)?;
    stage_complete(scenario, Stage::SettingsWritten);

    Ok(())
}

/// Create a staging folder in the folder which will hold `output_dir`
fn create_staging_dir(output_dir: &Path) -> Result<TempDir> {
    let parent = match output_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create output folder: {}", parent.display()))?;

    tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)
        .with_context(|| format!("Failed to create staging folder in {}", parent.display()))
}

/// Compile a scenario into `output_dir`.
///
/// If `output_dir` already exists it is replaced when `overwrite` is set, otherwise this is an
/// error. Nothing is written to `output_dir` unless compilation succeeds.
pub fn compile_scenario(
    scenario: &Scenario,
    output_dir: &Path,
    overwrite: bool,
    options: &CompileOptions,
) -> Result<()> {
    ensure!(
        overwrite || !output_dir.exists(),
        "Output folder {} already exists",
        output_dir.display()
    );

    let staging = create_staging_dir(output_dir)?;
    write_scenario_files(staging.path(), scenario, options)?;

    if output_dir.exists() {
        warn!("Overwriting output folder {}", output_dir.display());
        fs::remove_dir_all(output_dir).with_context(|| {
            format!("Failed to remove output folder {}", output_dir.display())
        })?;
    }

    fs::rename(staging.path(), output_dir).with_context(|| {
        format!(
            "Failed to move staging folder to {}",
            output_dir.display()
        )
    })?;

    // The staging folder has been moved, so there is nothing left to clean up
    let _ = staging.keep();

    Ok(())
}

/// Load the scenario at `source` and compile it into a folder in `output_root`.
///
/// # Returns
///
/// The folder the scenario was written to.
pub fn load_and_compile(
    source: &ScenarioSource,
    output_root: &Path,
    overwrite: bool,
    options: &CompileOptions,
) -> Result<PathBuf> {
    let scenario = Scenario::load(source)
        .with_context(|| format!("Failed to load scenario {}", source.name))?;
    stage_complete(&scenario, Stage::Loaded);

    let output_dir = get_output_dir(output_root, &scenario.name, overwrite);
    compile_scenario(&scenario, &output_dir, overwrite, options)
        .with_context(|| format!("Failed to compile scenario {}", scenario.name))?;
    info!(
        "Scenario {} written to {}",
        scenario.name,
        output_dir.display()
    );

    Ok(output_dir)
}

/// Load the scenario at `source` and run every stage into a throw-away folder
pub fn validate_scenario(source: &ScenarioSource, options: &CompileOptions) -> Result<()> {
    let scenario = Scenario::load(source)
        .with_context(|| format!("Failed to load scenario {}", source.name))?;
    stage_complete(&scenario, Stage::Loaded);

    let dir = tempfile::tempdir()?;
    write_scenario_files(dir.path(), &scenario, options)
        .with_context(|| format!("Failed to compile scenario {}", scenario.name))?;
    info!("Scenario {} is valid", scenario.name);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::auxiliary::SHELL_SCRIPT_FILE_NAME;
    use crate::emit::converter::CONVERTER_FILE_NAME;
    use crate::emit::link::LINK_FILE_NAME;
    use crate::emit::region::{REGION_FILE_NAME, REGIONS_DIR};
    use crate::emit::time_series::{TIME_SERIES_DIR, UNLIMITED_FILE_NAME};
    use crate::fixture::{assert_error, period, scenario};
    use rstest::{fixture, rstest};
    use tempfile::tempdir;

    #[fixture]
    fn options(period: SimulationPeriod) -> CompileOptions {
        CompileOptions {
            period,
            convert_to_gwh: true,
            engine: EngineParameters::default(),
        }
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn options_from_settings() {
        let options = CompileOptions::from_settings(&Settings::default()).unwrap();
        assert!(options.convert_to_gwh);
        assert_eq!(options.period.start().to_string(), "2020-01-01_00:00");
    }

    #[rstest]
    fn write_all_files(scenario: Scenario, options: CompileOptions) {
        let dir = tempdir().unwrap();
        write_scenario_files(dir.path(), &scenario, &options).unwrap();
        assert_eq!(
            dir_entries(dir.path()),
            [
                CONVERTER_FILE_NAME,
                "InstallationListResult.csv",
                LINK_FILE_NAME,
                "MultiConverter.csv",
                "PrimaryEnergy.csv",
                "ProgramSettings.dat",
                REGION_FILE_NAME,
                "Storage.csv",
                TIME_SERIES_DIR,
                "TransmissionConverter.csv",
                REGIONS_DIR,
                SHELL_SCRIPT_FILE_NAME,
            ]
        );
        assert_eq!(
            dir_entries(&dir.path().join(TIME_SERIES_DIR)),
            ["North_Wind.csv", "North_demand_Elec.csv", UNLIMITED_FILE_NAME]
        );
        assert_eq!(
            dir_entries(&dir.path().join(REGIONS_DIR)),
            ["North.csv"]
        );
    }

    #[rstest]
    fn compile_into_new_folder(scenario: Scenario, options: CompileOptions) {
        let root = tempdir().unwrap();
        let output_dir = root.path().join("base");
        compile_scenario(&scenario, &output_dir, false, &options).unwrap();
        assert!(output_dir.join(REGION_FILE_NAME).is_file());

        // Only the output folder is left: the staging folder has been moved into place
        assert_eq!(dir_entries(root.path()), ["base"]);
    }

    #[rstest]
    fn compile_existing_folder(scenario: Scenario, options: CompileOptions) {
        let root = tempdir().unwrap();
        let output_dir = root.path().join("base");
        fs::create_dir(&output_dir).unwrap();
        fs::write(output_dir.join("stale.txt"), "").unwrap();

        assert_error!(
            compile_scenario(&scenario, &output_dir, false, &options),
            format!("Output folder {} already exists", output_dir.display())
        );
        assert!(output_dir.join("stale.txt").is_file());

        compile_scenario(&scenario, &output_dir, true, &options).unwrap();
        assert!(!output_dir.join("stale.txt").exists());
        assert!(output_dir.join(REGION_FILE_NAME).is_file());
    }

    #[rstest]
    fn failed_compile_leaves_nothing(mut scenario: Scenario, options: CompileOptions) {
        scenario.demand[0].commodity = "Heat".into();

        let root = tempdir().unwrap();
        let output_dir = root.path().join("base");
        assert!(compile_scenario(&scenario, &output_dir, false, &options).is_err());
        assert!(dir_entries(root.path()).is_empty());
    }
}
