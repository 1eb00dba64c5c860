//! Files the engine needs besides the component files: its program settings, an empty
//! installation list and a launch script.
use crate::block::{Record, write_file};
use crate::settings::Settings;
use crate::year::SimulationPeriod;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// The name of the engine settings file
pub const PROGRAM_SETTINGS_FILE_NAME: &str = "ProgramSettings.dat";

/// The name of the installation list file
pub const INSTALLATION_LIST_FILE_NAME: &str = "InstallationListResult.csv";

/// The name of the launch script
pub const SHELL_SCRIPT_FILE_NAME: &str = "start_genesys.sh";

/// The delimiter between keys and values in the engine settings file
const SETTINGS_DELIMITER: u8 = b'=';

/// The column layout described at the top of the installation list
const INSTALLATION_LIST_LAYOUT: &str = "MOUNTING-CODE.TECH-CODE;DATA-TYPE;DATA(may contain placeholders varxy);(if applicable) next lines:;#varxy;INIT-POINT;lBOUND;uBOUND;";

/// Launches the engine on the scenario in the current folder, logging to a timestamped file
const SHELL_SCRIPT: &str = r#"echo Run genesys2 script v2
#getting the scenario name from the current folder
MY_DIR= ${PWD##*/}
echo Scenario: $MY_DIR
DATE="$(date +%Y-%m-%d_%H-%M)"
#current path
CPATH="$(pwd | xargs basename)"
#generate filename from time and path
log_filename=$DATE"_genesys_log_"$CPATH".txt"
echo "Starting Genesys 2 with logging to "$log_filename
#execute the optimisation as bg job
./genesys_2 --mode=analysis --scenario="$MY_DIR" -j=1>$log_filename&
"#;

/// Engine parameters written to the settings file
#[derive(Debug, Clone, PartialEq)]
pub struct EngineParameters {
    /// The optimisation algorithm (e.g. "cma-es")
    pub optimisation_algorithm: String,
    /// Interest rate for annuities
    pub interest_rate: f64,
    /// Whether the optimiser randomises its starting points
    pub use_randomisation: bool,
    /// The operation algorithm (e.g. "hsm_total_cost_min")
    pub operation_algorithm: String,
    /// How long an operation sequence lasts (e.g. "100a")
    pub operation_sequence_duration: String,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self::from_settings(&Settings::default())
    }
}

impl EngineParameters {
    /// Take the engine parameters from the program settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            optimisation_algorithm: settings.optimisation_algorithm.clone(),
            interest_rate: settings.interest_rate,
            use_randomisation: settings.use_randomisation,
            operation_algorithm: settings.operation_algorithm.clone(),
            operation_sequence_duration: settings.operation_sequence_duration.clone(),
        }
    }
}

/// The engine's representation of a flag
fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// The lines of the engine settings file, as key/value pairs or lone section comments
pub fn program_settings_lines(
    params: &EngineParameters,
    period: &SimulationPeriod,
) -> Vec<Vec<String>> {
    let line = |key: &str, value: String| vec![key.to_string(), value];

    vec![
        vec!["/*general settings*/".to_string()],
        line("optimisation_algorithm", params.optimisation_algorithm.clone()),
        line("simulation_start", period.start().to_string()),
        line("simulation_end", period.end().to_string()),
        line("interest_rate", params.interest_rate.to_string()),
        line("use_randomisation", yes_no(params.use_randomisation).into()),
        vec!["/*variables for operation simulation*/".to_string()],
        line("gridbalance_hop_level", "0".into()),
        line("operation_algorithm", params.operation_algorithm.clone()),
        line("energy2power_ratio", "1h".into()),
        line(
            "operation_sequence_duration",
            params.operation_sequence_duration.clone(),
        ),
        line("simulation_step_length", "1h".into()),
        line("analysis_hsm_output_detail", "yes".into()),
    ]
}

/// Write the engine settings file to `dir`
pub fn write_program_settings(
    dir: &Path,
    params: &EngineParameters,
    period: &SimulationPeriod,
) -> Result<()> {
    let file_path = dir.join(PROGRAM_SETTINGS_FILE_NAME);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(SETTINGS_DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .flexible(true)
        .from_path(&file_path)
        .with_context(|| format!("Could not create file {}", file_path.display()))?;
    for line in program_settings_lines(params, period) {
        writer.write_record(&line)?;
    }
    writer.flush()?;

    Ok(())
}

/// The records of the installation list, which has no entries
pub fn installation_list_records() -> Vec<Record> {
    vec![Record::comment(INSTALLATION_LIST_LAYOUT), Record::empty()]
}

/// Write the installation list to `dir`
pub fn write_installation_list(dir: &Path) -> Result<()> {
    write_file(
        &dir.join(INSTALLATION_LIST_FILE_NAME),
        &installation_list_records(),
    )
}

/// Write the launch script to `dir`, making it executable on Unix
pub fn write_shell_script(dir: &Path) -> Result<()> {
    let file_path = dir.join(SHELL_SCRIPT_FILE_NAME);
    fs::write(&file_path, SHELL_SCRIPT)
        .with_context(|| format!("Could not write file {}", file_path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&file_path, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Could not make {} executable", file_path.display()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::period;
    use rstest::rstest;
    use tempfile::tempdir;

    #[rstest]
    fn program_settings_file(period: SimulationPeriod) {
        let dir = tempdir().unwrap();
        write_program_settings(dir.path(), &EngineParameters::default(), &period).unwrap();
        let contents = fs::read_to_string(dir.path().join(PROGRAM_SETTINGS_FILE_NAME)).unwrap();
        assert_eq!(
            contents,
            "/*general settings*/
optimisation_algorithm=cma-es
simulation_start=2020-01-01_00:00
simulation_end=2020-12-31_00:00
interest_rate=0.07
use_randomisation=yes
/*variables for operation simulation*/
gridbalance_hop_level=0
operation_algorithm=hsm_total_cost_min
energy2power_ratio=1h
operation_sequence_duration=100a
simulation_step_length=1h
analysis_hsm_output_detail=yes
"
        );
    }

    #[rstest]
    fn engine_parameters_from_settings(period: SimulationPeriod) {
        let settings = Settings {
            interest_rate: 0.05,
            use_randomisation: false,
            ..Settings::default()
        };
        let lines = program_settings_lines(&EngineParameters::from_settings(&settings), &period);
        assert_eq!(lines[4], ["interest_rate", "0.05"]);
        assert_eq!(lines[5], ["use_randomisation", "no"]);
    }

    #[test]
    fn installation_list_file() {
        let dir = tempdir().unwrap();
        write_installation_list(dir.path()).unwrap();
        let contents = fs::read_to_string(dir.path().join(INSTALLATION_LIST_FILE_NAME)).unwrap();
        assert_eq!(
            contents,
            format!("#comment;\"{INSTALLATION_LIST_LAYOUT}\"\n#empty\n")
        );
    }

    #[test]
    fn shell_script_file() {
        let dir = tempdir().unwrap();
        write_shell_script(dir.path()).unwrap();
        let file_path = dir.path().join(SHELL_SCRIPT_FILE_NAME);
        let contents = fs::read_to_string(&file_path).unwrap();
        assert!(contents.starts_with("echo Run genesys2 script v2\n"));
        assert!(contents.ends_with("-j=1>$log_filename&\n"));

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&file_path).unwrap().permissions().mode();
            assert_eq!(mode & 0o777, 0o755);
        }
    }
}
