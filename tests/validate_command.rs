//! Integration tests for the `validate` command.
use genesys_input::cli::{ScenarioOpts, handle_validate_command};
use genesys_input::log::is_logger_initialised;
use genesys_input::settings::Settings;
use tempfile::tempdir;

mod common;
use common::ScenarioBuilder;

/// An integration test for the `validate` command.
///
/// We also check that the logger is initialised after it is run and that nothing is written to the
/// input folder.
#[test]
fn validate_command() {
    unsafe { std::env::set_var("GENESYS_INPUT_LOG_LEVEL", "off") };

    let input = tempdir().unwrap();
    ScenarioBuilder::new("base")
        .sites(&["North", "South"])
        .with_storage()
        .with_transmission()
        .write(input.path());
    let scenarios = ScenarioOpts {
        input_dir: input.path().to_path_buf(),
        scenarios: vec!["base".to_string()],
    };

    assert!(!is_logger_initialised());
    handle_validate_command(&scenarios, Some(Settings::default())).unwrap();
    assert!(is_logger_initialised());

    assert_eq!(std::fs::read_dir(input.path()).unwrap().count(), 1);
}
