//! The command line interface for the scenario compiler.
use crate::input::{ScenarioSource, discover_scenarios, select_scenarios};
use crate::log;
use crate::output::create_output_root;
use crate::pipeline::{CompileOptions, load_and_compile, validate_scenario};
use crate::settings::Settings;
use ::log::{error, info, warn};
use anyhow::{Context, Result, ensure};
use clap::{Args, CommandFactory, Parser, Subcommand};
use std::path::{Path, PathBuf};

pub mod settings;
use settings::SettingsSubcommands;

/// The folder scenarios are read from if none is given
const DEFAULT_INPUT_DIR: &str = "input";

/// The command line interface for the scenario compiler.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// The available commands.
    #[command(subcommand)]
    command: Option<Commands>,
    /// Flag to provide the CLI docs as markdown
    #[arg(long, hide = true)]
    markdown_help: bool,
}

/// Options selecting scenarios in the input folder
#[derive(Args)]
pub struct ScenarioOpts {
    /// Folder containing scenario workbooks and folders of CSV sheets
    #[arg(default_value = DEFAULT_INPUT_DIR)]
    pub input_dir: PathBuf,
    /// Only process the named scenario (may be given more than once)
    #[arg(long = "scenario")]
    pub scenarios: Vec<String>,
}

/// Options for the compile command
#[derive(Args)]
pub struct CompileOpts {
    /// Folder in which scenario output folders are created
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,
    /// First year of the simulation
    #[arg(long)]
    pub start_year: Option<i32>,
    /// Last year of the simulation
    #[arg(long)]
    pub end_year: Option<i32>,
    /// Whether to replace existing scenario output folders
    #[arg(long)]
    pub overwrite: bool,
    /// Keep demand in MWh rather than converting it to GWh
    #[arg(long)]
    pub no_gwh: bool,
}

/// The available commands.
#[derive(Subcommand)]
enum Commands {
    /// Compile scenarios into engine input files.
    Compile {
        /// The scenarios to compile
        #[command(flatten)]
        scenarios: ScenarioOpts,
        /// Other compile options
        #[command(flatten)]
        opts: CompileOpts,
    },
    /// Check that scenarios can be compiled, without keeping the output.
    Validate {
        /// The scenarios to validate
        #[command(flatten)]
        scenarios: ScenarioOpts,
    },
    /// Manage settings file.
    Settings {
        /// The subcommands for managing the settings file
        #[command(subcommand)]
        subcommand: SettingsSubcommands,
    },
}

impl Commands {
    /// Execute the supplied CLI command
    fn execute(self) -> Result<()> {
        match self {
            Self::Compile { scenarios, opts } => handle_compile_command(&scenarios, &opts, None),
            Self::Validate { scenarios } => handle_validate_command(&scenarios, None),
            Self::Settings { subcommand } => subcommand.execute(),
        }
    }
}

/// Parse CLI arguments and start the compiler
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();

    // Invoked as: `$ genesys-input --markdown-help`
    if cli.markdown_help {
        clap_markdown::print_help_markdown::<Cli>();
        return Ok(());
    }

    let Some(command) = cli.command else {
        let help_str = Cli::command().render_long_help().to_string();
        println!("{help_str}");
        return Ok(());
    };

    command.execute()
}

/// Find the scenarios selected on the command line
fn find_scenarios(opts: &ScenarioOpts) -> Result<Vec<ScenarioSource>> {
    let sources = select_scenarios(discover_scenarios(&opts.input_dir)?, &opts.scenarios)?;
    if sources.is_empty() {
        warn!("No scenarios found in {}", opts.input_dir.display());
    } else {
        info!(
            "Found scenarios: {}",
            sources
                .iter()
                .map(|source| source.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    Ok(sources)
}

/// Run `action` for every scenario, logging failures and carrying on with the next scenario.
///
/// # Returns
///
/// An error naming the failed scenarios, if any failed.
fn for_each_scenario<F>(sources: &[ScenarioSource], mut action: F) -> Result<()>
where
    F: FnMut(&ScenarioSource) -> Result<()>,
{
    let mut failed = Vec::new();
    for source in sources {
        if let Err(err) = action(source) {
            error!("{err:?}");
            failed.push(source.name.as_str());
        }
    }

    ensure!(
        failed.is_empty(),
        "{} of {} scenarios failed: {}",
        failed.len(),
        sources.len(),
        failed.join(", ")
    );

    Ok(())
}

/// Load the program settings, if not provided
fn load_settings(settings: Option<Settings>) -> Result<Settings> {
    match settings {
        Some(settings) => Ok(settings),
        None => Settings::load().context("Failed to load settings."),
    }
}

/// Handle the `compile` command.
pub fn handle_compile_command(
    scenarios: &ScenarioOpts,
    opts: &CompileOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let mut settings = load_settings(settings)?;

    // These settings can be overridden by command-line arguments
    if let Some(start_year) = opts.start_year {
        settings.start_year = start_year;
    }
    if let Some(end_year) = opts.end_year {
        settings.end_year = end_year;
    }
    if opts.overwrite {
        settings.overwrite = true;
    }
    if opts.no_gwh {
        settings.convert_to_gwh = false;
    }
    let options = CompileOptions::from_settings(&settings).context("Invalid settings.")?;

    let output_root: &Path = opts.output_dir.as_deref().unwrap_or(&settings.results_root);
    create_output_root(output_root)?;

    log::init(Some(settings.log_level.as_str()), Some(output_root))
        .context("Failed to initialise logging.")?;
    info!("Output folder: {}", output_root.display());

    let sources = find_scenarios(scenarios)?;
    for_each_scenario(&sources, |source| {
        load_and_compile(source, output_root, settings.overwrite, &options).map(|_| ())
    })?;
    info!("Compilation complete!");

    Ok(())
}

/// Handle the `validate` command.
pub fn handle_validate_command(
    scenarios: &ScenarioOpts,
    settings: Option<Settings>,
) -> Result<()> {
    let settings = load_settings(settings)?;
    let options = CompileOptions::from_settings(&settings).context("Invalid settings.")?;

    // No log files are written when validating
    log::init(Some(settings.log_level.as_str()), None).context("Failed to initialise logging.")?;

    let sources = find_scenarios(scenarios)?;
    for_each_scenario(&sources, |source| validate_scenario(source, &options))?;
    info!("Validation successful!");

    Ok(())
}
