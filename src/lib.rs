//! Common functionality for genesys-input, the GENESYS-2 scenario compiler.
#![warn(missing_docs)]
use std::path::PathBuf;

pub mod block;
pub mod cli;
pub mod commodity;
pub mod demand;
pub mod derive;
pub mod emit;
pub mod id;
pub mod input;
pub mod log;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod resolve;
pub mod scenario;
pub mod settings;
pub mod site;
pub mod storage;
pub mod transmission;
pub mod year;

#[cfg(test)]
mod fixture;

/// The name of the folder in the user's config directory holding genesys-input's files
const CONFIG_DIR_NAME: &str = "genesys-input";

/// Get the path to the genesys-input config directory.
///
/// Falls back to the current directory if the platform has no config directory.
pub fn get_config_dir() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_default();
    path.push(CONFIG_DIR_NAME);
    path
}
