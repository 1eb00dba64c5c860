//! The module responsible for choosing where scenario output is written.
use anyhow::{Context, Result};
use chrono::Local;
use log::warn;
use std::fs;
use std::path::{Path, PathBuf};

/// The format of the suffix appended to the names of folders which already exist
const SUFFIX_FORMAT: &str = "%Y%m%d-%H%M%S";

/// Get the output folder for a scenario.
///
/// If the folder already exists and `overwrite` is not set, the current time is appended to the
/// scenario name so that existing output is kept.
pub fn get_output_dir(output_root: &Path, scenario_name: &str, overwrite: bool) -> PathBuf {
    let output_dir = output_root.join(scenario_name);
    if overwrite || !output_dir.exists() {
        return output_dir;
    }

    let suffix = Local::now().format(SUFFIX_FORMAT);
    let new_dir = output_root.join(format!("{scenario_name}{suffix}"));
    warn!(
        "Output folder {} already exists; using {} instead",
        output_dir.display(),
        new_dir.display()
    );

    new_dir
}

/// Create the folder in which scenario output folders are created
pub fn create_output_root(output_root: &Path) -> Result<()> {
    if output_root.is_dir() {
        // already exists
        return Ok(());
    }

    fs::create_dir_all(output_root).with_context(|| {
        format!(
            "Failed to create output folder: {}",
            output_root.display()
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn output_dir_new() {
        let root = tempdir().unwrap();
        assert_eq!(
            get_output_dir(root.path(), "base", false),
            root.path().join("base")
        );
    }

    #[test]
    fn output_dir_existing() {
        let root = tempdir().unwrap();
        fs::create_dir(root.path().join("base")).unwrap();

        assert_eq!(
            get_output_dir(root.path(), "base", true),
            root.path().join("base")
        );

        let new_dir = get_output_dir(root.path(), "base", false);
        let name = new_dir.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("base"));
        assert_eq!(name.len(), "base".len() + "20200101-000000".len());
    }

    #[test]
    fn create_nested_output_root() {
        let root = tempdir().unwrap();
        let output_root = root.path().join("a").join("b");
        create_output_root(&output_root).unwrap();
        assert!(output_root.is_dir());

        // Creating it again is fine
        create_output_root(&output_root).unwrap();
    }
}
