//! Code for reading a scenario from a folder with one CSV file per sheet.
use super::*;

/// The file extension of sheet files
const SHEET_FILE_EXTENSION: &str = "csv";

/// Whether `path` is a folder holding the sheets of a scenario
pub fn is_sheet_dir(path: &Path) -> bool {
    path.join(format!("{SITE_SHEET}.{SHEET_FILE_EXTENSION}"))
        .is_file()
}

/// Read a single sheet from a CSV file. The sheet is named after the file stem.
fn read_sheet_file(file_path: &Path) -> Result<Sheet> {
    let name = file_path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .with_context(|| format!("Invalid sheet file name: {}", file_path.display()))?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(file_path)
        .with_context(|| input_err_msg(file_path))?;
    let headers = reader
        .headers()
        .with_context(|| input_err_msg(file_path))?
        .clone();
    let records = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| input_err_msg(file_path))?;

    Ok(Sheet::new(name, headers, records))
}

/// Read every sheet in `dir_path`, in file name order
pub fn read_sheet_dir(dir_path: &Path) -> Result<Vec<Sheet>> {
    let mut file_paths = Vec::new();
    for entry in fs::read_dir(dir_path).with_context(|| input_err_msg(dir_path))? {
        let path = entry?.path();
        if path.is_file()
            && path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(SHEET_FILE_EXTENSION))
        {
            file_paths.push(path);
        }
    }
    file_paths.sort();

    file_paths
        .iter()
        .map(|path| read_sheet_file(path))
        .collect()
}
