//! Code for reading a scenario from a workbook with one worksheet per sheet.
use super::*;
use calamine::{Data, Reader, open_workbook_auto};

/// The text of a cell, in the form it would have in a CSV file.
///
/// Cells holding spreadsheet errors (e.g. `#DIV/0!`) are read as blank, so optional numeric fields
/// fall back to their defaults.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(s) => s.trim().to_string(),
        other => other.to_string(),
    }
}

/// Read every worksheet of the workbook at `file_path`, in workbook order
pub fn read_workbook(file_path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(file_path).with_context(|| input_err_msg(file_path))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook
            .worksheet_range(&name)
            .with_context(|| format!("Could not read sheet {name} of {}", file_path.display()))?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_to_string).collect::<Vec<_>>());
        sheets.push(Sheet::from_rows(&name, rows));
    }

    Ok(sheets)
}
