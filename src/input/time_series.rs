//! Code for reading hourly time series from the `Demand` and `SupIm` sheets.
use super::*;
use crate::commodity::CommodityID;
use crate::site::SiteID;
use unicase::UniCase;

/// The number of hourly values in a year of data
pub const HOURS_PER_YEAR: usize = 8760;

/// The header of the optional index column
const INDEX_COLUMN: &str = "t";

/// An hourly series for one commodity at one site
#[derive(Debug, Clone, PartialEq)]
pub struct TimeSeries {
    /// The column header (`<site>.<commodity>`)
    pub column: String,
    /// The site the series applies to
    pub site: SiteID,
    /// The commodity the series applies to
    pub commodity: CommodityID,
    /// One value per hour
    pub values: Vec<f64>,
}

/// Whether the column header is that of an index column rather than a series
fn is_index_column(header: &str) -> bool {
    header.is_empty() || UniCase::new(header) == UniCase::new(INDEX_COLUMN)
}

/// Split a column header into site and commodity
fn parse_column_header(header: &str) -> Result<(SiteID, CommodityID)> {
    let (site, commodity) = header
        .split_once('.')
        .with_context(|| format!("Column {header} is not of the form <site>.<commodity>"))?;
    ensure!(
        !site.is_empty() && !commodity.is_empty(),
        "Column {header} is not of the form <site>.<commodity>"
    );

    Ok((site.into(), commodity.into()))
}

/// Read the values of the column at `idx`
fn read_column(sheet: &Sheet, idx: usize, header: &str) -> Result<Vec<f64>> {
    sheet
        .records()
        .iter()
        .enumerate()
        .map(|(row, record)| {
            let field = record.get(idx).unwrap_or_default();
            field.parse().with_context(|| {
                format!(
                    "Invalid value '{field}' in row {} of column {header}",
                    row + 2
                )
            })
        })
        .collect()
}

/// Read every series in a sheet, in column order.
///
/// A leading index column (headed `t` or without header) is skipped. Each series must have
/// exactly [`HOURS_PER_YEAR`] values.
pub fn read_time_series(sheet: &Sheet) -> Result<Vec<TimeSeries>> {
    let mut series = Vec::new();
    for (idx, header) in sheet.headers().iter().enumerate() {
        if idx == 0 && is_index_column(header) {
            continue;
        }

        let (site, commodity) = parse_column_header(header)
            .with_context(|| format!("Invalid header in sheet {}", sheet.name()))?;
        let values = read_column(sheet, idx, header)
            .with_context(|| format!("Invalid data in sheet {}", sheet.name()))?;
        ensure!(
            values.len() == HOURS_PER_YEAR,
            "Time series {header} in sheet {} has {} values, but {HOURS_PER_YEAR} were expected",
            sheet.name(),
            values.len()
        );

        series.push(TimeSeries {
            column: header.to_string(),
            site,
            commodity,
            values,
        });
    }

    Ok(series)
}
