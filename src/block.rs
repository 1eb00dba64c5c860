//! The block-structured record format read by the engine.
//!
//! Every line of an engine input file is a record of `;`-separated fields. Records are either
//! directives (`#blockwise`, `#empty`, ...), block headers (`#code ... #name ...`), attribute
//! records (`<name> #type <type> ...`) or terminators (`#endblock`, `#endtable`).
use crate::year::Timestamp;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use strum::Display;

/// The field delimiter for engine input files
const DELIMITER: u8 = b';';

/// The field marking a path to a file holding an attribute's data
const DATA_SOURCE_PATH: &str = "#data_source_path";

/// The representation of an attribute's value over time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ValueType {
    /// A constant value from the given time on
    #[strum(serialize = "DVP_const")]
    Constant,
    /// A value linearly interpolated between data points
    #[strum(serialize = "DVP_linear")]
    Linear,
    /// A repeating time series with a fixed interval
    #[strum(serialize = "TS_repeat_const")]
    RepeatingSeries,
    /// A base/value lookup table
    #[strum(serialize = "TBD_lookupTable")]
    LookupTable,
}

/// The kind of component referenced by an installation stub in a region file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ComponentKind {
    /// A (storage or renewable) converter
    #[strum(serialize = "#converter")]
    Converter,
    /// A multi-converter
    #[strum(serialize = "#multi-converter")]
    MultiConverter,
    /// A storage
    #[strum(serialize = "#storage")]
    Storage,
    /// A primary energy resource
    #[strum(serialize = "#primary_energy")]
    PrimaryEnergy,
}

/// Format a number for an engine input file
pub fn format_value(value: f64) -> String {
    value.to_string()
}

/// A single line of an engine input file
#[derive(Debug, Clone, PartialEq)]
pub struct Record(Vec<String>);

impl Record {
    /// Create a record from its fields
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(fields.into_iter().map(Into::into).collect())
    }

    /// The fields of the record
    pub fn fields(&self) -> &[String] {
        &self.0
    }

    /// The path following a `#data_source_path` field, if the record has one
    pub fn data_source_path(&self) -> Option<&str> {
        self.0
            .iter()
            .position(|field| field == DATA_SOURCE_PATH)
            .and_then(|idx| self.0.get(idx + 1))
            .map(String::as_str)
    }

    /// A `#comment` record
    pub fn comment(text: &str) -> Self {
        Self::new(["#comment", text])
    }

    /// A section comment in the style used at the top of component files
    pub fn section_comment(title: &str) -> Self {
        Self::comment(&format!("==============={title}============================================"))
    }

    /// The `#blockwise` directive
    pub fn blockwise() -> Self {
        Self::new(["#blockwise"])
    }

    /// The `#empty` directive, marking a file with no blocks
    pub fn empty() -> Self {
        Self::new(["#empty"])
    }

    /// An `/include(...)` directive
    pub fn include(path: &str) -> Self {
        Self::new([format!("/include({path})")])
    }

    /// The `#endblock` terminator
    pub fn end_block() -> Self {
        Self::new(["#endblock"])
    }

    /// The `#endtable` terminator
    pub fn end_table() -> Self {
        Self::new(["#endtable"])
    }

    /// A block header with identical code and name
    pub fn header(code: &str) -> Self {
        Self::new(["#code", code, "#name", code])
    }

    /// Append fields to the record
    pub fn with<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Append a tag followed by a list of values (e.g. `#input a b`)
    pub fn with_list<S: AsRef<str>>(self, tag: &str, values: &[S]) -> Self {
        self.with([tag]).with(values.iter().map(|v| v.as_ref().to_string()))
    }

    /// An attribute with a single value anchored at `timestamp`
    pub fn attribute(name: &str, kind: ValueType, timestamp: &Timestamp, value: f64) -> Self {
        Self::new([
            name.to_string(),
            "#type".into(),
            kind.to_string(),
            "#data".into(),
            timestamp.to_string(),
            format_value(value),
        ])
    }

    /// An attribute whose data is read from another file
    pub fn data_source(name: &str, kind: ValueType, path: &str) -> Self {
        Self::new([name, "#type", kind.to_string().as_str(), DATA_SOURCE_PATH, path])
    }

    /// A repeating time series with data read from another file
    pub fn repeating_source(name: &str, interval: &str, start: &Timestamp, path: &str) -> Self {
        Self::new([
            name,
            "#type",
            ValueType::RepeatingSeries.to_string().as_str(),
            "#interval",
            interval,
            "#start",
            start.to_string().as_str(),
            DATA_SOURCE_PATH,
            path,
        ])
    }

    /// A repeating time series with inline data
    pub fn repeating_data(name: &str, interval: &str, start: &Timestamp, values: &[f64]) -> Self {
        Self::new([
            name,
            "#type",
            ValueType::RepeatingSeries.to_string().as_str(),
            "#interval",
            interval,
            "#start",
            start.to_string().as_str(),
            "#data",
        ])
        .with(values.iter().copied().map(format_value))
    }

    /// An installation stub referencing a component by code
    pub fn stub(kind: ComponentKind, code: &str) -> Self {
        Self::new([kind.to_string().as_str(), "#code", code])
    }
}

/// Writes records to an engine input file
pub struct BlockWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl BlockWriter<File> {
    /// Create a new file at `path`
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .with_context(|| format!("Could not create file {}", path.display()))?;
        Ok(Self::from_writer(file))
    }
}

impl<W: Write> BlockWriter<W> {
    /// Write records to the given writer
    pub fn from_writer(writer: W) -> Self {
        let writer = csv::WriterBuilder::new()
            .delimiter(DELIMITER)
            .terminator(csv::Terminator::Any(b'\n'))
            .has_headers(false)
            .flexible(true)
            .from_writer(writer);

        Self { writer }
    }

    /// Write a single record
    pub fn write(&mut self, record: &Record) -> Result<()> {
        self.writer.write_record(record.fields())?;
        Ok(())
    }

    /// Write a sequence of records
    pub fn write_all<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        for record in records {
            self.write(record)?;
        }

        Ok(())
    }

    /// Flush all records and return the underlying writer
    pub fn finish(self) -> Result<W> {
        self.writer
            .into_inner()
            .map_err(|err| anyhow::anyhow!("Could not flush records: {}", err.error()))
    }
}

/// Write a complete engine input file with the given records
pub fn write_file(path: &Path, records: &[Record]) -> Result<()> {
    let mut writer = BlockWriter::create(path)?;
    writer.write_all(records)?;
    writer
        .finish()
        .with_context(|| format!("Could not write file {}", path.display()))?;

    Ok(())
}

/// Assemble the records of a component file from a heading comment and a list of blocks.
///
/// A file without blocks contains the `#empty` directive instead, as the engine has no notion of
/// a missing component file.
pub fn component_file_records(title: &str, blocks: Vec<Vec<Record>>) -> Vec<Record> {
    let mut records = vec![Record::section_comment(title)];
    if blocks.is_empty() {
        records.push(Record::empty());
    } else {
        records.push(Record::blockwise());
        records.extend(blocks.into_iter().flatten());
    }

    records
}
