//! Block emitters: turn resolved and derived entities into the records of engine input files.
//!
//! Each submodule builds the records for one kind of output file with pure functions and has a
//! `write_*` function putting them on disk.
use crate::block::{Record, ValueType};
use crate::derive::ConverterParameters;
use crate::year::Timestamp;

pub mod auxiliary;
pub mod converter;
pub mod link;
pub mod multi_converter;
pub mod primary_energy;
pub mod region;
pub mod storage;
pub mod time_series;

/// The attributes shared by all converter-like blocks, in the order the engine expects them
fn converter_attributes(params: &ConverterParameters, start: &Timestamp) -> [Record; 4] {
    [
        Record::attribute("efficiency_new", ValueType::Linear, start, params.efficiency),
        Record::attribute("cost", ValueType::Linear, start, params.cost),
        Record::attribute("lifetime", ValueType::Linear, start, params.lifetime),
        Record::attribute("OaM_rate", ValueType::Linear, start, params.oam_rate),
    ]
}

/// The installed capacity of a component, as written in region and link blocks
fn installation(value: f64, start: &Timestamp) -> Record {
    Record::attribute("installation", ValueType::Constant, start, value)
}
