//! The link and transmission converter files. Each link block refers to the converter carrying
//! its commodity by code.
use super::{converter_attributes, installation};
use crate::block::{ComponentKind, Record, ValueType, component_file_records, write_file};
use crate::derive::{TransmissionParameters, derive_transmission};
use crate::transmission::Transmission;
use crate::year::Timestamp;
use anyhow::Result;
use std::path::Path;

/// The name of the link file
pub const LINK_FILE_NAME: &str = "Link.csv";

/// The name of the transmission converter file
pub const TRANSMISSION_CONVERTER_FILE_NAME: &str = "TransmissionConverter.csv";

/// The heading of the link file
const LINK_TITLE: &str = "LINK Parameterisation";

/// The heading of the transmission converter file
const TRANSMISSION_CONVERTER_TITLE: &str = "Transmission Converters";

/// The block for a link between two regions
pub fn link_block(
    transmission: &Transmission,
    params: &TransmissionParameters,
    start: &Timestamp,
) -> Vec<Record> {
    vec![
        Record::new([
            "#code",
            params.link_code.as_str(),
            "#region_A",
            transmission.site_in.code().as_str(),
            "#region_B",
            transmission.site_out.code().as_str(),
        ]),
        Record::attribute("length", ValueType::Constant, start, params.length),
        Record::stub(ComponentKind::Converter, &params.converter.code),
        installation(params.converter.installation, start),
        Record::end_block(),
    ]
}

/// The block for the bidirectional converter of a link
pub fn transmission_converter_block(
    params: &TransmissionParameters,
    start: &Timestamp,
) -> Vec<Record> {
    let port = [&params.port];
    let mut block = vec![
        Record::new([
            "#code",
            params.converter.code.as_str(),
            "#name",
            params.converter_name.as_str(),
        ])
        .with_list("#input", &port)
        .with_list("#output", &port)
        .with(["#bidirectional", "true"]),
    ];
    block.extend(converter_attributes(&params.converter, start));
    block.extend([
        Record::attribute(
            "length_dep_loss",
            ValueType::Linear,
            start,
            params.length_dep_loss,
        ),
        Record::attribute(
            "length_dep_cost",
            ValueType::Linear,
            start,
            params.length_dep_cost,
        ),
        Record::end_block(),
    ]);
    block
}

/// All records of the link file. `links` are the links kept after halving the sheet.
pub fn link_file_records(links: &[Transmission], start: &Timestamp) -> Vec<Record> {
    let blocks = links
        .iter()
        .map(|link| link_block(link, &derive_transmission(link), start))
        .collect();

    component_file_records(LINK_TITLE, blocks)
}

/// All records of the transmission converter file
pub fn transmission_converter_file_records(
    links: &[Transmission],
    start: &Timestamp,
) -> Vec<Record> {
    let blocks = links
        .iter()
        .map(|link| transmission_converter_block(&derive_transmission(link), start))
        .collect();

    component_file_records(TRANSMISSION_CONVERTER_TITLE, blocks)
}

/// Write the link file to `dir`
pub fn write_link_file(dir: &Path, links: &[Transmission], start: &Timestamp) -> Result<()> {
    write_file(&dir.join(LINK_FILE_NAME), &link_file_records(links, start))
}

/// Write the transmission converter file to `dir`
pub fn write_transmission_converter_file(
    dir: &Path,
    links: &[Transmission],
    start: &Timestamp,
) -> Result<()> {
    write_file(
        &dir.join(TRANSMISSION_CONVERTER_FILE_NAME),
        &transmission_converter_file_records(links, start),
    )
}
