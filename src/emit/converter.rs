//! The converter file: single-input renewable converters followed by the converters charging each
//! storage.
use super::converter_attributes;
use crate::block::{Record, component_file_records, write_file};
use crate::commodity::ELECTRIC_ENERGY_PORT;
use crate::derive::{StorageParameters, derive_process, derive_storage};
use crate::process::{Process, ProcessCommodity};
use crate::resolve::{FlowIndex, resolve_converter_ports};
use crate::storage::Storage;
use crate::year::Timestamp;
use anyhow::Result;
use std::path::Path;

/// The name of the converter file
pub const CONVERTER_FILE_NAME: &str = "Converter.csv";

/// The heading of the converter file
const TITLE: &str = "converter-technologies";

/// The block for a renewable converter
pub fn renewable_converter_block(
    process: &Process,
    flows: &[&ProcessCommodity],
    start: &Timestamp,
) -> Vec<Record> {
    let params = derive_process(process);
    let ports = resolve_converter_ports(process, flows);

    let mut block = vec![
        Record::header(&params.code)
            .with_list("#input", &ports.inputs)
            .with_list("#output", &ports.outputs)
            .with(["#bidirectional", "false"]),
    ];
    block.extend(converter_attributes(&params, start));
    block.push(Record::end_block());
    block
}

/// The block for the bidirectional converter between the electrical bus and a storage
pub fn storage_converter_block(params: &StorageParameters, start: &Timestamp) -> Vec<Record> {
    let mut block = vec![
        Record::header(&params.converter.code)
            .with_list("#input", &[ELECTRIC_ENERGY_PORT])
            .with_list("#output", &[&params.energy_port])
            .with(["#bidirectional", "true"]),
    ];
    block.extend(converter_attributes(&params.converter, start));
    block.push(Record::end_block());
    block
}

/// All records of the converter file
pub fn converter_file_records(
    processes: &[Process],
    flows: &FlowIndex,
    storages: &[Storage],
    start: &Timestamp,
) -> Vec<Record> {
    let renewables = processes
        .iter()
        .filter(|process| process.in_converter_file())
        .map(|process| renewable_converter_block(process, flows.flows_for(process), start));
    let storage_converters = storages
        .iter()
        .map(|storage| storage_converter_block(&derive_storage(storage), start));

    component_file_records(TITLE, renewables.chain(storage_converters).collect())
}

/// Write the converter file to `dir`
pub fn write_converter_file(
    dir: &Path,
    processes: &[Process],
    flows: &FlowIndex,
    storages: &[Storage],
    start: &Timestamp,
) -> Result<()> {
    let records = converter_file_records(processes, flows, storages, start);
    write_file(&dir.join(CONVERTER_FILE_NAME), &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{flow, process, start, storage};
    use crate::process::FlowDirection;
    use rstest::rstest;

    fn fields(records: &[Record]) -> Vec<Vec<&str>> {
        records
            .iter()
            .map(|record| record.fields().iter().map(String::as_str).collect())
            .collect()
    }

    #[rstest]
    fn wind_power_plant_block(process: Process, start: Timestamp) {
        let process = Process {
            id: "Wind power plant".into(),
            ..process
        };
        let flows = [
            flow("Wind power plant", "Wind", FlowDirection::In, 1.0),
            flow("Wind power plant", "Elec", FlowDirection::Out, 1.0),
        ];
        let flows: Vec<_> = flows.iter().collect();
        let block = renewable_converter_block(&process, &flows, &start);
        assert_eq!(
            fields(&block),
            [
                vec![
                    "#code",
                    "Wind_power_plant_North",
                    "#name",
                    "Wind_power_plant_North",
                    "#input",
                    "Wind_North",
                    "#output",
                    "electric_energy",
                    "#bidirectional",
                    "false"
                ],
                vec![
                    "efficiency_new",
                    "#type",
                    "DVP_linear",
                    "#data",
                    "2020-01-01_00:00",
                    "1"
                ],
                vec!["cost", "#type", "DVP_linear", "#data", "2020-01-01_00:00", "1000000"],
                vec!["lifetime", "#type", "DVP_linear", "#data", "2020-01-01_00:00", "25"],
                vec!["OaM_rate", "#type", "DVP_linear", "#data", "2020-01-01_00:00", "0.01"],
                vec!["#endblock"],
            ]
        );
    }

    #[rstest]
    fn storage_converter(storage: Storage, start: Timestamp) {
        let block = storage_converter_block(&derive_storage(&storage), &start);
        assert_eq!(
            block[0].fields(),
            [
                "#code",
                "converter_Pump_storage_North",
                "#name",
                "converter_Pump_storage_North",
                "#input",
                "electric_energy",
                "#output",
                "Pump_storage_North_energy",
                "#bidirectional",
                "true"
            ]
        );
        assert_eq!(block[1].fields()[5], "0.9");
        assert_eq!(block[2].fields()[5], "500000");
        assert_eq!(block[3].fields()[5], "50");
        assert_eq!(block[4].fields()[5], "0.02");
    }

    #[rstest]
    fn converter_file_selects_processes(process: Process, storage: Storage, start: Timestamp) {
        let processes = [
            process.clone(),
            Process {
                id: "Photovoltaics".into(),
                ..process.clone()
            },
            Process {
                id: "Curtailment".into(),
                ..process
            },
        ];
        let flows = FlowIndex::new(&[]);
        let records = converter_file_records(&processes, &flows, &[storage], &start);
        let codes: Vec<_> = records
            .iter()
            .filter(|record| record.fields()[0] == "#code")
            .map(|record| record.fields()[1].as_str())
            .collect();
        assert_eq!(codes, ["Photovoltaics_North", "converter_Pump_storage_North"]);
        assert_eq!(records[1], Record::blockwise());
    }

    #[rstest]
    fn empty_converter_file(process: Process, start: Timestamp) {
        let flows = FlowIndex::new(&[]);
        let records = converter_file_records(&[process], &flows, &[], &start);
        assert_eq!(records, [Record::section_comment(TITLE), Record::empty()]);
    }
}
