//! The multi-converter file: converters with any number of inputs and outputs.
use super::converter_attributes;
use crate::block::{Record, component_file_records, format_value, write_file};
use crate::derive::derive_process;
use crate::process::{Process, ProcessCommodity};
use crate::resolve::{FlowIndex, resolve_multi_converter_ports};
use crate::year::Timestamp;
use anyhow::Result;
use std::path::Path;

/// The name of the multi-converter file
pub const MULTI_CONVERTER_FILE_NAME: &str = "MultiConverter.csv";

/// The heading of the multi-converter file
const TITLE: &str = "multiconverter-technologies";

/// The block for a multi-converter.
///
/// Unlike other converters, the outputs and their conversion factors are written as records of
/// their own after the header.
pub fn multi_converter_block(
    process: &Process,
    flows: &[&ProcessCommodity],
    start: &Timestamp,
) -> Vec<Record> {
    let ports = resolve_multi_converter_ports(process, flows);
    let mut params = derive_process(process);
    if let Some(efficiency) = ports.efficiency {
        params.efficiency = efficiency;
    }

    let conversions: Vec<_> = ports.conversions.iter().copied().map(format_value).collect();
    let mut block = vec![
        Record::header(&params.code).with_list("#input", &ports.inputs),
        Record::new(["#output"]).with(ports.outputs),
        Record::new(["#conversion"]).with(conversions),
    ];
    block.extend(converter_attributes(&params, start));
    block.push(Record::end_block());
    block
}

/// All records of the multi-converter file
pub fn multi_converter_file_records(
    processes: &[Process],
    flows: &FlowIndex,
    start: &Timestamp,
) -> Vec<Record> {
    let blocks = processes
        .iter()
        .filter(|process| process.in_multi_converter_file())
        .map(|process| multi_converter_block(process, flows.flows_for(process), start))
        .collect();

    component_file_records(TITLE, blocks)
}

/// Write the multi-converter file to `dir`
pub fn write_multi_converter_file(
    dir: &Path,
    processes: &[Process],
    flows: &FlowIndex,
    start: &Timestamp,
) -> Result<()> {
    let records = multi_converter_file_records(processes, flows, start);
    write_file(&dir.join(MULTI_CONVERTER_FILE_NAME), &records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{flow, process, start};
    use crate::process::FlowDirection;
    use rstest::rstest;

    #[rstest]
    fn gas_plant_block(process: Process, start: Timestamp) {
        let flows = [
            flow("Gas plant", "Gas", FlowDirection::In, 1.0),
            flow("Gas plant", "Elec", FlowDirection::Out, 0.6),
            flow("Gas plant", "CO2", FlowDirection::Out, 0.2),
        ];
        let flows: Vec<_> = flows.iter().collect();
        let block = multi_converter_block(&process, &flows, &start);

        assert_eq!(block.len(), 8);
        assert_eq!(
            block[0].fields(),
            [
                "#code",
                "Gas_plant_North",
                "#name",
                "Gas_plant_North",
                "#input",
                "Gas_North"
            ]
        );
        assert_eq!(block[1].fields(), ["#output", "electric_energy", "CO2_North"]);
        assert_eq!(block[2].fields(), ["#conversion", "-1", "200"]);
        assert_eq!(
            block[3],
            Record::attribute("efficiency_new", crate::block::ValueType::Linear, &start, 0.6)
        );
        assert_eq!(block[7], Record::end_block());
    }

    #[rstest]
    fn efficiency_without_electricity_output(process: Process, start: Timestamp) {
        let process = Process {
            efficiency_new: Some(0.4),
            ..process
        };
        let flows = [flow("Gas plant", "Heat", FlowDirection::Out, 0.9)];
        let flows: Vec<_> = flows.iter().collect();
        let block = multi_converter_block(&process, &flows, &start);
        assert_eq!(block[3].fields()[5], "0.4");
        assert_eq!(block[2].fields(), ["#conversion", "900"]);
    }

    #[rstest]
    fn multi_converter_file_selects_processes(process: Process, start: Timestamp) {
        let processes = ["Gas plant", "Wind", "Photovoltaics", "Curtailment", "Run of River"]
            .map(|name| Process {
                id: name.into(),
                ..process.clone()
            });
        let flows = FlowIndex::new(&[]);
        let records = multi_converter_file_records(&processes, &flows, &start);
        let codes: Vec<_> = records
            .iter()
            .filter(|record| record.fields()[0] == "#code")
            .map(|record| record.fields()[1].as_str())
            .collect();
        assert_eq!(codes, ["Gas_plant_North", "Run_of_River_North"]);
    }
}
