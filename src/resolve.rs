//! Entity resolvers: name-keyed joins between a primary entity and its rows in a second sheet.
use crate::commodity::{ELECTRIC_ENERGY_PORT, is_electricity};
use crate::derive::{port_name, site_port_name};
use crate::process::{FlowDirection, Process, ProcessCommodity, ProcessID};
use crate::transmission::Transmission;
use indexmap::IndexMap;
use itertools::Itertools;
use log::warn;

/// Factor applied to the ratio of non-electricity outputs of a multi-converter
const CONVERSION_SCALE: f64 = 1e3;

/// The conversion factor written for the electricity output of a multi-converter
const ELECTRICITY_CONVERSION: f64 = -1.0;

/// The rows of the `Process-Commodity` sheet, indexed by process name.
///
/// Rows are matched by process name only, so a process name used at several sites shares its
/// flows between all of them.
pub struct FlowIndex<'a> {
    flows: IndexMap<&'a ProcessID, Vec<&'a ProcessCommodity>>,
}

impl<'a> FlowIndex<'a> {
    /// Build the index, preserving the order of rows in the sheet
    pub fn new(flows: &'a [ProcessCommodity]) -> Self {
        let mut index: IndexMap<_, Vec<_>> = IndexMap::new();
        for flow in flows {
            index.entry(&flow.process_id).or_default().push(flow);
        }

        Self { flows: index }
    }

    /// The flows of the given process, in sheet order. Empty if the process has none.
    pub fn flows_for(&self, process: &Process) -> &[&'a ProcessCommodity] {
        self.flows
            .get(&process.id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Describe rows which may be joined to the wrong process.
    ///
    /// These are rows whose site differs from that of the process they are joined to and
    /// process names which occur at more than one site.
    pub fn site_conflicts(&self, processes: &[Process]) -> Vec<String> {
        let mut sites_by_process: IndexMap<_, Vec<_>> = IndexMap::new();
        for process in processes {
            let sites = sites_by_process.entry(&process.id).or_default();
            if !sites.contains(&process.site.as_str()) {
                sites.push(process.site.as_str());
            }
        }

        let mut conflicts = Vec::new();
        for (id, sites) in sites_by_process {
            if sites.len() > 1 {
                conflicts.push(format!(
                    "Process {id} exists at several sites ({}) and its flows are shared between \
                    them",
                    sites.join(", ")
                ));
            }
        }

        for process in processes {
            for flow in self.flows_for(process) {
                if let Some(site) = flow.site.as_ref().filter(|site| **site != process.site) {
                    conflicts.push(format!(
                        "Flow of {} for process {} has site {site}, but the process is at {}",
                        flow.commodity_id, process.id, process.site
                    ));
                }
            }
        }

        conflicts.into_iter().unique().collect()
    }

    /// Log a warning for every row which may be joined to the wrong process
    pub fn warn_site_conflicts(&self, processes: &[Process]) {
        for conflict in self.site_conflicts(processes) {
            warn!("{conflict}");
        }
    }
}

/// The ports of a single-input renewable converter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConverterPorts {
    /// Input ports, suffixed with the process's site
    pub inputs: Vec<String>,
    /// Output ports
    pub outputs: Vec<String>,
}

/// Resolve the ports of a renewable converter from its flows
pub fn resolve_converter_ports(process: &Process, flows: &[&ProcessCommodity]) -> ConverterPorts {
    let mut ports = ConverterPorts::default();
    for flow in flows {
        let commodity = flow.commodity_id.as_str();
        match flow.direction {
            FlowDirection::In => ports
                .inputs
                .push(site_port_name(commodity, process.site.as_str())),
            FlowDirection::Out => ports.outputs.push(port_name(commodity)),
        }
    }

    ports
}

/// The ports and conversion factors of a multi-converter
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiConverterPorts {
    /// Input ports
    pub inputs: Vec<String>,
    /// Output ports
    pub outputs: Vec<String>,
    /// One conversion factor per output port
    pub conversions: Vec<f64>,
    /// The efficiency given by the electricity output, if there is one
    pub efficiency: Option<f64>,
}

/// Resolve the ports of a multi-converter from its flows.
///
/// Electricity flows use the shared electrical bus while all other flows are suffixed with the
/// process's site. The ratio of an electricity output becomes the converter's efficiency.
pub fn resolve_multi_converter_ports(
    process: &Process,
    flows: &[&ProcessCommodity],
) -> MultiConverterPorts {
    let mut ports = MultiConverterPorts::default();
    for flow in flows {
        let commodity = flow.commodity_id.as_str();
        let port = if is_electricity(commodity) {
            ELECTRIC_ENERGY_PORT.to_string()
        } else {
            site_port_name(commodity, process.site.as_str())
        };

        match flow.direction {
            FlowDirection::In => ports.inputs.push(port),
            FlowDirection::Out => {
                ports.outputs.push(port);
                if is_electricity(commodity) {
                    ports.conversions.push(ELECTRICITY_CONVERSION);
                    ports.efficiency = Some(flow.ratio);
                } else {
                    ports.conversions.push(flow.ratio * CONVERSION_SCALE);
                }
            }
        }
    }

    ports
}

/// Select the links to write from the rows of the `Transmission` sheet.
///
/// The sheet lists every link twice, once in each direction, with all forward links first, so only
/// the first half of the rows is kept.
pub fn resolve_links(transmissions: &[Transmission]) -> &[Transmission] {
    if transmissions.len() % 2 != 0 {
        warn!(
            "Transmission sheet has an odd number of rows ({}); the last forward link may be lost",
            transmissions.len()
        );
    }

    let (kept, dropped) = transmissions.split_at(transmissions.len() / 2);
    for link in kept {
        if !dropped.iter().any(|other| other.is_reverse_of(link)) {
            warn!(
                "Transmission link {} has no reverse link in the second half of the sheet",
                link.converter_code()
            );
        }
    }

    kept
}
