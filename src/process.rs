//! Processes are the conversion technologies installed at a site. The data structures in this
//! module describe a process together with the commodities flowing in and out of it.
use crate::commodity::CommodityID;
use crate::id::define_id_type;
use crate::input::{deserialise_finite, deserialise_optional_finite};
use crate::site::{SiteID, define_site_getter};
use serde::Deserialize;
use serde_string_enum::DeserializeLabeledStringEnum;

define_id_type! {ProcessID}

/// Curtailment is modelled implicitly by the engine and never written as a converter
const CURTAILMENT: &str = "Curtailment";

/// Processes written to the converter file as single-input renewable converters
const CONVERTER_PROCESSES: [&str; 6] = [
    "Wind",
    "Photovoltaics",
    "Run of River",
    "Wind power plant",
    "Solar power plant",
    "Hydro power plant",
];

/// Processes left out of the multi-converter file
const MULTI_CONVERTER_EXCLUDED: [&str; 3] = [CURTAILMENT, "Photovoltaics", "Wind"];

/// Processes which get a `#converter` installation stub in their region file
const REGION_CONVERTER_PROCESSES: [&str; 3] = ["Photovoltaics", "Wind", "Run of River"];

/// Processes which do not get a `#multi-converter` installation stub in their region file
const REGION_MULTI_CONVERTER_EXCLUDED: [&str; 4] =
    [CURTAILMENT, "Photovoltaics", "Wind", "Run of River"];

/// Represents a row of the `Process` sheet
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Process {
    /// The process name (e.g. "Gas plant")
    #[serde(rename = "Process")]
    pub id: ProcessID,
    /// The site where the process is located
    #[serde(rename = "Site")]
    pub site: SiteID,
    /// Investment cost per unit capacity (in thousands)
    #[serde(rename = "inv-cost", deserialize_with = "deserialise_finite")]
    pub investment_cost: f64,
    /// Annual fixed cost per unit capacity (in thousands)
    #[serde(rename = "fix-cost", deserialize_with = "deserialise_finite")]
    pub fixed_cost: f64,
    /// Lifetime in years
    #[serde(deserialize_with = "deserialise_finite")]
    pub depreciation: f64,
    /// Capacity already installed
    #[serde(default, rename = "inst-cap", deserialize_with = "deserialise_optional_finite")]
    pub installed_capacity: Option<f64>,
    /// Efficiency of newly built capacity
    #[serde(default, deserialize_with = "deserialise_optional_finite")]
    pub efficiency_new: Option<f64>,
}
define_site_getter! {Process}

/// The kind of installation stub a process gets in its region file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubKind {
    /// A `#converter` stub
    Converter,
    /// A `#multi-converter` stub
    MultiConverter,
}

impl Process {
    /// The `#code` of the converter block for this process
    pub fn code(&self) -> String {
        format!("{}_{}", self.id.code(), self.site.code())
    }

    /// Whether this process is written to the renewable converter file
    pub fn in_converter_file(&self) -> bool {
        CONVERTER_PROCESSES.contains(&self.id.as_str())
    }

    /// Whether this process is written to the multi-converter file.
    ///
    /// NB: This does not exclude all the processes in the converter file (e.g. "Run of River"),
    /// so some processes are written to both files.
    pub fn in_multi_converter_file(&self) -> bool {
        !MULTI_CONVERTER_EXCLUDED.contains(&self.id.as_str())
    }

    /// The installation stub for this process in its region file, if any
    pub fn region_stub(&self) -> Option<StubKind> {
        let name = self.id.as_str();
        if REGION_CONVERTER_PROCESSES.contains(&name) {
            Some(StubKind::Converter)
        } else if REGION_MULTI_CONVERTER_EXCLUDED.contains(&name) {
            None
        } else {
            Some(StubKind::MultiConverter)
        }
    }
}

/// Direction of a commodity flow, relative to the process
#[derive(PartialEq, Eq, Debug, Clone, Copy, DeserializeLabeledStringEnum)]
pub enum FlowDirection {
    /// The commodity is consumed by the process
    #[string = "In"]
    In,
    /// The commodity is produced by the process
    #[string = "Out"]
    Out,
}

/// Represents a row of the `Process-Commodity` sheet
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ProcessCommodity {
    /// The name of the process this flow belongs to
    #[serde(rename = "Process")]
    pub process_id: ProcessID,
    /// The site of the process, if the sheet specifies one
    #[serde(rename = "Site", default)]
    pub site: Option<SiteID>,
    /// The commodity flowing in or out of the process
    #[serde(rename = "Commodity")]
    pub commodity_id: CommodityID,
    /// Whether the commodity is an input or an output
    #[serde(rename = "Direction")]
    pub direction: FlowDirection,
    /// Flow quantity relative to other flows of the process
    #[serde(deserialize_with = "deserialise_finite")]
    pub ratio: f64,
}
