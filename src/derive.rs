//! The derivation engine: defaults and derived quantities for every entity kind.
//!
//! Input sheets give costs in thousands and capacities in base units, while the engine expects
//! costs in base units and capacities in thousands, so every value is rescaled here on its way
//! to the output. The functions in this module are pure: they never modify the rows they are
//! given and they cannot fail.
use crate::commodity::{Commodity, ELECTRIC_ENERGY_PORT, is_electricity};
use crate::process::Process;
use crate::storage::Storage;
use crate::transmission::Transmission;

/// Efficiency used when none is given
pub const DEFAULT_EFFICIENCY: f64 = 1.0;

/// Upper bound for a primary energy resource when none is given
pub const DEFAULT_COMMODITY_MAX: f64 = 1e6;

/// Price of a commodity when none is given
pub const DEFAULT_PRICE: f64 = 0.0;

/// Lifetime of a storage in years when none is given
pub const DEFAULT_STORAGE_LIFETIME: f64 = 20.0;

/// Factor converting costs from the input (thousands) to the output (base units)
pub const COST_SCALE: f64 = 1e3;

/// Divisor converting capacities from the input to the output
pub const CAPACITY_SCALE: f64 = 1e3;

/// Multiplier applied to the investment cost when the O&M rate cannot be calculated
const ZERO_INVESTMENT_OAM_FACTOR: f64 = 0.01;

/// Convert a name into the form used for `#code` fields (spaces replaced with underscores)
pub fn to_code(name: &str) -> String {
    name.replace(' ', "_")
}

/// The name of the port for a commodity. Electricity uses the shared electrical bus.
pub fn port_name(commodity: &str) -> String {
    if is_electricity(commodity) {
        ELECTRIC_ENERGY_PORT.to_string()
    } else {
        to_code(commodity)
    }
}

/// The name of the port for a commodity at a given site
pub fn site_port_name(commodity: &str, site: &str) -> String {
    format!("{}_{}", port_name(commodity), to_code(site))
}

/// Operation and maintenance cost as a fraction of investment cost.
///
/// When the investment cost is zero, `0.01 * investment_cost` is used instead, which is always
/// zero. This looks like it was meant to be a flat 1% rate, but it is kept as it is because the
/// engine input files produced so far rely on it.
#[allow(clippy::float_cmp)]
pub fn oam_rate(fixed_cost: f64, investment_cost: f64) -> f64 {
    if investment_cost == 0.0 {
        ZERO_INVESTMENT_OAM_FACTOR * investment_cost
    } else {
        fixed_cost / investment_cost
    }
}

/// The value, unless it is missing, NaN or infinite
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|value| value.is_finite())
}

/// Rescale a cost from thousands to base units
pub fn scale_cost(cost: f64) -> f64 {
    cost * COST_SCALE
}

/// Rescale an installed capacity for the output, treating a missing value as zero
pub fn scale_capacity(capacity: Option<f64>) -> f64 {
    finite(capacity).unwrap_or(0.0) / CAPACITY_SCALE
}

/// Efficiency, defaulting to [`DEFAULT_EFFICIENCY`]
pub fn efficiency_or_default(efficiency: Option<f64>) -> f64 {
    finite(efficiency).unwrap_or(DEFAULT_EFFICIENCY)
}

/// Upper bound for a resource, folding missing, NaN and infinite values into the default
pub fn max_or_default(max: Option<f64>) -> f64 {
    finite(max).unwrap_or(DEFAULT_COMMODITY_MAX)
}

/// Price, folding missing, NaN and infinite values into the default
pub fn price_or_default(price: Option<f64>) -> f64 {
    finite(price).unwrap_or(DEFAULT_PRICE)
}

/// Derived output values shared by all converter-like components
#[derive(Debug, Clone, PartialEq)]
pub struct ConverterParameters {
    /// The `#code` (and `#name`) of the block
    pub code: String,
    /// Efficiency of newly built capacity
    pub efficiency: f64,
    /// Investment cost per unit capacity, in base units
    pub cost: f64,
    /// Lifetime in years
    pub lifetime: f64,
    /// O&M cost as a fraction of investment cost
    pub oam_rate: f64,
    /// Capacity already installed, in output units
    pub installation: f64,
}

/// Derive the output values for a process
pub fn derive_process(process: &Process) -> ConverterParameters {
    ConverterParameters {
        code: process.code(),
        efficiency: efficiency_or_default(process.efficiency_new),
        cost: scale_cost(process.investment_cost),
        lifetime: process.depreciation,
        oam_rate: oam_rate(process.fixed_cost, process.investment_cost),
        installation: scale_capacity(process.installed_capacity),
    }
}

/// Derived output values for a primary energy resource
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceParameters {
    /// The `#code` (and `#name`) of the block
    pub code: String,
    /// Upper bound on the resource
    pub max: f64,
    /// Price per unit, in base units
    pub price: f64,
}

/// Derive the output values for a commodity
pub fn derive_commodity(commodity: &Commodity) -> ResourceParameters {
    ResourceParameters {
        code: commodity.code(),
        max: max_or_default(commodity.max),
        price: scale_cost(price_or_default(commodity.price)),
    }
}

/// Derived output values for the two components of a storage
#[derive(Debug, Clone, PartialEq)]
pub struct StorageParameters {
    /// The charging converter, with costs from the power-related columns
    pub converter: ConverterParameters,
    /// The storage itself, with O&M costs from the capacity-related columns
    pub storage: ConverterParameters,
    /// The port carrying stored energy between converter and storage
    pub energy_port: String,
}

/// Derive the output values for a storage
pub fn derive_storage(storage: &Storage) -> StorageParameters {
    let investment_cost_power = finite(storage.investment_cost_power).unwrap_or(0.0);
    let lifetime = finite(storage.depreciation).unwrap_or(DEFAULT_STORAGE_LIFETIME);
    let installation = scale_capacity(storage.installed_capacity);

    StorageParameters {
        converter: ConverterParameters {
            code: storage.converter_code(),
            efficiency: efficiency_or_default(storage.charge_efficiency),
            cost: scale_cost(investment_cost_power),
            lifetime,
            oam_rate: oam_rate(
                finite(storage.fixed_cost_power).unwrap_or(0.0),
                investment_cost_power,
            ),
            installation,
        },
        storage: ConverterParameters {
            code: storage.code(),
            efficiency: 1.0 - finite(storage.discharge).unwrap_or(0.0),
            cost: scale_cost(investment_cost_power),
            lifetime,
            oam_rate: oam_rate(
                finite(storage.fixed_cost_capacity).unwrap_or(0.0),
                finite(storage.investment_cost_capacity).unwrap_or(0.0),
            ),
            installation,
        },
        energy_port: storage.energy_port(),
    }
}

/// Derived output values for a transmission link and its converter
#[derive(Debug, Clone, PartialEq)]
pub struct TransmissionParameters {
    /// The `#code` of the link block
    pub link_code: String,
    /// The transmission converter. Its `code` is referenced from the link block.
    pub converter: ConverterParameters,
    /// The `#name` of the transmission converter block
    pub converter_name: String,
    /// The port carrying the transported commodity
    pub port: String,
    /// Length of the link
    pub length: f64,
    /// Losses per unit length, in output units
    pub length_dep_loss: f64,
    /// Cost per unit length, in base units
    pub length_dep_cost: f64,
}

/// Derive the output values for a transmission link
pub fn derive_transmission(transmission: &Transmission) -> TransmissionParameters {
    TransmissionParameters {
        link_code: transmission.link_code(),
        converter: ConverterParameters {
            code: transmission.converter_code(),
            efficiency: transmission.eff,
            cost: scale_cost(transmission.investment_cost),
            lifetime: transmission.depreciation,
            oam_rate: oam_rate(transmission.fixed_cost, transmission.investment_cost),
            installation: scale_capacity(transmission.installed_capacity),
        },
        converter_name: transmission.converter_name(),
        port: port_name(transmission.commodity_id.as_str()),
        length: finite(transmission.length).unwrap_or(0.0),
        // Length-dependent losses and costs are not part of the input sheets
        length_dep_loss: 0.0,
        length_dep_cost: 0.0,
    }
}
