//! Storage technologies. Each storage is written as two components: a bidirectional converter
//! charging it from the electrical bus and the storage itself.
use crate::id::define_id_type;
use crate::input::deserialise_optional_finite;
use crate::site::{SiteID, define_site_getter};
use serde::Deserialize;

define_id_type! {StorageID}

/// Represents a row of the `Storage` sheet
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Storage {
    /// The storage name (e.g. "Pump")
    #[serde(rename = "Storage")]
    pub id: StorageID,
    /// The site where the storage is located
    #[serde(rename = "Site")]
    pub site: SiteID,
    /// Investment cost per unit of power (in thousands)
    #[serde(default, rename = "inv-cost-p", deserialize_with = "deserialise_optional_finite")]
    pub investment_cost_power: Option<f64>,
    /// Annual fixed cost per unit of power (in thousands)
    #[serde(default, rename = "fix-cost-p", deserialize_with = "deserialise_optional_finite")]
    pub fixed_cost_power: Option<f64>,
    /// Investment cost per unit of capacity (in thousands)
    #[serde(default, rename = "inv-cost-c", deserialize_with = "deserialise_optional_finite")]
    pub investment_cost_capacity: Option<f64>,
    /// Annual fixed cost per unit of capacity (in thousands)
    #[serde(default, rename = "fix-cost-c", deserialize_with = "deserialise_optional_finite")]
    pub fixed_cost_capacity: Option<f64>,
    /// Charging efficiency
    #[serde(default, rename = "eff-in", deserialize_with = "deserialise_optional_finite")]
    pub charge_efficiency: Option<f64>,
    /// Fraction of stored energy lost per period
    #[serde(default, deserialize_with = "deserialise_optional_finite")]
    pub discharge: Option<f64>,
    /// Lifetime in years
    #[serde(default, deserialize_with = "deserialise_optional_finite")]
    pub depreciation: Option<f64>,
    /// Storage capacity already installed
    #[serde(default, rename = "inst-cap-c", deserialize_with = "deserialise_optional_finite")]
    pub installed_capacity: Option<f64>,
}
define_site_getter! {Storage}

impl Storage {
    /// The `#code` of the storage block
    pub fn code(&self) -> String {
        format!("{}_{}", self.id.code(), self.site.code())
    }

    /// The `#code` of the converter which charges and discharges the storage
    pub fn converter_code(&self) -> String {
        format!("converter_{}", self.code())
    }

    /// The port carrying the stored energy between the converter and the storage
    pub fn energy_port(&self) -> String {
        format!("{}_energy", self.code())
    }
}
