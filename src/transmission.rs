//! Transmission links between pairs of sites. Each link is written as a link block, which refers
//! to a separately written transmission converter by its code.
use crate::commodity::CommodityID;
use crate::id::define_id_type;
use crate::input::{deserialise_finite, deserialise_optional_finite};
use crate::site::SiteID;
use serde::Deserialize;

define_id_type! {TransmissionID}

/// Represents a row of the `Transmission` sheet
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Transmission {
    /// The site at which the link starts
    #[serde(rename = "Site In")]
    pub site_in: SiteID,
    /// The site at which the link ends
    #[serde(rename = "Site Out")]
    pub site_out: SiteID,
    /// The transmission technology (e.g. "hvac")
    #[serde(rename = "Transmission")]
    pub id: TransmissionID,
    /// The commodity transported by the link
    #[serde(rename = "Commodity")]
    pub commodity_id: CommodityID,
    /// Transmission efficiency
    #[serde(deserialize_with = "deserialise_finite")]
    pub eff: f64,
    /// Investment cost per unit capacity (in thousands)
    #[serde(rename = "inv-cost", deserialize_with = "deserialise_finite")]
    pub investment_cost: f64,
    /// Annual fixed cost per unit capacity (in thousands)
    #[serde(rename = "fix-cost", deserialize_with = "deserialise_finite")]
    pub fixed_cost: f64,
    /// Lifetime in years
    #[serde(deserialize_with = "deserialise_finite")]
    pub depreciation: f64,
    /// Length of the link
    #[serde(default, deserialize_with = "deserialise_optional_finite")]
    pub length: Option<f64>,
    /// Capacity already installed
    #[serde(default, rename = "inst-cap", deserialize_with = "deserialise_optional_finite")]
    pub installed_capacity: Option<f64>,
}

impl Transmission {
    /// The `#code` of the link block
    pub fn link_code(&self) -> String {
        format!("{}_{}", self.site_in.code(), self.site_out.code())
    }

    /// The `#code` of the transmission converter block
    pub fn converter_code(&self) -> String {
        format!("{}_{}", self.id.code(), self.link_code())
    }

    /// The `#name` of the transmission converter block
    pub fn converter_name(&self) -> String {
        format!("{}_{}", self.id.code(), self.commodity_id.code())
    }

    /// Whether `other` describes the same link in the opposite direction
    pub fn is_reverse_of(&self, other: &Transmission) -> bool {
        self.id == other.id
            && self.commodity_id == other.commodity_id
            && self.site_in == other.site_out
            && self.site_out == other.site_in
    }
}
