//! Commodities are the energy carriers and resources tracked at each site. Every commodity except
//! electricity becomes a primary energy resource in the output.
use crate::id::define_id_type;
use crate::input::deserialise_optional_finite;
use crate::site::{SiteID, define_site_getter};
use serde::Deserialize;

define_id_type! {CommodityID}

/// The name of the electricity commodity in the input sheets
pub const ELECTRICITY: &str = "Elec";

/// The name of the shared electrical bus in output files
pub const ELECTRIC_ENERGY_PORT: &str = "electric_energy";

/// Commodities whose availability is given by a supply time series instead of a price
const INTERMITTENT_COMMODITIES: [&str; 3] = ["Solar", "Wind", "Run of River"];

/// Represents a row of the `Commodity` sheet
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Commodity {
    /// The commodity name (e.g. "Gas")
    #[serde(rename = "Commodity")]
    pub id: CommodityID,
    /// The site where the commodity is available
    #[serde(rename = "Site")]
    pub site: SiteID,
    /// Price per unit (in thousands)
    #[serde(default, deserialize_with = "deserialise_optional_finite")]
    pub price: Option<f64>,
    /// Maximum annual amount which can be drawn
    #[serde(default, deserialize_with = "deserialise_optional_finite")]
    pub max: Option<f64>,
}
define_site_getter! {Commodity}

impl Commodity {
    /// Whether this is the electricity commodity
    pub fn is_electricity(&self) -> bool {
        is_electricity(self.id.as_str())
    }

    /// Whether availability for this commodity comes from a supply time series
    pub fn is_intermittent(&self) -> bool {
        INTERMITTENT_COMMODITIES.contains(&self.id.as_str())
    }

    /// The `#code` of the primary energy resource for this commodity
    pub fn code(&self) -> String {
        format!("{}_{}", self.id.code(), self.site.code())
    }
}

/// Whether the named commodity is electricity
pub fn is_electricity(name: &str) -> bool {
    name == ELECTRICITY
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn commodity(name: &str) -> Commodity {
        Commodity {
            id: name.into(),
            site: "North Sea".into(),
            price: None,
            max: None,
        }
    }

    #[rstest]
    #[case("Solar", true)]
    #[case("Wind", true)]
    #[case("Run of River", true)]
    #[case("Gas", false)]
    #[case("Elec", false)]
    fn is_intermittent(#[case] name: &str, #[case] expected: bool) {
        assert_eq!(commodity(name).is_intermittent(), expected);
    }

    #[test]
    fn code_sanitises_commodity_and_site() {
        assert_eq!(commodity("Run of River").code(), "Run_of_River_North_Sea");
    }
}
