//! Sites are the geographical regions of a scenario. Every other entity is located at a site and
//! each site gets its own region file in the output.
use crate::id::{define_id_getter, define_id_type};
use indexmap::IndexMap;
use serde::Deserialize;

define_id_type! {SiteID}

/// A map of [`Site`]s, keyed by site ID
pub type SiteMap = IndexMap<SiteID, Site>;

/// Represents a row of the `Site` sheet
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Site {
    /// The name of the site (e.g. "North")
    #[serde(rename = "Name")]
    pub id: SiteID,
}
define_id_getter! {Site, SiteID}

/// An entity which is physically located at a single site
pub trait Located {
    /// The site at which the entity is located
    fn site(&self) -> &SiteID;

    /// Whether the entity is located at `site`
    fn is_at(&self, site: &SiteID) -> bool {
        self.site() == site
    }
}

/// Implement the [`Located`] trait for the given type, assuming it has a field called `site`
macro_rules! define_site_getter {
    ($t:ty) => {
        impl crate::site::Located for $t {
            fn site(&self) -> &crate::site::SiteID {
                &self.site
            }
        }
    };
}
pub(crate) use define_site_getter;

/// Iterate over the entities in `items` which are located at `site`, in input order
pub fn iter_at_site<'a, T: Located>(
    items: &'a [T],
    site: &'a SiteID,
) -> impl Iterator<Item = &'a T> + 'a {
    items.iter().filter(move |item| item.is_at(site))
}
