//! DDoSX protected domains, addressed by domain name.

use serde::{Deserialize, Serialize};

use crate::params::FilterBinding;
use crate::service::{IdScheme, NoChanges, Resource};

/// Domain protected by DDoSX.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct DdosxDomainEntity {
    /// Domain name; doubles as the identifier.
    pub name: String,
    /// Provisioning status.
    #[serde(default)]
    pub status: String,
    /// SafeDNS zone backing the domain, if any.
    #[serde(default)]
    pub safedns_zone_id: Option<u32>,
    /// Whether DNS is routed through DDoSX.
    #[serde(default)]
    pub dns_active: bool,
}

/// Marker for the DDoSX domain resource kind.
#[derive(Clone, Copy, Debug)]
pub struct DdosxDomain;

impl Resource for DdosxDomain {
    type Entity = DdosxDomainEntity;
    type Id = String;
    type Patch = NoChanges;
    type Create = NoChanges;

    const KIND: &'static str = "domain";
    const PLURAL: &'static str = "domains";
    const COLLECTION: &'static str = "ddosx_domains";
    const ID_SCHEME: IdScheme = IdScheme::Provided;
    const ID_FIELD: &'static str = "name";
    const DEFAULT_FIELDS: &'static [&'static str] = &["name", "status", "dns_active"];
    const FIELDS: &'static [&'static str] = &["name", "status", "safedns_zone_id", "dns_active"];
    const FILTER_BINDINGS: &'static [FilterBinding] = &[FilterBinding::new("name", "name")];
}
