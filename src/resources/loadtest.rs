//! Load testing domains.
//!
//! Domains are addressed by UUID, but users usually know them by name. The
//! `show` command therefore routes anything that is not a UUID through the
//! resource locator, matching on `name`.

use serde::{Deserialize, Serialize};

use crate::params::FilterBinding;
use crate::service::{IdScheme, NoChanges, Resource};

/// Domain registered for load testing.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct LoadTestDomainEntity {
    /// Domain UUID.
    pub id: String,
    /// Fully qualified domain name.
    #[serde(default)]
    pub name: String,
    /// How ownership of the domain was verified.
    #[serde(default)]
    pub verification_method: Option<String>,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Marker for the load test domain resource kind.
#[derive(Clone, Copy, Debug)]
pub struct LoadTestDomain;

impl Resource for LoadTestDomain {
    type Entity = LoadTestDomainEntity;
    type Id = String;
    type Patch = NoChanges;
    type Create = NoChanges;

    const KIND: &'static str = "domain";
    const PLURAL: &'static str = "domains";
    const COLLECTION: &'static str = "loadtest_domains";
    const ID_SCHEME: IdScheme = IdScheme::Uuid;
    const DEFAULT_FIELDS: &'static [&'static str] = &["id", "name"];
    const FIELDS: &'static [&'static str] = &["id", "name", "verification_method", "created_at"];
    const FILTER_BINDINGS: &'static [FilterBinding] = &[FilterBinding::new("name", "name")];
    const LOCATOR_PROPERTIES: &'static [&'static str] = &["name"];
}
