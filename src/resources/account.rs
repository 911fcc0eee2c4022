//! Account contacts.

use serde::{Deserialize, Serialize};

use crate::params::{FilterBinding, Operator};
use crate::service::{NoChanges, Resource};

/// Person attached to the account.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContactEntity {
    /// Numeric contact identifier.
    pub id: u32,
    /// Contact role, e.g. `Primary Contact` or `Accounts`.
    #[serde(rename = "type", default)]
    pub contact_type: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
}

/// Marker for the contact resource kind.
#[derive(Clone, Copy, Debug)]
pub struct Contact;

impl Resource for Contact {
    type Entity = ContactEntity;
    type Id = u32;
    type Patch = NoChanges;
    type Create = NoChanges;

    const KIND: &'static str = "contact";
    const PLURAL: &'static str = "contacts";
    const COLLECTION: &'static str = "account_contacts";
    const DEFAULT_FIELDS: &'static [&'static str] = &["id", "type", "first_name", "last_name"];
    const FIELDS: &'static [&'static str] = &["id", "type", "first_name", "last_name"];
    const FILTER_BINDINGS: &'static [FilterBinding] =
        &[FilterBinding::new("type", "type").with_operator(Operator::In)];
}
