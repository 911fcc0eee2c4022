//! Load balancer listeners.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::params::{FilterBinding, ParameterError};
use crate::service::Resource;

/// Listener accepting traffic on a load balancer cluster.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct ListenerEntity {
    /// Numeric listener identifier.
    pub id: u32,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Cluster the listener belongs to.
    #[serde(default)]
    pub cluster_id: u32,
    /// Target group receiving unmatched traffic.
    #[serde(default)]
    pub default_target_group_id: Option<u32>,
    /// Listener mode, `http` or `tcp`.
    #[serde(default)]
    pub mode: String,
    /// Whether HSTS headers are sent.
    #[serde(default)]
    pub hsts_enabled: bool,
    /// Whether plain HTTP is redirected to HTTPS.
    #[serde(default)]
    pub redirect_https: bool,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Changes accepted by `loadbalancer listener update`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListenerPatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Toggle HSTS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hsts_enabled: Option<bool>,
    /// Toggle HTTPS redirection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_https: Option<bool>,
}

/// Traffic handling mode of a listener.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerMode {
    /// Layer 7 HTTP handling.
    #[default]
    Http,
    /// Layer 4 pass-through.
    Tcp,
}

impl ListenerMode {
    /// Wire name of the mode.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Tcp => "tcp",
        }
    }
}

impl fmt::Display for ListenerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ListenerMode {
    type Err = ParameterError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "tcp" => Ok(Self::Tcp),
            _ => Err(ParameterError::InvalidFlagValue {
                flag: String::from("mode"),
                value: raw.to_owned(),
                reason: String::from("mode must be one of http, tcp"),
            }),
        }
    }
}

/// Request accepted by `loadbalancer listener create`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ListenerCreate {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Cluster the listener is added to.
    pub cluster_id: u32,
    /// Target group receiving unmatched traffic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_target_group_id: Option<u32>,
    /// Traffic handling mode.
    pub mode: ListenerMode,
    /// Whether HSTS headers are sent.
    pub hsts_enabled: bool,
    /// Whether plain HTTP is redirected to HTTPS.
    pub redirect_https: bool,
}

/// Marker for the listener resource kind.
#[derive(Clone, Copy, Debug)]
pub struct Listener;

impl Resource for Listener {
    type Entity = ListenerEntity;
    type Id = u32;
    type Patch = ListenerPatch;
    type Create = ListenerCreate;

    const KIND: &'static str = "listener";
    const PLURAL: &'static str = "listeners";
    const COLLECTION: &'static str = "loadbalancer_listeners";
    const DEFAULT_FIELDS: &'static [&'static str] =
        &["id", "name", "cluster_id", "mode", "default_target_group_id"];
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "cluster_id",
        "default_target_group_id",
        "mode",
        "hsts_enabled",
        "redirect_https",
        "created_at",
        "updated_at",
    ];
    const FILTER_BINDINGS: &'static [FilterBinding] = &[FilterBinding::new("name", "name")];
}
