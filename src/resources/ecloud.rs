//! eCloud volumes and VPCs.

use serde::{Deserialize, Serialize};

use crate::params::FilterBinding;
use crate::service::{IdScheme, NoChanges, Resource};

/// Block storage volume.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VolumeEntity {
    /// Volume identifier, e.g. `vol-abcdef12`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Owning VPC.
    #[serde(default)]
    pub vpc_id: Option<String>,
    /// Router the volume is reachable through.
    #[serde(default)]
    pub router_id: Option<String>,
    /// Capacity in GiB.
    #[serde(default)]
    pub capacity: u32,
    /// Provisioned IOPS.
    #[serde(default)]
    pub iops: Option<u32>,
    /// Synchronisation status reported by the platform.
    #[serde(default)]
    pub sync: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Changes accepted by `ecloud volume update`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct VolumePatch {
    /// New display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Request accepted by `ecloud volume create`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct VolumeCreate {
    /// Display name; the platform picks one when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// VPC the volume is created in.
    pub vpc_id: String,
    /// Router the volume is attached through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub router_id: Option<String>,
    /// Capacity in GiB.
    pub capacity: u32,
    /// Provisioned IOPS.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iops: Option<u32>,
}

/// Marker for the volume resource kind.
#[derive(Clone, Copy, Debug)]
pub struct Volume;

impl Resource for Volume {
    type Entity = VolumeEntity;
    type Id = String;
    type Patch = VolumePatch;
    type Create = VolumeCreate;

    const KIND: &'static str = "volume";
    const PLURAL: &'static str = "volumes";
    const COLLECTION: &'static str = "ecloud_volumes";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("vol");
    const DEFAULT_FIELDS: &'static [&'static str] =
        &["id", "name", "vpc_id", "capacity", "iops", "sync"];
    const FIELDS: &'static [&'static str] = &[
        "id",
        "name",
        "vpc_id",
        "router_id",
        "capacity",
        "iops",
        "sync",
        "created_at",
        "updated_at",
    ];
    const FILTER_BINDINGS: &'static [FilterBinding] = &[
        FilterBinding::new("name", "name"),
        FilterBinding::new("router", "router_id"),
    ];
}

/// Virtual private cloud.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub struct VpcEntity {
    /// VPC identifier, e.g. `vpc-abcdef12`.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Region hosting the VPC.
    #[serde(default)]
    pub region_id: Option<String>,
    /// Synchronisation status reported by the platform.
    #[serde(default)]
    pub sync: String,
    /// Creation timestamp.
    #[serde(default)]
    pub created_at: Option<String>,
    /// Last modification timestamp.
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// Marker for the VPC resource kind.
#[derive(Clone, Copy, Debug)]
pub struct Vpc;

impl Resource for Vpc {
    type Entity = VpcEntity;
    type Id = String;
    type Patch = NoChanges;
    type Create = NoChanges;

    const KIND: &'static str = "vpc";
    const PLURAL: &'static str = "vpcs";
    const COLLECTION: &'static str = "ecloud_vpcs";
    const ID_SCHEME: IdScheme = IdScheme::Prefixed("vpc");
    const DEFAULT_FIELDS: &'static [&'static str] = &["id", "name", "region_id", "sync"];
    const FIELDS: &'static [&'static str] =
        &["id", "name", "region_id", "sync", "created_at", "updated_at"];
    const FILTER_BINDINGS: &'static [FilterBinding] = &[FilterBinding::new("name", "name")];
}
