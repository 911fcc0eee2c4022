//! Resource kinds exposed by the command-line client.
//!
//! Each module declares its entity types and a [`crate::service::Resource`]
//! description: default and supported output fields, typed filter flags, and
//! the messages used by the generic command handlers.

pub mod account;
pub mod ddosx;
pub mod ecloud;
pub mod loadbalancer;
pub mod loadtest;

pub use account::Contact;
pub use ddosx::DdosxDomain;
pub use ecloud::{Volume, Vpc};
pub use loadbalancer::Listener;
pub use loadtest::LoadTestDomain;
