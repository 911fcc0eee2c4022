//! Core library for the `ukfast` command-line client.
//!
//! Commands are thin: they turn flags into [`params::RequestParameters`],
//! call a [`service::ResourceService`], and hand the typed results to the
//! [`output`] pipeline for rendering as a table, CSV, JSON, or bare values.
//! The [`locator`] resolves human-friendly names where an API only accepts
//! IDs. The binary is wired to the file-backed [`catalog::Catalog`].

pub mod catalog;
pub mod commands;
pub mod config;
pub mod locator;
pub mod logging;
pub mod output;
pub mod params;
pub mod resources;
pub mod service;
pub mod test_support;

pub use catalog::{Catalog, CatalogError};
pub use commands::{CommandContext, CommandError, ErrorLevel};
pub use config::{CliConfig, ConfigError};
pub use locator::{LocateError, LocatorProvider, ResourceLocator};
pub use output::{OutputDataProvider, OutputError, RenderFormat, RenderOptions};
pub use params::{FilterExpression, Operator, ParameterError, RequestParameters, SortExpression};
pub use service::{Resource, ResourceService, ServiceError};
