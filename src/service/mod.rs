//! Capability contract between command handlers and resource services.
//!
//! The HTTP SDK is an external collaborator. Commands only depend on
//! [`ResourceService`], which any backend (the offline catalog, a test
//! double, or a real API client) implements per [`Resource`] kind.

use std::fmt::{Debug, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::locator::LocatorProvider;
use crate::output::{OutputError, SerializedProvider};
use crate::params::{FilterBinding, RequestParameters};

/// Static description of one resource kind.
pub trait Resource {
    /// Typed entity returned by the service.
    type Entity: Serialize + DeserializeOwned + Clone + Debug;
    /// Identifier parsed from command arguments.
    type Id: FromStr + Display + Clone + Debug;
    /// Partial update payload; unset fields are skipped when serialised.
    type Patch: Serialize + Debug;
    /// Payload describing a new entity.
    type Create: Serialize + Debug;

    /// Singular noun used in messages, e.g. `volume`.
    const KIND: &'static str;
    /// Plural noun used in messages, e.g. `volumes`.
    const PLURAL: &'static str;
    /// Collection name in the backing store.
    const COLLECTION: &'static str;
    /// Field holding the identifier.
    const ID_FIELD: &'static str = "id";
    /// How a backend without its own ID allocation mints new identifiers.
    const ID_SCHEME: IdScheme = IdScheme::Sequential;
    /// Fields shown when no `--fields` are requested.
    const DEFAULT_FIELDS: &'static [&'static str];
    /// Every field that may be requested.
    const FIELDS: &'static [&'static str];
    /// Typed list flags and the properties they filter on.
    const FILTER_BINDINGS: &'static [FilterBinding] = &[];
    /// Properties a name lookup may match on, most preferred first.
    const LOCATOR_PROPERTIES: &'static [&'static str] = &[];
}

/// Identifier allocation for newly created entities.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum IdScheme {
    /// One more than the highest numeric identifier in use.
    Sequential,
    /// `<prefix>-` followed by eight lower-case hex digits, e.g. `vol-1a2b3c4d`.
    Prefixed(&'static str),
    /// A random version 4 UUID.
    Uuid,
    /// The create payload carries the identifier field itself.
    Provided,
}

/// Payload type for resources that cannot be created or updated.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct NoChanges {}

/// Errors surfaced by a resource service.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ServiceError {
    /// The entity does not exist.
    #[error("{kind} not found with ID [{id}]")]
    NotFound {
        /// Resource kind.
        kind: String,
        /// Identifier that was looked up.
        id: String,
    },
    /// The backend does not offer the operation for this kind.
    #[error("{operation} is not supported for {kind}")]
    Unsupported {
        /// Resource kind.
        kind: String,
        /// Operation that was attempted.
        operation: String,
    },
    /// Opaque failure reported by the backend.
    #[error("{0}")]
    Backend(String),
}

impl ServiceError {
    /// Builds a not-found error for resource `R`.
    #[must_use]
    pub fn not_found<R: Resource>(id: impl Display) -> Self {
        Self::NotFound {
            kind: R::KIND.to_owned(),
            id: id.to_string(),
        }
    }
}

/// Operations a backend offers for resource kind `R`.
pub trait ResourceService<R: Resource> {
    /// Lists entities matching `params`.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the backend call fails.
    fn list(&self, params: &RequestParameters) -> Result<Vec<R::Entity>, ServiceError>;

    /// Fetches one entity.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the entity does not exist.
    fn get(&self, id: &R::Id) -> Result<R::Entity, ServiceError>;

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the entity does not exist.
    fn patch(&self, id: &R::Id, patch: &R::Patch) -> Result<(), ServiceError>;

    /// Creates an entity and returns its identifier.
    ///
    /// # Errors
    ///
    /// Returns a [`ServiceError`] when the backend rejects the request.
    fn create(&self, request: &R::Create) -> Result<R::Id, ServiceError>;

    /// Removes an entity.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotFound`] when the entity does not exist.
    fn delete(&self, id: &R::Id) -> Result<(), ServiceError>;
}

/// Builds the output provider for a slice of `R` entities.
///
/// # Errors
///
/// Returns an [`OutputError`] when an entity fails to serialise.
pub fn output_provider<R: Resource>(
    items: &[R::Entity],
) -> Result<SerializedProvider, OutputError> {
    Ok(SerializedProvider::new(items)?
        .with_default_fields(R::DEFAULT_FIELDS.iter().copied())
        .with_supported_fields(R::FIELDS.iter().copied()))
}

/// Adapts a service's filtered `list` call for the resource locator.
pub struct ServiceLocator<'a, R, S: ?Sized> {
    service: &'a S,
    resource: PhantomData<R>,
}

impl<'a, R, S: ?Sized> ServiceLocator<'a, R, S> {
    /// Wraps a service.
    #[must_use]
    pub const fn new(service: &'a S) -> Self {
        Self {
            service,
            resource: PhantomData,
        }
    }
}

impl<R, S> LocatorProvider for ServiceLocator<'_, R, S>
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    type Entity = R::Entity;
    type Error = ServiceError;

    fn supported_properties(&self) -> &[&'static str] {
        R::LOCATOR_PROPERTIES
    }

    fn find(&self, params: &RequestParameters) -> Result<Vec<R::Entity>, ServiceError> {
        self.service.list(params)
    }
}
