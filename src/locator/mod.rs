//! Name-to-entity resolution for APIs without direct name lookup.
//!
//! A [`ResourceLocator`] issues a single exact-match filtered list call and
//! insists on exactly one result. There is no caching; callers resolving
//! several names loop themselves.

use std::fmt::Debug;

use thiserror::Error;
use uuid::Uuid;

use crate::params::{FilterExpression, RequestParameters};

/// Capability that can list entities filtered by one of a fixed set of
/// properties.
pub trait LocatorProvider {
    /// Entity returned by the backing list call.
    type Entity;
    /// Error raised by the backing list call.
    type Error: std::error::Error + 'static;

    /// Properties this provider can match on, in preference order.
    fn supported_properties(&self) -> &[&'static str];

    /// Lists entities matching `params`.
    ///
    /// # Errors
    ///
    /// Returns the provider's error when the backing call fails.
    fn find(&self, params: &RequestParameters) -> Result<Vec<Self::Entity>, Self::Error>;
}

/// Errors raised while locating an entity.
#[derive(Debug, Error)]
pub enum LocateError<E: std::error::Error + 'static> {
    /// The provider cannot filter on the requested property.
    #[error("unsupported locator property [{property}]")]
    UnsupportedProperty {
        /// Property that was requested.
        property: String,
    },
    /// The provider declares no properties at all.
    #[error("locator has no supported properties")]
    NoProperties,
    /// No entity matched.
    #[error("no resource found with {property} [{value}]")]
    NotFound {
        /// Property that was matched on.
        property: String,
        /// Value searched for.
        value: String,
    },
    /// More than one entity matched.
    #[error("more than one resource found with value [{value}] ({count} matches)")]
    Ambiguous {
        /// Value searched for.
        value: String,
        /// Number of entities that matched.
        count: usize,
    },
    /// The backing list call failed.
    #[error(transparent)]
    Provider(E),
}

/// Resolves human-supplied values to single entities.
#[derive(Clone, Debug)]
pub struct ResourceLocator<P> {
    provider: P,
}

impl<P: LocatorProvider> ResourceLocator<P> {
    /// Wraps a provider.
    #[must_use]
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Locates the single entity whose `property` equals `value`.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::UnsupportedProperty`] without calling the
    /// provider when `property` is not supported, [`LocateError::NotFound`]
    /// for zero matches, [`LocateError::Ambiguous`] for several, and
    /// [`LocateError::Provider`] when the list call fails.
    pub fn locate(&self, property: &str, value: &str) -> Result<P::Entity, LocateError<P::Error>> {
        if !self
            .provider
            .supported_properties()
            .iter()
            .any(|supported| *supported == property)
        {
            return Err(LocateError::UnsupportedProperty {
                property: property.to_owned(),
            });
        }

        let params = RequestParameters::new().with_filter(FilterExpression::eq(property, value));
        tracing::debug!(%params, "locating resource");
        let mut matches = self
            .provider
            .find(&params)
            .map_err(LocateError::Provider)?;

        match matches.len() {
            0 => Err(LocateError::NotFound {
                property: property.to_owned(),
                value: value.to_owned(),
            }),
            1 => matches.pop().ok_or_else(|| LocateError::NotFound {
                property: property.to_owned(),
                value: value.to_owned(),
            }),
            count => Err(LocateError::Ambiguous {
                value: value.to_owned(),
                count,
            }),
        }
    }

    /// Locates by the provider's preferred property.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::NoProperties`] when the provider declares none,
    /// otherwise the errors of [`ResourceLocator::locate`].
    pub fn invoke(&self, value: &str) -> Result<P::Entity, LocateError<P::Error>> {
        let property = self
            .provider
            .supported_properties()
            .first()
            .ok_or(LocateError::NoProperties)?;
        self.locate(property, value)
    }
}

/// Returns `true` when `value` parses as a UUID, i.e. is an ID rather than
/// a name.
#[must_use]
pub fn is_uuid(value: &str) -> bool {
    Uuid::parse_str(value).is_ok()
}
