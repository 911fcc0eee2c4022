//! Generic command handlers shared by every resource kind.
//!
//! Handlers translate raw arguments into service calls and hand the results
//! to the output pipeline. Multi-argument commands never stop at the first
//! failing item: each failure is written to the error stream, counted in the
//! context's [`ErrorLevel`], and the loop moves on. Whatever succeeded is
//! still rendered.
//!
//! Every handler that renders checks the field selection before its first
//! service call.

use std::fmt::Display;
use std::io::{self, Write};

use thiserror::Error;
use tracing::debug;

use crate::catalog::CatalogError;
use crate::config::ConfigError;
use crate::locator::{ResourceLocator, is_uuid};
use crate::logging::LoggingError;
use crate::output::{OutputError, RenderOptions, validate, write_output};
use crate::params::{FlagSnapshot, ParameterError, build_request_parameters};
use crate::service::{Resource, ResourceService, ServiceError, ServiceLocator, output_provider};

/// Count of per-item failures within one command invocation.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ErrorLevel {
    failures: usize,
}

impl ErrorLevel {
    /// A level with no failures recorded.
    #[must_use]
    pub const fn new() -> Self {
        Self { failures: 0 }
    }

    /// Records one failed item.
    pub const fn record(&mut self) {
        self.failures = self.failures.saturating_add(1);
    }

    /// Number of failed items.
    #[must_use]
    pub const fn failures(self) -> usize {
        self.failures
    }

    /// Returns `true` once any item has failed.
    #[must_use]
    pub const fn is_failure(self) -> bool {
        self.failures > 0
    }

    /// Process exit status: `0` when every item succeeded, `1` otherwise.
    #[must_use]
    pub fn exit_code(self) -> u8 {
        u8::from(self.is_failure())
    }
}

/// Errors that abort a command before or instead of per-item handling.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Flag values could not be turned into request parameters.
    #[error(transparent)]
    Parameters(#[from] ParameterError),
    /// Rendering failed, for example on an unsupported field.
    #[error(transparent)]
    Output(#[from] OutputError),
    /// A whole-command service call failed.
    #[error("{context}: {source}")]
    Service {
        /// What the command was doing, e.g. `Error retrieving volumes`.
        context: String,
        /// Error reported by the service.
        source: ServiceError,
    },
    /// Configuration could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The catalog file could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Logging could not be initialised.
    #[error(transparent)]
    Logging(#[from] LoggingError),
    /// Writing to the terminal failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Per-invocation state threaded through the handlers.
pub struct CommandContext<'a> {
    out: &'a mut dyn Write,
    err: &'a mut dyn Write,
    render: RenderOptions,
    errors: ErrorLevel,
}

impl<'a> CommandContext<'a> {
    /// Creates a context writing rendered output to `out` and item errors to
    /// `err`.
    pub const fn new(
        out: &'a mut dyn Write,
        err: &'a mut dyn Write,
        render: RenderOptions,
    ) -> Self {
        Self {
            out,
            err,
            render,
            errors: ErrorLevel::new(),
        }
    }

    /// Writes one error line and raises the error level.
    pub fn report(&mut self, message: impl Display) {
        writeln!(self.err, "{message}").ok();
        self.errors.record();
    }

    /// Renders `items` with the invocation's output options.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Output`] when the field selection is invalid
    /// or the write fails.
    pub fn render<R: Resource>(&mut self, items: &[R::Entity]) -> Result<(), CommandError> {
        let provider = output_provider::<R>(items)?;
        write_output(self.out, &provider, &self.render)?;
        Ok(())
    }

    /// Checks the output options against `R`'s fields without calling any
    /// service.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::Output`] when the selection cannot be
    /// rendered for `R`.
    pub fn validate_fields<R: Resource>(&self) -> Result<(), CommandError> {
        let provider = output_provider::<R>(&[])?;
        validate(&provider, &self.render)?;
        Ok(())
    }

    /// Failures recorded so far.
    #[must_use]
    pub const fn errors(&self) -> ErrorLevel {
        self.errors
    }

    fn parse_id<R: Resource>(&mut self, raw: &str) -> Option<R::Id> {
        if let Ok(id) = raw.trim().parse::<R::Id>() {
            return Some(id);
        }
        self.report(format_args!("Invalid {} ID [{raw}]", R::KIND));
        None
    }
}

/// Lists entities, applying generic and typed filter flags.
///
/// # Errors
///
/// Returns [`CommandError::Output`] for an unusable field selection and
/// [`CommandError::Parameters`] for malformed flags, both before the
/// service is called, [`CommandError::Service`] when the list call fails,
/// and [`CommandError::Output`] when rendering fails.
pub fn list<R, S>(
    ctx: &mut CommandContext<'_>,
    service: &S,
    flags: &FlagSnapshot,
) -> Result<(), CommandError>
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    ctx.validate_fields::<R>()?;
    let params = build_request_parameters(flags, R::FILTER_BINDINGS)?;
    debug!(kind = R::PLURAL, %params, "listing");
    let items = service
        .list(&params)
        .map_err(|source| CommandError::Service {
            context: format!("Error retrieving {}", R::PLURAL),
            source,
        })?;
    ctx.render::<R>(&items)
}

/// Shows each ID in turn, reporting the ones that fail.
///
/// # Errors
///
/// Returns [`CommandError::Output`] for an unusable field selection, before
/// any service call, or when rendering the successful items fails. Item
/// failures are reported through the context instead.
pub fn show<R, S>(
    ctx: &mut CommandContext<'_>,
    service: &S,
    ids: &[String],
) -> Result<(), CommandError>
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    ctx.validate_fields::<R>()?;
    let mut found = Vec::with_capacity(ids.len());
    for raw in ids {
        let Some(id) = ctx.parse_id::<R>(raw) else {
            continue;
        };
        match service.get(&id) {
            Ok(entity) => found.push(entity),
            Err(err) => {
                debug!(kind = R::KIND, %id, error = %err, "retrieval failed");
                ctx.report(format_args!("Error retrieving {} [{id}]: {err}", R::KIND));
            }
        }
    }
    ctx.render::<R>(&found)
}

/// Shows entities addressed either by UUID or by a locatable property such
/// as their name.
///
/// # Errors
///
/// Returns [`CommandError::Output`] for an unusable field selection, before
/// any service call, or when rendering the successful items fails.
pub fn show_located<R, S>(
    ctx: &mut CommandContext<'_>,
    service: &S,
    values: &[String],
) -> Result<(), CommandError>
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    ctx.validate_fields::<R>()?;
    let locator = ResourceLocator::new(ServiceLocator::<R, S>::new(service));
    let mut found = Vec::with_capacity(values.len());
    for value in values {
        let outcome = if is_uuid(value) {
            value
                .parse::<R::Id>()
                .map_err(|_| ServiceError::not_found::<R>(value))
                .and_then(|id| service.get(&id))
                .map_err(|err| format!("Error retrieving {} by ID [{value}]: {err}", R::KIND))
        } else {
            locator
                .invoke(value)
                .map_err(|err| format!("Error locating {} [{value}]: {err}", R::KIND))
        };
        match outcome {
            Ok(entity) => found.push(entity),
            Err(message) => ctx.report(message),
        }
    }
    ctx.render::<R>(&found)
}

/// Applies `patch` to each ID, then renders the refreshed entities.
///
/// # Errors
///
/// Returns [`CommandError::Output`] for an unusable field selection, before
/// any patch is sent, or when rendering the updated items fails.
pub fn update<R, S>(
    ctx: &mut CommandContext<'_>,
    service: &S,
    ids: &[String],
    patch: &R::Patch,
) -> Result<(), CommandError>
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    ctx.validate_fields::<R>()?;
    debug!(kind = R::KIND, ?patch, "updating");
    let mut updated = Vec::with_capacity(ids.len());
    for raw in ids {
        let Some(id) = ctx.parse_id::<R>(raw) else {
            continue;
        };
        if let Err(err) = service.patch(&id, patch) {
            ctx.report(format_args!("Error updating {} [{id}]: {err}", R::KIND));
            continue;
        }
        match service.get(&id) {
            Ok(entity) => updated.push(entity),
            Err(err) => ctx.report(format_args!(
                "Error retrieving updated {} [{id}]: {err}",
                R::KIND
            )),
        }
    }
    ctx.render::<R>(&updated)
}

/// Creates one entity and renders it as re-read from the service.
///
/// # Errors
///
/// Returns [`CommandError::Output`] for an unusable field selection before
/// the service is called, and [`CommandError::Service`] when creation or
/// the follow-up retrieval fails.
pub fn create<R, S>(
    ctx: &mut CommandContext<'_>,
    service: &S,
    request: &R::Create,
) -> Result<(), CommandError>
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    ctx.validate_fields::<R>()?;
    debug!(kind = R::KIND, ?request, "creating");
    let id = service
        .create(request)
        .map_err(|source| CommandError::Service {
            context: format!("Error creating {}", R::KIND),
            source,
        })?;
    let entity = service
        .get(&id)
        .map_err(|source| CommandError::Service {
            context: format!("Error retrieving new {}", R::KIND),
            source,
        })?;
    ctx.render::<R>(std::slice::from_ref(&entity))
}

/// Deletes each ID in turn, reporting the ones that fail.
///
/// Deletion renders nothing on success.
pub fn delete<R, S>(ctx: &mut CommandContext<'_>, service: &S, ids: &[String])
where
    R: Resource,
    S: ResourceService<R> + ?Sized,
{
    for raw in ids {
        let Some(id) = ctx.parse_id::<R>(raw) else {
            continue;
        };
        match service.delete(&id) {
            Ok(()) => debug!(kind = R::KIND, %id, "removed"),
            Err(err) => ctx.report(format_args!("Error removing {} [{id}]: {err}", R::KIND)),
        }
    }
}

#[cfg(test)]
mod tests;
