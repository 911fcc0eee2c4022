//! Parsing of raw flag values into [`RequestParameters`].

use thiserror::Error;

use super::{FilterExpression, Operator, RequestParameters, SortExpression};

const FILTER_FLAG: &str = "filter";
const SORT_FLAG: &str = "sort";

/// Errors raised while turning flag values into request parameters.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum ParameterError {
    /// A flag carried a value that could not be parsed.
    #[error("invalid value for --{flag} [{value}]: {reason}")]
    InvalidFlagValue {
        /// Flag name without leading dashes.
        flag: String,
        /// Raw value as supplied on the command line.
        value: String,
        /// What was wrong with the value.
        reason: String,
    },
}

impl ParameterError {
    fn invalid(flag: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFlagValue {
            flag: flag.to_owned(),
            value: value.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Declares that a typed command flag filters on an API property.
///
/// Tables of bindings are declared once per resource, so commands expose
/// ergonomic flags such as `--router` while reusing the generic filter
/// machinery.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FilterBinding {
    /// Flag name without leading dashes.
    pub flag: &'static str,
    /// API property the flag filters on.
    pub property: &'static str,
    /// Fixed operator; `None` infers one from the value.
    pub operator: Option<Operator>,
}

impl FilterBinding {
    /// Binds `flag` to `property` with operator inference.
    #[must_use]
    pub const fn new(flag: &'static str, property: &'static str) -> Self {
        Self {
            flag,
            property,
            operator: None,
        }
    }

    /// Fixes the operator instead of inferring it.
    #[must_use]
    pub const fn with_operator(mut self, operator: Operator) -> Self {
        self.operator = Some(operator);
        self
    }

    fn expression(&self, value: &str) -> FilterExpression {
        match self.operator {
            None => infer_filter(self.property, value),
            Some(Operator::In) => {
                FilterExpression::new(self.property, Operator::In, split_values(value))
            }
            Some(operator) => {
                FilterExpression::new(self.property, operator, vec![value.to_owned()])
            }
        }
    }
}

/// Raw flag values captured from one command invocation.
///
/// Typed flags are only recorded when the user supplied them, which is how
/// the builder distinguishes "changed" flags from defaults.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct FlagSnapshot {
    filters: Vec<String>,
    sorts: Vec<String>,
    page: Option<u32>,
    per_page: Option<u32>,
    typed: Vec<(String, String)>,
}

impl FlagSnapshot {
    /// Creates an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one `--filter` occurrence.
    #[must_use]
    pub fn filter(mut self, raw: impl Into<String>) -> Self {
        self.filters.push(raw.into());
        self
    }

    /// Adds every `--filter` occurrence in order.
    #[must_use]
    pub fn filters<I, S>(mut self, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.extend(raw.into_iter().map(Into::into));
        self
    }

    /// Adds one `--sort` occurrence.
    #[must_use]
    pub fn sort(mut self, raw: impl Into<String>) -> Self {
        self.sorts.push(raw.into());
        self
    }

    /// Adds every `--sort` occurrence in order.
    #[must_use]
    pub fn sorts<I, S>(mut self, raw: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sorts.extend(raw.into_iter().map(Into::into));
        self
    }

    /// Records `--page` when present.
    #[must_use]
    pub const fn page(mut self, page: Option<u32>) -> Self {
        self.page = page;
        self
    }

    /// Records `--per-page` when present.
    #[must_use]
    pub const fn per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page;
        self
    }

    /// Records a typed flag; `None` means the user left it unset.
    #[must_use]
    pub fn typed(mut self, flag: &str, value: Option<&str>) -> Self {
        if let Some(raw) = value {
            self.typed.push((flag.to_owned(), raw.to_owned()));
        }
        self
    }

    /// Value of a typed flag the user supplied.
    #[must_use]
    pub fn typed_value(&self, flag: &str) -> Option<&str> {
        self.typed
            .iter()
            .find(|(name, _)| name == flag)
            .map(|(_, value)| value.as_str())
    }
}

/// Builds an expression for a bare value, inferring the operator.
///
/// A `*` selects a wildcard match, a comma selects a membership match over
/// the split values, and anything else is an exact match.
#[must_use]
pub fn infer_filter(property: &str, value: &str) -> FilterExpression {
    if value.contains('*') {
        return FilterExpression::new(property, Operator::Like, vec![value.to_owned()]);
    }
    if value.contains(',') {
        return FilterExpression::new(property, Operator::In, split_values(value));
    }
    FilterExpression::eq(property, value)
}

/// Parses one `property[:operator]=value[,value...]` filter string.
///
/// # Errors
///
/// Returns [`ParameterError::InvalidFlagValue`] for the `filter` flag when
/// the string does not split into exactly one property part and one value
/// part around `=`, when the property is empty, or when the operator token
/// is unknown.
pub fn parse_filter(raw: &str) -> Result<FilterExpression, ParameterError> {
    let Some((lhs, rhs)) = raw.split_once('=').filter(|(_, rest)| !rest.contains('=')) else {
        return Err(ParameterError::invalid(
            FILTER_FLAG,
            raw,
            "missing value for filtering",
        ));
    };

    let (property, operator) = match lhs.split_once(':') {
        Some((name, token)) => {
            let operator = token.parse::<Operator>().map_err(|err| {
                ParameterError::invalid(
                    FILTER_FLAG,
                    raw,
                    format!("unknown filtering operator [{}]", err.0),
                )
            })?;
            (name.trim(), Some(operator))
        }
        None => (lhs.trim(), None),
    };

    if property.is_empty() {
        return Err(ParameterError::invalid(
            FILTER_FLAG,
            raw,
            "missing property for filtering",
        ));
    }

    let values = split_values(rhs);
    match operator {
        Some(op) if op.is_unary() => Ok(FilterExpression::new(property, op, values)),
        _ if values.is_empty() => Err(ParameterError::invalid(
            FILTER_FLAG,
            raw,
            "missing value for filtering",
        )),
        Some(op) => Ok(FilterExpression::new(property, op, values)),
        None => Ok(infer_filter(property, rhs.trim())),
    }
}

/// Parses one `property[:asc|desc]` sort string.
///
/// # Errors
///
/// Returns [`ParameterError::InvalidFlagValue`] for the `sort` flag when the
/// property is empty or the direction is not `asc` or `desc`.
pub fn parse_sort(raw: &str) -> Result<SortExpression, ParameterError> {
    let (property, descending) = match raw.split_once(':') {
        Some((name, direction)) => match direction.trim().to_ascii_lowercase().as_str() {
            "asc" => (name.trim(), false),
            "desc" => (name.trim(), true),
            other => {
                return Err(ParameterError::invalid(
                    SORT_FLAG,
                    raw,
                    format!("invalid sort direction [{other}]"),
                ));
            }
        },
        None => (raw.trim(), false),
    };

    if property.is_empty() {
        return Err(ParameterError::invalid(
            SORT_FLAG,
            raw,
            "missing property for sorting",
        ));
    }

    Ok(SortExpression {
        property: property.to_owned(),
        descending,
    })
}

/// Folds a flag snapshot into request parameters.
///
/// Generic filters come first in the order given, then one expression per
/// typed flag the user supplied, in binding order. A typed flag and a generic
/// filter on the same property are both kept and therefore ANDed.
///
/// # Errors
///
/// Returns the first [`ParameterError`] raised by a malformed filter or sort
/// value. Nothing is partially applied.
pub fn build_request_parameters(
    flags: &FlagSnapshot,
    bindings: &[FilterBinding],
) -> Result<RequestParameters, ParameterError> {
    let mut params = RequestParameters::new();

    for raw in &flags.filters {
        params = params.with_filter(parse_filter(raw)?);
    }

    for binding in bindings {
        if let Some(value) = flags.typed_value(binding.flag) {
            params = params.with_filter(binding.expression(value));
        }
    }

    for raw in &flags.sorts {
        params = params.with_sort(parse_sort(raw)?);
    }

    if let Some(page) = flags.page {
        params = params.with_page(page);
    }
    if let Some(per_page) = flags.per_page {
        params = params.with_per_page(per_page);
    }

    Ok(params)
}

fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect()
}
