//! Structured API request parameters derived from command-line flags.
//!
//! Commands never talk to a service with raw flag strings. Generic
//! `--filter`, `--sort`, `--page` and `--per-page` values, together with any
//! resource-specific typed flags, are folded into a [`RequestParameters`]
//! value by [`build_request_parameters`]. The value is immutable once built
//! and is handed to the service capability as-is.

mod builder;

use std::fmt;
use std::num::NonZeroU32;
use std::str::FromStr;

pub use builder::{
    FilterBinding, FlagSnapshot, ParameterError, build_request_parameters, infer_filter,
    parse_filter, parse_sort,
};

/// Comparison operator applied by a [`FilterExpression`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Operator {
    /// Property equals one of the values.
    Eq,
    /// Property differs from every value.
    Neq,
    /// Property is greater than the value.
    Gt,
    /// Property is less than the value.
    Lt,
    /// Property is greater than or equal to the value.
    Gte,
    /// Property is less than or equal to the value.
    Lte,
    /// Property matches a `*` wildcard pattern.
    Like,
    /// Property is a member of the value list.
    In,
    /// Property is absent or null.
    Null,
    /// Property is present and not null.
    NotNull,
}

impl Operator {
    /// Wire token understood by the query layer.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Neq => "neq",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Gte => "gte",
            Self::Lte => "lte",
            Self::Like => "lk",
            Self::In => "in",
            Self::Null => "null",
            Self::NotNull => "notnull",
        }
    }

    /// Returns `true` for operators that take no comparison value.
    #[must_use]
    pub const fn is_unary(self) -> bool {
        matches!(self, Self::Null | Self::NotNull)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Raised when an operator token is not recognised.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UnknownOperator(pub String);

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "eq" => Ok(Self::Eq),
            "neq" => Ok(Self::Neq),
            "gt" => Ok(Self::Gt),
            "lt" => Ok(Self::Lt),
            "gte" => Ok(Self::Gte),
            "lte" => Ok(Self::Lte),
            "lk" | "like" => Ok(Self::Like),
            "in" => Ok(Self::In),
            "null" => Ok(Self::Null),
            "notnull" => Ok(Self::NotNull),
            _ => Err(UnknownOperator(raw.trim().to_owned())),
        }
    }
}

/// A single predicate on one property. Expressions are ANDed together.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilterExpression {
    /// Property name as exposed by the API (for example `router_id`).
    pub property: String,
    /// Comparison applied to the property.
    pub operator: Operator,
    /// Comparison values in the order the user supplied them.
    pub values: Vec<String>,
}

impl FilterExpression {
    /// Builds an expression from its parts.
    #[must_use]
    pub fn new(property: impl Into<String>, operator: Operator, values: Vec<String>) -> Self {
        Self {
            property: property.into(),
            operator,
            values,
        }
    }

    /// Shorthand for an exact match on a single value.
    #[must_use]
    pub fn eq(property: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(property, Operator::Eq, vec![value.into()])
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}={}",
            self.property,
            self.operator,
            self.values.join(",")
        )
    }
}

/// Ordering directive. In a sequence, earlier expressions take precedence
/// and later ones only break ties.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SortExpression {
    /// Property to order by.
    pub property: String,
    /// Whether the ordering is descending.
    pub descending: bool,
}

impl SortExpression {
    /// Ascending sort on `property`.
    #[must_use]
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            descending: false,
        }
    }

    /// Descending sort on `property`.
    #[must_use]
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            descending: true,
        }
    }
}

impl fmt::Display for SortExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = if self.descending { "desc" } else { "asc" };
        write!(f, "{}:{direction}", self.property)
    }
}

/// Optional paging. `None` always means "use the service default".
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Pagination {
    /// One-based page number.
    pub page: Option<NonZeroU32>,
    /// Number of items per page.
    pub per_page: Option<NonZeroU32>,
}

impl Pagination {
    /// Returns `true` when neither field is set.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        self.page.is_none() && self.per_page.is_none()
    }
}

/// Filters, sorts and paging handed to a service `list` call.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RequestParameters {
    filters: Vec<FilterExpression>,
    sorts: Vec<SortExpression>,
    pagination: Pagination,
}

impl RequestParameters {
    /// Empty parameters: no filtering, service ordering and paging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a filter expression.
    #[must_use]
    pub fn with_filter(mut self, filter: FilterExpression) -> Self {
        self.filters.push(filter);
        self
    }

    /// Appends a sort expression with lower precedence than existing ones.
    #[must_use]
    pub fn with_sort(mut self, sort: SortExpression) -> Self {
        self.sorts.push(sort);
        self
    }

    /// Sets the page; zero leaves the service default in place.
    #[must_use]
    pub fn with_page(mut self, page: u32) -> Self {
        self.pagination.page = NonZeroU32::new(page);
        self
    }

    /// Sets the page size; zero leaves the service default in place.
    #[must_use]
    pub fn with_per_page(mut self, per_page: u32) -> Self {
        self.pagination.per_page = NonZeroU32::new(per_page);
        self
    }

    /// Filter expressions in the order they were added.
    #[must_use]
    pub fn filters(&self) -> &[FilterExpression] {
        &self.filters
    }

    /// Sort expressions, highest precedence first.
    #[must_use]
    pub fn sorts(&self) -> &[SortExpression] {
        &self.sorts
    }

    /// Requested paging.
    #[must_use]
    pub const fn pagination(&self) -> Pagination {
        self.pagination
    }

    /// Renders the query-string pairs the HTTP layer sends.
    ///
    /// Filters become `property:op` keys with comma-joined values, sorts are
    /// joined under one `sort` key, and paging is only emitted when set.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|filter| {
                (
                    format!("{}:{}", filter.property, filter.operator),
                    filter.values.join(","),
                )
            })
            .collect();

        if !self.sorts.is_empty() {
            let rendered: Vec<String> = self.sorts.iter().map(ToString::to_string).collect();
            pairs.push((String::from("sort"), rendered.join(",")));
        }
        if let Some(page) = self.pagination.page {
            pairs.push((String::from("page"), page.to_string()));
        }
        if let Some(per_page) = self.pagination.per_page {
            pairs.push((String::from("per_page"), per_page.to_string()));
        }
        pairs
    }
}

impl fmt::Display for RequestParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<String> = self
            .query_pairs()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        f.write_str(&rendered.join("&"))
    }
}
