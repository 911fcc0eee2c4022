//! Output rendering for command results.
//!
//! Commands wrap their typed results in an [`OutputDataProvider`] and call
//! [`write_output`] with the user's [`RenderOptions`]. Rendering happens in
//! memory first, so a rejected field selection never leaves partial output
//! on the terminal.

mod provider;
mod table;

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use thiserror::Error;

pub use provider::{OutputDataProvider, Row, SerializedProvider, scalar};

/// Presentation format selected with `--output`.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum RenderFormat {
    /// Column-aligned text table.
    #[default]
    Table,
    /// RFC 4180 comma separated values.
    Csv,
    /// Pretty-printed JSON array of complete rows.
    Json,
    /// A single bare value.
    Value,
    /// One line of bare values per row, for piping into other commands.
    List,
}

impl RenderFormat {
    /// Every format, in the order shown in help output.
    pub const ALL: [Self; 5] = [Self::Table, Self::Csv, Self::Json, Self::Value, Self::List];

    /// Lower-case name used on the command line and in configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Value => "value",
            Self::List => "list",
        }
    }
}

impl fmt::Display for RenderFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for RenderFormat {
    type Err = OutputError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.name() == wanted)
            .ok_or_else(|| OutputError::UnknownFormat {
                format: raw.to_owned(),
            })
    }
}

/// How a provider should be rendered.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct RenderOptions {
    /// Output format.
    pub format: RenderFormat,
    /// Requested fields in the user's order; empty selects the defaults.
    pub fields: Vec<String>,
    /// Suppresses the header line for table and CSV output.
    pub no_header: bool,
}

impl RenderOptions {
    /// Options for `format` with default fields and headers.
    #[must_use]
    pub const fn new(format: RenderFormat) -> Self {
        Self {
            format,
            fields: Vec::new(),
            no_header: false,
        }
    }

    /// Replaces the requested fields.
    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Sets header suppression.
    #[must_use]
    pub const fn with_no_header(mut self, no_header: bool) -> Self {
        self.no_header = no_header;
        self
    }
}

/// Splits a comma-delimited `--fields` value, dropping blanks.
#[must_use]
pub fn parse_field_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|field| !field.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Errors raised while rendering output.
#[derive(Debug, Error)]
pub enum OutputError {
    /// A requested field is not part of the provider's supported set.
    #[error("unsupported field [{field}]")]
    UnsupportedField {
        /// First offending field name.
        field: String,
    },
    /// Value output was asked for zero or several fields.
    #[error("value output requires exactly one field, got {count}")]
    ValueFieldCount {
        /// Number of fields requested.
        count: usize,
    },
    /// Neither requested, default, nor supported fields exist.
    #[error("no fields available to render")]
    NoFields,
    /// The `--output` value is not a known format.
    #[error("unknown output format [{format}]")]
    UnknownFormat {
        /// Value supplied by the user.
        format: String,
    },
    /// A row serialised to something other than an object.
    #[error("cannot render {kind} as a row")]
    NotAnObject {
        /// JSON kind that was produced instead.
        kind: &'static str,
    },
    /// JSON serialisation failed.
    #[error("failed to serialise output: {0}")]
    Serialize(#[from] serde_json::Error),
    /// CSV encoding failed.
    #[error("failed to encode CSV output: {0}")]
    Csv(#[from] csv::Error),
    /// Writing the rendered output failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// Resolves the field selection against a provider.
///
/// An empty request selects the default fields, falling back to every
/// supported field when the provider declares no defaults. A non-empty
/// request keeps the user's order.
///
/// # Errors
///
/// Returns [`OutputError::UnsupportedField`] naming the first requested field
/// the provider does not support.
pub fn resolve_fields(
    provider: &dyn OutputDataProvider,
    requested: &[String],
) -> Result<Vec<String>, OutputError> {
    if requested.is_empty() {
        let defaults = provider.default_fields();
        let fields = if defaults.is_empty() {
            provider.supported_fields()
        } else {
            defaults
        };
        return Ok(fields.to_vec());
    }

    if let Some(field) = requested.iter().find(|field| !provider.supports(field)) {
        return Err(OutputError::UnsupportedField {
            field: field.clone(),
        });
    }
    Ok(requested.to_vec())
}

/// Checks the field selection for `options` without looking at any rows.
///
/// Commands call this before contacting a service, so a bad `--fields`
/// value never follows a mutation.
///
/// # Errors
///
/// Returns [`OutputError::UnsupportedField`] for an unknown field,
/// [`OutputError::ValueFieldCount`] when value output is not given exactly
/// one field, and [`OutputError::NoFields`] when a tabular format has
/// nothing to show.
pub fn validate(
    provider: &dyn OutputDataProvider,
    options: &RenderOptions,
) -> Result<Vec<String>, OutputError> {
    let fields = resolve_fields(provider, &options.fields)?;
    match options.format {
        RenderFormat::Value if options.fields.len() != 1 => {
            Err(OutputError::ValueFieldCount {
                count: options.fields.len(),
            })
        }
        RenderFormat::Table | RenderFormat::List if fields.is_empty() => {
            Err(OutputError::NoFields)
        }
        RenderFormat::List if options.fields.is_empty() => {
            Ok(fields.into_iter().take(1).collect())
        }
        _ => Ok(fields),
    }
}

/// Renders a provider into a byte buffer.
///
/// JSON output always carries complete rows and ignores the field selection,
/// although requested fields are still validated. Rendering is deterministic,
/// so identical arguments produce identical bytes.
///
/// # Errors
///
/// Returns an [`OutputError`] when [`validate`] rejects the field selection
/// or encoding fails. Nothing is produced on error.
pub fn render(
    provider: &dyn OutputDataProvider,
    options: &RenderOptions,
) -> Result<Vec<u8>, OutputError> {
    let fields = validate(provider, options)?;
    let rows = provider.rows();

    match options.format {
        RenderFormat::Table => {
            Ok(table::render_table(rows, &fields, options.no_header).into_bytes())
        }
        RenderFormat::Csv => render_csv(rows, &fields, options.no_header),
        RenderFormat::Json => {
            let mut buffer = serde_json::to_vec_pretty(rows)?;
            buffer.push(b'\n');
            Ok(buffer)
        }
        RenderFormat::Value | RenderFormat::List => Ok(render_lines(rows, &fields)),
    }
}

/// Renders a provider and writes it in one piece.
///
/// # Errors
///
/// Returns any [`render`] error before touching `writer`, or
/// [`OutputError::Io`] when the write fails.
pub fn write_output(
    writer: &mut dyn Write,
    provider: &dyn OutputDataProvider,
    options: &RenderOptions,
) -> Result<(), OutputError> {
    let buffer = render(provider, options)?;
    writer.write_all(&buffer)?;
    writer.flush()?;
    Ok(())
}

fn render_csv(rows: &[Row], fields: &[String], no_header: bool) -> Result<Vec<u8>, OutputError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    if !no_header {
        writer.write_record(fields)?;
    }
    for row in rows {
        writer.write_record(fields.iter().map(|field| scalar(row.get(field))))?;
    }
    writer
        .into_inner()
        .map_err(|err| OutputError::Io(err.into_error()))
}

fn render_lines(rows: &[Row], fields: &[String]) -> Vec<u8> {
    let mut buffer = String::new();
    for row in rows {
        let values: Vec<String> = fields.iter().map(|field| scalar(row.get(field))).collect();
        buffer.push_str(&values.join(" "));
        buffer.push('\n');
    }
    buffer.into_bytes()
}
