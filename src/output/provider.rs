//! Data providers that decouple result shapes from rendering.

use serde::Serialize;
use serde_json::{Map, Value};

use super::OutputError;

/// One result row: field name to value, in declaration order.
pub type Row = Map<String, Value>;

/// Uniform view over a command's result collection.
///
/// Each resource module produces a provider from its typed rows; the renderer
/// only ever sees this trait.
pub trait OutputDataProvider {
    /// Fields rendered when the user does not pass `--fields`.
    fn default_fields(&self) -> &[String];

    /// Every field a user may request with `--fields`.
    fn supported_fields(&self) -> &[String];

    /// Result rows in presentation order.
    fn rows(&self) -> &[Row];

    /// Returns `true` when `field` may be requested.
    fn supports(&self, field: &str) -> bool {
        self.supported_fields().iter().any(|known| known == field)
    }
}

/// Provider over any serialisable row type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SerializedProvider {
    rows: Vec<Row>,
    default_fields: Vec<String>,
    supported_fields: Vec<String>,
    declared_supported: bool,
}

impl SerializedProvider {
    /// Serialises `items` into rows.
    ///
    /// # Errors
    ///
    /// Returns [`OutputError::Serialize`] when an item fails to serialise and
    /// [`OutputError::NotAnObject`] when it serialises to something other
    /// than a JSON object.
    pub fn new<T: Serialize>(items: &[T]) -> Result<Self, OutputError> {
        let rows = items
            .iter()
            .map(|item| match serde_json::to_value(item)? {
                Value::Object(row) => Ok(row),
                other => Err(OutputError::NotAnObject {
                    kind: json_kind(&other),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut provider = Self {
            rows,
            ..Self::default()
        };
        provider.refresh_supported();
        Ok(provider)
    }

    /// Sets the default field selection.
    #[must_use]
    pub fn with_default_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_fields = fields.into_iter().map(Into::into).collect();
        self.refresh_supported();
        self
    }

    /// Declares the full supported field set explicitly.
    ///
    /// Without a declaration the supported set is inferred from the rows,
    /// which leaves an empty result set unable to validate `--fields`.
    #[must_use]
    pub fn with_supported_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_fields = fields.into_iter().map(Into::into).collect();
        self.declared_supported = true;
        self.refresh_supported();
        self
    }

    fn refresh_supported(&mut self) {
        if !self.declared_supported {
            self.supported_fields.clear();
            let discovered = self.rows.iter().flat_map(|row| row.keys());
            for field in self.default_fields.iter().chain(discovered) {
                push_unique(&mut self.supported_fields, field);
            }
            return;
        }
        for field in &self.default_fields {
            push_unique(&mut self.supported_fields, field);
        }
    }
}

impl OutputDataProvider for SerializedProvider {
    fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    fn supported_fields(&self) -> &[String] {
        &self.supported_fields
    }

    fn rows(&self) -> &[Row] {
        &self.rows
    }
}

fn push_unique(fields: &mut Vec<String>, field: &str) {
    if !fields.iter().any(|known| known == field) {
        fields.push(field.to_owned());
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Renders a field value as a single table, CSV or value cell.
#[must_use]
pub fn scalar(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(Value::Bool(flag)) => flag.to_string(),
        Some(Value::Number(number)) => number.to_string(),
        Some(other) => other.to_string(),
    }
}
