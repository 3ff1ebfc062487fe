//! Typed runtime values for record data. Pure logic, no I/O.
//!
//! Record payloads travel as loose JSON ([`RecordData`]) because the
//! server tolerates shape drift. At the points where this client
//! *produces* data (form submission, template seeding) the payload is
//! vetted against the collection schema first: each value either parses
//! into a [`FieldValue`] tagged with its field's type, or yields a
//! [`DataIssue`] naming the offending field.

use chrono::NaiveDate;
use serde_json::Value;

use crate::model::RecordData;
use crate::schema::{Field, FieldType, Schema};

/// Date values are exchanged as plain `YYYY-MM-DD` strings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A value that passed the type check for its owning field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Email(String),
    Number(f64),
    Date(NaiveDate),
    /// One of the owning select field's options.
    Choice(String),
    LongText(String),
}

impl FieldValue {
    /// The field type this value conforms to.
    pub fn field_type(&self) -> FieldType {
        match self {
            Self::Text(_) => FieldType::Text,
            Self::Email(_) => FieldType::Email,
            Self::Number(_) => FieldType::Number,
            Self::Date(_) => FieldType::Date,
            Self::Choice(_) => FieldType::Select,
            Self::LongText(_) => FieldType::Textarea,
        }
    }

    /// Back to the wire representation.
    pub fn into_json(self) -> Value {
        match self {
            Self::Text(s) | Self::Email(s) | Self::Choice(s) | Self::LongText(s) => {
                Value::String(s)
            }
            Self::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Self::Date(d) => Value::String(d.format(DATE_FORMAT).to_string()),
        }
    }
}

/// Why a value was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataIssueKind {
    /// Required field absent, null, or blank.
    MissingRequired,
    /// Present but not representable as the field's type.
    TypeMismatch { expected: FieldType },
    /// String present but not a plausible email address.
    InvalidEmail,
    /// Select value is not one of the field's options.
    UnknownChoice,
}

/// A single rejected field within one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataIssue {
    pub field: String,
    pub kind: DataIssueKind,
}

/// Parse one raw JSON value against its field definition.
///
/// Text-like fields coerce scalars (numbers, booleans) to their string
/// form, mirroring how spreadsheet imports stringify cells. Everything
/// else is strict.
pub fn parse_value(field: &Field, raw: &Value) -> Result<FieldValue, DataIssueKind> {
    let mismatch = || DataIssueKind::TypeMismatch {
        expected: field.field_type,
    };

    match field.field_type {
        FieldType::Text => coerce_string(raw).map(FieldValue::Text).ok_or_else(mismatch),
        FieldType::Textarea => coerce_string(raw)
            .map(FieldValue::LongText)
            .ok_or_else(mismatch),
        FieldType::Email => match raw {
            Value::String(s) if looks_like_email(s) => Ok(FieldValue::Email(s.clone())),
            Value::String(_) => Err(DataIssueKind::InvalidEmail),
            _ => Err(mismatch()),
        },
        FieldType::Number => match raw {
            Value::Number(n) => n.as_f64().map(FieldValue::Number).ok_or_else(mismatch),
            Value::String(s) => s
                .trim()
                .parse::<f64>()
                .map(FieldValue::Number)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldType::Date => match raw {
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(FieldValue::Date)
                .map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldType::Select => match raw {
            Value::String(s) => {
                let known = field
                    .options
                    .as_ref()
                    .map_or(false, |opts| opts.iter().any(|o| o == s));
                if known {
                    Ok(FieldValue::Choice(s.clone()))
                } else {
                    Err(DataIssueKind::UnknownChoice)
                }
            }
            _ => Err(mismatch()),
        },
    }
}

/// Check a whole record payload against a schema.
///
/// Absent, null, and blank-string values are all treated as "not
/// provided": an issue only when the field is required. Keys the schema
/// does not mention are ignored, matching the server's tolerance for
/// stale data left behind by schema edits.
pub fn typecheck_data(schema: &Schema, data: &RecordData) -> Vec<DataIssue> {
    let mut issues = Vec::new();

    for field in &schema.fields {
        let provided = match data.get(&field.name) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.trim().is_empty() => None,
            Some(raw) => Some(raw),
        };

        match provided {
            None => {
                if field.required {
                    issues.push(DataIssue {
                        field: field.name.clone(),
                        kind: DataIssueKind::MissingRequired,
                    });
                }
            }
            Some(raw) => {
                if let Err(kind) = parse_value(field, raw) {
                    issues.push(DataIssue {
                        field: field.name.clone(),
                        kind,
                    });
                }
            }
        }
    }

    issues
}

fn coerce_string(raw: &Value) -> Option<String> {
    match raw {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// Deliberately loose: just enough to catch obvious typos, same as the
// single-line email input does.
fn looks_like_email(s: &str) -> bool {
    s.contains('@') && s.contains('.')
}
