//! Field-definition model for user-defined collections.
//!
//! A [`Schema`] is an ordered list of typed [`Field`]s. It drives dynamic
//! form rendering (via [`InputKind`]) and spreadsheet-import column
//! mapping. Field order is authoring order and is preserved everywhere;
//! nothing in this module sorts or deduplicates fields.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// The six supported field types.
///
/// `text` and `email` share a single-line input; `number` and `date` get
/// specialised inputs; `select` is constrained to its options; `textarea`
/// is multi-line free text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Email,
    Number,
    Date,
    Select,
    Textarea,
}

impl FieldType {
    /// Stable string representation matching serde's `rename_all = "lowercase"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Email => "email",
            Self::Number => "number",
            Self::Date => "date",
            Self::Select => "select",
            Self::Textarea => "textarea",
        }
    }

    /// Which input control a form should render for this type.
    pub fn input_kind(&self) -> InputKind {
        match self {
            Self::Text => InputKind::SingleLine("text"),
            Self::Email => InputKind::SingleLine("email"),
            Self::Number => InputKind::SingleLine("number"),
            Self::Date => InputKind::DatePicker,
            Self::Select => InputKind::Dropdown,
            Self::Textarea => InputKind::MultiLine,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input affordance a [`FieldType`] maps to in a rendered form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    /// Single-line `<input>` with the given HTML `type` attribute.
    SingleLine(&'static str),
    /// Calendar picker producing `YYYY-MM-DD` strings.
    DatePicker,
    /// Drop-down constrained to the field's `options`.
    Dropdown,
    /// Multi-line free-text area.
    MultiLine,
}

/// A single field definition.
///
/// `name` is the stable storage key for record data; `label` is the
/// user-facing caption and the only part users may edit during import
/// review. `options` is only meaningful for [`FieldType::Select`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Field {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl Field {
    /// An optional field with no options.
    pub fn new(name: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            field_type,
            required: false,
            options: None,
        }
    }

    /// Mark the field required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Attach select options.
    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = Some(options.into_iter().map(Into::into).collect());
        self
    }
}

/// An ordered field list. The unit the API stores per collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field by its storage `name`.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Replace the label of the named field, leaving its position, `name`,
    /// and `type` untouched. Returns `false` if no such field exists.
    pub fn rename_label(&mut self, field_name: &str, new_label: impl Into<String>) -> bool {
        match self.fields.iter_mut().find(|f| f.name == field_name) {
            Some(field) => {
                field.label = new_label.into();
                true
            }
            None => false,
        }
    }

    /// Names of `select` fields that have no options to offer.
    ///
    /// Such a field renders as a drop-down with nothing to pick, so
    /// callers building schemas by hand should treat a non-empty result
    /// as a defect in the schema.
    pub fn unusable_selects(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| {
                f.field_type == FieldType::Select
                    && f.options.as_ref().map_or(true, |opts| opts.is_empty())
            })
            .map(|f| f.name.as_str())
            .collect()
    }
}

// ── Label validation ────────────────────────────────────────────────

/// Why a label was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelIssue {
    /// Empty after trimming surrounding whitespace.
    Empty,
    /// Collides case-insensitively with an earlier field's label.
    Duplicate,
}

impl LabelIssue {
    /// User-facing message shown next to the offending input.
    pub fn message(&self) -> &'static str {
        match self {
            Self::Empty => "Name cannot be empty",
            Self::Duplicate => "Duplicate name",
        }
    }
}

/// A label problem attached to the field (by `name`) that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelViolation {
    pub field: String,
    pub issue: LabelIssue,
}

/// Result of [`validate_schema`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaValidation {
    pub violations: Vec<LabelViolation>,
}

impl SchemaValidation {
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }

    /// The issue recorded for a field, if any.
    pub fn issue_for(&self, field_name: &str) -> Option<LabelIssue> {
        self.violations
            .iter()
            .find(|v| v.field == field_name)
            .map(|v| v.issue)
    }
}

/// Check every label in the schema: non-empty after trimming, and unique
/// case-insensitively among trimmed labels.
///
/// Within a colliding group only the fields after the first occurrence
/// are flagged, so fixing the later ones resolves the group. An empty
/// label is reported as [`LabelIssue::Empty`] only; it never counts
/// toward duplicate detection. Cheap enough to re-run on every edit.
pub fn validate_schema(schema: &Schema) -> SchemaValidation {
    let mut violations = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for field in &schema.fields {
        let trimmed = field.label.trim();
        if trimmed.is_empty() {
            violations.push(LabelViolation {
                field: field.name.clone(),
                issue: LabelIssue::Empty,
            });
            continue;
        }
        if !seen.insert(trimmed.to_lowercase()) {
            violations.push(LabelViolation {
                field: field.name.clone(),
                issue: LabelIssue::Duplicate,
            });
        }
    }

    SchemaValidation { violations }
}
