// hydroini/src/schema/spec.rs

//! Field and block schemas.

use crate::field_types::{FieldType, FieldValue};
use linked_hash_map::LinkedHashMap;
use std::cmp::Ordering;
use std::fmt;

/// Declaration of one field of a block schema.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub expected_type: FieldType,
    pub required: bool,
    pub default: Option<FieldValue>,
    pub repeatable: bool,
    /// Minimum number of occurrences of a repeatable field
    pub min_count: usize,
    /// Separator of a float list; whitespace when unset
    pub list_delimiter: Option<char>,
}

impl FieldSpec {
    /// A field that must be present unless it has a default.
    pub fn required(expected_type: FieldType) -> Self {
        Self {
            expected_type,
            required: true,
            default: None,
            repeatable: false,
            min_count: 0,
            list_delimiter: None,
        }
    }

    pub fn optional(expected_type: FieldType) -> Self {
        Self {
            required: false,
            ..Self::required(expected_type)
        }
    }

    /// Value substituted when the field is absent.
    pub fn with_default<V: Into<FieldValue>>(mut self, value: V) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Allow the key to occur more than once; occurrences keep file order.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    pub fn min_count(mut self, count: usize) -> Self {
        self.min_count = count;
        self
    }

    /// Split a float list on `delimiter` instead of whitespace.
    pub fn delimited_by(mut self, delimiter: char) -> Self {
        self.list_delimiter = Some(delimiter);
        self
    }
}

/// How a field value is compared with the value of a [`Condition`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Comparison {
    #[default]
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    /// Numbers compare numerically, anything else by its text, ignoring case.
    pub fn holds(self, actual: &FieldValue, expected: &FieldValue) -> bool {
        let ordering = match (actual.as_f64(), expected.as_f64()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => Some(
                actual
                    .to_raw_string()
                    .to_ascii_lowercase()
                    .cmp(&expected.to_raw_string().to_ascii_lowercase()),
            ),
        };
        match ordering {
            Some(ordering) => match self {
                Comparison::Equal => ordering == Ordering::Equal,
                Comparison::NotEqual => ordering != Ordering::Equal,
                Comparison::Greater => ordering == Ordering::Greater,
                Comparison::GreaterOrEqual => ordering != Ordering::Less,
                Comparison::Less => ordering == Ordering::Less,
                Comparison::LessOrEqual => ordering != Ordering::Greater,
            },
            None => false,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
            Comparison::Greater => ">",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Less => "<",
            Comparison::LessOrEqual => "<=",
        };
        write!(f, "{}", symbol)
    }
}

/// A test on the value of one field, e.g. `interpolationMethod == triangulation`.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub field: String,
    pub comparison: Comparison,
    pub value: FieldValue,
}

impl Condition {
    pub fn new<S: Into<String>, V: Into<FieldValue>>(
        field: S,
        comparison: Comparison,
        value: V,
    ) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: value.into(),
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.field, self.comparison, self.value)
    }
}

/// A rule tying fields of one block to each other, checked on validation.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldRule {
    /// `fields` must have a value whenever the condition holds
    RequiredWhen {
        condition: Condition,
        fields: Vec<String>,
    },
    /// `fields` must not be written whenever the condition holds
    ForbiddenWhen {
        condition: Condition,
        fields: Vec<String>,
    },
    /// Each list field holds `max(count + increment, min_length)` items,
    /// where `count` is the integer value of `count_field`.
    ListLength {
        fields: Vec<String>,
        count_field: String,
        increment: i64,
        min_length: usize,
        /// Whether the lists must be written once the count is positive
        required: bool,
    },
}

impl FieldRule {
    /// A list-length rule with no increment, no minimum and optional lists.
    pub fn list_length(fields: &[&str], count_field: &str) -> Self {
        FieldRule::ListLength {
            fields: to_strings(fields),
            count_field: count_field.to_string(),
            increment: 0,
            min_length: 0,
            required: false,
        }
    }
}

fn to_strings(fields: &[&str]) -> Vec<String> {
    fields.iter().map(|f| f.to_string()).collect()
}

/// Whether a block of this schema carries trailing table rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableRule {
    Forbidden,
    #[default]
    Optional,
    Required,
}

/// Concrete schema of one block type, or of one variant of it.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    type_name: String,
    discriminator: Option<(String, String)>,
    fields: LinkedHashMap<String, FieldSpec>,
    paired: Vec<(String, String)>,
    rules: Vec<FieldRule>,
    table: TableRule,
}

impl Schema {
    /// Create an empty schema for blocks with the given header.
    pub fn new<S: Into<String>>(type_name: S) -> Self {
        Self {
            type_name: type_name.into(),
            discriminator: None,
            fields: LinkedHashMap::new(),
            paired: Vec::new(),
            rules: Vec::new(),
            table: TableRule::default(),
        }
    }

    /// Declare a field. Declaration order is the order new values are written in.
    pub fn field<S: Into<String>>(mut self, name: S, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Declare two repeatable fields whose Nth occurrences belong together.
    pub fn paired<S: Into<String>>(mut self, first: S, second: S) -> Self {
        self.paired.push((first.into(), second.into()));
        self
    }

    /// Require `fields` whenever `field` equals `value`.
    pub fn required_when<V: Into<FieldValue>>(
        self,
        field: &str,
        value: V,
        fields: &[&str],
    ) -> Self {
        self.with_rule(FieldRule::RequiredWhen {
            condition: Condition::new(field, Comparison::Equal, value),
            fields: to_strings(fields),
        })
    }

    /// Forbid `fields` whenever `field` equals `value`.
    pub fn forbidden_when<V: Into<FieldValue>>(
        self,
        field: &str,
        value: V,
        fields: &[&str],
    ) -> Self {
        self.with_rule(FieldRule::ForbiddenWhen {
            condition: Condition::new(field, Comparison::Equal, value),
            fields: to_strings(fields),
        })
    }

    /// Tie the number of items of list `fields` to the value of `count_field`.
    pub fn list_length(self, fields: &[&str], count_field: &str) -> Self {
        self.with_rule(FieldRule::list_length(fields, count_field))
    }

    pub fn with_rule(mut self, rule: FieldRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn with_table(mut self, rule: TableRule) -> Self {
        self.table = rule;
        self
    }

    pub(crate) fn set_discriminator(&mut self, field: &str, value: &str) {
        self.discriminator = Some((field.to_string(), value.to_string()));
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The discriminator field and the value selecting this schema.
    pub fn discriminator(&self) -> Option<(&str, &str)> {
        self.discriminator
            .as_ref()
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    pub fn variant(&self) -> Option<&str> {
        self.discriminator().map(|(_, value)| value)
    }

    /// Look up a field case-insensitively, returning its declared name.
    pub fn field_spec(&self, key: &str) -> Option<(&str, &FieldSpec)> {
        self.fields
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(name, spec)| (name.as_str(), spec))
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.paired
    }

    /// The partner of a paired field, if any.
    pub(crate) fn partner(&self, field: &str) -> Option<&str> {
        self.paired.iter().find_map(|(a, b)| {
            if a.eq_ignore_ascii_case(field) {
                Some(b.as_str())
            } else if b.eq_ignore_ascii_case(field) {
                Some(a.as_str())
            } else {
                None
            }
        })
    }

    pub fn rules(&self) -> &[FieldRule] {
        &self.rules
    }

    pub fn table_rule(&self) -> TableRule {
        self.table
    }
}
