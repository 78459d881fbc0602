// hydroini/src/schema/record.rs

//! Typed records: the unit an application holds, edits and writes back.
//!
//! Besides typed field values a record remembers everything needed to write
//! an unmodified block back unchanged: the written key spelling, the raw
//! value text, inline comments, comment lines, keys the schema does not know
//! about and the order all of these appeared in.

use super::spec::{Condition, FieldRule, FieldSpec, Schema, TableRule};
use super::table::DataTable;
use crate::document::{comment_text, to_comment, BlockComment, Entry};
use crate::error::{IniError, Result};
use crate::field_types::parsing::normalize;
use crate::field_types::{format_float_list, FieldValue};
use linked_hash_map::LinkedHashMap;
use std::sync::Arc;

/// Where a field value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueOrigin {
    /// Read from a block
    Parsed,
    /// Substituted from the schema default; not written unless asked for
    Default,
    /// Set programmatically
    Assigned,
}

/// A field value together with its written form.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: FieldValue,
    pub comment: Option<String>,
    key: String,
    source: Option<String>,
    origin: ValueOrigin,
}

impl TypedValue {
    pub(crate) fn parsed(key: &str, raw: &str, value: FieldValue, comment: Option<String>) -> Self {
        Self {
            value,
            comment,
            key: key.to_string(),
            source: Some(raw.to_string()),
            origin: ValueOrigin::Parsed,
        }
    }

    pub(crate) fn defaulted(key: &str, value: FieldValue) -> Self {
        Self {
            value,
            comment: None,
            key: key.to_string(),
            source: None,
            origin: ValueOrigin::Default,
        }
    }

    pub(crate) fn assigned(key: &str, value: FieldValue, comment: Option<String>) -> Self {
        Self {
            value,
            comment,
            key: key.to_string(),
            source: None,
            origin: ValueOrigin::Assigned,
        }
    }

    pub fn origin(&self) -> ValueOrigin {
        self.origin
    }

    /// Key as written in the file.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw text the value was parsed from.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Text written after `key =`; parsed values keep their source text.
    pub fn raw_text(&self) -> String {
        self.written(None)
    }

    /// Entry for this value; float lists use the field's delimiter.
    pub(crate) fn to_entry(&self, spec: Option<&FieldSpec>) -> Entry {
        Entry {
            key: self.key.clone(),
            value: self.written(spec.and_then(|s| s.list_delimiter)),
            comment: self.comment.clone(),
        }
    }

    fn written(&self, delimiter: Option<char>) -> String {
        match (&self.origin, &self.source, &self.value) {
            (ValueOrigin::Parsed, Some(source), _) => source.clone(),
            (_, _, FieldValue::FloatList(values)) => format_float_list(values, delimiter),
            (_, _, value) => value.to_raw_string(),
        }
    }
}

/// Position of one written entry: the Nth value of a field, or an extra.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    Field { name: String, index: usize },
    Extra(usize),
}

/// A block interpreted against its schema.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedRecord {
    pub(super) schema: Arc<Schema>,
    pub(super) header: String,
    /// Values per declared field, in declaration order
    pub(super) values: LinkedHashMap<String, Vec<TypedValue>>,
    pub(super) extras: Vec<Entry>,
    pub(super) layout: Vec<Slot>,
    pub(super) comments: Vec<BlockComment>,
    pub(super) table: Option<DataTable>,
}

impl TypedRecord {
    /// Create a record holding only schema defaults and, for a variant
    /// schema, its discriminator value.
    pub fn new(schema: Arc<Schema>) -> Self {
        let header = schema.type_name().to_string();
        let mut record = Self::empty(schema, &header);
        record.apply_defaults();
        if let Some((field, value)) = record.schema.discriminator() {
            let field = field.to_string();
            let value = FieldValue::Text(value.to_string());
            if let Some(values) = record.values.get_mut(&field) {
                *values = vec![TypedValue::assigned(&field, value, None)];
            }
        }
        record
    }

    pub(super) fn empty(schema: Arc<Schema>, header: &str) -> Self {
        let values = schema
            .fields()
            .map(|(name, _)| (name.to_string(), Vec::new()))
            .collect();
        Self {
            schema,
            header: header.to_string(),
            values,
            extras: Vec::new(),
            layout: Vec::new(),
            comments: Vec::new(),
            table: None,
        }
    }

    /// Substitute defaults for absent fields.
    pub(super) fn apply_defaults(&mut self) {
        let schema = Arc::clone(&self.schema);
        for (name, spec) in schema.fields() {
            if let (Some(values), Some(default)) = (self.values.get_mut(name), &spec.default) {
                if values.is_empty() {
                    values.push(TypedValue::defaulted(name, default.clone()));
                }
            }
        }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Header as written in the file.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn type_name(&self) -> &str {
        self.schema.type_name()
    }

    /// Discriminator value of the schema this record was built with.
    pub fn variant(&self) -> Option<&str> {
        self.schema.variant()
    }

    /// All values of a field with their written form.
    pub fn values(&self, field: &str) -> &[TypedValue] {
        self.schema
            .field_spec(field)
            .and_then(|(name, _)| self.values.get(name))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// First value of a field, defaults included.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.values(field).first().map(|v| &v.value)
    }

    /// Every value of a repeatable field, in file order.
    pub fn get_all(&self, field: &str) -> Vec<&FieldValue> {
        self.values(field).iter().map(|v| &v.value).collect()
    }

    pub fn get_f64(&self, field: &str) -> Option<f64> {
        self.get(field).and_then(FieldValue::as_f64)
    }

    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_str)
    }

    /// Whether the field was written or assigned, as opposed to defaulted.
    pub fn is_present(&self, field: &str) -> bool {
        self.values(field)
            .iter()
            .any(|v| v.origin != ValueOrigin::Default)
    }

    /// Values of two paired fields, matched by position.
    pub fn pairs(&self, first: &str, second: &str) -> Vec<(&FieldValue, &FieldValue)> {
        self.values(first)
            .iter()
            .zip(self.values(second))
            .map(|(a, b)| (&a.value, &b.value))
            .collect()
    }

    /// Replace a field's value(s) by a single value.
    ///
    /// Setting a value equal to the current one keeps its written form; in
    /// particular setting a field to its default leaves it unwritten.
    pub fn set<V: Into<FieldValue>>(&mut self, field: &str, value: V) -> Result<()> {
        self.set_all(field, vec![value.into()])
    }

    /// Replace all values of a field. Written keys and comments are kept by
    /// position.
    pub fn set_all<V: Into<FieldValue>>(&mut self, field: &str, values: Vec<V>) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (name, spec) = self.lookup(&schema, field)?;
        if !spec.repeatable && values.len() > 1 {
            return Err(self.duplicate_field(name, values.len()));
        }
        let values = values
            .into_iter()
            .map(|v| self.check(name, spec, v.into()))
            .collect::<Result<Vec<_>>>()?;
        self.guard_discriminator(name, &values)?;

        let current = self.values.get(name).map(Vec::as_slice).unwrap_or(&[]);
        let unchanged = current.len() == values.len()
            && current
                .iter()
                .zip(&values)
                .all(|(old, new)| old.value == *new);
        if unchanged {
            return Ok(());
        }

        let replaced: Vec<TypedValue> = values
            .into_iter()
            .enumerate()
            .map(|(i, value)| match current.get(i) {
                Some(old) if old.origin != ValueOrigin::Default => {
                    TypedValue::assigned(&old.key, value, old.comment.clone())
                }
                _ => TypedValue::assigned(name, value, None),
            })
            .collect();
        let emptied = replaced.is_empty();
        if let Some(slot) = self.values.get_mut(name) {
            *slot = replaced;
        }
        if emptied {
            self.apply_defaults();
        }
        Ok(())
    }

    /// Append a value to a repeatable field.
    ///
    /// For a non-repeatable field this only succeeds when the field holds no
    /// value or only its default.
    pub fn push<V: Into<FieldValue>>(&mut self, field: &str, value: V) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (name, spec) = self.lookup(&schema, field)?;
        let value = self.check(name, spec, value.into())?;
        self.guard_discriminator(name, std::slice::from_ref(&value))?;
        let present = self
            .values(name)
            .iter()
            .filter(|v| v.origin != ValueOrigin::Default)
            .count();
        if !spec.repeatable && present > 0 {
            return Err(self.duplicate_field(name, present + 1));
        }

        if let Some(values) = self.values.get_mut(name) {
            values.retain(|v| v.origin != ValueOrigin::Default);
            values.push(TypedValue::assigned(name, value, None));
        }
        Ok(())
    }

    /// Remove every value of a field, returning the removed values. A field
    /// with a default falls back to it.
    pub fn remove(&mut self, field: &str) -> Result<Vec<FieldValue>> {
        let schema = Arc::clone(&self.schema);
        let (name, _) = self.lookup(&schema, field)?;
        self.guard_discriminator(name, &[])?;
        let removed = self
            .values
            .get_mut(name)
            .map(std::mem::take)
            .unwrap_or_default();
        self.apply_defaults();
        Ok(removed
            .into_iter()
            .filter(|v| v.origin != ValueOrigin::Default)
            .map(|v| v.value)
            .collect())
    }

    /// Inline comment text of a field's first value, without its `#`.
    pub fn comment(&self, field: &str) -> Option<&str> {
        self.values(field)
            .first()
            .and_then(|v| v.comment.as_deref())
            .map(comment_text)
    }

    /// Set or clear the inline comment of a field's first value. A defaulted
    /// value with a comment is written out. Text without a leading `#` gets
    /// one.
    pub fn set_comment<S: Into<String>>(&mut self, field: &str, comment: Option<S>) -> Result<()> {
        let schema = Arc::clone(&self.schema);
        let (name, _) = self.lookup(&schema, field)?;
        let header = self.header.clone();
        let variant = self.variant().map(str::to_string);
        let first = self
            .values
            .get_mut(name)
            .and_then(|values| values.first_mut());
        match first {
            Some(value) => {
                if value.origin == ValueOrigin::Default {
                    value.origin = ValueOrigin::Assigned;
                }
                value.comment = comment.map(to_comment);
                Ok(())
            }
            None => Err(IniError::missing_field(name.to_string(), header, variant)),
        }
    }

    /// Entries whose keys the schema does not declare.
    pub fn extras(&self) -> &[Entry] {
        &self.extras
    }

    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras
            .iter()
            .find(|e| e.is_key(key))
            .map(|e| e.value.as_str())
    }

    /// Append an undeclared entry; it is written after the existing entries.
    pub fn push_extra(&mut self, entry: Entry) {
        self.layout.push(Slot::Extra(self.extras.len()));
        self.extras.push(entry);
    }

    /// Comment-only lines of the block.
    pub fn comments(&self) -> &[BlockComment] {
        &self.comments
    }

    pub fn table(&self) -> Option<&DataTable> {
        self.table.as_ref()
    }

    pub fn table_mut(&mut self) -> Option<&mut DataTable> {
        self.table.as_mut()
    }

    pub fn set_table(&mut self, table: Option<DataTable>) {
        self.table = table;
    }

    /// Check the record against its schema: required fields, repetition,
    /// pairing, field rules and the table rule.
    pub fn validate(&self) -> Result<()> {
        for (name, spec) in self.schema.fields() {
            let count = self.values.get(name).map_or(0, Vec::len);
            if !spec.repeatable && count > 1 {
                return Err(self.duplicate_field(name, count));
            }
            if (count == 0 && spec.required) || count < spec.min_count {
                return Err(IniError::missing_field(
                    name.to_string(),
                    self.header.clone(),
                    self.variant().map(str::to_string),
                ));
            }
        }

        for (first, second) in self.schema.pairs() {
            let first_count = self.values(first).len();
            let second_count = self.values(second).len();
            if first_count != second_count {
                return Err(IniError::PairingMismatch {
                    first: first.clone(),
                    first_count,
                    second: second.clone(),
                    second_count,
                    block: self.header.clone(),
                    block_index: None,
                });
            }
        }

        for rule in self.schema.rules() {
            self.check_rule(rule)?;
        }

        let has_rows = self.table.as_ref().map_or(false, |t| !t.is_empty());
        let problem = match (self.schema.table_rule(), has_rows) {
            (TableRule::Forbidden, true) => Some("table rows are not allowed"),
            (TableRule::Required, false) => Some("table rows are required"),
            _ => None,
        };
        match problem {
            Some(message) => Err(IniError::InvalidTable {
                message: message.to_string(),
                block: self.header.clone(),
                variant: self.variant().map(str::to_string),
                block_index: None,
            }),
            None => Ok(()),
        }
    }

    fn check_rule(&self, rule: &FieldRule) -> Result<()> {
        match rule {
            FieldRule::RequiredWhen { condition, fields } if self.holds(condition) => {
                match fields.iter().find(|f| self.values(f).is_empty()) {
                    Some(field) => Err(IniError::missing_field(
                        field.clone(),
                        self.header.clone(),
                        self.variant().map(str::to_string),
                    )),
                    None => Ok(()),
                }
            }
            FieldRule::ForbiddenWhen { condition, fields } if self.holds(condition) => {
                match fields.iter().find(|f| self.is_present(f)) {
                    Some(field) => {
                        Err(self.invalid_field(field, format!("not allowed when {}", condition)))
                    }
                    None => Ok(()),
                }
            }
            FieldRule::ListLength {
                fields,
                count_field,
                increment,
                min_length,
                required,
            } => {
                let count = match self.get(count_field).and_then(FieldValue::as_i64) {
                    Some(count) => count,
                    None => return Ok(()),
                };
                let expected = usize::try_from(count + increment)
                    .unwrap_or(0)
                    .max(*min_length);
                for field in fields {
                    if !self.is_present(field) {
                        if *required && expected > 0 {
                            return Err(IniError::missing_field(
                                field.clone(),
                                self.header.clone(),
                                self.variant().map(str::to_string),
                            ));
                        }
                        continue;
                    }
                    let length = self.list_length(field);
                    if length != expected {
                        return Err(self.invalid_field(
                            field,
                            format!(
                                "{} items given, {} expected from {} = {}",
                                length, expected, count_field, count
                            ),
                        ));
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn holds(&self, condition: &Condition) -> bool {
        self.get(&condition.field)
            .map_or(false, |value| condition.comparison.holds(value, &condition.value))
    }

    /// Number of items a list field holds over all of its values.
    fn list_length(&self, field: &str) -> usize {
        self.values(field)
            .iter()
            .map(|v| match &v.value {
                FieldValue::FloatList(values) => values.len(),
                _ => 1,
            })
            .sum()
    }

    /// The discriminator only accepts the variant its schema was chosen for.
    fn guard_discriminator(&self, name: &str, values: &[FieldValue]) -> Result<()> {
        let (field, variant) = match self.schema.discriminator() {
            Some(discriminator) => discriminator,
            None => return Ok(()),
        };
        if !field.eq_ignore_ascii_case(name) {
            return Ok(());
        }
        match values {
            [FieldValue::Text(value)] if value.trim().eq_ignore_ascii_case(variant) => Ok(()),
            _ => Err(IniError::UnknownVariant {
                type_name: self.type_name().to_string(),
                field: field.to_string(),
                value: values
                    .iter()
                    .map(FieldValue::to_raw_string)
                    .collect::<Vec<_>>()
                    .join(", "),
                block_index: None,
            }),
        }
    }

    fn invalid_field(&self, field: &str, message: String) -> IniError {
        IniError::InvalidField {
            field: field.to_string(),
            message,
            block: self.header.clone(),
            variant: self.variant().map(str::to_string),
            block_index: None,
        }
    }

    fn lookup<'s>(&self, schema: &'s Schema, field: &str) -> Result<(&'s str, &'s FieldSpec)> {
        schema.field_spec(field).ok_or_else(|| IniError::UnknownField {
            field: field.to_string(),
            block: self.header.clone(),
            variant: self.variant().map(str::to_string),
        })
    }

    fn check(&self, name: &str, spec: &FieldSpec, value: FieldValue) -> Result<FieldValue> {
        let raw = value.to_raw_string();
        normalize(value, &spec.expected_type).ok_or_else(|| {
            IniError::type_coercion(name.to_string(), raw, spec.expected_type.name())
                .in_block(&self.header, self.variant())
        })
    }

    fn duplicate_field(&self, name: &str, count: usize) -> IniError {
        IniError::DuplicateField {
            field: name.to_string(),
            count,
            block: self.header.clone(),
            variant: self.variant().map(str::to_string),
            block_index: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field_types::FieldType;
    use crate::schema::FieldSpec;

    fn schema() -> Arc<Schema> {
        let mut schema = Schema::new("Forcing")
            .field("name", FieldSpec::required(FieldType::Text))
            .field("function", FieldSpec::required(FieldType::Text))
            .field(
                "timeInterpolation",
                FieldSpec::required(FieldType::choice(&["linear", "blockFrom", "blockTo"])),
            )
            .field("factor", FieldSpec::optional(FieldType::Float).with_default(1.0))
            .field("quantity", FieldSpec::required(FieldType::Text).repeatable().min_count(1))
            .field("unit", FieldSpec::required(FieldType::Text).repeatable().min_count(1))
            .paired("quantity", "unit");
        schema.set_discriminator("function", "timeseries");
        Arc::new(schema)
    }

    #[test]
    fn test_new_record_has_defaults_and_discriminator() {
        let record = TypedRecord::new(schema());
        assert_eq!(record.header(), "Forcing");
        assert_eq!(record.get_str("function"), Some("timeseries"));
        assert_eq!(record.get_f64("factor"), Some(1.0));
        assert!(!record.is_present("factor"));
        assert!(record.is_present("function"));
        assert!(record.get("name").is_none());
    }

    #[test]
    fn test_set_checks_type_and_canonicalises_choice() {
        let mut record = TypedRecord::new(schema());
        record.set("timeInterpolation", "BLOCKTO").unwrap();
        assert_eq!(record.get_str("timeinterpolation"), Some("blockTo"));

        let err = record.set("factor", "big").unwrap_err();
        assert_eq!(err.category(), "coercion");
        assert_eq!(err.context().variant.as_deref(), Some("timeseries"));

        record.set("factor", 2).unwrap();
        assert_eq!(record.get("factor"), Some(&FieldValue::Float(2.0)));
        assert_eq!(record.set("offset", 1.0).unwrap_err().category(), "unknown_field");
    }

    #[test]
    fn test_push_and_pairs() {
        let mut record = TypedRecord::new(schema());
        record.push("quantity", "time").unwrap();
        record.push("unit", "minutes since 2015-01-01 00:00:00").unwrap();
        record.push("quantity", "dischargebnd").unwrap();
        record.push("unit", "m3/s").unwrap();

        let pairs: Vec<_> = record
            .pairs("quantity", "unit")
            .into_iter()
            .map(|(q, u)| (q.to_string(), u.to_string()))
            .collect();
        assert_eq!(pairs[1], ("dischargebnd".to_string(), "m3/s".to_string()));

        record.set("name", "left").unwrap();
        assert_eq!(record.push("name", "right").unwrap_err().category(), "duplicate");
        assert_eq!(
            record.set_all("name", vec!["a", "b"]).unwrap_err().category(),
            "duplicate"
        );
    }

    #[test]
    fn test_remove_falls_back_to_default() {
        let mut record = TypedRecord::new(schema());
        record.set("factor", 3.0).unwrap();
        assert_eq!(record.remove("factor").unwrap(), vec![FieldValue::Float(3.0)]);
        assert_eq!(record.get_f64("factor"), Some(1.0));
        assert!(!record.is_present("factor"));
        assert!(record.remove("name").unwrap().is_empty());
    }

    #[test]
    fn test_comments() {
        let mut record = TypedRecord::new(schema());
        assert!(record.set_comment("name", Some("x")).is_err());
        record.set_comment("factor", Some("scale")).unwrap();
        assert_eq!(record.comment("factor"), Some("scale"));
        assert_eq!(record.values("factor")[0].comment.as_deref(), Some("# scale"));
        assert!(record.is_present("factor"));

        record.set_comment("factor", Some("##kept")).unwrap();
        assert_eq!(record.values("factor")[0].comment.as_deref(), Some("##kept"));
        assert_eq!(record.comment("factor"), Some("#kept"));
    }

    #[test]
    fn test_discriminator_cannot_change_variant() {
        let mut record = TypedRecord::new(schema());

        let err = record.set("function", "harmonic").unwrap_err();
        assert_eq!(err.category(), "unknown_variant");
        assert_eq!(err.context().variant.as_deref(), Some("harmonic"));
        assert_eq!(record.remove("function").unwrap_err().category(), "unknown_variant");
        assert_eq!(
            record.set_all::<&str>("function", vec![]).unwrap_err().category(),
            "unknown_variant"
        );
        assert_eq!(record.get_str("function"), Some("timeseries"));

        record.set("function", "TimeSeries").unwrap();
        assert_eq!(record.get_str("function"), Some("TimeSeries"));
    }

    #[test]
    fn test_discriminator_push_needs_matching_variant() {
        let mut schema = Schema::new("Lateral")
            .field("type", FieldSpec::optional(FieldType::Text))
            .field("name", FieldSpec::optional(FieldType::Text));
        schema.set_discriminator("type", "discharge");
        let mut record = TypedRecord::empty(Arc::new(schema), "Lateral");

        assert_eq!(record.push("type", "salinity").unwrap_err().category(), "unknown_variant");
        record.push("type", "discharge").unwrap();
        assert_eq!(record.get_str("type"), Some("discharge"));
    }

    fn meteo() -> Arc<Schema> {
        Arc::new(
            Schema::new("Meteo")
                .field("interpolationMethod", FieldSpec::optional(FieldType::Text))
                .field("averagingType", FieldSpec::optional(FieldType::Integer))
                .field("extrapolationAllowed", FieldSpec::optional(FieldType::Bool))
                .field("numCoordinates", FieldSpec::optional(FieldType::Integer))
                .field(
                    "xCoordinates",
                    FieldSpec::optional(FieldType::FloatList).delimited_by(','),
                )
                .field("yCoordinates", FieldSpec::optional(FieldType::FloatList))
                .required_when("interpolationMethod", "averaging", &["averagingType"])
                .forbidden_when("interpolationMethod", "linear", &["extrapolationAllowed"])
                .with_rule(FieldRule::ListLength {
                    fields: vec!["xCoordinates".to_string(), "yCoordinates".to_string()],
                    count_field: "numCoordinates".to_string(),
                    increment: 0,
                    min_length: 0,
                    required: true,
                }),
        )
    }

    #[test]
    fn test_required_and_forbidden_when() {
        let mut record = TypedRecord::new(meteo());
        assert!(record.validate().is_ok());

        record.set("interpolationMethod", "Averaging").unwrap();
        let err = record.validate().unwrap_err();
        assert_eq!(err.category(), "missing");
        assert_eq!(err.context().field.as_deref(), Some("averagingType"));
        record.set("averagingType", 1).unwrap();
        assert!(record.validate().is_ok());

        record.set("extrapolationAllowed", true).unwrap();
        assert!(record.validate().is_ok());
        record.set("interpolationMethod", "linear").unwrap();
        let err = record.validate().unwrap_err();
        assert_eq!(err.category(), "invalid");
        assert!(err.to_string().contains("interpolationMethod == linear"));
    }

    #[test]
    fn test_list_length_follows_count_field() {
        let mut record = TypedRecord::new(meteo());
        record.set("numCoordinates", 3).unwrap();
        let err = record.validate().unwrap_err();
        assert_eq!(err.category(), "missing");
        assert_eq!(err.context().field.as_deref(), Some("xCoordinates"));

        record.set("xCoordinates", vec![0.0, 1.0, 2.0]).unwrap();
        record.set("yCoordinates", vec![5.0, 6.0]).unwrap();
        let err = record.validate().unwrap_err();
        assert_eq!(err.category(), "invalid");
        assert!(err.to_string().contains("2 items given, 3 expected"));

        record.set("yCoordinates", vec![5.0, 6.0, 7.0]).unwrap();
        assert!(record.validate().is_ok());

        record.set("numCoordinates", 0).unwrap();
        record.remove("xCoordinates").unwrap();
        record.remove("yCoordinates").unwrap();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_list_length_increment_and_minimum() {
        let schema = Schema::new("Polygon")
            .field("numPoints", FieldSpec::optional(FieldType::Integer))
            .field("levels", FieldSpec::optional(FieldType::FloatList))
            .with_rule(FieldRule::ListLength {
                fields: vec!["levels".to_string()],
                count_field: "numPoints".to_string(),
                increment: 1,
                min_length: 3,
                required: false,
            });
        let mut record = TypedRecord::new(Arc::new(schema));
        record.set("numPoints", 1).unwrap();
        assert!(record.validate().is_ok());
        record.set("levels", vec![1.0, 2.0]).unwrap();
        assert_eq!(record.validate().unwrap_err().category(), "invalid");
        record.set("levels", vec![1.0, 2.0, 3.0]).unwrap();
        assert!(record.validate().is_ok());
        record.set("numPoints", 3).unwrap();
        assert_eq!(record.validate().unwrap_err().category(), "invalid");
    }

    #[test]
    fn test_entry_uses_field_delimiter() {
        let schema = meteo();
        let mut record = TypedRecord::new(Arc::clone(&schema));
        record.set("xCoordinates", vec![0.0, 1.5]).unwrap();
        record.set("yCoordinates", vec![0.0, 1.5]).unwrap();
        let (_, x_spec) = schema.field_spec("xCoordinates").unwrap();
        let (_, y_spec) = schema.field_spec("yCoordinates").unwrap();
        assert_eq!(record.values("xCoordinates")[0].to_entry(Some(x_spec)).value, "0.0, 1.5");
        assert_eq!(record.values("yCoordinates")[0].to_entry(Some(y_spec)).value, "0.0 1.5");
    }

    #[test]
    fn test_validate() {
        let mut record = TypedRecord::new(schema());
        assert_eq!(record.validate().unwrap_err().category(), "missing");

        record.set("name", "left").unwrap();
        record.set("timeInterpolation", "linear").unwrap();
        record.push("quantity", "time").unwrap();
        record.push("unit", "minutes").unwrap();
        record.push("quantity", "dischargebnd").unwrap();
        assert_eq!(record.validate().unwrap_err().category(), "pairing");

        record.push("unit", "m3/s").unwrap();
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_extras() {
        let mut record = TypedRecord::new(schema());
        record.push_extra(Entry::new("comment", "operator note"));
        assert_eq!(record.extra("COMMENT"), Some("operator note"));
        assert_eq!(record.extras().len(), 1);
    }
}
