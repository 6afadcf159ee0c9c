//! Live objects as seen by the index
//!
//! A `Record` is one row of a live object table: a primary key, stored
//! field values, computed accessors and relations to other records.
//! Relations cover single related objects, one-to-many collections and
//! deferred callables that produce the related value on demand.

use crate::error::{Error, Result};
use crate::types::PrimaryKey;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Computed field: called with the owning record, may fail
pub type Accessor = Arc<dyn Fn(&Record) -> Result<FieldValue> + Send + Sync>;

/// Deferred relation: produces the related value on demand, may fail
pub type RelationFn = Arc<dyn Fn() -> Result<Relation> + Send + Sync>;

// ============================================================================
// FieldValue
// ============================================================================

/// Value of a single field
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FieldValue {
    /// Missing / SQL NULL
    #[default]
    Null,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point
    Float(f64),
    /// Text
    Text(String),
    /// Sequence of values
    List(Vec<FieldValue>),
    /// Mapping of values (ordered by key)
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    /// True for `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Borrow the text of a `Text` value
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Coerce to searchable text
    ///
    /// Strings pass through, sequences join with `", "`, mappings join their
    /// values with `", "`, other scalars are stringified and `Null` is empty.
    pub fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            FieldValue::Bool(b) => b.to_string(),
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.clone(),
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_text)
                .collect::<Vec<_>>()
                .join(", "),
            FieldValue::Map(map) => map
                .values()
                .map(FieldValue::to_text)
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Compare two scalar values
    ///
    /// Integers and floats compare numerically with each other. `Null`
    /// sorts before everything. Returns `None` for incomparable kinds.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        use FieldValue::*;
        match (self, other) {
            (Null, Null) => Some(Ordering::Equal),
            (Null, _) => Some(Ordering::Less),
            (_, Null) => Some(Ordering::Greater),
            (Bool(a), Bool(b)) => Some(a.cmp(b)),
            (Int(a), Int(b)) => Some(a.cmp(b)),
            (Float(a), Float(b)) => a.partial_cmp(b),
            (Int(a), Float(b)) => (*a as f64).partial_cmp(b),
            (Float(a), Int(b)) => a.partial_cmp(&(*b as f64)),
            (Text(a), Text(b)) => Some(a.cmp(b)),
            (List(a), List(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.compare(y)? {
                        Ordering::Equal => continue,
                        other => return Some(other),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Text(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Text(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Int(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

impl From<PrimaryKey> for FieldValue {
    fn from(pk: PrimaryKey) -> Self {
        match pk {
            PrimaryKey::Int(i) => FieldValue::Int(i),
            PrimaryKey::Text(s) => FieldValue::Text(s),
        }
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(v: Vec<T>) -> Self {
        FieldValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

impl From<serde_json::Value> for FieldValue {
    fn from(v: serde_json::Value) -> Self {
        use serde_json::Value as J;
        match v {
            J::Null => FieldValue::Null,
            J::Bool(b) => FieldValue::Bool(b),
            J::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Int(i),
                None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            J::String(s) => FieldValue::Text(s),
            J::Array(items) => FieldValue::List(items.into_iter().map(Into::into).collect()),
            J::Object(map) => {
                FieldValue::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

// ============================================================================
// Relation
// ============================================================================

/// Related value of a record
#[derive(Clone)]
pub enum Relation {
    /// Related value is absent (NULL foreign key)
    Empty,
    /// A single related object
    One(Box<Record>),
    /// A one-to-many collection
    Many(Vec<Record>),
    /// A callable returning the related value
    Deferred(RelationFn),
}

impl Relation {
    /// Wrap a callable producing the related value
    pub fn deferred<F>(f: F) -> Self
    where
        F: Fn() -> Result<Relation> + Send + Sync + 'static,
    {
        Relation::Deferred(Arc::new(f))
    }

    /// Resolve to the list of related records
    ///
    /// Deferred relations are called (and chased) until a concrete value
    /// is produced.
    pub fn resolve(&self) -> Result<Vec<Record>> {
        match self {
            Relation::Empty => Ok(Vec::new()),
            Relation::One(record) => Ok(vec![record.as_ref().clone()]),
            Relation::Many(records) => Ok(records.clone()),
            Relation::Deferred(f) => f()?.resolve(),
        }
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relation::Empty => f.write_str("Empty"),
            Relation::One(r) => f.debug_tuple("One").field(r).finish(),
            Relation::Many(rs) => f.debug_tuple("Many").field(rs).finish(),
            Relation::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

impl From<Record> for Relation {
    fn from(record: Record) -> Self {
        Relation::One(Box::new(record))
    }
}

impl From<Vec<Record>> for Relation {
    fn from(records: Vec<Record>) -> Self {
        Relation::Many(records)
    }
}

impl From<Option<Record>> for Relation {
    fn from(record: Option<Record>) -> Self {
        record.map(Relation::from).unwrap_or(Relation::Empty)
    }
}

// ============================================================================
// Record
// ============================================================================

/// One live object
#[derive(Clone)]
pub struct Record {
    pk: PrimaryKey,
    title: Option<String>,
    values: BTreeMap<String, FieldValue>,
    accessors: BTreeMap<String, Accessor>,
    relations: BTreeMap<String, Relation>,
}

impl Record {
    /// Create an empty record with the given primary key
    pub fn new(pk: impl Into<PrimaryKey>) -> Self {
        Record {
            pk: pk.into(),
            title: None,
            values: BTreeMap::new(),
            accessors: BTreeMap::new(),
            relations: BTreeMap::new(),
        }
    }

    /// Builder: set the display title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Builder: set a stored field value
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Builder: set a computed field
    pub fn with_accessor<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Record) -> Result<FieldValue> + Send + Sync + 'static,
    {
        self.accessors.insert(name.into(), Arc::new(f));
        self
    }

    /// Builder: set a relation
    pub fn with_related(mut self, name: impl Into<String>, relation: impl Into<Relation>) -> Self {
        self.relations.insert(name.into(), relation.into());
        self
    }

    /// Overwrite a stored field value
    pub fn set_value(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(name.into(), value.into());
    }

    /// Primary key
    pub fn pk(&self) -> &PrimaryKey {
        &self.pk
    }

    /// Display title, if any
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Resolve a field value
    ///
    /// `pk` resolves to the primary key. Stored values win over accessors.
    ///
    /// # Errors
    ///
    /// `MissingField` if the record has neither a value nor an accessor
    /// named `name`; accessor failures are propagated.
    pub fn value(&self, name: &str) -> Result<FieldValue> {
        if name == "pk" {
            return Ok(self.pk.clone().into());
        }
        if let Some(value) = self.values.get(name) {
            return Ok(value.clone());
        }
        match self.accessors.get(name) {
            Some(accessor) => accessor(self),
            None => Err(Error::MissingField(name.to_string())),
        }
    }

    /// Relation by name, `None` if the record has none
    pub fn relation(&self, name: &str) -> Option<&Relation> {
        self.relations.get(name)
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("pk", &self.pk)
            .field("title", &self.title)
            .field("values", &self.values)
            .field("accessors", &self.accessors.keys().collect::<Vec<_>>())
            .field("relations", &self.relations)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_text_scalars() {
        assert_eq!(FieldValue::from("hello").to_text(), "hello");
        assert_eq!(FieldValue::Int(3).to_text(), "3");
        assert_eq!(FieldValue::Bool(true).to_text(), "true");
        assert_eq!(FieldValue::Null.to_text(), "");
    }

    #[test]
    fn test_to_text_joins_sequences_and_maps() {
        let list = FieldValue::from(vec!["red", "green"]);
        assert_eq!(list.to_text(), "red, green");

        let mut map = BTreeMap::new();
        map.insert("a".to_string(), FieldValue::from("alpha"));
        map.insert("b".to_string(), FieldValue::from(vec!["x", "y"]));
        assert_eq!(FieldValue::Map(map).to_text(), "alpha, x, y");
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(
            FieldValue::Int(2).compare(&FieldValue::Float(2.5)),
            Some(Ordering::Less)
        );
        assert_eq!(
            FieldValue::Null.compare(&FieldValue::Int(0)),
            Some(Ordering::Less)
        );
        assert_eq!(FieldValue::from("a").compare(&FieldValue::Int(1)), None);
    }

    #[test]
    fn test_from_json() {
        let v: FieldValue = serde_json::json!({"tags": ["a", "b"], "n": 2}).into();
        assert_eq!(v.to_text(), "2, a, b");
    }

    #[test]
    fn test_record_value_resolution() {
        let record = Record::new(1)
            .with_value("title", "Hello")
            .with_accessor("shout", |r| Ok(r.value("title")?.to_text().to_uppercase().into()));

        assert_eq!(record.value("title").unwrap(), FieldValue::from("Hello"));
        assert_eq!(record.value("shout").unwrap(), FieldValue::from("HELLO"));
        assert_eq!(record.value("pk").unwrap(), FieldValue::Int(1));
        assert!(matches!(
            record.value("nope"),
            Err(Error::MissingField(ref f)) if f == "nope"
        ));
    }

    #[test]
    fn test_relation_resolve() {
        let author = Record::new(7).with_value("name", "Ada");
        assert_eq!(Relation::from(author.clone()).resolve().unwrap().len(), 1);
        assert!(Relation::Empty.resolve().unwrap().is_empty());

        let many = Relation::from(vec![author.clone(), author.clone()]);
        assert_eq!(many.resolve().unwrap().len(), 2);

        let deferred = Relation::deferred(move || Ok(Relation::from(author.clone())));
        let resolved = deferred.resolve().unwrap();
        assert_eq!(resolved[0].pk(), &PrimaryKey::Int(7));
    }

    #[test]
    fn test_deferred_relation_failure_propagates() {
        let failing = Relation::deferred(|| Err(Error::store("lazy load failed")));
        assert!(failing.resolve().is_err());
    }
}
