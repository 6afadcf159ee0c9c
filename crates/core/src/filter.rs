//! Structural filters over live object tables
//!
//! An `ObjectQuery` is the caller's object scope: a model, an optional
//! filter tree and an ordering. It is evaluated by the store to produce the
//! base candidate set of a search.

use crate::error::Result;
use crate::types::ContentType;
use crate::value::{FieldValue, Record};
use std::cmp::Ordering;

/// Comparison applied by a single lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    /// `field = value`
    Exact,
    /// `field < value`
    Lt,
    /// `field <= value`
    Lte,
    /// `field > value`
    Gt,
    /// `field >= value`
    Gte,
    /// `field IN value` (value is a list)
    In,
    /// `field IS NULL` when value is `true`, `IS NOT NULL` when `false`
    IsNull,
    /// Text prefix match
    StartsWith,
    /// Text containment, or list membership
    Contains,
}

/// Filter tree
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Single field lookup
    Lookup {
        /// Field name (`pk` for the primary key)
        field: String,
        /// Comparison
        lookup: Lookup,
        /// Operand
        value: FieldValue,
    },
    /// Conjunction; empty matches everything
    And(Vec<Filter>),
    /// Disjunction; empty matches everything
    Or(Vec<Filter>),
    /// Negation
    Not(Box<Filter>),
}

impl Filter {
    /// Lookup constructor
    pub fn lookup(field: impl Into<String>, lookup: Lookup, value: impl Into<FieldValue>) -> Self {
        Filter::Lookup {
            field: field.into(),
            lookup,
            value: value.into(),
        }
    }

    /// `field = value`
    pub fn eq(field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::lookup(field, Lookup::Exact, value)
    }

    /// Negate this filter
    pub fn negate(self) -> Self {
        Filter::Not(Box::new(self))
    }

    /// Evaluate against a record
    pub fn matches(&self, record: &Record) -> Result<bool> {
        match self {
            Filter::Lookup {
                field,
                lookup,
                value,
            } => {
                let actual = record.value(field)?;
                Ok(apply_lookup(&actual, *lookup, value))
            }
            Filter::And(filters) => {
                for filter in filters {
                    if !filter.matches(record)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Filter::Or(filters) => {
                if filters.is_empty() {
                    return Ok(true);
                }
                for filter in filters {
                    if filter.matches(record)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
            Filter::Not(inner) => Ok(!inner.matches(record)?),
        }
    }

    /// Every field name referenced by this filter
    pub fn fields(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_fields(&mut out);
        out
    }

    fn collect_fields<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Filter::Lookup { field, .. } => out.push(field),
            Filter::And(filters) | Filter::Or(filters) => {
                for filter in filters {
                    filter.collect_fields(out);
                }
            }
            Filter::Not(inner) => inner.collect_fields(out),
        }
    }
}

fn apply_lookup(actual: &FieldValue, lookup: Lookup, operand: &FieldValue) -> bool {
    // SQL semantics: comparisons against NULL are never true
    if actual.is_null() && !matches!(lookup, Lookup::IsNull) {
        return false;
    }
    match lookup {
        Lookup::Exact => actual.compare(operand) == Some(Ordering::Equal),
        Lookup::Lt => actual.compare(operand) == Some(Ordering::Less),
        Lookup::Lte => matches!(
            actual.compare(operand),
            Some(Ordering::Less | Ordering::Equal)
        ),
        Lookup::Gt => actual.compare(operand) == Some(Ordering::Greater),
        Lookup::Gte => matches!(
            actual.compare(operand),
            Some(Ordering::Greater | Ordering::Equal)
        ),
        Lookup::In => match operand {
            FieldValue::List(items) => items
                .iter()
                .any(|item| actual.compare(item) == Some(Ordering::Equal)),
            _ => false,
        },
        Lookup::IsNull => match operand {
            FieldValue::Bool(want_null) => actual.is_null() == *want_null,
            _ => false,
        },
        Lookup::StartsWith => match (actual, operand) {
            (FieldValue::Text(a), FieldValue::Text(p)) => a.starts_with(p.as_str()),
            _ => false,
        },
        Lookup::Contains => match (actual, operand) {
            (FieldValue::Text(a), FieldValue::Text(p)) => a.contains(p.as_str()),
            (FieldValue::List(items), needle) => items
                .iter()
                .any(|item| item.compare(needle) == Some(Ordering::Equal)),
            _ => false,
        },
    }
}

/// One ordering clause
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    /// Field name
    pub field: String,
    /// Descending when true
    pub descending: bool,
}

impl OrderBy {
    /// Ascending order on `field`
    pub fn asc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            descending: false,
        }
    }

    /// Descending order on `field`
    pub fn desc(field: impl Into<String>) -> Self {
        OrderBy {
            field: field.into(),
            descending: true,
        }
    }
}

/// The caller's object scope
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectQuery {
    /// Model whose live table is queried
    pub model: ContentType,
    /// Structural filter, `None` for all rows
    pub filter: Option<Filter>,
    /// Ordering; primary key ascending breaks ties and applies when empty
    pub order_by: Vec<OrderBy>,
}

impl ObjectQuery {
    /// All objects of a model
    pub fn all(model: impl Into<ContentType>) -> Self {
        ObjectQuery {
            model: model.into(),
            filter: None,
            order_by: Vec::new(),
        }
    }

    /// Builder: add a filter (conjoined with any existing one)
    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(match self.filter.take() {
            None => filter,
            Some(Filter::And(mut filters)) => {
                filters.push(filter);
                Filter::And(filters)
            }
            Some(existing) => Filter::And(vec![existing, filter]),
        });
        self
    }

    /// Builder: append an ordering clause
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by.push(order);
        self
    }

    /// Whether a record belongs to the scope
    pub fn matches(&self, record: &Record) -> Result<bool> {
        match &self.filter {
            Some(filter) => filter.matches(record),
            None => Ok(true),
        }
    }

    /// Sort records into scope order
    ///
    /// Ordering fields that a record lacks sort as NULL.
    pub fn sort(&self, records: &mut [Record]) {
        records.sort_by(|a, b| {
            for order in &self.order_by {
                let va = a.value(&order.field).unwrap_or(FieldValue::Null);
                let vb = b.value(&order.field).unwrap_or(FieldValue::Null);
                let ord = va.compare(&vb).unwrap_or(Ordering::Equal);
                let ord = if order.descending { ord.reverse() } else { ord };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            a.pk().cmp(b.pk())
        });
    }

    /// Every field referenced by the filter and the ordering
    pub fn referenced_fields(&self) -> Vec<&str> {
        let mut fields = self.filter.as_ref().map(Filter::fields).unwrap_or_default();
        fields.extend(self.order_by.iter().map(|o| o.field.as_str()));
        fields
    }
}
