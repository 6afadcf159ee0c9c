//! Searchable-field schema and model registry
//!
//! Each indexed record type (model) declares an ordered list of field
//! descriptors. A descriptor is one of:
//! - `Search`: an atomic field extracted as text, optionally boosted
//! - `Filter`: a field usable by structural filters and ordering
//! - `Related`: a related object (or collection) with its own sub-fields
//!
//! Models may declare a parent model. An object of a child model is also an
//! object of every ancestor, and receives one index entry per ancestor.

use crate::error::{Error, Result};
use crate::types::{ContentType, PkKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ============================================================================
// FieldDescriptor
// ============================================================================

/// One declared field of a model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldDescriptor {
    /// Atomic searchable field
    Search {
        /// Field (or accessor) name
        name: String,
        /// Application-defined boost; undeclared counts as 0
        #[serde(default, skip_serializing_if = "Option::is_none")]
        boost: Option<f64>,
    },
    /// Field usable by structural filters
    Filter {
        /// Field name
        name: String,
    },
    /// Related field group
    Related {
        /// Relation name
        name: String,
        /// Sub-fields extracted from each related object
        fields: Vec<FieldDescriptor>,
    },
}

impl FieldDescriptor {
    /// Unboosted search field
    pub fn search(name: impl Into<String>) -> Self {
        FieldDescriptor::Search {
            name: name.into(),
            boost: None,
        }
    }

    /// Boosted search field
    pub fn boosted(name: impl Into<String>, boost: f64) -> Self {
        FieldDescriptor::Search {
            name: name.into(),
            boost: Some(boost),
        }
    }

    /// Filter field
    pub fn filter(name: impl Into<String>) -> Self {
        FieldDescriptor::Filter { name: name.into() }
    }

    /// Related field group
    pub fn related(name: impl Into<String>, fields: Vec<FieldDescriptor>) -> Self {
        FieldDescriptor::Related {
            name: name.into(),
            fields,
        }
    }

    /// Field or relation name
    pub fn name(&self) -> &str {
        match self {
            FieldDescriptor::Search { name, .. }
            | FieldDescriptor::Filter { name }
            | FieldDescriptor::Related { name, .. } => name,
        }
    }

    fn collect_boosts(&self, out: &mut Vec<f64>) {
        match self {
            FieldDescriptor::Search { boost, .. } => out.push(boost.unwrap_or(0.0)),
            FieldDescriptor::Filter { .. } => {}
            FieldDescriptor::Related { fields, .. } => {
                for field in fields {
                    field.collect_boosts(out);
                }
            }
        }
    }

    fn validate(&self) -> Result<()> {
        match self {
            FieldDescriptor::Search {
                name,
                boost: Some(b),
            } if !b.is_finite() => Err(Error::configuration(format!(
                "boost of field {:?} must be finite, got {}",
                name, b
            ))),
            FieldDescriptor::Related { fields, .. } => fields.iter().try_for_each(Self::validate),
            _ => Ok(()),
        }
    }
}

// ============================================================================
// ModelDef
// ============================================================================

/// Declared schema of one indexed record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDef {
    /// Concrete record type
    pub content_type: ContentType,
    /// Parent record type in a polymorphic hierarchy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ContentType>,
    /// Primary-key kind, used to cast stored object ids
    #[serde(default)]
    pub pk_kind: PkKind,
    /// Declared fields, in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDescriptor>,
}

impl ModelDef {
    /// Create a model with no fields and integer keys
    pub fn new(content_type: impl Into<ContentType>) -> Self {
        ModelDef {
            content_type: content_type.into(),
            parent: None,
            pk_kind: PkKind::Int,
            fields: Vec::new(),
        }
    }

    /// Builder: set the parent model
    pub fn with_parent(mut self, parent: impl Into<ContentType>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Builder: set the primary-key kind
    pub fn with_pk_kind(mut self, kind: PkKind) -> Self {
        self.pk_kind = kind;
        self
    }

    /// Builder: append a field
    pub fn with_field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Top-level search field by name
    pub fn search_field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| matches!(f, FieldDescriptor::Search { .. }) && f.name() == name)
    }

    /// Whether structural filters may reference `name`
    ///
    /// The primary key is always filterable.
    pub fn is_filterable(&self, name: &str) -> bool {
        name == "pk"
            || self
                .fields
                .iter()
                .any(|f| matches!(f, FieldDescriptor::Filter { .. }) && f.name() == name)
    }
}

// ============================================================================
// Schema
// ============================================================================

/// Registry of every indexed record type
#[derive(Debug, Clone, Default)]
pub struct Schema {
    models: BTreeMap<ContentType, ModelDef>,
}

impl Schema {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from model definitions
    pub fn from_models(models: impl IntoIterator<Item = ModelDef>) -> Result<Self> {
        let mut schema = Schema::new();
        for model in models {
            schema.register(model)?;
        }
        Ok(schema)
    }

    /// Register a model
    ///
    /// # Errors
    ///
    /// Configuration error on duplicate registration or non-finite boosts.
    pub fn register(&mut self, model: ModelDef) -> Result<()> {
        model.fields.iter().try_for_each(FieldDescriptor::validate)?;
        if self.models.contains_key(&model.content_type) {
            return Err(Error::configuration(format!(
                "model {} is already registered",
                model.content_type
            )));
        }
        self.models.insert(model.content_type.clone(), model);
        Ok(())
    }

    /// Look up a model
    pub fn get(&self, content_type: &ContentType) -> Result<&ModelDef> {
        self.models
            .get(content_type)
            .ok_or_else(|| Error::UnknownModel(content_type.clone()))
    }

    /// Whether a model is registered
    pub fn contains(&self, content_type: &ContentType) -> bool {
        self.models.contains_key(content_type)
    }

    /// Iterate registered models
    pub fn models(&self) -> impl Iterator<Item = &ModelDef> {
        self.models.values()
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// True if no model is registered
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// The concrete type followed by each ancestor up to the root
    ///
    /// # Errors
    ///
    /// `UnknownModel` if the type or one of its parents is unregistered,
    /// configuration error on a parent cycle.
    pub fn ancestors(&self, content_type: &ContentType) -> Result<Vec<ContentType>> {
        let mut chain = vec![content_type.clone()];
        let mut current = self.get(content_type)?;
        while let Some(parent) = &current.parent {
            if chain.contains(parent) {
                return Err(Error::configuration(format!(
                    "model hierarchy of {} contains a cycle",
                    content_type
                )));
            }
            current = self.get(parent)?;
            chain.push(parent.clone());
        }
        Ok(chain)
    }

    /// Every registered model that has `content_type` among its ancestors
    /// (excluding `content_type` itself)
    pub fn descendants(&self, content_type: &ContentType) -> Vec<ContentType> {
        self.models
            .keys()
            .filter(|ct| *ct != content_type)
            .filter(|ct| {
                self.ancestors(ct)
                    .map(|chain| chain.contains(content_type))
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }

    /// Distinct boosts over every search field of every model
    ///
    /// Undeclared boosts count as 0. Sorted descending.
    pub fn all_boosts(&self) -> Vec<f64> {
        let mut boosts = Vec::new();
        for model in self.models.values() {
            for field in &model.fields {
                field.collect_boosts(&mut boosts);
            }
        }
        boosts.sort_by(|a, b| b.total_cmp(a));
        // -0.0 and 0.0 are the same boost
        boosts.dedup_by(|a, b| a == b);
        boosts
    }
}
