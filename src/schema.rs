//! Schema types and structures
//!
//! A [`Definition`] is one generated class. Nested definitions are owned by
//! the property that declares them, so a file's definitions form a tree per
//! top-level match expression.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Namespace separator of the generated language
pub const NAMESPACE_SEPARATOR: char = '\\';

/// One generated type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    /// Namespace of the type, empty for the root namespace
    pub namespace: String,
    /// Class name (never empty)
    pub type_name: String,
    /// Properties in declaration order (constructor parameter order)
    pub properties: IndexMap<String, PropertyRef>,
}

/// Type of one property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyRef {
    /// Sequence of the target rather than a single instance
    pub is_array: bool,
    pub target: PropertyTarget,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyTarget {
    /// Resolved type name
    TypeName(String),
    /// Inline definition, promoted to its own class at emission time
    Nested(Box<Definition>),
}

impl Definition {
    pub fn new(namespace: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            type_name: type_name.into(),
            properties: IndexMap::new(),
        }
    }

    /// Add a property, keeping declaration order
    pub fn with_property(mut self, name: impl Into<String>, property: PropertyRef) -> Self {
        self.properties.insert(name.into(), property);
        self
    }

    /// `Namespace\Type`, or just `Type` in the root namespace
    pub fn qualified_name(&self) -> String {
        let namespace = self.namespace.trim_matches(NAMESPACE_SEPARATOR);
        if namespace.is_empty() {
            self.type_name.clone()
        } else {
            format!("{}{}{}", namespace, NAMESPACE_SEPARATOR, self.type_name)
        }
    }

    /// Slash-separated output path mirroring the namespace (`App/Models/User`)
    pub fn relative_path(&self) -> String {
        self.qualified_name()
            .replace(NAMESPACE_SEPARATOR, "/")
            .trim_start_matches('/')
            .to_string()
    }

    /// Directly nested definitions, in property order
    pub fn nested(&self) -> impl Iterator<Item = &Definition> {
        self.properties.values().filter_map(|p| match &p.target {
            PropertyTarget::Nested(definition) => Some(definition.as_ref()),
            PropertyTarget::TypeName(_) => None,
        })
    }

    /// Number of definitions in this tree, including this one
    pub fn tree_size(&self) -> usize {
        1 + self.nested().map(Definition::tree_size).sum::<usize>()
    }
}

impl PropertyRef {
    pub fn type_name(name: impl Into<String>) -> Self {
        Self {
            is_array: false,
            target: PropertyTarget::TypeName(name.into()),
        }
    }

    pub fn nested(definition: Definition) -> Self {
        Self {
            is_array: false,
            target: PropertyTarget::Nested(Box::new(definition)),
        }
    }

    /// Same target, held as a sequence
    pub fn into_array(mut self) -> Self {
        self.is_array = true;
        self
    }
}
