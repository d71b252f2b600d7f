// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Space configuration.
//!
//! [`SpaceConfig`] holds the knobs that change how a space is validated and
//! evaluated. [`SpaceDocument`] describes the data-only part of a space
//! (order, domains, constants) so it can be kept in a file; dependents and
//! filters are code and are added to the builder afterwards.
//!
//! ```
//! use permspace::config::SpaceDocument;
//!
//! let doc: SpaceDocument = serde_json::from_str(r#"{
//!     "order": ["a", "b"],
//!     "independents": {"a": [1, 2, 3], "b": ["x", "y"]},
//!     "constants": {"name": "demo"}
//! }"#).unwrap();
//! let space = doc.into_builder().build().unwrap();
//! assert_eq!(space.approximate_size(), 6);
//! ```

use crate::space::SpaceBuilder;
use crate::value::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// How strictly the order must match the independent parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// The order lists exactly the independent parameters.
    #[default]
    Strict,
    /// Single-valued independents may be left out of the order, and
    /// constants or dependents in the order are ignored.
    Permissive,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpaceConfig {
    pub policy: OrderPolicy,

    /// Cache dependent results by argument values. Never changes results.
    pub memoize: bool,
}

/// Serializable description of a space without its functions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpaceDocument {
    pub order: Vec<String>,

    #[serde(default)]
    pub independents: IndexMap<String, Vec<Value>>,

    #[serde(default)]
    pub constants: IndexMap<String, Value>,

    #[serde(default)]
    pub config: SpaceConfig,
}

impl SpaceDocument {
    /// A builder preloaded with this document's declarations.
    pub fn into_builder(self) -> SpaceBuilder {
        SpaceBuilder::from_document(self)
    }
}
