// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Enumeration of parameter spaces: a more powerful cartesian product.
//!
//! A parameter space is declared from named parameters of three kinds:
//!
//! - **independent** parameters, each with an ordered list of values;
//! - **dependent** parameters, computed from other parameters;
//! - **constants**.
//!
//! Enumeration visits every combination of independent values, adds the
//! constants and the computed dependents, and yields one [`Namespace`] per
//! combination accepted by the registered filters.
//!
//! # Architecture
//!
//! ## Definition (immutable)
//!
//! [`ParameterSpace`] validates the declarations once, sorts dependents
//! topologically, and records for every parameter the independents it
//! depends on. It can be shared by any number of concurrent enumerations.
//!
//! ## Enumeration (per iterator)
//!
//! Each [`Enumerator`] owns a [`engine::MixedRadix`] counter whose digits
//! index the independents' domains. The first parameter of the order is the
//! most significant digit and the last one the least significant, so the
//! output matches nested loops with the last parameter innermost.
//!
//! ## Filter jumps
//!
//! When a filter rejects a combination, every combination that differs
//! only in parameters the filter cannot see is rejected as well. The
//! enumerator skips that whole block with a single counter jump instead of
//! testing each member.
//!
//! # Example
//!
//! ```
//! use permspace::{ParameterSpace, Value};
//!
//! let space = ParameterSpace::builder(["arabic", "letter"])
//!     .independent("arabic", 1..=3)
//!     .independent("letter", ['a', 'b'])
//!     .dependent("name", ["arabic", "letter"], |args| {
//!         format!("{}.{}", args["arabic"], args["letter"])
//!     })
//!     .filter(["arabic"], |args| args["arabic"].as_i64() < Some(3))
//!     .build()
//!     .unwrap();
//!
//! let names: Vec<Value> = space
//!     .iter()
//!     .map(|ns| ns.unwrap()["name"].clone())
//!     .collect();
//! assert_eq!(names, ["1.a", "1.b", "2.a", "2.b"].map(Value::from));
//! assert_eq!(space.len().unwrap(), 4);
//! assert_eq!(space.approximate_size(), 6);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod function;
pub mod namespace;
pub mod space;
pub mod value;

// Re-export commonly used types
pub use config::{OrderPolicy, SpaceConfig, SpaceDocument};
pub use engine::{Bounds, Enumerator};
pub use error::{BoxError, Result, SpaceError};
pub use function::Function;
pub use namespace::Namespace;
pub use space::{Declaration, ParameterSpace, SpaceBuilder};
pub use value::Value;
