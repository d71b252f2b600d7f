// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for building and enumerating parameter spaces.
//!
//! Everything except [`SpaceError::Evaluation`] and
//! [`SpaceError::MissingArgument`] is detected eagerly: at construction, at
//! filter registration, or when bounds are set up. Evaluation errors come
//! from user code and surface from the iterator at the combination that
//! triggered them.

use thiserror::Error;

/// Boxed error returned by fallible dependent functions and filters.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Crate result type.
pub type Result<T> = std::result::Result<T, SpaceError>;

#[derive(Debug, Error)]
pub enum SpaceError {
    /// A name is listed twice in the order, or declared twice.
    #[error("parameters listed or declared more than once: {}", .names.join(", "))]
    DuplicateParameter { names: Vec<String> },

    /// The order, a filter, or a dependent references an undeclared name.
    #[error("undefined or unresolvable parameters: {}", .names.join(", "))]
    UndefinedParameter { names: Vec<String> },

    /// Dependents that form, or depend on, a cycle.
    #[error("dependent parameters form a cycle: {}", .names.join(", "))]
    CyclicParameters { names: Vec<String> },

    /// Independent parameters absent from the order.
    #[error("parameter ordering is missing independent parameters: {}", .names.join(", "))]
    MissingParameter { names: Vec<String> },

    /// Constants or dependents listed in the order.
    #[error("parameter ordering contains non-independent parameters: {}", .names.join(", "))]
    InvalidParameter { names: Vec<String> },

    /// A bound names an unknown parameter or a value outside its domain.
    #[error("invalid value for parameter \"{parameter}\": {reason}")]
    InvalidValue { parameter: String, reason: String },

    /// An independent parameter declared with no candidate values.
    #[error("independent parameter \"{name}\" has no values")]
    EmptyDomain { name: String },

    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// A function was invoked without one of its declared arguments.
    #[error("{function} is missing argument \"{argument}\"")]
    MissingArgument { function: String, argument: String },

    /// A dependent function or filter returned an error.
    #[error("{function} failed: {source}")]
    Evaluation {
        function: String,
        #[source]
        source: BoxError,
    },
}

/// Sort and deduplicate a list of names for stable error messages.
pub(crate) fn sorted_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
    names.sort();
    names.dedup();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_list_sorted_names() {
        let err = SpaceError::MissingParameter {
            names: sorted_names(["b", "a", "b"]),
        };
        assert_eq!(
            err.to_string(),
            "parameter ordering is missing independent parameters: a, b"
        );
    }

    #[test]
    fn test_evaluation_exposes_source() {
        use std::error::Error as _;
        let err = SpaceError::Evaluation {
            function: "c".into(),
            source: "boom".into(),
        };
        assert_eq!(err.to_string(), "c failed: boom");
        assert!(err.source().is_some());
    }
}
