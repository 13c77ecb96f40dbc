//! Router error types.

use thiserror::Error;

/// Route table validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route pattern `{0}` must start with `/`")]
    Relative(String),

    #[error("route pattern `{0}` is declared twice (as `{1}`)")]
    Duplicate(String, String),

    #[error("more than one catch-all route declared")]
    MultipleCatchAll,

    #[error("empty parameter name in `{0}`")]
    EmptyParam(String),

    #[error("parameter `{name}` repeated in `{pattern}`")]
    RepeatedParam { pattern: String, name: String },
}

/// Failure of a lazy component import or a route loader.
///
/// Clonable so every waiter on the same memoized slot observes the same error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to load `{target}`: {message}")]
pub struct LoadError {
    pub target: String,
    pub message: String,
}

impl LoadError {
    pub fn new(target: impl Into<String>, err: &anyhow::Error) -> Self {
        Self {
            target: target.into(),
            message: format!("{err:#}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_error_keeps_context_chain() {
        let err = anyhow::anyhow!("file missing").context("reading post");
        let load = LoadError::new("/blog/a", &err);
        assert_eq!(load.target, "/blog/a");
        assert_eq!(load.message, "reading post: file missing");
        assert!(load.to_string().contains("/blog/a"));
    }
}
