//! Error type for expression construction.
//!
//! Building an expression is total except for one structural check: a
//! translate node must carry a translate operation and an edit node an edit
//! operation. A mismatch is a defect in whatever assembled the node, so
//! [`ExpressionError`] is never retried and callers are expected to propagate
//! it to the top of the request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::Operator;

/// Errors raised while constructing an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ExpressionError {
    /// An operation node was given an operation tagged with the wrong operator.
    ///
    /// Produced by: [`crate::TranslateExpression::new`],
    /// [`crate::EditExpression::new`], and deserialization of either node.
    #[error("Configuration error: {message}")]
    ConfigurationError {
        /// Description of the configuration problem.
        message: String,
    },
}

impl ExpressionError {
    pub(crate) fn operator_mismatch(expected: Operator, actual: Operator) -> Self {
        Self::ConfigurationError {
            message: format!("expected a {expected} operation, found a {actual} operation"),
        }
    }
}
