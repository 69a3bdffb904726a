//! Codebase expressions: immutable trees describing how a codebase is
//! obtained and transformed.
//!
//! A leaf names a source repository; translate and edit nodes apply an
//! operation to a child expression. The tree's canonical string (its
//! `Display` output) is what the translation-pipeline executor consumes and
//! what it uses as a cache key.
//!
//! ## Architectural Layer
//!
//! **Domain values only.** This crate has no I/O dependencies. It describes
//! *what* should be produced; executing the description, resolving repository
//! names and parsing the string form back into a tree are left to callers.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype names (`RepositoryName`, `ProjectSpace`, `EditorName`) |
//! | [`term`] | `Term`, `TermOptions`, `Operator`, `Operation` |
//! | [`expression`] | `Expression` and its repository, translate and edit nodes |
//! | [`errors`] | Construction error type |

pub mod errors;
pub mod expression;
pub mod identifiers;
pub mod term;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::ExpressionError;
pub use expression::{
    EditExpression, Expression, RepositoryExpression, TranslateExpression,
    REFERENCE_FROM_CODEBASE, REFERENCE_TARGET_CODEBASE, REVISION,
};
pub use identifiers::{EditorName, ProjectSpace, RepositoryName};
pub use term::{Operation, Operator, Term, TermOptions};
