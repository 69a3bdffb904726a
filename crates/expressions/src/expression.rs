//! The expression tree.
//!
//! An [`Expression`] describes how a codebase is obtained: a
//! [`RepositoryExpression`] names a repository directly, and
//! [`TranslateExpression`] / [`EditExpression`] wrap a child expression with an
//! operation. `"myRepo>public{}"` is the repository `myRepo` translated into
//! the `public` project space.
//!
//! ## Canonical string
//!
//! `Display` produces the canonical string that the executor uses as its
//! pipeline-lookup and cache key:
//!
//! ```text
//! repository := name [ '{' options '}' ]      braces only when options exist
//! translate  := child '>' name '{' options '}'
//! edit       := child '|' name '{' options '}'
//! options    := [ key '=' value { ',' key '=' value } ]
//! ```
//!
//! Names, keys and values are written bare when they are plain tokens
//! (ASCII alphanumerics and `_-./:@`) and double-quoted otherwise, so no two
//! distinct trees share a string. Equal trees always produce equal strings. Option order is first-insertion
//! order (see [`crate::TermOptions`]).

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::term::write_token;
use crate::{
    EditorName, ExpressionError, Operation, Operator, ProjectSpace, RepositoryName, Term,
    TermOptions,
};

/// Option key naming the to-side codebase an inverse translation inspects.
pub const REFERENCE_TARGET_CODEBASE: &str = "referenceTargetCodebase";

/// Option key naming the baseline from-side codebase of a three-way merge.
pub const REFERENCE_FROM_CODEBASE: &str = "referenceFromCodebase";

/// Option key pinning a repository leaf to a revision.
pub const REVISION: &str = "revision";

// ---------------------------------------------------------------------------
// Expression
// ---------------------------------------------------------------------------

/// Any node of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    /// A named source repository.
    Repository(RepositoryExpression),
    /// A translation of a child expression.
    Translate(TranslateExpression),
    /// An edit of a child expression.
    Edit(EditExpression),
}

impl Expression {
    /// Wraps this expression in a translation into `project_space`.
    pub fn translate_to(self, project_space: ProjectSpace) -> TranslateExpression {
        TranslateExpression::translate(self, project_space)
    }

    /// Wraps this expression in an edit by `editor`.
    pub fn edit_with(self, editor: EditorName, options: TermOptions) -> EditExpression {
        EditExpression::edit(self, editor, options)
    }

    /// Returns the repository named by the innermost leaf.
    pub fn root_repository(&self) -> &RepositoryName {
        let mut current = self;
        loop {
            match current {
                Expression::Repository(repo) => return repo.repository(),
                Expression::Translate(t) => current = t.to_translate(),
                Expression::Edit(e) => current = e.to_edit(),
            }
        }
    }

    /// Number of operation nodes between this expression and its leaf.
    pub fn depth(&self) -> usize {
        let mut current = self;
        let mut depth = 0;
        loop {
            match current {
                Expression::Repository(_) => return depth,
                Expression::Translate(t) => current = t.to_translate(),
                Expression::Edit(e) => current = e.to_edit(),
            }
            depth += 1;
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Repository(repo) => fmt::Display::fmt(repo, f),
            Expression::Translate(t) => fmt::Display::fmt(t, f),
            Expression::Edit(e) => fmt::Display::fmt(e, f),
        }
    }
}

impl From<RepositoryExpression> for Expression {
    fn from(value: RepositoryExpression) -> Self {
        Expression::Repository(value)
    }
}

impl From<TranslateExpression> for Expression {
    fn from(value: TranslateExpression) -> Self {
        Expression::Translate(value)
    }
}

impl From<EditExpression> for Expression {
    fn from(value: EditExpression) -> Self {
        Expression::Edit(value)
    }
}

// ---------------------------------------------------------------------------
// Repository leaf
// ---------------------------------------------------------------------------

/// A leaf naming a source repository, optionally with options such as a
/// pinned revision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryExpression {
    repository: RepositoryName,
    #[serde(default)]
    options: TermOptions,
}

impl RepositoryExpression {
    /// Creates a leaf for `repository` with no options.
    pub fn new(repository: RepositoryName) -> Self {
        Self {
            repository,
            options: TermOptions::new(),
        }
    }

    /// Returns the repository this leaf names.
    pub fn repository(&self) -> &RepositoryName {
        &self.repository
    }

    /// Returns the leaf's options in insertion order.
    pub fn options(&self) -> &TermOptions {
        &self.options
    }

    /// Returns the leaf as a [`Term`] named after the repository.
    pub fn term(&self) -> Term {
        Term::with_options(self.repository.as_str(), self.options.clone())
    }

    /// Returns a new leaf with `key` set to `value`.
    #[must_use]
    pub fn with_option(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            repository: self.repository.clone(),
            options: self.options.with(key, value),
        }
    }

    /// Pins the leaf to `revision`.
    #[must_use]
    pub fn at_revision(&self, revision: impl Into<String>) -> Self {
        self.with_option(REVISION, revision)
    }

    /// Wraps this node in a translation into `project_space`.
    pub fn translate_to(self, project_space: ProjectSpace) -> TranslateExpression {
        Expression::from(self).translate_to(project_space)
    }

    /// Wraps this node in an edit by `editor`.
    pub fn edit_with(self, editor: EditorName, options: TermOptions) -> EditExpression {
        Expression::from(self).edit_with(editor, options)
    }
}

/// A bare leaf is just its name (`myRepo`); options add braces (`myRepo{revision=42}`).
/// Names that are not plain tokens are quoted like option values.
impl fmt::Display for RepositoryExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_token(f, self.repository.as_str())?;
        if !self.options.is_empty() {
            write!(f, "{}", self.options)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Translate node
// ---------------------------------------------------------------------------

/// A translation of the child codebase into another project space.
///
/// The operation is always tagged [`Operator::Translate`]; the check happens
/// once in [`TranslateExpression::new`] and every other constructor keeps the
/// operator it started with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TranslateExpression {
    to_translate: Box<Expression>,
    operation: Operation,
}

impl TranslateExpression {
    /// Builds a translate node.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::ConfigurationError`] when `operation` is not
    /// a translate operation.
    pub fn new(to_translate: Expression, operation: Operation) -> Result<Self, ExpressionError> {
        if operation.operator() != Operator::Translate {
            tracing::warn!(
                child = %to_translate,
                operation = %operation,
                "rejected translate expression with non-translate operation"
            );
            return Err(ExpressionError::operator_mismatch(
                Operator::Translate,
                operation.operator(),
            ));
        }
        Ok(Self {
            to_translate: Box::new(to_translate),
            operation,
        })
    }

    /// Builds a translation of `to_translate` into `project_space` with no options.
    pub fn translate(to_translate: impl Into<Expression>, project_space: ProjectSpace) -> Self {
        Self {
            to_translate: Box::new(to_translate.into()),
            operation: Operation::new(Operator::Translate, Term::new(project_space.as_str())),
        }
    }

    /// Returns the operation this node applies.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Returns the expression being translated.
    pub fn to_translate(&self) -> &Expression {
        &self.to_translate
    }

    /// Returns this translation with `reference_target_codebase` recorded as
    /// the to-side reference.
    ///
    /// Inverse translation uses it to look at a codebase a forward translation
    /// already produced, e.g. to find renamings it has to undo.
    #[must_use]
    pub fn with_reference_target_codebase(
        &self,
        reference_target_codebase: impl Into<Expression>,
    ) -> Self {
        self.with_option(
            REFERENCE_TARGET_CODEBASE,
            reference_target_codebase.into().to_string(),
        )
    }

    /// Returns this translation with `reference_from_codebase` recorded as the
    /// from-side reference.
    ///
    /// A three-way merge applies the changes in the input codebase and in the
    /// reference to-codebase onto this baseline.
    #[must_use]
    pub fn with_reference_from_codebase(
        &self,
        reference_from_codebase: impl Into<Expression>,
    ) -> Self {
        self.with_option(
            REFERENCE_FROM_CODEBASE,
            reference_from_codebase.into().to_string(),
        )
    }

    /// Returns this translation with an arbitrary option set on its term.
    #[must_use]
    pub fn with_option(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let key = key.into();
        tracing::trace!(key = %key, expression = %self, "threading translate option");
        Self {
            to_translate: self.to_translate.clone(),
            operation: self.operation.with_option(key, value),
        }
    }

    /// Wraps this node in a translation into `project_space`.
    pub fn translate_to(self, project_space: ProjectSpace) -> TranslateExpression {
        Expression::from(self).translate_to(project_space)
    }

    /// Wraps this node in an edit by `editor`.
    pub fn edit_with(self, editor: EditorName, options: TermOptions) -> EditExpression {
        Expression::from(self).edit_with(editor, options)
    }
}

impl fmt::Display for TranslateExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.to_translate, self.operation)
    }
}

impl<'de> Deserialize<'de> for TranslateExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = TranslateNode::deserialize(deserializer)?;
        Self::new(*node.to_translate, node.operation).map_err(de::Error::custom)
    }
}

/// Wire shape of a translate node; deserializing goes through the checked
/// constructor.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TranslateNode {
    to_translate: Box<Expression>,
    operation: Operation,
}

// ---------------------------------------------------------------------------
// Edit node
// ---------------------------------------------------------------------------

/// An editor run over the child codebase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EditExpression {
    to_edit: Box<Expression>,
    operation: Operation,
}

impl EditExpression {
    /// Builds an edit node.
    ///
    /// # Errors
    ///
    /// Returns [`ExpressionError::ConfigurationError`] when `operation` is not
    /// an edit operation.
    pub fn new(to_edit: Expression, operation: Operation) -> Result<Self, ExpressionError> {
        if operation.operator() != Operator::Edit {
            tracing::warn!(
                child = %to_edit,
                operation = %operation,
                "rejected edit expression with non-edit operation"
            );
            return Err(ExpressionError::operator_mismatch(
                Operator::Edit,
                operation.operator(),
            ));
        }
        Ok(Self {
            to_edit: Box::new(to_edit),
            operation,
        })
    }

    /// Builds an edit of `to_edit` by `editor` with the given options.
    pub fn edit(to_edit: impl Into<Expression>, editor: EditorName, options: TermOptions) -> Self {
        Self {
            to_edit: Box::new(to_edit.into()),
            operation: Operation::new(Operator::Edit, Term::with_options(editor.as_str(), options)),
        }
    }

    /// Returns the operation this node applies.
    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    /// Returns the expression being edited.
    pub fn to_edit(&self) -> &Expression {
        &self.to_edit
    }

    /// Returns this edit with an option set on its term.
    #[must_use]
    pub fn with_option(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            to_edit: self.to_edit.clone(),
            operation: self.operation.with_option(key, value),
        }
    }

    /// Wraps this node in a translation into `project_space`.
    pub fn translate_to(self, project_space: ProjectSpace) -> TranslateExpression {
        Expression::from(self).translate_to(project_space)
    }

    /// Wraps this node in an edit by `editor`.
    pub fn edit_with(self, editor: EditorName, options: TermOptions) -> EditExpression {
        Expression::from(self).edit_with(editor, options)
    }
}

impl fmt::Display for EditExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.to_edit, self.operation)
    }
}

impl<'de> Deserialize<'de> for EditExpression {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let node = EditNode::deserialize(deserializer)?;
        Self::new(*node.to_edit, node.operation).map_err(de::Error::custom)
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EditNode {
    to_edit: Box<Expression>,
    operation: Operation,
}
