//! Command-line argument definitions using clap derive, and their conversion
//! into expressions.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use expressions::{
    EditorName, Expression, ProjectSpace, RepositoryExpression, RepositoryName, TermOptions,
};

/// Build a codebase expression and print its canonical form.
#[derive(Parser, Debug)]
#[command(name = "codebase-expr")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. `debug`, `expressions=trace`)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format for the built expression
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// The canonical expression string
    Text,
    /// The expression tree as JSON
    Json,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Translate a repository into a project space
    Translate {
        #[command(flatten)]
        source: SourceArgs,

        /// Project space to translate into
        #[arg(long = "to")]
        to: String,

        /// Repository holding the already-translated to-side codebase
        #[arg(long)]
        reference_target: Option<String>,

        /// Repository holding the baseline from-side codebase for merging
        #[arg(long)]
        reference_from: Option<String>,

        /// Extra translation option as key=value (repeatable)
        #[arg(long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },

    /// Run an editor over a repository
    Edit {
        #[command(flatten)]
        source: SourceArgs,

        /// Editor to apply
        #[arg(long)]
        editor: String,

        /// Editor option as key=value (repeatable)
        #[arg(long = "option", value_name = "KEY=VALUE")]
        options: Vec<String>,
    },
}

#[derive(clap::Args, Debug)]
pub struct SourceArgs {
    /// Repository the expression starts from
    #[arg(long)]
    pub repository: String,

    /// Pin the repository to a revision
    #[arg(long)]
    pub revision: Option<String>,
}

impl SourceArgs {
    fn leaf(&self) -> Result<RepositoryExpression> {
        let leaf = RepositoryExpression::new(repository_name(&self.repository)?);
        Ok(match &self.revision {
            Some(rev) => leaf.at_revision(rev.as_str()),
            None => leaf,
        })
    }
}

impl Command {
    /// Validates the arguments and builds the expression they describe.
    pub fn build(&self) -> Result<Expression> {
        match self {
            Command::Translate {
                source,
                to,
                reference_target,
                reference_from,
                options,
            } => {
                let space = ProjectSpace::new(to.as_str())
                    .ok_or_else(|| anyhow!("--to must not be empty"))?;
                let mut expr = source.leaf()?.translate_to(space);
                for (key, value) in parse_options(options)?.iter() {
                    expr = expr.with_option(key, value);
                }
                if let Some(name) = reference_target {
                    expr = expr.with_reference_target_codebase(leaf(name)?);
                }
                if let Some(name) = reference_from {
                    expr = expr.with_reference_from_codebase(leaf(name)?);
                }
                Ok(expr.into())
            }
            Command::Edit {
                source,
                editor,
                options,
            } => {
                let editor = EditorName::new(editor.as_str())
                    .ok_or_else(|| anyhow!("--editor must not be empty"))?;
                Ok(source.leaf()?.edit_with(editor, parse_options(options)?).into())
            }
        }
    }
}

fn repository_name(name: &str) -> Result<RepositoryName> {
    RepositoryName::new(name).ok_or_else(|| anyhow!("repository name must not be empty"))
}

fn leaf(name: &str) -> Result<RepositoryExpression> {
    Ok(RepositoryExpression::new(repository_name(name)?))
}

/// Parses repeated `key=value` arguments, keeping first-seen key order.
fn parse_options(raw: &[String]) -> Result<TermOptions> {
    let mut pairs = Vec::with_capacity(raw.len());
    for item in raw {
        let (key, value) = item
            .split_once('=')
            .with_context(|| format!("option '{item}' is not of the form key=value"))?;
        if key.is_empty() {
            bail!("option '{item}' has an empty key");
        }
        pairs.push((key.to_string(), value.to_string()));
    }
    Ok(pairs.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("codebase-expr").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn translate_with_references() {
        let cli = parse(&[
            "translate",
            "--repository",
            "myRepo",
            "--to",
            "public",
            "--reference-target",
            "refTo",
            "--reference-from",
            "refFrom",
        ]);
        let expr = cli.command.build().unwrap();
        assert_eq!(
            expr.to_string(),
            "myRepo>public{referenceTargetCodebase=refTo,referenceFromCodebase=refFrom}"
        );
    }

    #[test]
    fn edit_with_revision_and_options() {
        let cli = parse(&[
            "edit",
            "--repository",
            "internal",
            "--revision",
            "42",
            "--editor",
            "scrubber",
            "--option",
            "mode=strict",
        ]);
        let expr = cli.command.build().unwrap();
        assert_eq!(expr.to_string(), "internal{revision=42}|scrubber{mode=strict}");
    }

    #[test]
    fn malformed_option_is_rejected() {
        let err = parse_options(&["novalue".to_string()]).unwrap_err();
        assert!(err.to_string().contains("key=value"));
        assert!(parse_options(&["=x".to_string()]).is_err());
    }

    #[test]
    fn repeated_option_keeps_first_position() {
        let raw = ["a=1".to_string(), "b=2".to_string(), "a=3".to_string()];
        assert_eq!(parse_options(&raw).unwrap().to_string(), "{a=3,b=2}");
    }

    #[test]
    fn empty_project_space_is_rejected() {
        let cli = parse(&["translate", "--repository", "myRepo", "--to", ""]);
        assert!(cli.command.build().is_err());
    }
}
