//! The front-end pipeline: lex, parse, build scopes, lint.

use std::path::Path;

use tracing::debug;

use crate::ast::Node;
use crate::diagnostic::Diagnostic;
use crate::error::CoreError;
use crate::lexer::lex;
use crate::lint::{LintConfig, Linter};
use crate::parser::parse;
use crate::scope::{build_scopes, ScopeTree};
use crate::sources::{load_sources, SourceFile};

/// Everything the front end learned about one source text.
#[derive(Debug)]
pub struct CheckOutput {
    pub lex_diagnostics: Vec<Diagnostic>,
    pub parse_diagnostics: Vec<Diagnostic>,
    pub lint_diagnostics: Vec<Diagnostic>,
    pub program: Node,
    pub scopes: ScopeTree,
}

impl CheckOutput {
    /// Lexer, parser and lint diagnostics, in that order.
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.lex_diagnostics
            .iter()
            .chain(&self.parse_diagnostics)
            .chain(&self.lint_diagnostics)
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics().next().is_none()
    }
}

/// Check a single source text.
///
/// Lint rules run even when parsing failed, over whatever tree the parser
/// managed to recover.
pub fn check_source(source: &str, config: &LintConfig) -> Result<CheckOutput, CoreError> {
    let lexed = lex(source);
    let parsed = parse(lexed.tokens);
    let scopes = build_scopes(&parsed.program)?;
    let lint_diagnostics = Linter::new(config.clone()).lint(&parsed.program, &scopes);

    debug!(
        lexer = lexed.diagnostics.len(),
        parser = parsed.diagnostics.len(),
        lint = lint_diagnostics.len(),
        "checked source"
    );

    Ok(CheckOutput {
        lex_diagnostics: lexed.diagnostics,
        parse_diagnostics: parsed.diagnostics,
        lint_diagnostics,
        program: parsed.program,
        scopes,
    })
}

/// Check every source file found at `root`.
pub fn check_path(
    root: impl AsRef<Path>,
    config: &LintConfig,
) -> Result<Vec<(SourceFile, CheckOutput)>, CoreError> {
    load_sources(root)?
        .into_iter()
        .map(|file| {
            let output = check_source(&file.contents, config)?;
            Ok((file, output))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeError;

    #[test]
    fn clean_program_has_no_diagnostics() {
        let output = check_source(
            "class Greeter\n  var name: string\n  function greet()\n    print(name)\n",
            &LintConfig::default(),
        )
        .expect("check");
        assert!(output.is_clean(), "{:?}", output.diagnostics().collect::<Vec<_>>());
    }

    #[test]
    fn keeps_channels_apart() {
        let output =
            check_source("var x = $\nvar z = 1\ny = 1\n", &LintConfig::default()).expect("check");
        assert_eq!(output.lex_diagnostics.len(), 1);
        assert_eq!(output.lex_diagnostics[0].source, "lexer");
        assert!(output.parse_diagnostics.iter().all(|d| d.source == "parser"));
        assert!(
            output
                .lint_diagnostics
                .iter()
                .any(|d| d.message == "No symbol with the name 'y'")
        );
    }

    #[test]
    fn lints_the_recovered_tree() {
        let output =
            check_source("var = 1\nvar y = 2\nx = y\n", &LintConfig::default()).expect("check");
        assert_eq!(output.parse_diagnostics.len(), 1);
        assert_eq!(output.lint_diagnostics.len(), 1);
    }

    #[test]
    fn fatal_scope_errors_are_internal() {
        let error = check_source("class A\nclass A\n", &LintConfig::default()).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Internal(ScopeError::DuplicateClass { .. })
        ));
        assert!(error.to_string().starts_with("internal compiler error: "));
    }

    #[test]
    fn checks_every_file_under_a_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        std::fs::write(dir.path().join("a.tek"), "var a = 1\n").expect("write");
        std::fs::write(dir.path().join("b.tek"), "b\n").expect("write");

        let results = check_path(dir.path(), &LintConfig::default()).expect("check");
        let problems: Vec<usize> = results
            .iter()
            .map(|(_, output)| output.diagnostics().count())
            .collect();
        assert_eq!(problems, vec![0, 1]);
    }
}
