//! Rule-based checks over a parsed program and its scopes.
//!
//! Each [`LintRule`] registers callbacks on a shared [`Walker`], so all
//! rules run during one traversal. Rules never fail; they push diagnostics
//! through the [`Report`] handed to them.

pub mod rules;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::ast::Node;
use crate::builtins;
use crate::diagnostic::{Diagnostic, Level};
use crate::scope::ScopeTree;
use crate::span::Span;
use crate::walker::Walker;

pub trait LintRule {
    /// Kebab-case identifier, used as the diagnostic source.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    fn level(&self) -> Level {
        Level::Error
    }

    /// Register this rule's callbacks on `walker`.
    fn create(&self, walker: &mut Walker<'_>, report: Report);
}

/// Diagnostic sink handed to a single rule.
#[derive(Clone)]
pub struct Report {
    sink: Rc<RefCell<Vec<Diagnostic>>>,
    source: &'static str,
    level: Level,
}

impl Report {
    fn new(rule: &dyn LintRule, sink: Rc<RefCell<Vec<Diagnostic>>>) -> Self {
        Self {
            sink,
            source: rule.name(),
            level: rule.level(),
        }
    }

    pub fn report(&self, message: impl Into<String>, span: Span) {
        self.sink
            .borrow_mut()
            .push(Diagnostic::new(self.level, self.source, message, span));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintConfig {
    /// Names of rules that should not run.
    pub disabled: BTreeSet<String>,
    /// Names that are always defined.
    pub globals: BTreeSet<String>,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            disabled: BTreeSet::new(),
            globals: builtins::names().map(str::to_owned).collect(),
        }
    }
}

/// Every rule shipped with the linter, enabled or not.
pub fn default_rules(config: &LintConfig) -> Vec<Box<dyn LintRule>> {
    vec![
        Box::new(rules::IllegalRedeclaration),
        Box::new(rules::NoUndefined::new(config.globals.clone())),
        Box::new(rules::ClassAtTopLevel),
        Box::new(rules::IllegalControlStatement),
        Box::new(rules::InvalidClassBody),
        Box::new(rules::IllegalIf),
    ]
}

pub struct Linter {
    config: LintConfig,
    rules: Vec<Box<dyn LintRule>>,
}

impl Linter {
    pub fn new(config: LintConfig) -> Self {
        let rules = default_rules(&config);
        for name in &config.disabled {
            if !rules.iter().any(|rule| rule.name() == name.as_str()) {
                warn!(rule = %name, "ignoring unknown rule in the disabled list");
            }
        }
        Self { config, rules }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn LintRule> {
        self.rules.iter().map(Box::as_ref)
    }

    pub fn is_enabled(&self, rule: &dyn LintRule) -> bool {
        !self.config.disabled.contains(rule.name())
    }

    /// Run every enabled rule; diagnostics come back ordered by position.
    pub fn lint(&self, program: &Node, scopes: &ScopeTree) -> Vec<Diagnostic> {
        let sink = Rc::new(RefCell::new(Vec::new()));

        let mut walker = Walker::new(program, scopes);
        let mut enabled = 0;
        for rule in self.rules().filter(|rule| self.is_enabled(*rule)) {
            rule.create(&mut walker, Report::new(rule, Rc::clone(&sink)));
            enabled += 1;
        }
        walker.walk();
        drop(walker);

        let mut diagnostics = sink.take();
        diagnostics.sort_by_key(|diagnostic| diagnostic.span.start);
        debug!(rules = enabled, diagnostics = diagnostics.len(), "linted program");
        diagnostics
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new(LintConfig::default())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::tests::parse_source;
    use crate::scope::build_scopes;

    #[test]
    fn rule_names_are_unique_and_kebab_case() {
        let rules = default_rules(&LintConfig::default());
        let mut names: Vec<_> = rules.iter().map(|rule| rule.name()).collect();
        for name in &names {
            assert!(name.chars().all(|c| c.is_ascii_lowercase() || c == '-'), "{name}");
        }
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), rules.len());
    }

    #[test]
    fn disabled_rules_do_not_run() {
        let output = parse_source("x = 1\n");
        let scopes = build_scopes(&output.program).expect("scopes");

        let all = Linter::default().lint(&output.program, &scopes);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].source, "no-undefined");

        let mut config = LintConfig::default();
        config.disabled.insert("no-undefined".to_string());
        assert!(Linter::new(config).lint(&output.program, &scopes).is_empty());
    }

    #[test]
    fn globals_extend_the_builtins() {
        let output = parse_source("print(host)\n");
        let scopes = build_scopes(&output.program).expect("scopes");
        assert_eq!(Linter::default().lint(&output.program, &scopes).len(), 1);

        let mut config = LintConfig::default();
        config.globals.insert("host".to_string());
        assert!(Linter::new(config).lint(&output.program, &scopes).is_empty());
    }

    #[test]
    fn diagnostics_are_sorted_by_position() {
        let source = "class A\n  5\nfunction f()\n  break\nb\n";
        let output = parse_source(source);
        let scopes = build_scopes(&output.program).expect("scopes");
        let diagnostics = Linter::default().lint(&output.program, &scopes);
        let starts: Vec<_> = diagnostics.iter().map(|d| d.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted);
        assert_eq!(diagnostics.len(), 3);
    }
}
