use std::collections::BTreeSet;
use std::rc::Rc;

use crate::ast::{NodeData, NodeKind};
use crate::lexer::Token;
use crate::lint::{LintRule, Report};
use crate::walker::{WalkContext, Walker};

/// Reports names that resolve to nothing.
///
/// Identifier nodes only appear where a value is read or written;
/// declared names are plain tokens and never reach this rule. Type
/// annotations are checked too, but only single-segment ones, since a
/// qualified path is resolved through the import it starts with.
pub struct NoUndefined {
    globals: Rc<BTreeSet<String>>,
}

impl NoUndefined {
    pub fn new(globals: BTreeSet<String>) -> Self {
        Self {
            globals: Rc::new(globals),
        }
    }
}

fn check(name: &Token, context: &WalkContext<'_>, globals: &BTreeSet<String>, report: &Report) {
    let lexeme = name.lexeme.as_str();
    if context.has_symbol(lexeme) || context.has_function(lexeme) || globals.contains(lexeme) {
        return;
    }
    report.report(format!("No symbol with the name '{lexeme}'"), name.span);
}

impl LintRule for NoUndefined {
    fn name(&self) -> &'static str {
        "no-undefined"
    }

    fn description(&self) -> &'static str {
        "Report references to undefined variables"
    }

    fn create(&self, walker: &mut Walker<'_>, report: Report) {
        let globals = Rc::clone(&self.globals);
        let types_report = report.clone();
        let type_globals = Rc::clone(&self.globals);

        walker
            .on_enter(NodeKind::Identifier, move |node, context| {
                if let NodeData::Identifier(name) = &node.data {
                    check(name, context, &globals, &report);
                }
            })
            .on_enter(NodeKind::VariableType, move |node, context| {
                if let NodeData::VariableType { path, .. } = &node.data {
                    if let [name] = path.as_slice() {
                        check(name, context, &type_globals, &types_report);
                    }
                }
            });
    }
}
