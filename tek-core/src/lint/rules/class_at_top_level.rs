use crate::ast::NodeKind;
use crate::lint::{LintRule, Report};
use crate::walker::Walker;

pub struct ClassAtTopLevel;

impl LintRule for ClassAtTopLevel {
    fn name(&self) -> &'static str {
        "class-at-top-level"
    }

    fn description(&self) -> &'static str {
        "Report when a class declaration is not at the top level"
    }

    fn create(&self, walker: &mut Walker<'_>, report: Report) {
        walker.on_enter(NodeKind::ClassDecl, move |node, context| {
            let at_top = context
                .parent()
                .is_some_and(|parent| parent.kind() == NodeKind::Program);
            if !at_top {
                report.report("A class can only be declared at the top level", node.span);
            }
        });
    }
}
