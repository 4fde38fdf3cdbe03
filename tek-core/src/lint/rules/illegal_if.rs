use crate::ast::{NodeData, NodeKind};
use crate::lint::{LintRule, Report};
use crate::walker::Walker;

/// An if expression has to produce a value on every path.
pub struct IllegalIf;

impl LintRule for IllegalIf {
    fn name(&self) -> &'static str {
        "illegal-if"
    }

    fn description(&self) -> &'static str {
        "Report if expressions without an else body"
    }

    fn create(&self, walker: &mut Walker<'_>, report: Report) {
        walker.on_enter(NodeKind::IfExpr, move |node, _| {
            if let NodeData::IfExpr {
                else_clause: None, ..
            } = &node.data
            {
                report.report("An if expression must have an else body", node.span);
            }
        });
    }
}
