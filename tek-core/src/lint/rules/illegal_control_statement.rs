use crate::ast::{Node, NodeKind};
use crate::lint::{LintRule, Report};
use crate::walker::{WalkContext, Walker};

pub struct IllegalControlStatement;

/// Where a control statement may appear, and what to say when it does not.
const PLACEMENTS: &[(NodeKind, &[NodeKind], &str)] = &[
    (
        NodeKind::ReturnStmt,
        &[NodeKind::FunctionDecl, NodeKind::Constructor],
        "You can only place return inside a function",
    ),
    (
        NodeKind::YieldStmt,
        &[NodeKind::IfExpr],
        "You can only place yield inside an if expression",
    ),
    (
        NodeKind::BreakStmt,
        &[NodeKind::ForStmt, NodeKind::WhileStmt, NodeKind::RepeatStmt],
        "You can only place break inside a loop",
    ),
    (
        NodeKind::ContinueStmt,
        &[NodeKind::ForStmt, NodeKind::WhileStmt, NodeKind::RepeatStmt],
        "You can only place continue inside a loop",
    ),
    (
        NodeKind::FallthroughStmt,
        &[NodeKind::SwitchCase],
        "You can only place fallthrough inside a switch case",
    ),
];

/// Whether one of `allowed` encloses the current node without a function
/// boundary in between.
fn enclosed_by(context: &WalkContext<'_>, allowed: &[NodeKind]) -> bool {
    for parent in context.parents().iter().rev() {
        let kind = parent.kind();
        if allowed.contains(&kind) {
            return true;
        }
        if is_boundary(parent) {
            return false;
        }
    }
    false
}

fn is_boundary(node: &Node) -> bool {
    matches!(
        node.kind(),
        NodeKind::FunctionDecl | NodeKind::Constructor | NodeKind::ClassDecl
    )
}

impl LintRule for IllegalControlStatement {
    fn name(&self) -> &'static str {
        "illegal-control-statement"
    }

    fn description(&self) -> &'static str {
        "Report control statements placed outside the construct they control"
    }

    fn create(&self, walker: &mut Walker<'_>, report: Report) {
        for &(kind, allowed, message) in PLACEMENTS {
            let report = report.clone();
            walker.on_enter(kind, move |node, context| {
                if !enclosed_by(context, allowed) {
                    report.report(message, node.span);
                }
            });
        }
    }
}
