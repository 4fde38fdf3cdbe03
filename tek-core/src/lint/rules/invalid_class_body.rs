use crate::ast::{NodeData, NodeKind};
use crate::lint::{LintRule, Report};
use crate::walker::Walker;

pub struct InvalidClassBody;

impl LintRule for InvalidClassBody {
    fn name(&self) -> &'static str {
        "invalid-class-body"
    }

    fn description(&self) -> &'static str {
        "Report statements and expressions inside a class body"
    }

    fn create(&self, walker: &mut Walker<'_>, report: Report) {
        walker.on_enter(NodeKind::ClassDecl, move |node, _| {
            let NodeData::ClassDecl {
                static_body,
                instance_body,
                ..
            } = &node.data
            else {
                return;
            };
            for member in static_body.iter().chain(instance_body) {
                if let NodeData::ClassProp { value, .. } = &member.data {
                    if !value.is_declaration() {
                        report.report("You can only put declarations in a class body", value.span);
                    }
                }
            }
        });
    }
}
