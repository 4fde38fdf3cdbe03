//! Overload signatures.
//!
//! A function is bound under `name(T1,T2)`, a constructor under `new(T1)`.
//! Generic parameters owned by the function (or, for constructors, by the
//! class) are replaced by their position, so `f<T>(a: T)` and `f<U>(a: U)`
//! produce the same signature.

use crate::ast::{Node, NodeData};

/// Generic parameter names in declaration order.
pub fn generic_names(params: &[Node]) -> Vec<&str> {
    params
        .iter()
        .filter_map(|param| match &param.data {
            NodeData::GenericParam { identifier, .. } => Some(identifier.lexeme.as_str()),
            _ => None,
        })
        .collect()
}

/// Render a `VariableType` node as `a.b.C<T,U>[]`.
pub fn render_type(node: &Node, generics: &[&str]) -> String {
    let NodeData::VariableType {
        path,
        generics: arguments,
        array_depth,
    } = &node.data
    else {
        return String::new();
    };

    let mut out = match path.as_slice() {
        [single] => match generics.iter().position(|name| *name == single.lexeme) {
            Some(index) => format!("${index}"),
            None => single.lexeme.clone(),
        },
        _ => path
            .iter()
            .map(|segment| segment.lexeme.as_str())
            .collect::<Vec<_>>()
            .join("."),
    };

    if !arguments.is_empty() {
        let rendered: Vec<String> = arguments
            .iter()
            .map(|argument| render_type(argument, generics))
            .collect();
        out.push('<');
        out.push_str(&rendered.join(","));
        out.push('>');
    }
    for _ in 0..*array_depth {
        out.push_str("[]");
    }
    out
}

fn signature(name: &str, params: &[Node], generics: &[&str]) -> String {
    let types: Vec<String> = params
        .iter()
        .filter_map(|param| match &param.data {
            NodeData::Parameter { variable_type, .. } => Some(render_type(variable_type, generics)),
            _ => None,
        })
        .collect();
    format!("{name}({})", types.join(","))
}

pub fn function(name: &str, generic_params: &[Node], params: &[Node]) -> String {
    signature(name, params, &generic_names(generic_params))
}

pub fn constructor(class_generics: &[Node], params: &[Node]) -> String {
    signature("new", params, &generic_names(class_generics))
}

/// Signature of a function or constructor node; `None` for anything else.
///
/// Constructors need the generic list of their class, which the node
/// itself does not carry.
pub fn of_node(node: &Node, class_generics: &[Node]) -> Option<String> {
    match &node.data {
        NodeData::FunctionDecl {
            identifier,
            generic_params,
            params,
            ..
        }
        | NodeData::EmptyFunctionDecl {
            identifier,
            generic_params,
            params,
            ..
        } => Some(function(&identifier.lexeme, generic_params, params)),
        NodeData::Constructor { params, .. } => Some(constructor(class_generics, params)),
        _ => None,
    }
}
