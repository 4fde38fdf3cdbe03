use crate::lexer::Token;

use super::Node;

/// Discriminant of every node variant.
///
/// Variants are grouped in four contiguous ranges (declarations,
/// expressions, statements, other) so classification is a range check.
/// New kinds must be inserted inside the range they belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum NodeKind {
    // Declarations
    EmptyVariableDecl,
    VariableDecl,
    EmptyFunctionDecl,
    FunctionDecl,
    ClassDecl,
    ImportDecl,

    // Expressions
    AssignmentExpr,
    WrappedExpr,
    UnaryExpr,
    BinaryExpr,
    CallExpr,
    IndexExpr,
    MemberExpr,
    NewExpr,
    InstanceofExpr,
    AsyncExpr,
    ArrayExpr,
    IfExpr,
    ElseExpr,
    Identifier,
    This,
    Super,
    NumberLiteral,
    StringLiteral,
    BooleanLiteral,

    // Statements
    IfStmt,
    ElseStmt,
    SwitchStmt,
    ForStmt,
    RepeatStmt,
    WhileStmt,
    TryStmt,
    ThrowStmt,
    ReturnStmt,
    YieldStmt,
    ExpressionStmt,
    BreakStmt,
    ContinueStmt,
    FallthroughStmt,

    // Other
    Program,
    VariableType,
    Parameter,
    GenericParam,
    ClassProp,
    Constructor,
    ImportExpose,
    SwitchCase,
    CatchClause,
}

impl NodeKind {
    /// Every kind in discriminant order.
    pub const ALL: [NodeKind; 48] = [
        NodeKind::EmptyVariableDecl,
        NodeKind::VariableDecl,
        NodeKind::EmptyFunctionDecl,
        NodeKind::FunctionDecl,
        NodeKind::ClassDecl,
        NodeKind::ImportDecl,
        NodeKind::AssignmentExpr,
        NodeKind::WrappedExpr,
        NodeKind::UnaryExpr,
        NodeKind::BinaryExpr,
        NodeKind::CallExpr,
        NodeKind::IndexExpr,
        NodeKind::MemberExpr,
        NodeKind::NewExpr,
        NodeKind::InstanceofExpr,
        NodeKind::AsyncExpr,
        NodeKind::ArrayExpr,
        NodeKind::IfExpr,
        NodeKind::ElseExpr,
        NodeKind::Identifier,
        NodeKind::This,
        NodeKind::Super,
        NodeKind::NumberLiteral,
        NodeKind::StringLiteral,
        NodeKind::BooleanLiteral,
        NodeKind::IfStmt,
        NodeKind::ElseStmt,
        NodeKind::SwitchStmt,
        NodeKind::ForStmt,
        NodeKind::RepeatStmt,
        NodeKind::WhileStmt,
        NodeKind::TryStmt,
        NodeKind::ThrowStmt,
        NodeKind::ReturnStmt,
        NodeKind::YieldStmt,
        NodeKind::ExpressionStmt,
        NodeKind::BreakStmt,
        NodeKind::ContinueStmt,
        NodeKind::FallthroughStmt,
        NodeKind::Program,
        NodeKind::VariableType,
        NodeKind::Parameter,
        NodeKind::GenericParam,
        NodeKind::ClassProp,
        NodeKind::Constructor,
        NodeKind::ImportExpose,
        NodeKind::SwitchCase,
        NodeKind::CatchClause,
    ];

    pub fn is_declaration(self) -> bool {
        in_range(self, NodeKind::EmptyVariableDecl, NodeKind::ImportDecl)
    }

    pub fn is_expression(self) -> bool {
        in_range(self, NodeKind::AssignmentExpr, NodeKind::BooleanLiteral)
    }

    pub fn is_statement(self) -> bool {
        in_range(self, NodeKind::IfStmt, NodeKind::FallthroughStmt)
    }

    pub fn is_other(self) -> bool {
        in_range(self, NodeKind::Program, NodeKind::CatchClause)
    }
}

fn in_range(kind: NodeKind, first: NodeKind, last: NodeKind) -> bool {
    (first as u8..=last as u8).contains(&(kind as u8))
}

/// Payload of a node.
///
/// Names introduced by a declaration are kept as [`Token`]s, so every
/// [`NodeData::Identifier`] in a tree is a reference to a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    // Declarations
    EmptyVariableDecl {
        identifier: Token,
        variable_type: Option<Box<Node>>,
    },
    VariableDecl {
        identifier: Token,
        variable_type: Option<Box<Node>>,
        value: Box<Node>,
    },
    EmptyFunctionDecl {
        identifier: Token,
        generic_params: Vec<Node>,
        params: Vec<Node>,
        return_type: Option<Box<Node>>,
    },
    FunctionDecl {
        identifier: Token,
        generic_params: Vec<Node>,
        params: Vec<Node>,
        return_type: Option<Box<Node>>,
        body: Vec<Node>,
    },
    ClassDecl {
        identifier: Token,
        generic_params: Vec<Node>,
        extends: Vec<Node>,
        constructors: Vec<Node>,
        static_body: Vec<Node>,
        instance_body: Vec<Node>,
    },
    ImportDecl {
        path: Vec<Token>,
        rename: Option<Token>,
        expose: Vec<Node>,
    },

    // Expressions
    AssignmentExpr {
        target: Box<Node>,
        value: Box<Node>,
    },
    WrappedExpr {
        inner: Box<Node>,
    },
    UnaryExpr {
        operator: Token,
        operand: Box<Node>,
    },
    BinaryExpr {
        left: Box<Node>,
        operator: Token,
        right: Box<Node>,
    },
    CallExpr {
        callee: Box<Node>,
        generic_args: Vec<Node>,
        args: Vec<Node>,
    },
    IndexExpr {
        object: Box<Node>,
        index: Box<Node>,
    },
    MemberExpr {
        object: Box<Node>,
        property: Token,
    },
    NewExpr {
        class_type: Box<Node>,
        args: Vec<Node>,
    },
    InstanceofExpr {
        value: Box<Node>,
        class_type: Box<Node>,
    },
    AsyncExpr {
        inner: Box<Node>,
    },
    ArrayExpr {
        elements: Vec<Node>,
    },
    IfExpr {
        condition: Box<Node>,
        body: Vec<Node>,
        else_clause: Option<Box<Node>>,
    },
    ElseExpr {
        body: Vec<Node>,
    },
    Identifier(Token),
    This,
    Super,
    NumberLiteral(Token),
    StringLiteral(Token),
    BooleanLiteral(Token),

    // Statements
    IfStmt {
        condition: Box<Node>,
        body: Vec<Node>,
        else_clause: Option<Box<Node>>,
    },
    ElseStmt {
        body: Vec<Node>,
    },
    SwitchStmt {
        subject: Box<Node>,
        cases: Vec<Node>,
    },
    ForStmt {
        identifier: Token,
        variable_type: Option<Box<Node>>,
        iterable: Box<Node>,
        body: Vec<Node>,
    },
    RepeatStmt {
        amount: Box<Node>,
        body: Vec<Node>,
    },
    WhileStmt {
        condition: Box<Node>,
        body: Vec<Node>,
    },
    TryStmt {
        body: Vec<Node>,
        catch_clause: Box<Node>,
    },
    ThrowStmt {
        value: Box<Node>,
    },
    ReturnStmt {
        value: Option<Box<Node>>,
    },
    YieldStmt {
        value: Box<Node>,
    },
    ExpressionStmt {
        expression: Box<Node>,
    },
    BreakStmt,
    ContinueStmt,
    FallthroughStmt,

    // Other
    Program {
        body: Vec<Node>,
    },
    /// A type annotation such as `a.b.List<T>[][]`.
    VariableType {
        path: Vec<Token>,
        generics: Vec<Node>,
        array_depth: u32,
    },
    Parameter {
        identifier: Token,
        variable_type: Box<Node>,
    },
    GenericParam {
        identifier: Token,
        extends: Option<Box<Node>>,
    },
    /// A member of a class body, wrapping the member declaration.
    ClassProp {
        is_static: bool,
        value: Box<Node>,
    },
    Constructor {
        params: Vec<Node>,
        body: Vec<Node>,
    },
    ImportExpose {
        value: Token,
        rename: Option<Token>,
    },
    SwitchCase {
        conditions: Vec<Node>,
        body: Vec<Node>,
    },
    CatchClause {
        identifier: Token,
        variable_type: Option<Box<Node>>,
        body: Vec<Node>,
    },
}

impl NodeData {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::EmptyVariableDecl { .. } => NodeKind::EmptyVariableDecl,
            NodeData::VariableDecl { .. } => NodeKind::VariableDecl,
            NodeData::EmptyFunctionDecl { .. } => NodeKind::EmptyFunctionDecl,
            NodeData::FunctionDecl { .. } => NodeKind::FunctionDecl,
            NodeData::ClassDecl { .. } => NodeKind::ClassDecl,
            NodeData::ImportDecl { .. } => NodeKind::ImportDecl,
            NodeData::AssignmentExpr { .. } => NodeKind::AssignmentExpr,
            NodeData::WrappedExpr { .. } => NodeKind::WrappedExpr,
            NodeData::UnaryExpr { .. } => NodeKind::UnaryExpr,
            NodeData::BinaryExpr { .. } => NodeKind::BinaryExpr,
            NodeData::CallExpr { .. } => NodeKind::CallExpr,
            NodeData::IndexExpr { .. } => NodeKind::IndexExpr,
            NodeData::MemberExpr { .. } => NodeKind::MemberExpr,
            NodeData::NewExpr { .. } => NodeKind::NewExpr,
            NodeData::InstanceofExpr { .. } => NodeKind::InstanceofExpr,
            NodeData::AsyncExpr { .. } => NodeKind::AsyncExpr,
            NodeData::ArrayExpr { .. } => NodeKind::ArrayExpr,
            NodeData::IfExpr { .. } => NodeKind::IfExpr,
            NodeData::ElseExpr { .. } => NodeKind::ElseExpr,
            NodeData::Identifier(_) => NodeKind::Identifier,
            NodeData::This => NodeKind::This,
            NodeData::Super => NodeKind::Super,
            NodeData::NumberLiteral(_) => NodeKind::NumberLiteral,
            NodeData::StringLiteral(_) => NodeKind::StringLiteral,
            NodeData::BooleanLiteral(_) => NodeKind::BooleanLiteral,
            NodeData::IfStmt { .. } => NodeKind::IfStmt,
            NodeData::ElseStmt { .. } => NodeKind::ElseStmt,
            NodeData::SwitchStmt { .. } => NodeKind::SwitchStmt,
            NodeData::ForStmt { .. } => NodeKind::ForStmt,
            NodeData::RepeatStmt { .. } => NodeKind::RepeatStmt,
            NodeData::WhileStmt { .. } => NodeKind::WhileStmt,
            NodeData::TryStmt { .. } => NodeKind::TryStmt,
            NodeData::ThrowStmt { .. } => NodeKind::ThrowStmt,
            NodeData::ReturnStmt { .. } => NodeKind::ReturnStmt,
            NodeData::YieldStmt { .. } => NodeKind::YieldStmt,
            NodeData::ExpressionStmt { .. } => NodeKind::ExpressionStmt,
            NodeData::BreakStmt => NodeKind::BreakStmt,
            NodeData::ContinueStmt => NodeKind::ContinueStmt,
            NodeData::FallthroughStmt => NodeKind::FallthroughStmt,
            NodeData::Program { .. } => NodeKind::Program,
            NodeData::VariableType { .. } => NodeKind::VariableType,
            NodeData::Parameter { .. } => NodeKind::Parameter,
            NodeData::GenericParam { .. } => NodeKind::GenericParam,
            NodeData::ClassProp { .. } => NodeKind::ClassProp,
            NodeData::Constructor { .. } => NodeKind::Constructor,
            NodeData::ImportExpose { .. } => NodeKind::ImportExpose,
            NodeData::SwitchCase { .. } => NodeKind::SwitchCase,
            NodeData::CatchClause { .. } => NodeKind::CatchClause,
        }
    }
}
