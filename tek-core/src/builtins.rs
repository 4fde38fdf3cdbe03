//! Native names that every Tek program can refer to.
//!
//! The linter treats every entry as declared, so references to these names
//! are never reported as undefined. Users can add more names through
//! [`LintConfig::globals`](crate::lint::LintConfig).

/// Builtin types, then builtin functions, as written in Tek source.
pub const BUILTINS: &[&str] = &[
    "any", "int", "number", "string", "boolean", "void", "Array", "Object", "Error", "print",
    "input", "len",
];

pub fn names() -> impl Iterator<Item = &'static str> {
    BUILTINS.iter().copied()
}
