//! Rules shipped with the linter.

mod class_at_top_level;
mod illegal_control_statement;
mod illegal_if;
mod illegal_redeclaration;
mod invalid_class_body;
mod no_undefined;

pub use class_at_top_level::ClassAtTopLevel;
pub use illegal_control_statement::IllegalControlStatement;
pub use illegal_if::IllegalIf;
pub use illegal_redeclaration::IllegalRedeclaration;
pub use invalid_class_body::InvalidClassBody;
pub use no_undefined::NoUndefined;
