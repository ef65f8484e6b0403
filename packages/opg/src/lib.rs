pub mod error;
pub mod grammars;
pub mod language;
pub mod precedence;
