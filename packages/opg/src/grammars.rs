pub mod operator_precedence;
pub mod types;

pub use operator_precedence::OperatorPrecedenceGrammar;
pub use types::{NonTerminal, Production, ProductionSymbol, Terminal};
