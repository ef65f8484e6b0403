use std::fmt::Display;

use derive_more::Display;
use itertools::Itertools;

use crate::language::Symbol;

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Terminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NonTerminal(pub Symbol);

#[derive(Debug, Display, Clone, PartialEq, Eq, Hash)]
pub enum ProductionSymbol {
    Terminal(Terminal),
    NonTerminal(NonTerminal),
}

impl ProductionSymbol {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProductionSymbol::Terminal(_))
    }

    pub fn symbol(&self) -> &Symbol {
        match self {
            ProductionSymbol::Terminal(Terminal(s)) => s,
            ProductionSymbol::NonTerminal(NonTerminal(s)) => s,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Production(pub Vec<ProductionSymbol>);

impl Production {
    pub fn symbols(&self) -> &[ProductionSymbol] {
        &self.0
    }
}

impl Display for Production {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(" "))
    }
}
