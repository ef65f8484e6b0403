use derive_more::{Display, Error};

use crate::{grammars::types::Terminal, precedence::table::Precedence};

#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum OpgError {
    #[display("incorrect grammar format in line {line}: {text}")]
    GrammarFormat { line: usize, text: String },

    #[display("invalid grammar: consecutive nonterminals in production {lhs} -> {production}")]
    InvalidGrammar { lhs: String, production: String },

    #[display("VT closure did not converge within {max_sweeps} sweep(s)")]
    ClosureDivergence { max_sweeps: usize },

    #[display(
        "conflicting precedence relations for ({left}, {right}): already '{existing}', also derived '{attempted}'"
    )]
    PrecedenceConflict {
        left: Terminal,
        right: Terminal,
        existing: Precedence,
        attempted: Precedence,
    },
}
