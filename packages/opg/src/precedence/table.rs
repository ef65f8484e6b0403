use derive_more::Display;
use indexmap::{map::Entry, IndexMap, IndexSet};
use itertools::Itertools;
use tabled::{builder::Builder, settings::Style};

use crate::{
    error::OpgError,
    grammars::{
        operator_precedence::OperatorPrecedenceGrammar,
        types::{Production, ProductionSymbol, Terminal},
    },
    precedence::vt_sets::{first_vt, last_vt, VtSets},
};

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Precedence {
    #[display("<")]
    Lower,
    #[display("=")]
    Equal,
    #[display(">")]
    Higher,
}

/// The operator precedence table: one relation per ordered terminal pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrecedenceTable {
    terminals: IndexSet<Terminal>,
    relations: IndexMap<(Terminal, Terminal), Precedence>,
}

impl PrecedenceTable {
    pub fn terminals(&self) -> &IndexSet<Terminal> {
        &self.terminals
    }

    pub fn relations(&self) -> &IndexMap<(Terminal, Terminal), Precedence> {
        &self.relations
    }

    pub fn relation(&self, left: &Terminal, right: &Terminal) -> Option<Precedence> {
        self.relations.get(&(left.clone(), right.clone())).copied()
    }

    // Re-asserting the identical relation is a no-op; asserting a different
    // one for the same pair means the grammar is not a valid OPG.
    fn insert_relation(
        &mut self,
        left: Terminal,
        right: Terminal,
        relation: Precedence,
    ) -> Result<(), OpgError> {
        match self.relations.entry((left, right)) {
            Entry::Occupied(entry) => {
                let existing = *entry.get();
                if existing == relation {
                    Ok(())
                } else {
                    let (left, right) = entry.key().clone();
                    Err(OpgError::PrecedenceConflict {
                        left,
                        right,
                        existing,
                        attempted: relation,
                    })
                }
            }
            Entry::Vacant(entry) => {
                entry.insert(relation);
                Ok(())
            }
        }
    }

    // Every ordered position pair (i < j) is scanned once; the rule fired
    // depends only on the kinds of the two endpoints. In particular two
    // terminals are declared Equal even when other symbols lie strictly
    // between them.
    fn derive_from_production(
        &mut self,
        production: &Production,
        first_vt: &VtSets,
        last_vt: &VtSets,
    ) -> Result<(), OpgError> {
        for (left, right) in production.symbols().iter().tuple_combinations::<(_, _)>() {
            match (left, right) {
                (ProductionSymbol::Terminal(a), ProductionSymbol::Terminal(b)) => {
                    self.insert_relation(a.clone(), b.clone(), Precedence::Equal)?;
                }
                (ProductionSymbol::Terminal(a), ProductionSymbol::NonTerminal(q)) => {
                    for terminal in first_vt.get(q).into_iter().flatten() {
                        self.insert_relation(a.clone(), terminal.clone(), Precedence::Lower)?;
                    }
                }
                (ProductionSymbol::NonTerminal(p), ProductionSymbol::Terminal(b)) => {
                    for terminal in last_vt.get(p).into_iter().flatten() {
                        self.insert_relation(terminal.clone(), b.clone(), Precedence::Higher)?;
                    }
                }
                (ProductionSymbol::NonTerminal(_), ProductionSymbol::NonTerminal(_)) => {}
            }
        }

        Ok(())
    }

    pub fn relation_table(&self) -> String {
        let mut builder = Builder::default();

        builder.push_record(
            std::iter::once(String::new()).chain(self.terminals.iter().map(ToString::to_string)),
        );

        for left in &self.terminals {
            builder.push_record(std::iter::once(left.to_string()).chain(
                self.terminals.iter().map(|right| {
                    self.relation(left, right)
                        .map(|relation| relation.to_string())
                        .unwrap_or_default()
                }),
            ));
        }

        let mut table = builder.build();
        table.with(Style::rounded());

        table.to_string()
    }
}

impl TryFrom<&OperatorPrecedenceGrammar> for PrecedenceTable {
    type Error = OpgError;

    /// Builds the precedence table from both closed VT maps, scanning every
    /// production of every nonterminal. Fails fast: no partial table is
    /// returned on error.
    fn try_from(grammar: &OperatorPrecedenceGrammar) -> Result<Self, Self::Error> {
        let first = first_vt(grammar)?;
        let last = last_vt(grammar)?;

        let mut table = PrecedenceTable {
            terminals: grammar.terminals().clone(),
            relations: IndexMap::new(),
        };

        for productions in grammar.productions().values() {
            for production in productions {
                table.derive_from_production(production, &first, &last)?;
            }
        }

        Ok(table)
    }
}
