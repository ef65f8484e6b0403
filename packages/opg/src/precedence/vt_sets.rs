use indexmap::{IndexMap, IndexSet};

use crate::{
    error::OpgError,
    grammars::{
        operator_precedence::OperatorPrecedenceGrammar,
        types::{NonTerminal, Production, ProductionSymbol, Terminal},
    },
};

/// Terminal-closure sets, one per nonterminal. Membership order carries no
/// meaning.
pub type VtSets = IndexMap<NonTerminal, IndexSet<Terminal>>;

/// Any finite grammar converges within |nonterminals| sweeps; hitting this
/// cap means the closure loop itself is broken.
pub const MAX_CLOSURE_SWEEPS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanDirection {
    Forward,
    Backward,
}

impl ScanDirection {
    // The first two symbols in scan order; only these two can contribute
    // to the VT set of the production's left-hand side.
    fn leading_pair(self, production: &Production) -> (&ProductionSymbol, Option<&ProductionSymbol>) {
        let symbols = production.symbols();
        match self {
            ScanDirection::Forward => (&symbols[0], symbols.get(1)),
            ScanDirection::Backward => (
                &symbols[symbols.len() - 1],
                symbols.len().checked_sub(2).map(|i| &symbols[i]),
            ),
        }
    }
}

/// FIRST_VT: for each nonterminal, the terminals that can appear first in
/// some derivation from it.
pub fn first_vt(grammar: &OperatorPrecedenceGrammar) -> Result<VtSets, OpgError> {
    generate_vt(grammar, ScanDirection::Forward)
}

/// LAST_VT: for each nonterminal, the terminals that can appear last in
/// some derivation from it.
pub fn last_vt(grammar: &OperatorPrecedenceGrammar) -> Result<VtSets, OpgError> {
    generate_vt(grammar, ScanDirection::Backward)
}

fn generate_vt(
    grammar: &OperatorPrecedenceGrammar,
    direction: ScanDirection,
) -> Result<VtSets, OpgError> {
    let mut vt = grammar
        .non_terminals()
        .iter()
        .map(|nt| (nt.clone(), IndexSet::new()))
        .collect::<VtSets>();

    // An edge (P, Q) means VT(P) must eventually include all of VT(Q).
    let mut containment = IndexSet::new();

    for (lhs, productions) in grammar.productions() {
        for production in productions {
            let (head, next) = direction.leading_pair(production);
            match head {
                ProductionSymbol::Terminal(terminal) => {
                    vt[lhs].insert(terminal.clone());
                }
                ProductionSymbol::NonTerminal(nt) => {
                    // A self-edge carries no new information.
                    if nt != lhs {
                        containment.insert((lhs.clone(), nt.clone()));
                    }
                    if let Some(ProductionSymbol::Terminal(terminal)) = next {
                        vt[lhs].insert(terminal.clone());
                    }
                }
            }
        }
    }

    close(&mut vt, &containment, MAX_CLOSURE_SWEEPS)?;

    Ok(vt)
}

// Sweeps all containment edges until a full sweep adds nothing. Returns the
// number of sweeps taken.
fn close(
    vt: &mut VtSets,
    containment: &IndexSet<(NonTerminal, NonTerminal)>,
    max_sweeps: usize,
) -> Result<usize, OpgError> {
    let mut sweeps = 0;

    loop {
        sweeps += 1;
        if sweeps > max_sweeps {
            return Err(OpgError::ClosureDivergence { max_sweeps });
        }

        let mut changed = false;
        for (target, source) in containment {
            if target == source {
                continue;
            }

            let missing = match vt.get(source) {
                Some(set) => set
                    .iter()
                    .filter(|terminal| !vt[target].contains(*terminal))
                    .cloned()
                    .collect::<Vec<_>>(),
                None => continue,
            };

            if !missing.is_empty() {
                changed = true;
                vt[target].extend(missing);
            }
        }

        if !changed {
            return Ok(sweeps);
        }
    }
}
