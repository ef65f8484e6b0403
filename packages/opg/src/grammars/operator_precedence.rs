use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

use crate::{
    error::OpgError,
    grammars::types::{NonTerminal, Production, ProductionSymbol, Terminal},
    language::Symbol,
};

/// End marker wrapped around the start symbol by the implicit augmenting rule.
pub const END_MARKER: &str = "$";

/// Left-hand side of the implicit augmenting rule `OPG_START -> $ <start> $`.
pub const AUGMENTED_START: &str = "OPG_START";

/// A context-free grammar restricted to the operator precedence class:
/// no production contains two consecutive nonterminals.
#[derive(Debug, Clone)]
pub struct OperatorPrecedenceGrammar {
    start_symbol: NonTerminal,
    terminals: IndexSet<Terminal>,
    non_terminals: IndexSet<NonTerminal>,
    productions: IndexMap<NonTerminal, Vec<Production>>,
}

impl OperatorPrecedenceGrammar {
    /// Parses a grammar from its textual form, one rule per line:
    /// `LHS -> tok tok | tok ...`, whitespace-delimited.
    ///
    /// The first rule's left-hand side is the start symbol; an augmenting
    /// rule `OPG_START -> $ <start> $` is inserted ahead of it so the end
    /// marker takes part in the VT sets.
    pub fn parse(text: &str) -> Result<Self, OpgError> {
        let mut raw: IndexMap<String, Vec<Vec<String>>> = IndexMap::new();
        let mut declared_start = None;

        for (lineno, line) in text.lines().enumerate() {
            let lineno = lineno + 1;
            let fields = line.split_whitespace().collect::<Vec<_>>();
            if fields.is_empty() {
                continue;
            }

            if declared_start.is_none() {
                declared_start = Some(fields[0].to_string());
                raw.insert(
                    AUGMENTED_START.to_string(),
                    vec![vec![
                        END_MARKER.to_string(),
                        fields[0].to_string(),
                        END_MARKER.to_string(),
                    ]],
                );
            }

            parse_rule(&fields, line, lineno, &mut raw)?;
        }

        let start_symbol = declared_start.ok_or_else(|| OpgError::GrammarFormat {
            line: 1,
            text: text.trim().to_string(),
        })?;

        Self::resolve(raw, start_symbol)
    }

    // Raw name lists are resolved in a single pass: every name that occurs
    // as a left-hand side is a nonterminal, everything else a terminal. The
    // same pass validates the operator precedence shape rule.
    fn resolve(
        raw: IndexMap<String, Vec<Vec<String>>>,
        start_symbol: String,
    ) -> Result<Self, OpgError> {
        let non_terminals = raw
            .keys()
            .map(|name| NonTerminal(Symbol::new(name.as_str())))
            .collect::<IndexSet<_>>();

        let mut terminals = IndexSet::new();
        let mut productions = IndexMap::with_capacity(raw.len());

        for (lhs, alternatives) in &raw {
            let lhs = NonTerminal(Symbol::new(lhs.as_str()));

            let mut resolved = Vec::with_capacity(alternatives.len());
            for names in alternatives {
                let mut symbols: Vec<ProductionSymbol> = Vec::with_capacity(names.len());
                for name in names {
                    let symbol = if raw.contains_key(name) {
                        ProductionSymbol::NonTerminal(NonTerminal(Symbol::new(name.as_str())))
                    } else {
                        let terminal = Terminal(Symbol::new(name.as_str()));
                        terminals.insert(terminal.clone());
                        ProductionSymbol::Terminal(terminal)
                    };

                    if let Some(previous) = symbols.last() {
                        if !previous.is_terminal() && !symbol.is_terminal() {
                            return Err(OpgError::InvalidGrammar {
                                lhs: lhs.to_string(),
                                production: names.iter().join(" "),
                            });
                        }
                    }

                    symbols.push(symbol);
                }
                resolved.push(Production(symbols));
            }

            productions.insert(lhs, resolved);
        }

        Ok(Self {
            start_symbol: NonTerminal(Symbol::new(start_symbol)),
            terminals,
            non_terminals,
            productions,
        })
    }

    pub fn start_symbol(&self) -> &NonTerminal {
        &self.start_symbol
    }

    pub fn terminals(&self) -> &IndexSet<Terminal> {
        &self.terminals
    }

    pub fn non_terminals(&self) -> &IndexSet<NonTerminal> {
        &self.non_terminals
    }

    pub fn productions(&self) -> &IndexMap<NonTerminal, Vec<Production>> {
        &self.productions
    }

    pub fn definition(&self) -> String {
        let mut definition = format!(
            "G = ({{{}}}, {{{}}}, P, {})\n\n",
            self.non_terminals.iter().join(", "),
            self.terminals.iter().join(", "),
            self.start_symbol
        );

        definition += "P = {\n";
        for (lhs, productions) in &self.productions {
            definition += &format!("  {} -> {}\n", lhs, productions.iter().join(" | "));
        }
        definition += "}\n";

        definition
    }
}

fn parse_rule(
    fields: &[&str],
    line: &str,
    lineno: usize,
    raw: &mut IndexMap<String, Vec<Vec<String>>>,
) -> Result<(), OpgError> {
    if fields.len() <= 2 || fields[1] != "->" {
        return Err(OpgError::GrammarFormat {
            line: lineno,
            text: line.trim().to_string(),
        });
    }

    let alternatives = raw.entry(fields[0].to_string()).or_default();

    let mut pos = 2;
    while pos < fields.len() {
        let mut names = Vec::new();
        while pos < fields.len() && fields[pos] != "|" {
            names.push(fields[pos].to_string());
            pos += 1;
        }
        if names.is_empty() {
            return Err(OpgError::GrammarFormat {
                line: lineno,
                text: line.trim().to_string(),
            });
        }
        alternatives.push(names);
        pos += 1;
    }

    Ok(())
}

impl TryFrom<&str> for OperatorPrecedenceGrammar {
    type Error = OpgError;

    fn try_from(text: &str) -> Result<Self, Self::Error> {
        Self::parse(text)
    }
}

#[cfg(test)]
mod tests {
    use matches::assert_matches;

    use super::*;

    const ARITHMETIC: &str = "E -> E + T | T\nT -> T * F | F\nF -> ( E ) | i";

    fn terminal(name: &str) -> Terminal {
        Terminal(Symbol::new(name))
    }

    fn non_terminal(name: &str) -> NonTerminal {
        NonTerminal(Symbol::new(name))
    }

    #[test]
    fn parses_arithmetic_grammar() {
        let grammar = OperatorPrecedenceGrammar::parse(ARITHMETIC).unwrap();

        assert_eq!(grammar.start_symbol(), &non_terminal("E"));
        assert_eq!(
            grammar.non_terminals().iter().cloned().collect::<Vec<_>>(),
            vec![
                non_terminal(AUGMENTED_START),
                non_terminal("E"),
                non_terminal("T"),
                non_terminal("F"),
            ]
        );
        assert_eq!(
            grammar.terminals().iter().cloned().collect::<Vec<_>>(),
            vec![
                terminal(END_MARKER),
                terminal("+"),
                terminal("*"),
                terminal("("),
                terminal(")"),
                terminal("i"),
            ]
        );
    }

    #[test]
    fn inserts_augmenting_rule_first() {
        let grammar = OperatorPrecedenceGrammar::parse(ARITHMETIC).unwrap();

        let (lhs, productions) = grammar.productions().first().unwrap();
        assert_eq!(lhs, &non_terminal(AUGMENTED_START));
        assert_eq!(productions.len(), 1);
        assert_eq!(productions[0].to_string(), "$ E $");
    }

    #[test]
    fn repeated_lhs_lines_append_productions() {
        let grammar = OperatorPrecedenceGrammar::parse("E -> a\nE -> b").unwrap();

        let productions = &grammar.productions()[&non_terminal("E")];
        assert_eq!(productions.len(), 2);
        assert_eq!(productions[0].to_string(), "a");
        assert_eq!(productions[1].to_string(), "b");
    }

    #[test]
    fn missing_arrow_is_a_format_error() {
        let error = OperatorPrecedenceGrammar::parse("A B").unwrap_err();
        assert_matches!(error, OpgError::GrammarFormat { line: 1, .. });
    }

    #[test]
    fn format_errors_cite_the_offending_line() {
        let error = OperatorPrecedenceGrammar::parse("E -> a\n\nE oops").unwrap_err();
        assert_eq!(
            error,
            OpgError::GrammarFormat {
                line: 3,
                text: "E oops".to_string(),
            }
        );
    }

    #[test]
    fn empty_alternative_is_a_format_error() {
        let error = OperatorPrecedenceGrammar::parse("E -> a | | b").unwrap_err();
        assert_matches!(error, OpgError::GrammarFormat { line: 1, .. });
    }

    #[test]
    fn trailing_pipe_is_tolerated() {
        let grammar = OperatorPrecedenceGrammar::parse("E -> a |").unwrap();
        assert_eq!(grammar.productions()[&non_terminal("E")].len(), 1);
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_matches!(
            OperatorPrecedenceGrammar::parse("\n\n"),
            Err(OpgError::GrammarFormat { line: 1, .. })
        );
    }

    #[test]
    fn consecutive_nonterminals_are_rejected() {
        let error = OperatorPrecedenceGrammar::parse("A -> B C\nB -> b\nC -> c").unwrap_err();
        assert_eq!(
            error,
            OpgError::InvalidGrammar {
                lhs: "A".to_string(),
                production: "B C".to_string(),
            }
        );
    }

    #[test]
    fn renders_definition() {
        let grammar = OperatorPrecedenceGrammar::parse("S -> a S b | c").unwrap();

        let definition = grammar.definition();
        assert!(definition.starts_with("G = ({OPG_START, S}, {$, a, b, c}, P, S)"));
        assert!(definition.contains("  S -> a S b | c\n"));
    }
}
