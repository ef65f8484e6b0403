use opg::{
    grammars::OperatorPrecedenceGrammar,
    precedence::{first_vt, last_vt, PrecedenceTable},
};

fn arithmetic_grammar() {
    let grammar = OperatorPrecedenceGrammar::parse(
        "E -> E + T | T\n\
         T -> T * F | F\n\
         F -> ( E ) | i",
    )
    .unwrap();

    println!("Grammar:\n{}", grammar.definition());

    let first = first_vt(&grammar).unwrap();
    for (nt, terminals) in &first {
        println!(
            "FirstVT({}) = {{{}}}",
            nt,
            terminals
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let last = last_vt(&grammar).unwrap();
    for (nt, terminals) in &last {
        println!(
            "LastVT({}) = {{{}}}",
            nt,
            terminals
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        );
    }

    let table = PrecedenceTable::try_from(&grammar).unwrap();
    println!("\nPrecedence Table:\n{}", table.relation_table());
}

fn conflicting_grammar() {
    let grammar = OperatorPrecedenceGrammar::parse(
        "S -> a B | A b\n\
         B -> b\n\
         A -> a",
    )
    .unwrap();

    println!("Grammar:\n{}", grammar.definition());

    match PrecedenceTable::try_from(&grammar) {
        Ok(table) => println!("Precedence Table:\n{}", table.relation_table()),
        Err(error) => println!("Error: {}", error),
    }
}

fn main() {
    arithmetic_grammar();
    conflicting_grammar();
}
