use fraudrule::{compile, RuleCategory};

fn main() {
    let rules = [
        ("AMOUNT > 1000", RuleCategory::Threshold),
        ("COUNT(*) >= 10", RuleCategory::Pattern),
        ("amount > 100 and time = 'night'", RuleCategory::Composite),
        ("AMOUNT > 100 OR AMOUNT", RuleCategory::Composite),
        ("FOO > 1", RuleCategory::Threshold),
    ];

    for (text, category) in rules {
        match compile(text, category) {
            Ok(ast) => {
                println!("{:<9} {text}", category.as_str());
                println!("          canonical: {ast}");
                println!("          fields:    {:?}", ast.fields());
                #[cfg(feature = "json")]
                match fraudrule::to_json_string(&ast) {
                    Ok(doc) => println!("          document:  {doc}"),
                    Err(e) => println!("          document:  {e}"),
                }
            }
            Err(e) => println!("{:<9} {text}\n          error: {e}", category.as_str()),
        }
    }
}
