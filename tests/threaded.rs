use std::sync::Arc;
use std::thread;

use fraudrule::{count_all, field, AstNode, CompileError, Compiler, ErrorKind, Field, RuleCategory};

#[test]
fn compile_across_threads() {
    let compiler = Arc::new(Compiler::new().max_depth(16));

    let jobs: Vec<(&'static str, RuleCategory)> = vec![
        ("AMOUNT > 1000", RuleCategory::Threshold),
        ("COUNT(*) >= 10", RuleCategory::Pattern),
        ("AMOUNT > 100 AND TIME = 'night'", RuleCategory::Composite),
        ("FOO > 1", RuleCategory::Threshold),
        ("AMOUNT > 5", RuleCategory::Pattern),
    ];

    let handles: Vec<_> = jobs
        .into_iter()
        .map(|(text, category)| {
            let c = Arc::clone(&compiler);
            thread::spawn(move || c.compile(text, category))
        })
        .collect();

    let results: Vec<Result<AstNode, CompileError>> =
        handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(results[0], Ok(field(Field::Amount).gt(1000)));
    assert_eq!(results[1], Ok(count_all().gte(10)));
    assert_eq!(
        results[2],
        Ok(field(Field::Amount).gt(100).and(field(Field::Time).eq("night")))
    );
    assert_eq!(
        results[3].as_ref().map_err(CompileError::kind),
        Err(ErrorKind::UnknownField)
    );
    assert_eq!(
        results[4].as_ref().map_err(CompileError::kind),
        Err(ErrorKind::CategoryConstraint)
    );
}

#[test]
fn concurrent_compiles_are_identical() {
    let compiler = Arc::new(Compiler::new());
    let text = "NOT (AMOUNT > 1 OR LOCATION = 'moscow') AND DEVICE_USED != 'atm'";

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let c = Arc::clone(&compiler);
            thread::spawn(move || {
                (0..100)
                    .map(|_| c.compile(text, RuleCategory::Composite))
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let all: Vec<_> = handles
        .into_iter()
        .flat_map(|h| h.join().unwrap())
        .collect();
    assert_eq!(all.len(), 800);
    assert!(all[0].is_ok());
    assert!(all.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn compiler_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Compiler>();
    assert_send_sync::<AstNode>();
    assert_send_sync::<CompileError>();
}
