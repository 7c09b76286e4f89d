
use fraudrule::{compile, AstNode, CompileError, ErrorKind, Literal, LogicOp, RuleCategory};
use proptest::prelude::*;
use strategies::{arb_comparison, arb_composite, arb_condition, arb_pattern, comparisons};

// ---------------------------------------------------------------------------
// Invariant 1: Idempotence
//
// Compiling the same text and category twice yields deeply equal trees.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn idempotent_composite(node in arb_composite()) {
        let text = node.to_string();
        let first = compile(&text, RuleCategory::Composite);
        for _ in 0..3 {
            let again = compile(&text, RuleCategory::Composite);
            prop_assert_eq!(&first, &again, "recompiling {} changed the result", text);
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Canonical text
//
// Display output compiles back to an equal tree for every category.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn display_recompiles_threshold(node in arb_comparison()) {
        let text = node.to_string();
        let compiled = compile(&text, RuleCategory::Threshold);
        prop_assert_eq!(compiled, Ok(node), "text: {}", text);
    }

    #[test]
    fn display_recompiles_pattern(node in arb_pattern()) {
        let text = node.to_string();
        let compiled = compile(&text, RuleCategory::Pattern);
        prop_assert_eq!(compiled, Ok(node), "text: {}", text);
    }

    #[test]
    fn display_recompiles_composite(node in arb_composite()) {
        let text = node.to_string();
        let compiled = compile(&text, RuleCategory::Composite);
        prop_assert_eq!(compiled, Ok(node), "text: {}", text);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Integer classification
//
// Integers in the signed 32-bit range use the narrow literal, the rest of the
// 64-bit range uses the wide one.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn integer_width(value in any::<i64>()) {
        let ast = compile(&format!("AMOUNT = {value}"), RuleCategory::Threshold).unwrap();
        let literal = ast.as_comparison().and_then(|c| c.right.as_literal()).cloned();
        let expected = match i32::try_from(value) {
            Ok(narrow) => Literal::Int32(narrow),
            Err(_) => Literal::Int64(value),
        };
        prop_assert_eq!(literal, Some(expected));
    }

    #[test]
    fn fractional_numbers_are_float(value in -1.0e9_f64..1.0e9) {
        prop_assume!(value.fract() != 0.0);
        let ast = compile(&format!("AMOUNT < {value}"), RuleCategory::Threshold).unwrap();
        let literal = ast.as_comparison().and_then(|c| c.right.as_literal()).cloned();
        prop_assert_eq!(literal, Some(Literal::Float(value)));
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Flattening
//
// An unparenthesized chain of N comparisons joined by one operator becomes a
// single logical node with N operands.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn same_operator_chain_is_flat(
        parts in prop::collection::vec(arb_comparison(), 2..8),
        use_and in any::<bool>(),
    ) {
        let (op, word) = if use_and { (LogicOp::And, " AND ") } else { (LogicOp::Or, " OR ") };
        let text = parts.iter().map(ToString::to_string).collect::<Vec<_>>().join(word);
        let ast = compile(&text, RuleCategory::Composite).unwrap();
        let logical = ast.as_logical().unwrap();
        prop_assert_eq!(logical.operator(), op);
        prop_assert_eq!(logical.operands(), &parts[..]);
    }

    #[test]
    fn logical_arity_holds(node in arb_composite()) {
        let ast = compile(&node.to_string(), RuleCategory::Composite).unwrap();
        let mut ok = true;
        ast.walk(&mut |n| {
            if let AstNode::Logical(l) = n {
                ok &= match l.operator() {
                    LogicOp::Not => l.operands().len() == 1,
                    LogicOp::And | LogicOp::Or => l.operands().len() >= 2,
                };
            }
        });
        prop_assert!(ok);
        prop_assert_eq!(comparisons(&ast), comparisons(&node));
    }
}

// ---------------------------------------------------------------------------
// Invariant 5: Category constraints
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn composite_rejects_aggregates(node in arb_condition()) {
        let text = format!("{node} AND COUNT(AMOUNT) > 1");
        let err = compile(&text, RuleCategory::Composite).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::CategoryConstraint);
    }

    #[test]
    fn pattern_requires_aggregate(node in arb_comparison()) {
        let err = compile(&node.to_string(), RuleCategory::Pattern).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::CategoryConstraint);
    }

    #[test]
    fn threshold_rejects_logic(node in arb_composite()) {
        let err = compile(&node.to_string(), RuleCategory::Threshold).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::CategoryConstraint);
    }
}

// ---------------------------------------------------------------------------
// Invariant 6: Total function
//
// Arbitrary printable input never panics; it compiles or reports an error.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    #[test]
    fn arbitrary_input_never_panics(text in "[ -~]{0,80}", category in 0_usize..3) {
        let category = RuleCategory::ALL[category];
        match compile(&text, category) {
            Ok(_) | Err(CompileError::EmptyExpression) => {}
            Err(err) => prop_assert!(!err.to_string().is_empty()),
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 7: Document round trip
// ---------------------------------------------------------------------------

#[cfg(feature = "json")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn json_document_round_trip(node in arb_composite()) {
        let doc = fraudrule::to_document(&node).unwrap();
        prop_assert_eq!(fraudrule::from_document(doc).unwrap(), node);
    }
}
