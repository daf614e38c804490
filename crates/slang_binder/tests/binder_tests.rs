//! Binder integration tests.
//!
//! Parses slang source, binds it and checks the resolved symbols, types and
//! binding diagnostics.

use bumpalo::Bump;
use pretty_assertions::assert_eq;
use slang_binder::*;
use slang_core::text::SourceText;
use slang_diagnostics::{DiagnosticCollection, Severity};
use slang_parser::parse;

/// Helper: parse and bind `text`, then hand the tree and diagnostics to `f`.
fn with_tree<R>(text: &str, f: impl FnOnce(&BoundTree<'_>, &DiagnosticCollection) -> R) -> R {
    let arena = Bump::new();
    let source = SourceText::new("test.sl", text);
    let mut diagnostics = DiagnosticCollection::new();
    let unit = parse(&arena, &source, &mut diagnostics);
    let tree = Binder::bind(unit, &source, &mut diagnostics);
    f(&tree, &diagnostics)
}

/// Helper: the diagnostic codes produced for `text`.
fn bind_codes(text: &str) -> Vec<String> {
    with_tree(text, |_, diagnostics| {
        diagnostics.iter().map(|d| d.code.to_string()).collect()
    })
}

/// Helper: the diagnostic messages produced for `text`.
fn bind_messages(text: &str) -> Vec<String> {
    with_tree(text, |_, diagnostics| {
        diagnostics.iter().map(|d| d.message.clone()).collect()
    })
}

fn variable_type(tree: &BoundTree<'_>, id: SymbolId) -> TypeSymbol {
    tree.symbol(id).as_variable().expect("variable").ty
}

/// The initializer of the `index`-th global statement.
fn initializer<'t, 'a>(tree: &'t BoundTree<'a>, index: usize) -> &'t BoundExpression<'a> {
    match &tree.statements.statements[index] {
        BoundStatement::VariableDeclaration {
            initializer: Some(initializer),
            ..
        } => initializer,
        other => panic!("expected an initialized declaration, got {:?}", other),
    }
}

#[test]
fn test_well_formed_program_binds_cleanly() {
    let codes = bind_codes(
        "fun add(a: int, b: int): int { return a + b; }\n\
         var x = add(1, 2);\n\
         print(string(x));\n\
         print(x);\n\
         print(\"no newline\", false);\n\
         var name = input();",
    );
    assert!(codes.is_empty(), "{:?}", codes);
}

#[test]
fn test_literal_types() {
    with_tree(
        "var a = 1; var b = 1.5; var c = \"s\"; var d = true;",
        |tree, diagnostics| {
            assert!(diagnostics.is_empty());
            let types: Vec<_> = tree
                .globals
                .iter()
                .map(|&id| variable_type(tree, id))
                .collect();
            assert_eq!(
                types,
                vec![TypeSymbol::Int, TypeSymbol::Double, TypeSymbol::String, TypeSymbol::Bool]
            );
        },
    );
}

#[test]
fn test_globals_and_locals() {
    with_tree(
        "var g = 1; { var b = 2; } fun f() { var l = 3; }",
        |tree, diagnostics| {
            assert!(diagnostics.is_empty());
            assert_eq!(tree.globals.len(), 1);
            assert!(matches!(tree.symbol(tree.globals[0]), Symbol::GlobalVariable(_)));
            assert_eq!(tree.name_of(tree.globals[0]), "g");

            let (_, definition) = tree.definitions.first().expect("f");
            match &definition.body.statements[0] {
                BoundStatement::VariableDeclaration { variable, .. } => {
                    assert!(matches!(tree.symbol(*variable), Symbol::LocalVariable(_)));
                }
                other => panic!("unexpected {:?}", other),
            }
        },
    );
}

#[test]
fn test_parameters_are_local_variables() {
    with_tree(
        "fun f(a: int, b: double): double { return a + b; }",
        |tree, diagnostics| {
            assert!(diagnostics.is_empty());
            let (_, definition) = tree.definitions.first().expect("f");
            let types: Vec<_> = definition
                .parameters
                .iter()
                .map(|&id| variable_type(tree, id))
                .collect();
            assert_eq!(types, vec![TypeSymbol::Int, TypeSymbol::Double]);
            assert_eq!(definition.end_token.text, "}");
        },
    );
}

#[test]
fn test_mixed_arithmetic_widens_int_operand() {
    with_tree("var x = 1 + 2.5;", |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        assert_eq!(variable_type(tree, tree.globals[0]), TypeSymbol::Double);
        match &initializer(tree, 0).kind {
            BoundExpressionKind::Binary { left, right, .. } => {
                assert!(matches!(
                    left.kind,
                    BoundExpressionKind::Conversion {
                        conversion: Conversion::Implicit,
                        ..
                    }
                ));
                assert_eq!(left.ty, TypeSymbol::Double);
                assert!(matches!(right.kind, BoundExpressionKind::Literal(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    });
}

#[test]
fn test_declared_type_conversions() {
    assert!(bind_codes("var d: double = 1;").is_empty());
    assert_eq!(bind_codes("var i: int = 1.5;"), vec!["B0010"]);
    assert_eq!(bind_codes("var s: string = 1;"), vec!["B0010"]);
    assert_eq!(bind_codes("var b: bool = 1;"), vec!["B0009"]);
    assert_eq!(
        bind_messages("var b: bool = 1;"),
        vec!["Cannot convert type 'int' to 'bool'."]
    );
}

#[test]
fn test_explicit_conversion_calls() {
    assert!(bind_codes("var i = int(\"12\"); var d = double(i); var s = string(true);").is_empty());
    assert_eq!(bind_codes("var b = bool(1);"), vec!["B0009"]);
    assert_eq!(bind_codes("var x = int(1, 2);"), vec!["B0021"]);
    assert_eq!(bind_codes("var x = int();"), vec!["B0021"]);

    with_tree("var x = int(1);", |tree, _| {
        // An identity conversion leaves the operand as it is.
        assert!(matches!(
            initializer(tree, 0).kind,
            BoundExpressionKind::Literal(_)
        ));
    });
    with_tree("var x = int(\"7\");", |tree, _| {
        let expression = initializer(tree, 0);
        assert_eq!(expression.ty, TypeSymbol::Int);
        assert!(matches!(
            expression.kind,
            BoundExpressionKind::Conversion {
                conversion: Conversion::Explicit,
                ..
            }
        ));
        assert_eq!(expression.token.text, "7");
    });
}

#[test]
fn test_undefined_names() {
    assert_eq!(bind_codes("x = 1;"), vec!["B0001"]);
    assert_eq!(bind_codes("print(y);"), vec!["B0001"]);
    assert_eq!(bind_codes("foo();"), vec!["B0008"]);
    assert_eq!(bind_codes("var v: foo = 1;"), vec!["B0005"]);
    assert_eq!(bind_messages("foo();"), vec!["Undefined function 'foo'."]);
}

#[test]
fn test_errors_do_not_cascade() {
    assert_eq!(
        bind_codes("var x = y + 1;\nvar z = -x;\nprint(string(z * 2));\nif (x) print(\"a\");"),
        vec!["B0001"]
    );
}

#[test]
fn test_operator_errors() {
    assert_eq!(bind_codes("var x = 1 + true;"), vec!["B0002"]);
    assert_eq!(
        bind_messages("var x = 1 + true;"),
        vec!["Operator '+' cannot be applied to operands of type 'int' and 'bool'."]
    );
    assert_eq!(bind_codes("var y = !1;"), vec!["B0003"]);
    assert_eq!(bind_codes("var z = \"a\" - \"b\";"), vec!["B0002"]);
    assert!(bind_codes("var s = \"a\" + \"b\"; var e = s == \"ab\";").is_empty());
}

#[test]
fn test_overload_resolution_picks_best_candidate() {
    let text = "fun f(x: int): string { return \"int\"; }\n\
                fun f(x: double): string { return \"double\"; }\n\
                var a = f(1);\n\
                var b = f(1.5);";
    with_tree(text, |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        let name = tree.interner.get("f").expect("interned");
        let overloads = tree.functions.overloads(name);
        assert_eq!(overloads.len(), 2);

        for (index, expected) in [(0, overloads[0]), (1, overloads[1])] {
            match &initializer(tree, index).kind {
                BoundExpressionKind::Call { function, .. } => assert_eq!(*function, expected),
                other => panic!("unexpected {:?}", other),
            }
        }
    });
}

#[test]
fn test_exact_match_beats_implicit_conversion() {
    let text = "fun f(x: double): string { return \"double\"; }\n\
                fun f(x: int): string { return \"int\"; }\n\
                var a = f(1);";
    with_tree(text, |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        let name = tree.interner.get("f").expect("interned");
        let int_overload = tree.functions.overloads(name)[1];
        match &initializer(tree, 0).kind {
            BoundExpressionKind::Call { function, .. } => assert_eq!(*function, int_overload),
            other => panic!("unexpected {:?}", other),
        }
    });
}

#[test]
fn test_implicit_conversion_beats_explicit() {
    let text = "fun f(x: string) {}\nfun f(x: double) {}\nf(1);";
    with_tree(text, |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        let name = tree.interner.get("f").expect("interned");
        let double_overload = tree.functions.overloads(name)[1];
        match &tree.statements.statements[0] {
            BoundStatement::Expression(call) => match &call.kind {
                BoundExpressionKind::Call { function, .. } => assert_eq!(*function, double_overload),
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    });
}

#[test]
fn test_rndi_builtin() {
    with_tree("var r = rndi(6);", |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        let call = initializer(tree, 0);
        assert_eq!(call.ty, TypeSymbol::Int);
        match &call.kind {
            BoundExpressionKind::Call { function, .. } => {
                let function = tree.symbol(*function).as_function().expect("function");
                assert_eq!(function.builtin, Some(Builtin::Rndi));
            }
            other => panic!("unexpected {:?}", other),
        }
    });
    assert_eq!(bind_codes("rndi(true);"), vec!["B0007"]);
}

#[test]
fn test_overload_resolution_failures() {
    let text = "fun f(x: int) {}\nfun f(x: double) {}\nf(true);";
    assert_eq!(bind_codes(text), vec!["B0007"]);
    assert_eq!(
        bind_messages(text),
        vec!["No overload of 'f' accepts arguments (bool)."]
    );
    assert_eq!(bind_codes("fun g(a: int) {}\ng(1, 2);"), vec!["B0007"]);
}

#[test]
fn test_ties_go_to_the_earliest_declaration() {
    let text = "fun f(x: int) {}\nfun f(x: bool) {}\nf(\"s\");";
    with_tree(text, |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        let name = tree.interner.get("f").expect("interned");
        let first = tree.functions.overloads(name)[0];
        match &tree.statements.statements[0] {
            BoundStatement::Expression(call) => match &call.kind {
                BoundExpressionKind::Call { function, .. } => assert_eq!(*function, first),
                other => panic!("unexpected {:?}", other),
            },
            other => panic!("unexpected {:?}", other),
        }
    });
}

#[test]
fn test_duplicate_overload_is_rejected() {
    let text = "fun f(a: int) {}\nfun f(b: int) { undefined(); }";
    with_tree(text, |tree, diagnostics| {
        let codes: Vec<_> = diagnostics.iter().map(|d| d.code.to_string()).collect();
        // The rejected body is still checked.
        assert_eq!(codes, vec!["B0006", "B0008"]);
        assert_eq!(
            diagnostics.diagnostics()[0].message,
            "Function 'f' is already declared with the signature (int)."
        );
        assert_eq!(tree.definitions.len(), 1);
    });
}

#[test]
fn test_calls_resolve_regardless_of_declaration_order() {
    assert!(bind_codes("var x = g();\nfun g(): int { return h(); }\nfun h(): int { return 1; }").is_empty());
}

#[test]
fn test_declaration_errors() {
    assert_eq!(bind_codes("const c;"), vec!["B0013"]);
    assert_eq!(bind_codes("var v;"), vec!["B0014"]);
    assert_eq!(bind_codes("var v: void;"), vec!["B0015"]);
    assert_eq!(bind_codes("var a = 1; var a = 2;"), vec!["B0004"]);
    assert_eq!(
        bind_messages("var a = 1; var a = 2;"),
        vec!["Variable 'a' is already declared in this scope."]
    );
    assert_eq!(bind_codes("fun f(a: int, a: int) {}"), vec!["B0011"]);
    assert_eq!(bind_codes("fun f(a: void) {}"), vec!["B0015"]);
    assert_eq!(bind_codes("const c = 1; c = 2;"), vec!["B0012"]);
}

#[test]
fn test_return_checks() {
    assert_eq!(bind_codes("return;"), vec!["B0016"]);
    assert_eq!(bind_codes("fun f(): int { return; }"), vec!["B0017"]);
    assert_eq!(bind_codes("fun g() { return 1; }"), vec!["B0018"]);
    assert_eq!(bind_codes("fun h(): int { return \"s\"; }"), vec!["B0010"]);
    assert_eq!(bind_codes("fun k(): double { return 1; }"), Vec::<String>::new());
    assert_eq!(
        bind_messages("fun f(): int { return; }"),
        vec!["Function 'f' must return a value of type 'int'."]
    );
}

#[test]
fn test_void_value_cannot_be_used() {
    assert_eq!(bind_codes("var x = print(\"a\");"), vec!["B0019"]);
    assert_eq!(bind_codes("var y = 1 + print(\"a\");"), vec!["B0019"]);
    assert_eq!(bind_codes("fun f() {}\nprint(string(f()));"), vec!["B0019"]);
}

#[test]
fn test_condition_must_be_bool() {
    assert_eq!(bind_codes("if (1) print(\"a\");"), vec!["B0009"]);
    assert!(bind_codes("if (1 < 2) print(\"a\"); else print(\"b\");").is_empty());
}

#[test]
fn test_labels_and_goto() {
    with_tree(
        "goto end;\nprint(\"skipped\");\nend: print(\"done\");",
        |tree, diagnostics| {
            assert!(diagnostics.is_empty());
            let labels: Vec<_> = tree.statements.labels.values().copied().collect();
            assert_eq!(labels, vec![2]);
        },
    );
    assert_eq!(bind_codes("goto nowhere;"), vec!["B0020"]);
    assert_eq!(bind_codes("a: a: ;"), vec!["B0004"]);
    assert_eq!(bind_messages("a: a: ;"), vec!["Label 'a' is already declared in this scope."]);
}

#[test]
fn test_label_visibility() {
    // Out of a nested block: allowed.
    assert!(bind_codes("{ goto out; }\nout: ;").is_empty());
    // Into a nested block: the label is not in scope.
    assert_eq!(bind_codes("goto inner;\n{ inner: ; }"), vec!["B0020"]);
    // Out of a function body: never.
    assert_eq!(bind_codes("fun f() { goto out; }\nout: ;"), vec!["B0020"]);
}

#[test]
fn test_block_scoping() {
    assert_eq!(bind_codes("{ var a = 1; }\na = 2;"), vec!["B0001"]);
    assert!(bind_codes("var a = 1;\n{ var a = \"s\"; a = \"t\"; }").is_empty());
    assert_eq!(bind_codes("if (true) var x = 1;\nx = 2;"), vec!["B0001"]);
}

#[test]
fn test_function_body_sees_globals() {
    assert!(bind_codes("var counter = 0;\nfun bump() { counter = counter + 1; }").is_empty());
}

#[test]
fn test_unused_expression_value_is_a_warning() {
    with_tree("1 + 2;", |_, diagnostics| {
        assert_eq!(diagnostics.len(), 1);
        let diagnostic = &diagnostics.diagnostics()[0];
        assert_eq!(diagnostic.code.to_string(), "B0022");
        assert_eq!(diagnostic.severity, Severity::Warning);
        assert!(!diagnostics.has_errors());
    });
    assert!(bind_codes("var x = 0; x = 1; print(\"a\");").is_empty());
}

#[test]
fn test_positions_point_at_the_offending_token() {
    with_tree("var a = 1;\nvar b = c;", |_, diagnostics| {
        let diagnostic = &diagnostics.diagnostics()[0];
        let info = diagnostic.source.as_ref().expect("located");
        assert_eq!(info.file_name, "test.sl");
        assert_eq!((info.position.line, info.position.column), (1, 8));
    });
}

#[test]
fn test_long_operator_chain_binds() {
    let mut text = String::from("var total = ");
    text.push_str(&vec!["1"; 100_000].join(" + "));
    text.push(';');
    with_tree(&text, |tree, diagnostics| {
        assert!(diagnostics.is_empty());
        assert_eq!(initializer(tree, 0).ty, TypeSymbol::Int);
    });
}
