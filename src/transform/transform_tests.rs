#![cfg(test)]

use pretty_assertions::assert_eq;

use crate::backend::pretty_print::Printer;
use crate::backend::ts_ast::{
    AssignOp, Binding, ExprKind, StmtKind, TsStmt, TypeNode, VarDecl,
};
use crate::syntax::parser::Parser;
use crate::transform::{error::TransformError, Scope, TransformOptions, Transformer};

const MODULE: TransformOptions = TransformOptions {
    module: true,
    classmod: false,
};

const CLASSMOD: TransformOptions = TransformOptions {
    module: false,
    classmod: true,
};

fn run(src: &str, options: TransformOptions) -> Result<(Vec<TsStmt>, Vec<String>), TransformError> {
    let chunk = Parser::parse(src).expect("Failed to parse");
    let mut transformer = Transformer::new(options);
    let stmts = transformer.transform_chunk(&chunk)?;
    Ok((stmts, transformer.diagnostics().to_vec()))
}

fn transform(src: &str) -> Vec<TsStmt> {
    run(src, TransformOptions::default())
        .expect("Failed to transform")
        .0
}

fn diagnostics(src: &str) -> Vec<String> {
    run(src, TransformOptions::default())
        .expect("Failed to transform")
        .1
}

fn transform_err(src: &str) -> TransformError {
    run(src, TransformOptions::default()).expect_err("Expected the transformation to fail")
}

fn print_with(src: &str, options: TransformOptions) -> String {
    let (stmts, _) = run(src, options).expect("Failed to transform");
    Printer::print(&stmts, None).code
}

fn print(src: &str) -> String {
    print_with(src, TransformOptions::default())
}

fn var_decl(stmt: &TsStmt) -> &VarDecl {
    match &stmt.kind {
        StmtKind::Var(decl) => decl,
        other => panic!("Expected a variable statement, got {other:?}"),
    }
}

// Locals and assignments

#[test]
fn single_local_is_scalar() {
    let stmts = transform("local x = 1");
    let decl = var_decl(&stmts[0]);

    assert_eq!(decl.binding, Binding::Ident("x".to_string()));
    assert!(matches!(
        decl.init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Number(n)) if *n == 1.0
    ));
}

#[test]
fn several_locals_destructure_an_array() {
    assert_eq!(print("local a, b = 1, 2"), "let [a, b] = [1, 2];\n");

    let stmts = transform("local a, b, c = f()");
    let decl = var_decl(&stmts[0]);
    assert_eq!(
        decl.binding,
        Binding::Array(vec!["a".to_string(), "b".to_string(), "c".to_string()])
    );
    // A single initializer is kept as is
    assert!(matches!(
        decl.init.as_ref().map(|e| &e.kind),
        Some(ExprKind::Call { .. })
    ));
}

#[test]
fn local_without_initializer() {
    assert_eq!(print("local a, b"), "let [a, b];\n");
    assert_eq!(print("local x"), "let x;\n");
}

#[test]
fn member_assignment_is_not_an_array() {
    let stmts = transform("a.b = 1");
    let StmtKind::Expr(expr) = &stmts[0].kind else {
        panic!("Expected an expression statement");
    };
    let ExprKind::Assign(target, AssignOp::Assign, _) = &expr.kind else {
        panic!("Expected an assignment");
    };

    assert!(matches!(target.kind, ExprKind::Member { .. }));
    assert_eq!(print("a.b = 1"), "a.b = 1;\n");
}

#[test]
fn multiple_assignment() {
    assert_eq!(print("a, b = b, a"), "[a, b] = [b, a];\n");
    assert_eq!(print("t[1], t[2] = f()"), "[t[1], t[2]] = f();\n");
}

#[test]
fn typed_local() {
    assert_eq!(
        print("-- @type number\nlocal x = 1"),
        "let x: number = 1;\n"
    );
    assert_eq!(
        print("-- @type string|nil\nlocal x"),
        "let x: string | undefined;\n"
    );
    // Several variables never take a type
    assert_eq!(print("-- @type number\nlocal a, b = 1, 2"), "let [a, b] = [1, 2];\n");
}

#[test]
fn unknown_type_is_fatal() {
    assert!(matches!(
        transform_err("-- @type table\nlocal t = {}"),
        TransformError::UnknownType { name, .. } if name == "table"
    ));
}

// Expressions

#[test]
fn operator_mapping() {
    assert_eq!(print("x = a .. b"), "x = a + b;\n");
    assert_eq!(print("x = a ^ 2"), "x = a ** 2;\n");
    assert_eq!(print("x = a == b"), "x = a === b;\n");
    assert_eq!(print("x = a ~= b"), "x = a !== b;\n");
    assert_eq!(print("x = a % 2 <= 1"), "x = a % 2 <= 1;\n");
    assert_eq!(print("x = a and b or c"), "x = a && b || c;\n");
}

#[test]
fn unary_mapping() {
    assert_eq!(print("x = #t"), "x = t.length;\n");
    assert_eq!(print("x = not a"), "x = !a;\n");
    assert_eq!(print("x = -a"), "x = -a;\n");
    assert_eq!(print("x = ~a"), "x = ~a;\n");
}

#[test]
fn unsupported_operators_are_fatal() {
    for (src, op) in [
        ("x = a // b", "//"),
        ("x = a & b", "&"),
        ("x = a | b", "|"),
        ("x = a ~ b", "~"),
        ("x = a << 1", "<<"),
        ("x = a >> 1", ">>"),
    ] {
        assert!(
            matches!(transform_err(src), TransformError::UnknownOperator { op: found, .. } if found == op),
            "{src} should fail"
        );
    }
}

#[test]
fn precedence_survives_the_translation() {
    assert_eq!(print("x = (a + b) * c"), "x = (a + b) * c;\n");
    assert_eq!(print("x = 'n: ' .. 1 + 2"), "x = \"n: \" + (1 + 2);\n");
    assert_eq!(print("x = -a ^ 2"), "x = -(a ** 2);\n");
}

#[test]
fn literals_and_special_names() {
    assert_eq!(print("x = nil"), "x = undefined;\n");
    assert_eq!(print("x = 1.5"), "x = 1.5;\n");
    assert_eq!(print("x = 0x10"), "x = 16;\n");
    assert_eq!(print("x = true"), "x = true;\n");
    assert_eq!(print("x = [[raw]]"), "x = \"raw\";\n");
    assert_eq!(print("_G.x = 1"), "globalThis.x = 1;\n");
}

#[test]
fn calls() {
    assert_eq!(print("print 'hi'"), "print(\"hi\");\n");
    assert_eq!(print("f { 1, 2 }"), "f([1, 2]);\n");
    assert_eq!(print("obj:m(1)"), "obj.m(1);\n");
    assert_eq!(print("a.b[c](d)"), "a.b[c](d);\n");
}

#[test]
fn tables() {
    assert_eq!(print("t = {}"), "t = {};\n");
    assert_eq!(print("t = { 1, 2 }"), "t = [1, 2];\n");
    assert_eq!(
        print("t = { x = 1, [k] = 2 }"),
        "t = { x: 1, [k]: 2 };\n"
    );
}

#[test]
fn mixed_tables_are_fatal() {
    for src in [
        "t = { 1, x = 2 }",
        "t = { [k] = 1, 2 }",
        "t = { x = 1, y = 2, 3 }",
        "f({ 1, { a = 1, 2 } })",
    ] {
        assert!(
            matches!(transform_err(src), TransformError::MixedTableConstructor { .. }),
            "{src} should fail"
        );
    }
}

#[test]
fn varargs_become_a_rest_parameter() {
    assert_eq!(
        print("-- @tparam number ...\nfunction f(...) g(...) end"),
        "function f(...vararg: number[]): void {\n    g(...vararg);\n}\n"
    );
}

#[test]
fn function_expression_uses_statement_tags() {
    assert_eq!(
        print("-- @tparam number a\nlocal f = function(a) end"),
        "let f = function (a: number) {\n};\n"
    );
    assert_eq!(
        print("-- @tparam number a\n-- @treturn number\nlocal f = function(a) return a end"),
        "let f = function (a: number): number {\n    return a;\n};\n"
    );
}

// Functions and parameters

#[test]
fn named_function_declaration() {
    assert_eq!(
        print("-- @tparam number a\n-- @tparam string b\nlocal function f(a, b) end"),
        "function f(a: number, b: string): void {\n}\n"
    );
}

#[test]
fn return_type_from_treturn_tags() {
    assert_eq!(
        print("-- @treturn number\nfunction f() end"),
        "function f(): number {\n}\n"
    );
    assert_eq!(
        print("-- @treturn number\n-- @treturn string\nfunction f() end"),
        "function f(): [number, string] {\n}\n"
    );
}

#[test]
fn member_declarations_are_demoted() {
    assert_eq!(
        print("function a.b.c() end"),
        "a.b.c = function (): void {\n};\n"
    );
    assert_eq!(
        print("function obj:m() end"),
        "obj.m = function (self): void {\n};\n"
    );
}

#[test]
fn one_matching_tparam_means_no_diagnostic() {
    let found = diagnostics("-- @tparam number a\nfunction f(a) end");
    assert!(found.is_empty());
}

#[test]
fn missing_tparam_is_diagnosed_once() {
    let found = diagnostics("function f(a) end");
    assert_eq!(
        found,
        vec![
            "1:11 Parameter a does not have a type signature. Use \"@tparam <type> a\" to define this."
                .to_string()
        ]
    );
}

#[test]
fn several_tparams_are_diagnosed_once() {
    let src = "-- @tparam number a\n-- @tparam string a\nfunction f(a) end";
    let (stmts, found) = run(src, TransformOptions::default()).unwrap();

    assert_eq!(
        found,
        vec!["3:11 Many @tparams found for parameter a. Using the first one.".to_string()]
    );

    let StmtKind::Function(decl) = &stmts[0].kind else {
        panic!("Expected a function declaration");
    };
    assert_eq!(decl.func.params[0].ty, Some(TypeNode::Number));
}

#[test]
fn implicit_receiver_is_never_diagnosed() {
    assert!(diagnostics("function obj:m() end").is_empty());
    assert_eq!(diagnostics("function obj:m(x) end").len(), 1);
}

#[test]
fn diagnostics_follow_source_order() {
    let found = diagnostics("function f(a, b) end\nfunction g(c) end");
    let names: Vec<&str> = found
        .iter()
        .map(|d| d.split_whitespace().nth(2).unwrap())
        .collect();

    assert_eq!(names, vec!["a", "b", "c"]);
}

#[test]
fn nested_function_tags_do_not_leak() {
    // The outer tag belongs to `f`, not to the inner declaration
    let src = "-- @tparam number a\nfunction f(a)\n  function g(a) end\nend";
    assert_eq!(diagnostics(src).len(), 1);
}

// Control flow

#[test]
fn top_level_return_exports() {
    let src = "local function f()\n  return x\nend\nreturn x";
    assert_eq!(
        print(src),
        "function f(): void {\n    return x;\n}\nexport = x;\n"
    );
}

#[test]
fn bare_or_nested_returns_stay_returns() {
    assert_eq!(print("return"), "return;\n");
    assert_eq!(
        print("if a then return 1 end"),
        "if (a) {\n    return 1;\n}\n"
    );
    assert_eq!(print("return 1, 2"), "export = [1, 2];\n");
}

#[test]
fn if_chain_uses_each_clause() {
    let src = "if a then x() elseif b then y() elseif c then z() else w() end";
    assert_eq!(
        print(src),
        "if (a) {\n    x();\n} else if (b) {\n    y();\n} else if (c) {\n    z();\n} else {\n    w();\n}\n"
    );
}

#[test]
fn numeric_for() {
    assert_eq!(
        print("for i = 1, 10 do f(i) end"),
        "for (let i = 1; i <= 10; i++) {\n    f(i);\n}\n"
    );
    assert_eq!(
        print("for i = 10, 1, -1 do end"),
        "for (let i = 10; i <= 1; i += -1) {\n}\n"
    );
}

#[test]
fn generic_for() {
    assert_eq!(
        print("for k, v in pairs(t) do end"),
        "for (const [k, v] of pairs(t)) {\n}\n"
    );
    assert!(matches!(
        transform_err("for k in next, t do end"),
        TransformError::MultipleIterators { count: 2, .. }
    ));
}

#[test]
fn while_and_break() {
    assert_eq!(
        print("while true do break end"),
        "while (true) {\n    break;\n}\n"
    );
}

#[test]
fn untranslatable_statements_are_fatal() {
    for (src, kind) in [
        ("repeat x() until y", "RepeatStatement"),
        ("do x() end", "DoStatement"),
        ("goto done", "GotoStatement"),
        ("::done::", "LabelStatement"),
    ] {
        assert!(
            matches!(transform_err(src), TransformError::UnknownStatement { kind: found, .. } if found == kind),
            "{src} should fail"
        );
    }
}

// Module and class rewriting

#[test]
fn module_functions_are_exported() {
    let src = "-- @module M\nlocal M = {}\nfunction M.f() end\nreturn M";
    assert_eq!(
        print_with(src, MODULE),
        "export function f(): void {\n}\nexport = M;\n"
    );
}

#[test]
fn module_lifted_functions_come_first() {
    let src = "-- @module M\nlocal M = {}\nlocal x = 1\nfunction M:g() end";
    assert_eq!(
        print_with(src, MODULE),
        "export function g(self): void {\n}\nlet x = 1;\n"
    );
}

#[test]
fn module_declines_nested_member_paths() {
    let src = "-- @module M\nlocal M = {}\nfunction M.f() end\nfunction M.a.b() end";
    assert_eq!(
        print_with(src, MODULE),
        "let M = {};\nM.f = function (): void {\n};\nM.a.b = function (): void {\n};\n"
    );
}

#[test]
fn module_mode_needs_the_option() {
    let src = "-- @module M\nlocal M = {}\nfunction M.f() end";
    assert_eq!(
        print(src),
        "let M = {};\nM.f = function (): void {\n};\n"
    );
}

#[test]
fn module_only_applies_to_the_top_level() {
    let src = "function outer()\n  -- @module M\n  local M = {}\n  function M.f() end\nend";
    assert_eq!(
        print_with(src, MODULE),
        "function outer(): void {\n    let M = {};\n    M.f = function (): void {\n    };\n}\n"
    );
}

#[test]
fn exporting_a_plain_function_is_fatal() {
    let chunk = Parser::parse("function f() end\nfunction a.b.c() end").unwrap();
    let scope = Scope {
        depth: 1,
        comments: &chunk.comments,
        block: &chunk.body,
    };
    let mut transformer = Transformer::new(MODULE);

    for stmt in &chunk.body.stmts {
        assert!(matches!(
            transformer.export_function(scope, stmt),
            Err(TransformError::NotExportable { .. })
        ));
    }
}

#[test]
fn class_from_classmod() {
    let src = "\
-- @classmod Account
local Account = {}
function Account:deposit() end
function Account.new() end
print(1)";

    assert_eq!(
        print_with(src, CLASSMOD),
        "class Account {\n    deposit(): void {\n    }\n    static new(): void {\n    }\n}\nprint(1);\n"
    );
}

#[test]
fn class_methods_can_have_any_base() {
    let src = "-- @classmod A\nlocal A = {}\nfunction x.y.z() end\nfunction f() end";
    assert_eq!(
        print_with(src, CLASSMOD),
        "class A {\n    static z(): void {\n    }\n}\nfunction f(): void {\n}\n"
    );
}

#[test]
fn class_in_a_nested_block() {
    let src = "function make()\n  -- @classmod P\n  local P = {}\n  function P.origin() end\nend";
    assert_eq!(
        print_with(src, CLASSMOD),
        "function make(): void {\n    class P {\n        static origin(): void {\n        }\n    }\n}\n"
    );
}

#[test]
fn module_wins_over_class_at_the_top_level() {
    let both = TransformOptions {
        module: true,
        classmod: true,
    };

    let src = "-- @module M\nlocal M = {}\nfunction M.f() end";
    assert_eq!(print_with(src, both), "export function f(): void {\n}\n");

    let src = "-- @classmod C\nlocal C = {}\nfunction C.f() end";
    assert_eq!(
        print_with(src, both),
        "class C {\n    static f(): void {\n    }\n}\n"
    );
}

#[test]
fn marker_must_be_on_the_first_statement() {
    let src = "x = 1\n-- @module M\nlocal M = {}\nfunction M.f() end";
    assert_eq!(
        print_with(src, MODULE),
        "x = 1;\nlet M = {};\nM.f = function (): void {\n};\n"
    );
}

// Run properties

#[test]
fn transformation_is_deterministic() {
    let src = "\
-- @module M
local M = {}
-- @tparam number a
function M.f(a, b)
  if a then return { 1, 2 } elseif b then return nil end
  for i = 1, #a do print(i .. '') end
end
return M";

    let first = run(src, MODULE).unwrap();
    let second = run(src, MODULE).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.1.len(), 1);
}

#[test]
fn runs_start_fresh() {
    let chunk = Parser::parse("function f(a) end").unwrap();
    let mut transformer = Transformer::new(TransformOptions::default());

    let first = transformer.transform_chunk(&chunk).unwrap();
    let second = transformer.transform_chunk(&chunk).unwrap();

    assert_eq!(first, second);
    assert_eq!(transformer.diagnostics().len(), 1);
}

#[test]
fn every_node_has_a_source_location() {
    let chunk = Parser::parse("x = 1\n\ny = f(2)").unwrap();
    let mut transformer = Transformer::new(TransformOptions::default());
    let stmts = transformer.transform_chunk(&chunk).unwrap();

    let location = transformer.provenance().get(stmts[1].id).unwrap();
    assert_eq!(location.start_pos.line, 3);

    // x, 1, x = 1, the statement; y, f, 2, f(2), y = f(2), the statement
    assert_eq!(transformer.provenance().len(), 10);
}
