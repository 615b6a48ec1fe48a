#![cfg(test)]

use pretty_assertions::assert_eq;

use crate::{
    backend::ts_ast::TypeNode,
    sema::{check, typecheck::is_assignable},
    syntax::parser::Parser,
    transform::{TransformOptions, Transformer},
};

fn check_source(src: &str) -> Vec<String> {
    let chunk = Parser::parse(src).expect("Failed to parse");
    let mut transformer = Transformer::new(TransformOptions::default());
    let stmts = transformer
        .transform_chunk(&chunk)
        .expect("Failed to transform");

    check(&stmts, transformer.provenance())
        .iter()
        .map(|e| e.to_string())
        .collect()
}

// Assignability
#[test]
fn unions_accept_their_members() {
    let maybe_number = TypeNode::Union(vec![TypeNode::Number, TypeNode::Undefined]);

    assert!(is_assignable(&TypeNode::Number, &maybe_number));
    assert!(is_assignable(&TypeNode::Undefined, &maybe_number));
    assert!(!is_assignable(&TypeNode::String, &maybe_number));
    assert!(!is_assignable(&maybe_number, &TypeNode::Number));
}

#[test]
fn tuples_compare_element_wise() {
    let pair = TypeNode::Tuple(vec![TypeNode::Number, TypeNode::String]);

    assert!(is_assignable(&pair, &pair.clone()));
    assert!(!is_assignable(
        &TypeNode::Tuple(vec![TypeNode::String, TypeNode::Number]),
        &pair
    ));
    assert!(!is_assignable(&TypeNode::Tuple(vec![TypeNode::Number]), &pair));
}

#[test]
fn undefined_is_void() {
    assert!(is_assignable(&TypeNode::Undefined, &TypeNode::Void));
    assert!(!is_assignable(&TypeNode::Number, &TypeNode::Void));
}

// Declarations
#[test]
fn annotated_local_mismatch() {
    assert_eq!(
        check_source("-- @type number\nlocal x = 'string'"),
        vec!["2:0 Type 'string' is not assignable to type 'number'.".to_string()]
    );
}

#[test]
fn annotated_local_typechecks() {
    assert!(check_source("-- @type number\nlocal x = 1 + 2 * 3").is_empty());
    assert!(check_source("-- @type string\nlocal s = 'a' .. 1").is_empty());
    assert!(check_source("-- @type boolean\nlocal b = not x").is_empty());
    assert!(check_source("-- @type number|nil\nlocal x = nil").is_empty());
}

#[test]
fn concatenation_is_a_string() {
    assert_eq!(check_source("-- @type number\nlocal s = 'a' .. 1").len(), 1);
}

#[test]
fn unknown_types_are_never_reported() {
    assert!(check_source("-- @type number\nlocal x = f()").is_empty());
    assert!(check_source("-- @type number\nlocal x = t.y").is_empty());
    assert!(check_source("-- @type number\nlocal x = a or b").is_empty());
    assert!(check_source("local y = 'a'\n-- @type number\nlocal x = y").is_empty());
}

#[test]
fn annotated_names_flow_into_initializers() {
    let src = "-- @type string\nlocal s = 'a'\n-- @type number\nlocal x = s";
    assert_eq!(check_source(src).len(), 1);
}

// Assignments
#[test]
fn assignment_to_annotated_local() {
    assert_eq!(
        check_source("-- @type number\nlocal x = 1\nx = 'a'"),
        vec!["3:0 Type 'string' is not assignable to type 'number'.".to_string()]
    );
    assert!(check_source("-- @type number\nlocal x = 1\nx = x + 1").is_empty());
}

#[test]
fn assignment_in_a_nested_block() {
    let src = "-- @type number\nlocal x = 1\nif c then\n  x = 'a'\nend";
    assert_eq!(check_source(src).len(), 1);
}

#[test]
fn inner_declaration_shadows() {
    let src = "\
-- @type number
local x = 1
function f()
  local x = 'a'
  x = 'b'
end
x = 2";
    assert!(check_source(src).is_empty());
}

#[test]
fn block_scope_ends_with_the_block() {
    let src = "\
while c do
  -- @type number
  local x = 1
end
x = 'a'";
    assert!(check_source(src).is_empty());
}

// Returns
#[test]
fn return_value_against_treturn() {
    assert_eq!(
        check_source("-- @treturn number\nfunction f()\n  return 'a'\nend"),
        vec!["3:9 Type 'string' is not assignable to type 'number'.".to_string()]
    );
}

#[test]
fn return_value_from_void_function() {
    assert_eq!(
        check_source("function f() return 1 end"),
        vec!["1:20 Type 'number' is not assignable to type 'void'.".to_string()]
    );
    assert!(check_source("function f() return end").is_empty());
    assert!(check_source("function f() return nil end").is_empty());
}

#[test]
fn several_return_values_form_a_tuple() {
    let src = "-- @treturn number\n-- @treturn string\nfunction f() return 1, 'a' end";
    assert!(check_source(src).is_empty());

    let src = "-- @treturn number\n-- @treturn string\nfunction f() return 'a', 1 end";
    assert_eq!(check_source(src).len(), 1);
}

#[test]
fn parameters_are_typed_by_tparam() {
    let src = "-- @tparam number a\n-- @treturn string\nfunction f(a) return a end";
    assert_eq!(
        check_source(src),
        vec!["3:21 Type 'number' is not assignable to type 'string'.".to_string()]
    );
}

#[test]
fn function_expressions_without_treturn_are_unchecked() {
    assert!(check_source("local f = function() return 1 end").is_empty());
}

#[test]
fn method_bodies_are_checked() {
    let src = "function obj:m()\n  -- @type number\n  local x = true\nend";
    assert_eq!(check_source(src).len(), 1);
}

#[test]
fn findings_follow_source_order() {
    let src = "\
-- @type number
local a = 'x'
-- @type string
local b = 1";
    assert_eq!(
        check_source(src),
        vec![
            "2:0 Type 'string' is not assignable to type 'number'.".to_string(),
            "4:0 Type 'number' is not assignable to type 'string'.".to_string(),
        ]
    );
}
