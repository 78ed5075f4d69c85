//! Black-box coverage of the distinct error kinds the pipeline can raise:
//! lex, parse, name, type, arity, range and IR errors.

use anthe::error::AntheError;
use anthe::parser::parse;
use anthe::scope::Scope;

fn eval_err(source: &str) -> AntheError {
    let program = parse(source);
    assert!(program.is_ok(), "parse errors: {:?}", program.errors);
    anthe::evaluator::eval_program(&program, &Scope::new())
        .expect_err("expected evaluation to fail")
}

#[test]
fn lex_error_unterminated_string_surfaces_as_a_parse_error() {
    let program = parse(r#"let x = "unterminated;"#);
    assert!(!program.is_ok());
}

#[test]
fn lex_error_illegal_character_surfaces_as_a_parse_error() {
    let program = parse("let x = 1 @ 2;");
    assert!(!program.is_ok());
}

#[test]
fn parse_error_missing_delimiter() {
    let program = parse("let x = (1 + 2;");
    assert!(!program.is_ok());
}

#[test]
fn parse_error_invalid_let_shape() {
    let program = parse("let = 1;");
    assert!(!program.is_ok());
}

#[test]
fn parse_error_invalid_type_annotation() {
    let program = parse("let x: 123 = 1;");
    assert!(!program.is_ok());
}

#[test]
fn name_error_undefined_identifier() {
    assert!(matches!(eval_err("nope;"), AntheError::Name(_)));
}

#[test]
fn name_error_redefinition_in_same_scope() {
    assert!(matches!(eval_err("let x = 1; let x = 2;"), AntheError::Name(_)));
}

#[test]
fn name_error_assignment_to_constant() {
    assert!(matches!(eval_err("const x = 1; x = 2;"), AntheError::Name(_)));
}

#[test]
fn name_error_assignment_to_undefined_name() {
    assert!(matches!(eval_err("x = 2;"), AntheError::Name(_)));
}

#[test]
fn type_error_infix_mismatch() {
    assert!(matches!(eval_err(r#"1 + "a";"#), AntheError::Type(_)));
}

#[test]
fn type_error_non_hashable_hash_key() {
    assert!(matches!(eval_err("let h = {[1]: 1}; h;"), AntheError::Type(_)));
}

#[test]
fn type_error_non_indexable_value() {
    assert!(matches!(eval_err("let x = 1; x[0];"), AntheError::Type(_)));
}

#[test]
fn type_error_calling_a_non_function() {
    assert!(matches!(eval_err("let x = 1; x();"), AntheError::Type(_)));
}

#[test]
fn type_error_negating_a_non_integer_non_float() {
    assert!(matches!(eval_err(r#"-"a";"#), AntheError::Type(_)));
}

#[test]
fn arity_error_argument_count_mismatch() {
    let source = "let f = func(a, b) { return a + b; }; f(1);";
    assert!(matches!(eval_err(source), AntheError::Arity(_)));
}

#[test]
fn range_error_array_index_out_of_bounds() {
    assert!(matches!(eval_err("let a = [1, 2]; a[10];"), AntheError::Range(_)));
}

#[test]
fn range_error_division_by_zero() {
    assert!(matches!(eval_err("1 / 0;"), AntheError::Range(_)));
}

#[test]
fn ir_error_unsupported_construct() {
    let program = parse(r#"let s = "hi";"#);
    assert!(program.is_ok());
    let result = anthe::ir::lower_program(&program);
    assert!(matches!(result, Err(_)), "string literals cannot be lowered yet");
}

#[test]
fn ir_error_unknown_callee() {
    let program = parse("(func(x) { return x; })(1);");
    assert!(program.is_ok());
    let result = anthe::ir::lower_program(&program);
    assert!(result.is_err(), "indirect calls cannot be lowered");
}
