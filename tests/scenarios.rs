//! Black-box coverage of end-to-end scenarios, driving the library API
//! directly (parse -> evaluate) the way a caller embedding the
//! interpreter would.

use anthe::error::AntheError;
use anthe::parser::parse;
use anthe::scope::Scope;
use anthe::value::Value;

fn run(source: &str) -> Result<Value, AntheError> {
    let program = parse(source);
    assert!(program.is_ok(), "parse errors: {:?}", program.errors);
    anthe::evaluator::eval_program(&program, &Scope::new())
}

#[test]
fn scenario_1_integer_addition() {
    assert!(matches!(
        run("let x = 10; let y = 20; return x + y;").unwrap(),
        Value::Integer(30)
    ));
}

#[test]
fn scenario_2_function_call() {
    let source = "let f = func(a, b) { return a * b; }; f(3, 4);";
    assert!(matches!(run(source).unwrap(), Value::Integer(12)));
}

#[test]
fn scenario_3_closure_over_enclosing_let() {
    let source = r#"
        let c = func(x) { return func(y) { return x + y; }; };
        let add5 = c(5);
        add5(7);
    "#;
    assert!(matches!(run(source).unwrap(), Value::Integer(12)));
}

#[test]
fn scenario_4_array_index_and_arithmetic() {
    let source = "let a = [1, 2, 3]; a[2] + a[0];";
    assert!(matches!(run(source).unwrap(), Value::Integer(4)));
}

#[test]
fn scenario_5_hash_lookup_hit_and_miss() {
    let hit = r#"let h = {"k": 1, "m": 2}; h["k"];"#;
    assert!(matches!(run(hit).unwrap(), Value::Integer(1)));

    let miss = r#"let h = {"k": 1, "m": 2}; h["missing"];"#;
    assert!(matches!(run(miss).unwrap(), Value::Null));
}

#[test]
fn scenario_6_if_else_evaluates_consequence() {
    let source = "if (1 < 2) { 100 } else { 200 };";
    assert!(matches!(run(source).unwrap(), Value::Integer(100)));
}

#[test]
fn scenario_7_type_mismatch_on_infix_is_an_error() {
    let program = parse(r#"let x = 1; x + "a";"#);
    assert!(program.is_ok(), "{:?}", program.errors);
    let result = anthe::evaluator::eval_program(&program, &Scope::new());
    assert!(matches!(result, Err(AntheError::Type(_))));
}

#[test]
fn scenario_8_assigning_to_a_constant_is_a_name_error() {
    let program = parse("const k = 1; k = 2;");
    assert!(program.is_ok(), "{:?}", program.errors);
    let result = anthe::evaluator::eval_program(&program, &Scope::new());
    assert!(matches!(result, Err(AntheError::Name(_))));
}

#[test]
fn scenario_9_ir_compile_emits_expected_opcodes_in_main() {
    let program = parse("func main() { let x = 2 + 3; return x; }");
    assert!(program.is_ok(), "{:?}", program.errors);
    let module = anthe::ir::lower_program(&program).expect("lowering should succeed");

    assert_eq!(module.functions.len(), 1);
    let main = &module.functions[0];
    assert_eq!(main.name, "main");

    let text = main.to_string();
    for opcode in ["alloca", "store", "load", "add", "ret"] {
        assert!(text.contains(opcode), "expected `{opcode}` in:\n{text}");
    }
}
