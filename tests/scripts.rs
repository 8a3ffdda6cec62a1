//! End-to-end script evaluation tests: parse + evaluate through the
//! public engine API.

use fang::{evaluate_parsed, parse, Config, Engine, Value};

fn run(source: &str) -> Value {
    let parsed = parse(source, Some("test.fg"), None).expect("parse failure");
    evaluate_parsed(&parsed, None).expect("evaluation failure")
}

fn run_err(source: &str) -> fang::FangError {
    let parsed = parse(source, Some("test.fg"), None).expect("parse failure");
    evaluate_parsed(&parsed, None).expect_err("expected an evaluation error")
}

fn json(text: &str) -> Value {
    serde_json::from_str(text).expect("bad fixture")
}

// === Basic evaluation ===

#[test]
fn bare_statements_with_return() {
    assert_eq!(run("a:3,b:2,return(a+b)"), Value::Int(5));
}

#[test]
fn json_document_evaluates_to_itself() {
    let result = run(r#"{"a": 3, "b": [2, 1]}"#);
    assert_eq!(result, json(r#"{"a": 3, "b": [2, 1]}"#));
}

#[test]
fn bare_key_value_statements_build_a_block() {
    assert_eq!(run("a: 3, b: 2"), json(r#"{"a": 3, "b": 2}"#));
}

#[test]
fn last_expression_is_the_result() {
    assert_eq!(run("1 + 2"), Value::Int(3));
    assert_eq!(run("a = 4\na * 2"), Value::Int(8));
}

#[test]
fn walrus_records_the_block_result() {
    assert_eq!(run("a: 1, result := a + 1"), Value::Int(2));
}

#[test]
fn undefined_name_reads_as_null() {
    assert_eq!(run("return(nothing)"), Value::Null);
}

// === Functions ===

#[test]
fn function_definition_and_call() {
    assert_eq!(run("function f(x){return(x*x)} return(f(4))"), Value::Int(16));
}

#[test]
fn closures_see_their_defining_scope() {
    let source = "function make(a){function g(){return(a)} return(g)} h=make(7), return(h())";
    assert_eq!(run(source), Value::Int(7));
}

#[test]
fn missing_arguments_are_null() {
    assert_eq!(run("function f(x){return(x)} return(f())"), Value::Null);
}

#[test]
fn parameters_are_writable() {
    assert_eq!(run("function f(x){x = x + 1, return(x)} return(f(1))"), Value::Int(2));
}

#[test]
fn plain_parameters_deep_copy_composites() {
    let source = "function f(x){x.0 = 99} a = [1], f(a), return(a.0)";
    assert_eq!(run(source), Value::Int(1));
}

#[test]
fn reference_parameters_share_identity() {
    let source = "function f(reference x){x.0 = 99} a = [1], f(a), return(a.0)";
    assert_eq!(run(source), Value::Int(99));
}

#[test]
fn function_modifier_defers_evaluation() {
    let source = "function twice(function body){body(), body()} x = 0, twice({x += 1}), return(x)";
    assert_eq!(run(source), Value::Int(2));
}

#[test]
fn anonymous_function_expression() {
    assert_eq!(run("f = function(n){return(n + 1)}, return(f(41))"), Value::Int(42));
}

// === Control flow ===

#[test]
fn if_returns_the_matched_body_value() {
    assert_eq!(
        run("x = 10, return(if(x > 5, 'big', true, 'small'))"),
        Value::from("big")
    );
    assert_eq!(
        run("x = 1, return(if(x > 5, 'big', true, 'small'))"),
        Value::from("small")
    );
}

#[test]
fn if_bodies_write_into_the_enclosing_scope() {
    let source = "x = 2, if(x == 1, {r = 'one'}, x == 2, {r = 'two'}), return(r)";
    assert_eq!(run(source), Value::from("two"));
}

#[test]
fn while_loop_accumulates() {
    let source = "i = 0, total = 0, while(i < 4, {total += i, i += 1}), return(total)";
    assert_eq!(run(source), Value::Int(6));
}

#[test]
fn for_in_accumulates_into_caller_scope() {
    assert_eq!(run("x=[1,2,3], for(v in x){y+=v}, return(y)"), Value::Int(6));
}

#[test]
fn c_style_for() {
    let source = "s = 0, for(i = 0, i < 5, i += 1, {s += i}), return(s)";
    assert_eq!(run(source), Value::Int(10));
}

#[test]
fn for_in_over_a_block_yields_pairs() {
    let source = "b = {x: 1, y: 2}, keys = [], vals = 0, for(p in b){keys += p.0, vals += p.1}, return([keys, vals])";
    assert_eq!(run(source), json(r#"[["x", "y"], 3]"#));
}

#[test]
fn for_in_snapshots_the_collection() {
    // Growing the array inside the body must not extend the iteration.
    let source = "x = [1, 2], n = 0, for(v in x){x += 9, n += 1}, return(n)";
    assert_eq!(run(source), Value::Int(2));
}

#[test]
fn break_and_continue() {
    let source = "i = 0, s = 0, while(true, {i += 1, if(i > 5, {break}), if(i % 2 == 0, {continue}), s += i}), return(s)";
    assert_eq!(run(source), Value::Int(9));
}

#[test]
fn do_loops_until_break() {
    assert_eq!(
        run("i = 0, do({i += 1, if(i == 3, {break})}), return(i)"),
        Value::Int(3)
    );
}

#[test]
fn break_outside_a_loop_is_an_error() {
    let err = run_err("break");
    assert!(err.message.contains("loop"), "{}", err.message);
}

#[test]
fn break_cannot_cross_a_function_boundary() {
    let err = run_err("function f(){break} while(true, {f()})");
    assert!(err.message.contains("loop"), "{}", err.message);
}

#[test]
fn return_unwinds_nested_bodies() {
    let source = "function f(){while(true, {if(true, {return(5)})}) return(1)} return(f())";
    assert_eq!(run(source), Value::Int(5));
}

// === Assignment and member access ===

#[test]
fn assignment_deep_copies() {
    assert_eq!(run("a = [1, 2], b = a, b.0 = 9, return(a.0)"), Value::Int(1));
    assert_eq!(
        run("a = {x: {y: 1}}, b = a, b.x.y = 9, return(a.x.y)"),
        Value::Int(1)
    );
}

#[test]
fn member_chains_read_and_write() {
    assert_eq!(
        run("data = {list: [1, 2]}, data.list[0] = 9, return(data.list.0)"),
        Value::Int(9)
    );
}

#[test]
fn integer_member_syntax() {
    assert_eq!(run("x = {a: [10, 20]}, return(x.a.1)"), Value::Int(20));
}

#[test]
fn negative_indexes_wrap() {
    assert_eq!(run("a = [1, 2, 3], return(a[-1])"), Value::Int(3));
}

#[test]
fn reading_out_of_range_yields_null() {
    assert_eq!(run("a = [1], return(a[5])"), Value::Null);
    assert_eq!(run("b = {}, return(b.zzz)"), Value::Null);
    assert_eq!(run("b = {}, return(b.x.y.z)"), Value::Null);
}

#[test]
fn writing_out_of_range_is_an_error() {
    let err = run_err("a = [1], a[5] = 2");
    assert!(err.message.contains("range"), "{}", err.message);
}

#[test]
fn compound_member_assignment() {
    assert_eq!(run("b = {n: 1}, b.n += 4, return(b.n)"), Value::Int(5));
}

#[test]
fn remove_deletes_members_and_variables() {
    assert_eq!(run("b = {x: 1, y: 2}, remove(b.x), return(len(b))"), Value::Int(1));
    assert_eq!(run("a = [1, 2, 3], remove(a[1]), return(a)"), json("[1, 3]"));
    assert_eq!(run("x = 1, remove(x), return(x)"), Value::Null);
}

#[test]
fn reserved_names_are_unassignable() {
    let err = run_err("___x___ = 1");
    assert!(err.message.contains("reserved"), "{}", err.message);
}

#[test]
fn local_assignment_shadows() {
    let source = "x = 1\nfunction f(){x: 9, return(x)}\nreturn([f(), x])";
    assert_eq!(run(source), json("[9, 1]"));
}

#[test]
fn plain_assignment_reaches_outward() {
    let source = "x = 1\nfunction f(){x = 9}\nf(), return(x)";
    assert_eq!(run(source), Value::Int(9));
}

// === Operators at script level ===

#[test]
fn arithmetic_scenarios() {
    assert_eq!(run("return(3/2)"), Value::Float(1.5));
    assert_eq!(run("return(4/2)"), Value::Int(2));
    assert!(matches!(run_err("return(1/0)").kind, fang::ErrorKind::Eval));
}

#[test]
fn string_operators() {
    assert_eq!(run("return('a-b-c' / '-')"), json(r#"["a", "b", "c"]"#));
    assert_eq!(run("return([1, 2, 3] * '-')"), Value::from("1-2-3"));
    assert_eq!(run("return('ab' * 3)"), Value::from("ababab"));
    assert_eq!(run("return('hello' - 'l')"), Value::from("heo"));
}

#[test]
fn block_merge() {
    assert_eq!(run("return({a: 1, b: 1} + {b: 2})"), json(r#"{"a": 1, "b": 3}"#));
}

#[test]
fn equality_and_membership() {
    assert_eq!(run("return([1, [2]] == [1, [2]])"), Value::Bool(true));
    assert_eq!(run("return(1 == true)"), Value::Bool(true));
    assert_eq!(run("return([1] == [true])"), Value::Bool(false));
    assert_eq!(run("return(2 in [1, 2])"), Value::Bool(true));
    assert_eq!(run("return('a' in {a: 1})"), Value::Bool(true));
    assert_eq!(run("return('an' in 'banana')"), Value::Bool(true));
}

#[test]
fn logic_operators() {
    assert_eq!(run("return(not false)"), Value::Bool(true));
    assert_eq!(run("return(not [])"), Value::Bool(false));
    assert_eq!(run("return(1 > 2 or 3 > 2)"), Value::Bool(true));
    assert_eq!(run("return(true and 0)"), Value::Bool(false));
}

#[test]
fn short_circuit_skips_the_right_side() {
    // The right side would divide by zero if evaluated.
    assert_eq!(run("return(false and 1/0)"), Value::Bool(false));
    assert_eq!(run("return(true or 1/0)"), Value::Bool(true));
}

// === Builtins ===

#[test]
fn conversion_builtins() {
    assert_eq!(run("return(int('42'))"), Value::Int(42));
    assert_eq!(run("return(int(3.9))"), Value::Int(3));
    assert_eq!(run("return(float('2.5'))"), Value::Float(2.5));
    assert_eq!(run("return(float(2))"), Value::Float(2.0));
    assert_eq!(run("return(string(1.0))"), Value::from("1.0"));
    assert_eq!(run("return(string([1, 'a']))"), Value::from(r#"[1, "a"]"#));
    assert!(run_err("return(int('abc'))").message.contains("not a number"));
}

#[test]
fn type_builtin() {
    assert_eq!(run("return(type(1))"), Value::from("int"));
    assert_eq!(run("return(type(1.5))"), Value::from("float"));
    assert_eq!(run("return(type('x'))"), Value::from("string"));
    assert_eq!(run("return(type(true))"), Value::from("boolean"));
    assert_eq!(run("return(type(null))"), Value::from("null"));
    assert_eq!(run("return(type([]))"), Value::from("array"));
    assert_eq!(run("return(type({}))"), Value::from("block"));
    assert_eq!(run("function f(){} return(type(f))"), Value::from("function"));
}

#[test]
fn len_and_strip() {
    assert_eq!(run("return(len([1, 2, 3]))"), Value::Int(3));
    assert_eq!(run("return(len({a: 1}))"), Value::Int(1));
    assert_eq!(run("return(len('abc'))"), Value::Int(3));
    assert_eq!(run("return(strip('  pad  '))"), Value::from("pad"));
    assert_eq!(run("return(strip('\u{3000}wide\u{3000}'))"), Value::from("wide"));
}

#[test]
fn insert_builtin() {
    assert_eq!(run("a = [1, 3], insert(a, 1, 2), return(a)"), json("[1, 2, 3]"));
    assert_eq!(run("a = [1, 2], insert(a, len(a), 3), return(a)"), json("[1, 2, 3]"));
    assert_eq!(run("a = [1, 3], insert(a, -1, 2), return(a)"), json("[1, 2, 3]"));
    assert!(run_err("a = [1], insert(a, 5, 2)").message.contains("range"));
}

#[test]
fn user_functions_shadow_builtins() {
    assert_eq!(run("function len(x){return(99)} return(len('abc'))"), Value::Int(99));
}

// === Host variables ===

#[test]
fn injected_variables_are_visible() {
    let engine = Engine::new(Config::default());
    let data: Value = serde_json::from_str(r#"{"x": 10, "y": 32}"#).unwrap();
    let result = engine
        .run_with("return(data.x + data.y)", &[("data", data)])
        .unwrap();
    assert_eq!(result, Value::Int(42));
}

#[test]
fn injected_variables_are_deep_copied() {
    let engine = Engine::new(Config::default());
    let data: Value = serde_json::from_str(r#"{"n": 1}"#).unwrap();
    engine
        .run_with("data.n = 99, return(data.n)", &[("data", data.clone())])
        .unwrap();
    assert_eq!(data, serde_json::from_str::<Value>(r#"{"n": 1}"#).unwrap());
}

#[test]
fn scripts_do_not_leak_between_runs() {
    let engine = Engine::new(Config::default());
    engine.run("leaky = 1").unwrap();
    assert_eq!(engine.run("return(leaky)").unwrap(), Value::Null);
}

// === Parse reuse ===

#[test]
fn parsed_programs_are_reusable() {
    let parsed = parse("n = 2, return(n * 3)", None, None).unwrap();
    assert_eq!(evaluate_parsed(&parsed, None).unwrap(), Value::Int(6));
    assert_eq!(evaluate_parsed(&parsed, None).unwrap(), Value::Int(6));
}
