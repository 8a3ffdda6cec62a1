//! Resource ceilings: recursion depth, loop iterations, array/block
//! sizes. Every ceiling converts into an evaluation error; nothing
//! panics or hangs.

use fang::{evaluate_parsed, parse, Config, ErrorKind, FangError, Value};

fn run_with(source: &str, config: &Config) -> Result<Value, FangError> {
    let parsed = parse(source, Some("limits.fg"), Some(config))?;
    evaluate_parsed(&parsed, Some(config))
}

fn expect_limit_error(source: &str, config: &Config, needle: &str) {
    let error = run_with(source, config).expect_err("expected a limit error");
    assert_eq!(error.kind, ErrorKind::Eval);
    assert!(
        error.message.contains(needle),
        "unexpected message: {}",
        error.message
    );
}

// === Recursion depth ===

#[test]
fn unbounded_recursion_aborts() {
    let config = Config::default();
    expect_limit_error(
        "function f(n){return(f(n + 1))} return(f(0))",
        &config,
        "recursive",
    );
}

#[test]
fn deep_expressions_count_against_the_stack() {
    let config = Config::default().with_max_depth(10);
    expect_limit_error(
        "return(1+(1+(1+(1+(1+(1+(1+(1+(1+(1+(1+1)))))))))))",
        &config,
        "recursive",
    );
}

#[test]
fn shallow_programs_run_under_a_small_ceiling() {
    let config = Config::default().with_max_depth(20);
    assert_eq!(run_with("return(1 + 1)", &config).unwrap(), Value::Int(2));
}

// === Loop iterations ===

#[test]
fn infinite_while_aborts() {
    let config = Config::default().with_max_loop_times(10);
    expect_limit_error("while(true, {x = 1})", &config, "loop");
}

#[test]
fn infinite_do_aborts() {
    let config = Config::default().with_max_loop_times(10);
    expect_limit_error("do({x = 1})", &config, "loop");
}

#[test]
fn loops_under_the_ceiling_complete() {
    let config = Config::default().with_max_loop_times(5);
    let result = run_with("n = 0, for(i = 0, i < 5, i += 1, {n += 1}), return(n)", &config);
    assert_eq!(result.unwrap(), Value::Int(5));
}

// === Array and block sizes ===

#[test]
fn array_repetition_respects_the_ceiling() {
    let config = Config::default().with_max_array_size(10);
    expect_limit_error("return([1, 2, 3] * 4)", &config, "maximum");
}

#[test]
fn array_append_respects_the_ceiling() {
    let config = Config::default().with_max_array_size(3);
    expect_limit_error("a = [1, 2, 3], return(a + 4)", &config, "maximum");
}

#[test]
fn insert_respects_the_ceiling() {
    let config = Config::default().with_max_array_size(3);
    expect_limit_error("a = [1, 2, 3], insert(a, 0, 4)", &config, "maximum");
}

#[test]
fn string_split_respects_the_ceiling() {
    let config = Config::default().with_max_array_size(3);
    expect_limit_error("return('a,b,c,d' / ',')", &config, "maximum");
}

#[test]
fn block_growth_respects_the_ceiling() {
    let config = Config::default().with_max_array_size(2);
    expect_limit_error("b = {a: 1, b: 2}, b.c = 3", &config, "maximum");
}

#[test]
fn array_literal_respects_the_ceiling() {
    let config = Config::default().with_max_array_size(2);
    expect_limit_error("return([1, 2, 3])", &config, "maximum");
}

// === Non-finite floats ===

#[test]
fn overflowing_arithmetic_needs_the_infinity_option() {
    let config = Config::default();
    let error = run_with("return(1e308 * 10.0)", &config).expect_err("expected an error");
    assert!(error.message.contains("infinite"), "{}", error.message);

    let permissive = Config::default().with_infinity("Infinity");
    let value = run_with("return(1e308 * 10.0)", &permissive).unwrap();
    assert!(matches!(value, Value::Float(f) if f.is_infinite()));
}

#[test]
fn infinity_prints_through_its_configured_text() {
    let permissive = Config::default().with_infinity("Infinity");
    let value = run_with("return(string(1e308 * 10.0))", &permissive).unwrap();
    assert_eq!(value, Value::from("Infinity"));
}

#[test]
fn conversions_always_reject_non_finite() {
    let permissive = Config::default().with_infinity("Infinity");
    let error =
        run_with("return(int(1e308 * 10.0))", &permissive).expect_err("expected an error");
    assert!(error.message.contains("non-finite"), "{}", error.message);
}
