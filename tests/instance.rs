//! Instance lifecycle: a program run as a class constructor keeps its
//! environment as state, host calls mutate and read it, and an aborted
//! call leaves the instance usable.

use fang::{get_member, invoke_on_instance, make_instance, parse, Config, ErrorKind, Value};

const COUNTER: &str = "
count = 0
log = []

function add(n) {
    count += n
    log += n
    return(count)
}

function boom() {
    return(1 / 0)
}

tag: 'counter'
";

fn counter() -> fang::Instance {
    let parsed = parse(COUNTER, Some("counter.fg"), None).expect("parse failure");
    make_instance(&parsed, None).expect("constructor failure")
}

fn key(text: &str) -> Value {
    Value::from(text)
}

// === Construction ===

#[test]
fn constructor_state_is_readable() {
    let instance = counter();
    assert_eq!(instance.get(&[key("count")]).unwrap(), Value::Int(0));
    assert_eq!(instance.get(&[key("tag")]).unwrap(), Value::from("counter"));
}

#[test]
fn missing_members_read_as_null() {
    let instance = counter();
    assert_eq!(instance.get(&[key("nope")]).unwrap(), Value::Null);
    assert_eq!(instance.get(&[key("log"), Value::Int(5)]).unwrap(), Value::Null);
}

#[test]
fn member_paths_traverse_containers() {
    let parsed = parse("items: [1, {k: 'v'}]", None, None).unwrap();
    let instance = make_instance(&parsed, None).unwrap();
    assert_eq!(
        instance.get(&[key("items"), Value::Int(1), key("k")]).unwrap(),
        Value::from("v")
    );
    assert_eq!(
        instance.get(&[key("items"), Value::Int(-2)]).unwrap(),
        Value::Int(1)
    );
}

#[test]
fn constructor_errors_propagate() {
    let parsed = parse("x = 1 / 0", None, None).unwrap();
    let error = make_instance(&parsed, None).expect_err("expected an error");
    assert_eq!(error.kind, ErrorKind::Eval);
}

// === Invocation ===

#[test]
fn calls_mutate_persistent_state() {
    let instance = counter();
    assert_eq!(instance.invoke("add", &[Value::Int(5)]).unwrap(), Value::Int(5));
    assert_eq!(instance.invoke("add", &[Value::Int(3)]).unwrap(), Value::Int(8));
    assert_eq!(instance.get(&[key("count")]).unwrap(), Value::Int(8));

    let log = instance.get(&[key("log")]).unwrap();
    assert_eq!(log, serde_json::from_str::<Value>("[5, 3]").unwrap());
}

#[test]
fn host_arguments_are_copied_in() {
    let instance = counter();
    let n = Value::Int(2);
    instance.invoke("add", &[n.clone()]).unwrap();
    assert_eq!(n, Value::Int(2));
}

#[test]
fn unknown_functions_are_an_error() {
    let instance = counter();
    let error = instance.invoke("missing", &[]).expect_err("expected an error");
    assert!(error.message.contains("missing"), "{}", error.message);

    let error = instance.invoke("count", &[]).expect_err("expected an error");
    assert!(error.message.contains("not a function"), "{}", error.message);
}

// === Error rewind ===

#[test]
fn a_failed_call_leaves_the_instance_clean() {
    let instance = counter();
    instance.invoke("add", &[Value::Int(4)]).unwrap();

    let error = instance.invoke("boom", &[]).expect_err("expected an error");
    assert_eq!(error.kind, ErrorKind::Eval);

    // State survives and further calls work from constructor-level scope.
    assert_eq!(instance.get(&[key("count")]).unwrap(), Value::Int(4));
    assert_eq!(instance.invoke("add", &[Value::Int(1)]).unwrap(), Value::Int(5));
}

#[test]
fn instances_are_independent() {
    let a = counter();
    let b = counter();
    a.invoke("add", &[Value::Int(9)]).unwrap();
    assert_eq!(b.get(&[key("count")]).unwrap(), Value::Int(0));
}

// === Functions crossing the boundary ===

#[test]
fn function_members_survive_as_state() {
    let parsed = parse(
        "factor = 3\nfunction scale(x) { return(x * factor) }",
        None,
        None,
    )
    .unwrap();
    let instance = make_instance(&parsed, None).unwrap();
    assert_eq!(
        invoke_on_instance(&instance, "scale", &[Value::Int(7)]).unwrap(),
        Value::Int(21)
    );

    // The stored function reads the *current* member value.
    let member = get_member(&instance, &[key("factor")]).unwrap();
    assert_eq!(member, Value::Int(3));
}

#[test]
fn json_only_config_still_builds_data_instances() {
    let config = Config::json();
    let parsed = parse(r#"{"a": {"b": 7}}"#, None, Some(&config)).unwrap();
    let instance = make_instance(&parsed, Some(&config)).unwrap();
    assert_eq!(
        instance.get(&[key("a"), key("b")]).unwrap(),
        Value::Int(7)
    );
}
