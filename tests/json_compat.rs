//! JSON compatibility: any valid JSON document evaluates to the
//! equivalent value, the canonical text of such a value is valid JSON
//! again, and serde maps values to and from JSON directly.

use fang::interpreter::display::string_of;
use fang::{evaluate_parsed, parse, Config, Value};

fn eval_json(document: &str) -> Value {
    let config = Config::json();
    let parsed = parse(document, Some("doc.json"), Some(&config)).expect("parse failure");
    evaluate_parsed(&parsed, Some(&config)).expect("evaluation failure")
}

fn eval_script(source: &str) -> Value {
    let parsed = parse(source, None, None).expect("parse failure");
    evaluate_parsed(&parsed, None).expect("evaluation failure")
}

// === JSON input ===

#[test]
fn json_primitives() {
    assert_eq!(eval_json("42"), Value::Int(42));
    assert_eq!(eval_json("-17"), Value::Int(-17));
    assert_eq!(eval_json("2.5"), Value::Float(2.5));
    assert_eq!(eval_json(r#""hello""#), Value::from("hello"));
    assert_eq!(eval_json("true"), Value::Bool(true));
    assert_eq!(eval_json("null"), Value::Null);
}

#[test]
fn json_documents_match_serde() {
    let documents = [
        r#"{"a": 3, "b": [2, 1]}"#,
        r#"[1, [2, [3, [4]]], {"deep": {"deeper": null}}]"#,
        r#"{"text": "line\nbreak A", "flag": false, "n": -0.5}"#,
        "[]",
        "{}",
    ];

    for document in documents {
        let through_engine = eval_json(document);
        let through_serde: Value = serde_json::from_str(document).unwrap();
        assert_eq!(through_engine, through_serde, "mismatch for {document}");
    }
}

#[test]
fn unquoted_keys_are_accepted() {
    assert_eq!(
        eval_json("{a: 3, b: {c: null}}"),
        serde_json::from_str::<Value>(r#"{"a": 3, "b": {"c": null}}"#).unwrap()
    );
}

#[test]
fn json_mode_rejects_scripts() {
    let config = Config::json();
    for source in ["a = 3", "print(1)", "{a: 1 + 2}", "[1] [2]"] {
        assert!(
            parse(source, None, Some(&config)).is_err(),
            "{source} should be rejected in JSON mode"
        );
    }
}

#[test]
fn script_mode_still_reads_json() {
    // Without json_only the same documents evaluate identically.
    let document = r#"{"a": 3, "b": [2, 1]}"#;
    assert_eq!(
        eval_script(document),
        serde_json::from_str::<Value>(document).unwrap()
    );
}

// === JSON output ===

#[test]
fn canonical_text_reparses_to_an_equal_value() {
    let documents = [
        r#"{"a": 3, "b": [2, 1]}"#,
        r#"[1.5, "two", null, true, {"k": []}]"#,
        r#"{"esc": "a\"b\\c\nd\tx"}"#,
    ];

    for document in documents {
        let value = eval_json(document);
        let text = string_of(&value, &Config::default()).unwrap();
        let reparsed: Value = serde_json::from_str(&text)
            .unwrap_or_else(|e| panic!("canonical text of {document} is not JSON: {e}\n{text}"));
        assert_eq!(reparsed, value, "round trip changed {document}");
    }
}

#[test]
fn evaluator_results_round_trip_through_text() {
    let sources = [
        "a: 3, b: 2",
        "return([1, 2] + 3)",
        "return({x: 1} + {y: [true, null]})",
        "return('a,b' / ',')",
    ];

    for source in sources {
        let value = eval_script(source);
        let text = string_of(&value, &Config::default()).unwrap();
        let reparsed = eval_script(&text);
        assert_eq!(reparsed, value, "round trip changed result of {source}");
    }
}

#[test]
fn serde_serializes_engine_results() {
    let value = eval_script("a: 3, b: [2, 1]");
    let json = serde_json::to_string(&value).unwrap();
    let reparsed: Value = serde_json::from_str(&json).unwrap();
    assert_eq!(reparsed, value);
}

#[test]
fn block_key_order_is_insertion_order() {
    let value = eval_script("z: 1, a: 2, m: 3");
    let text = string_of(&value, &Config::default()).unwrap();
    assert_eq!(text, r#"{"z": 1, "a": 2, "m": 3}"#);
}

#[test]
fn functions_do_not_serialize() {
    let value = eval_script("function f(){} return(f)");
    assert!(serde_json::to_string(&value).is_err());
}
