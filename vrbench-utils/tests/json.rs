use serde_json::json;
use vrbench_utils::*;

#[test]
fn test_jsonify_sorts_keys() {
    let value = json!({"b": 1, "a": {"d": [ {"z": 0, "y": 1} ], "c": true}});
    assert_eq!(
        jsonify(&value).unwrap(),
        r#"{"a":{"c":true,"d":[{"y":1,"z":0}]},"b":1}"#
    );
}

#[test]
fn test_dejsonify() {
    let v: Vec<i32> = dejsonify("[20, 150]").unwrap();
    assert_eq!(v, vec![20, 150]);
    assert!(dejsonify::<Vec<i32>>("[20,").is_err());
}
