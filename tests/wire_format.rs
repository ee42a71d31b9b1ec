use serde_json::json;
use sqlite_worker::{ExecOutcome, Params, QueryResult, Request, Response, Value};

#[test]
fn request_deserializes_from_original_wire_shape() {
    let request: Request = serde_json::from_value(json!({
        "id": 1,
        "action": "execute",
        "dbName": "a",
        "sql": "INSERT INTO t VALUES (?1, ?2)",
        "params": [1, "x"]
    }))
    .unwrap();
    assert_eq!(request.id, 1);
    assert_eq!(request.action, "execute");
    assert_eq!(request.db_name, "a");
    assert_eq!(
        request.params,
        Some(Params::Positional(vec![
            Value::Integer(1),
            Value::Text("x".to_string()),
        ]))
    );
}

#[test]
fn named_params_deserialize_from_an_object() {
    let request: Request = serde_json::from_value(json!({
        "id": 2,
        "action": "execute",
        "dbName": "a",
        "sql": "INSERT INTO t VALUES (:k, :v, :b, :n)",
        "params": {"k": "two", "v": 2.5, "b": true, "n": null}
    }))
    .unwrap();
    let Some(Params::Named(map)) = request.params else {
        panic!("expected named params");
    };
    assert_eq!(map.get("k"), Some(&Value::Text("two".to_string())));
    assert_eq!(map.get("v"), Some(&Value::Real(2.5)));
    assert_eq!(map.get("b"), Some(&Value::Boolean(true)));
    assert_eq!(map.get("n"), Some(&Value::Null));
}

#[test]
fn request_serializes_camel_case_and_omits_absent_fields() {
    let value = serde_json::to_value(Request::open(7, "a")).unwrap();
    assert_eq!(value, json!({"id": 7, "action": "open", "dbName": "a"}));
}

#[test]
fn ok_acknowledgement_serializes_as_literal_ok() {
    let value = serde_json::to_value(Response::ok(1, ExecOutcome::Ok)).unwrap();
    assert_eq!(value, json!({"id": 1, "result": "ok"}));
}

#[test]
fn execute_response_serializes_engine_result_directly() {
    let outcome = ExecOutcome::Results(vec![QueryResult {
        columns: vec!["x".to_string()],
        rows: vec![vec![Value::Integer(1)]],
    }]);
    let value = serde_json::to_value(Response::ok(4, outcome)).unwrap();
    assert_eq!(
        value,
        json!({"id": 4, "result": [{"columns": ["x"], "values": [[1]]}]})
    );
}

#[test]
fn error_response_carries_only_id_and_error() {
    let value = serde_json::to_value(Response::failure(9, "database a not open")).unwrap();
    assert_eq!(value, json!({"id": 9, "error": "database a not open"}));
}

#[test]
fn responses_round_trip() {
    let responses = [
        Response::ok(1, ExecOutcome::Ok),
        Response::failure(2, "no such table: t"),
        Response::ok(
            3,
            ExecOutcome::Results(vec![QueryResult {
                columns: vec!["a".to_string(), "b".to_string()],
                rows: vec![
                    vec![Value::Integer(1), Value::Text("one".to_string())],
                    vec![Value::Null, Value::Real(2.5)],
                ],
            }]),
        ),
    ];
    for response in responses {
        let text = serde_json::to_string(&response).unwrap();
        let back: Response = serde_json::from_str(&text).unwrap();
        assert_eq!(back, response);
    }
}

#[test]
fn requests_round_trip() {
    let requests = [
        Request::open(1, "a"),
        Request::execute(
            2,
            "a",
            "SELECT * FROM t WHERE x = ?1",
            Some(Params::positional([Value::from(1)])),
        ),
        Request::close(3, "a"),
    ];
    for request in requests {
        let text = serde_json::to_string(&request).unwrap();
        let back: Request = serde_json::from_str(&text).unwrap();
        assert_eq!(back, request);
    }
}
