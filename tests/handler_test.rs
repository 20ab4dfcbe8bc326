//! Integration tests for the message handler.

use agrosense::config::Config;
use agrosense::handler::{handle, handle_str};
use agrosense::model::{FarmerId, MessageResponse, Mode};
use serde_json::{Value, json};

fn config(use_azure: bool, environment: &str) -> Config {
    let use_azure = use_azure.to_string();
    let environment = environment.to_string();
    Config::from_lookup(move |name| match name {
        "USE_AZURE" => Some(use_azure.clone()),
        "NODE_ENV" => Some(environment.clone()),
        _ => None,
    })
}

fn demo() -> Config {
    config(false, "development")
}

fn azure() -> Config {
    config(true, "development")
}

fn assert_failure(response: &MessageResponse, code: &str) {
    assert!(!response.success, "expected failure, got {response:?}");
    assert_eq!(response.error.as_deref(), Some(code));
    assert_eq!(response.mode, None);
    assert_eq!(response.farmer_id, None);
}

// ---------------------------------------------------------------------------
// Payload shape
// ---------------------------------------------------------------------------

#[test]
fn non_object_payloads_are_rejected() {
    let payloads = [
        json!(null),
        json!([]),
        json!([{"text": "Hello"}]),
        json!("Hello"),
        json!(42),
        json!(1.5),
        json!(true),
    ];

    for payload in &payloads {
        let response = handle(payload, &demo());
        assert_failure(&response, "INVALID_PAYLOAD");
        assert_eq!(response.message, "Invalid payload: expected JSON object");
        assert_eq!(response.details, None);
    }
}

#[test]
fn missing_or_blank_text_is_rejected() {
    let payloads = [
        json!({}),
        json!({"text": ""}),
        json!({"text": "   \t\n "}),
        json!({"text": null, "farmerId": "f1"}),
        json!({"language": "fr"}),
    ];

    for payload in &payloads {
        let response = handle(payload, &demo());
        assert_failure(&response, "EMPTY_TEXT");
        assert_eq!(response.message, "Empty query text");
    }
}

// ---------------------------------------------------------------------------
// Success paths
// ---------------------------------------------------------------------------

#[test]
fn demo_mode_echoes_query_with_farmer() {
    let payload = json!({"text": "Hello", "language": "EN", "farmerId": "f1"});
    let response = handle(&payload, &demo());

    assert!(response.success);
    assert_eq!(response.mode, Some(Mode::Demo));
    assert_eq!(response.language.as_deref(), Some("en"));
    assert_eq!(response.farmer_id, Some(FarmerId::from("f1")));
    assert_eq!(response.message, "[Demo Mode] Received query from farmer f1: Hello");
    assert_eq!(response.error, None);
    assert_eq!(response.details, None);
}

#[test]
fn azure_mode_echoes_query() {
    let payload = json!({"text": "Hello", "language": "EN", "farmerId": "f1"});
    let response = handle(&payload, &azure());

    assert!(response.success);
    assert_eq!(response.mode, Some(Mode::Azure));
    assert_eq!(response.language.as_deref(), Some("en"));
    assert_eq!(response.farmer_id, Some(FarmerId::from("f1")));
    assert!(response.message.contains("Azure Mode"));
    assert!(response.message.contains("Hello"));
    assert_eq!(response.message, "[Azure Mode] Processing query: Hello");
}

#[test]
fn text_is_trimmed_before_echo() {
    let payload = json!({"text": "  maize price?  \n"});
    let response = handle(&payload, &demo());

    assert_eq!(
        response.message,
        "[Demo Mode] Received query from farmer anonymous: maize price?"
    );
}

#[test]
fn defaults_apply_when_optional_fields_are_absent() {
    let response = handle(&json!({"text": "Hello"}), &demo());

    assert!(response.success);
    assert_eq!(response.language.as_deref(), Some("en"));
    assert_eq!(response.farmer_id, Some(FarmerId::from("anonymous")));
    assert!(response.message.contains("anonymous"));
}

#[test]
fn null_optional_fields_fall_back_to_defaults() {
    let payload = json!({"text": "Hello", "language": null, "farmerId": null});
    let response = handle(&payload, &demo());

    assert_eq!(response.language.as_deref(), Some("en"));
    assert_eq!(response.farmer_id, Some(FarmerId::from("anonymous")));
}

#[test]
fn farmer_id_is_not_transformed() {
    let payload = json!({"text": "Hello", "farmerId": "  Farmer_ABC "});
    let response = handle(&payload, &demo());

    assert_eq!(response.farmer_id, Some(FarmerId::from("  Farmer_ABC ")));
}

#[test]
fn numeric_farmer_id_is_echoed_as_a_number() {
    let payload = json!({"text": "Hello", "farmerId": 1234});
    let response = handle(&payload, &demo());

    assert!(response.success);
    assert!(response.message.contains("farmer 1234:"));

    let body = serde_json::to_value(&response).unwrap();
    assert_eq!(body["farmerId"], json!(1234));
}

#[test]
fn non_scalar_farmer_ids_are_echoed_unchanged() {
    let cases = [
        (json!(true), "farmer true:"),
        (json!(["a"]), r#"farmer ["a"]:"#),
        (json!({"id": 1}), r#"farmer {"id":1}:"#),
    ];

    for (farmer_id, expected) in cases {
        let payload = json!({"text": "Hello", "farmerId": farmer_id.clone()});
        let response = handle(&payload, &demo());

        assert!(response.success, "{farmer_id}: {response:?}");
        assert!(response.message.contains(expected), "{}", response.message);
        assert_eq!(response.farmer_id, Some(FarmerId::Other(farmer_id.clone())));

        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["farmerId"], farmer_id);
    }
}

#[test]
fn unknown_fields_are_ignored() {
    let payload = json!({"text": "Hello", "channel": "sms", "extra": {"a": 1}});
    assert!(handle(&payload, &demo()).success);
}

// ---------------------------------------------------------------------------
// Processing failures
// ---------------------------------------------------------------------------

#[test]
fn wrongly_typed_field_is_a_processing_failure() {
    let response = handle(&json!({"text": 42}), &demo());

    assert_failure(&response, "DATA_ERROR");
    assert_eq!(response.message, "Error processing request");
    assert!(response.details.is_some());
}

#[test]
fn failure_details_are_hidden_outside_development() {
    for environment in ["production", "staging", "Development"] {
        let response = handle(&json!({"language": ["en"], "text": "Hi"}), &config(false, environment));

        assert_failure(&response, "DATA_ERROR");
        assert_eq!(response.details, None, "{environment}");

        let body = serde_json::to_value(&response).unwrap();
        assert!(body.get("details").is_none());
    }
}

#[test]
fn validation_rejections_never_carry_details() {
    let response = handle(&json!({"text": " "}), &demo());
    assert_eq!(response.details, None);
}

#[test]
fn raw_body_that_is_not_json_is_a_processing_failure() {
    let response = handle_str("{not json", &demo());

    assert_failure(&response, "SYNTAX_ERROR");
    assert_eq!(response.message, "Error processing request");
    assert!(response.details.is_some());

    let response = handle_str("", &config(false, "production"));
    assert_failure(&response, "EOF_ERROR");
    assert_eq!(response.details, None);
}

#[test]
fn raw_body_goes_through_the_same_pipeline() {
    let response = handle_str(r#"{"text": "Hello", "farmerId": "f9"}"#, &demo());
    assert!(response.success);
    assert!(response.message.contains("f9"));

    let response = handle_str("[1, 2]", &demo());
    assert_failure(&response, "INVALID_PAYLOAD");
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

#[test]
fn success_response_serializes_camel_case() {
    let payload = json!({"text": "Hello", "language": "Sw", "farmerId": "f1"});
    let body = serde_json::to_value(handle(&payload, &demo())).unwrap();

    assert_eq!(
        body,
        json!({
            "success": true,
            "message": "[Demo Mode] Received query from farmer f1: Hello",
            "language": "sw",
            "farmerId": "f1",
            "mode": "demo",
        })
    );
}

#[test]
fn failure_response_serializes_without_success_fields() {
    let body: Value = serde_json::to_value(handle(&json!([]), &azure())).unwrap();

    assert_eq!(
        body,
        json!({
            "success": false,
            "message": "Invalid payload: expected JSON object",
            "error": "INVALID_PAYLOAD",
        })
    );
}

#[test]
fn response_round_trips_through_json() {
    let response = handle(&json!({"text": "Hello", "farmerId": 7}), &azure());
    let text = serde_json::to_string(&response).unwrap();
    let back: MessageResponse = serde_json::from_str(&text).unwrap();
    assert_eq!(back, response);
}
