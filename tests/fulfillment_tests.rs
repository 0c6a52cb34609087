use chrono::{TimeZone, Utc};
use lex_chat::fulfillment::{fulfill, reservation_id, FulfillmentEvent};
use lex_chat::kernel::DialogActionType;
use serde_json::json;

fn event(intent: &str, slots: serde_json::Value, attributes: serde_json::Value) -> FulfillmentEvent {
    serde_json::from_value(json!({
        "sessionState": {
            "intent": { "name": intent, "slots": slots, "confirmationState": "None" },
            "sessionAttributes": attributes
        },
        "inputTranscript": "test"
    }))
    .unwrap()
}

fn slot(value: &str) -> serde_json::Value {
    json!({ "value": { "originalValue": value, "interpretedValue": value, "resolvedValues": [value] } })
}

#[test]
fn test_reservation_id_format() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let id = reservation_id(now);
    assert!(id.starts_with("R-"));
    assert_eq!(id, id.to_uppercase());
    assert_eq!(id, "R-LOYW3V28");
}

#[test]
fn test_make_then_check_reservation() {
    let now = Utc.timestamp_millis_opt(1_700_000_000_000).unwrap();
    let made = fulfill(
        event(
            "MakeReservation",
            json!({ "Branch": slot("강남점"), "CourseName": slot("토익"), "Date": slot("2월 10일"), "Time": null }),
            json!({}),
        ),
        now,
    );

    assert_eq!(made.session_state.intent.state.as_deref(), Some("Fulfilled"));
    assert_eq!(
        made.session_state.dialog_action.as_ref().map(|a| &a.kind),
        Some(&DialogActionType::Close)
    );
    assert!(made.messages[0].content.contains("R-LOYW3V28"));
    assert!(made.messages[0].content.contains("강남점 / 토익 / 2월 10일"));
    // Unknown intent fields survive the round trip
    assert_eq!(made.session_state.intent.extra["confirmationState"], json!("None"));

    let attributes = serde_json::to_value(&made.session_state.session_attributes).unwrap();
    let checked = fulfill(event("CheckReservation", json!({}), attributes), now);
    assert!(checked.messages[0].content.starts_with("예약 조회: 강남점 / 토익"));
}

#[test]
fn test_cancel_without_any_id_fails() {
    let out = fulfill(event("CancelReservation", json!({}), json!({})), Utc::now());
    assert_eq!(out.session_state.intent.state.as_deref(), Some("Failed"));
    assert!(out.messages[0].content.contains("취소할 예약번호"));
}

#[test]
fn test_cancel_uses_slot_id() {
    let out = fulfill(
        event("CancelReservation", json!({ "ReservationId": slot("R-ABC") }), json!({})),
        Utc::now(),
    );
    assert_eq!(
        out.session_state
            .session_attributes
            .get("lastCancelledReservationId")
            .map(String::as_str),
        Some("R-ABC")
    );
    assert_eq!(out.messages[0].content, "예약(R-ABC) 취소가 완료됐어요.");
}

#[test]
fn test_check_unknown_id() {
    let out = fulfill(
        event("CheckReservation", json!({ "ReservationId": slot("R-NOPE") }), json!({})),
        Utc::now(),
    );
    assert!(out.messages[0].content.contains("R-NOPE"));
    assert_eq!(out.session_state.intent.state.as_deref(), Some("Fulfilled"));
}

#[test]
fn test_course_info_and_fallback() {
    let course = fulfill(event("CourseInfo", json!({ "CourseName": slot("회화") }), json!({})), Utc::now());
    assert!(course.messages[0].content.starts_with("회화 과정은"));

    let ask = fulfill(event("CourseInfo", json!({}), json!({})), Utc::now());
    assert!(ask.messages[0].content.starts_with("어떤 과정이"));

    let unknown = fulfill(event("SmallTalk", json!({}), json!({})), Utc::now());
    assert!(unknown.messages[0].content.starts_with("죄송해요"));
    assert_eq!(unknown.messages[0].content_type, "PlainText");
}

#[test]
fn test_response_wire_shape() {
    let out = fulfill(event("Help", json!({}), json!({})), Utc::now());
    let wire = serde_json::to_value(&out).unwrap();

    assert_eq!(wire["sessionState"]["dialogAction"]["type"], json!("Close"));
    assert_eq!(wire["sessionState"]["intent"]["name"], json!("Help"));
    assert_eq!(wire["messages"][0]["contentType"], json!("PlainText"));
}

#[test]
fn test_event_envelope_fields_are_kept_aside() {
    let parsed: FulfillmentEvent = serde_json::from_value(json!({
        "sessionState": { "intent": { "name": "Help" } },
        "inputTranscript": "도움말",
        "invocationSource": "FulfillmentCodeHook"
    }))
    .unwrap();

    assert_eq!(parsed.session_state.intent.name.as_deref(), Some("Help"));
    assert_eq!(parsed.extra["inputTranscript"], json!("도움말"));
    assert_eq!(parsed.extra["invocationSource"], json!("FulfillmentCodeHook"));
    assert!(!parsed.extra.contains_key("sessionState"));
}
