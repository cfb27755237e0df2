// Unit tests for Cardmatch

use cardmatch::core::{Catalog, Matchmaker, WaitingPool};
use cardmatch::models::{
    ClientEvent, ErrorResponse, PlayerId, Profile, QueueStatus, ResponseKind, ServerEvent, SessionId, StageComplete,
};
use chrono::{Duration, Utc};
use serde_json::json;
use validator::Validate;

fn create_profile(unique_id: &str, age: u8) -> Profile {
    Profile {
        name: "Alex".to_string(),
        age,
        location: "Vienna".to_string(),
        bio: "Opera and football".to_string(),
        unique_id: unique_id.to_string(),
        telegram_id: Some("12345".to_string()),
    }
}

#[test]
fn test_profile_age_bounds() {
    assert!(create_profile("u1", 18).validate().is_ok());
    assert!(create_profile("u1", 100).validate().is_ok());
    assert!(create_profile("u1", 17).validate().is_err());
    assert!(create_profile("u1", 101).validate().is_err());
}

#[test]
fn test_profile_requires_fields() {
    let mut profile = create_profile("u1", 30);
    profile.bio = String::new();
    assert!(profile.validate().is_err());

    let profile = create_profile("", 30);
    assert!(profile.validate().is_err());
}

#[test]
fn test_parse_join_waiting() {
    let frame = json!({
        "event": "joinWaiting",
        "data": {
            "name": "Alex",
            "age": 30,
            "location": "Vienna",
            "bio": "Opera",
            "uniqueId": "u1"
        }
    });
    let event: ClientEvent = serde_json::from_value(frame).unwrap();
    match event {
        ClientEvent::JoinWaiting(request) => {
            assert_eq!(request.unique_id.as_deref(), Some("u1"));
            assert!(request.telegram_id.is_none());
            assert_eq!(Profile::try_from(request).unwrap().age, 30);
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}

#[test]
fn test_bad_profiles_parse_then_fail_validation() {
    let frames = [
        r#"{"event":"joinWaiting","data":{"name":"Alex","age":30,"location":"Vienna","uniqueId":"u1"}}"#,
        r#"{"event":"joinWaiting","data":{"name":"Alex","age":300,"location":"Vienna","bio":"Opera","uniqueId":"u1"}}"#,
        r#"{"event":"joinWaiting","data":{"name":"Alex","age":-1,"location":"Vienna","bio":"Opera","uniqueId":"u1"}}"#,
    ];

    for frame in frames {
        let event: ClientEvent = serde_json::from_str(frame).unwrap();
        let ClientEvent::JoinWaiting(request) = event else {
            panic!("Unexpected event for {}", frame);
        };
        let error = Profile::try_from(request).unwrap_err();
        assert_eq!(error.code(), "validation_error");
    }
}

#[test]
fn test_parse_leave_waiting_without_data() {
    let event: ClientEvent = serde_json::from_value(json!({ "event": "leaveWaiting" })).unwrap();
    assert!(matches!(event, ClientEvent::LeaveWaiting));
}

#[test]
fn test_parse_respond_card_accepts_dislike() {
    let session_id = SessionId::new();
    let frame = json!({
        "event": "respondCard",
        "data": { "sessionId": session_id, "response": "dislike" }
    });
    let event: ClientEvent = serde_json::from_value(frame).unwrap();
    match event {
        ClientEvent::RespondCard(req) => {
            assert_eq!(req.session_id, session_id);
            assert_eq!(req.response, ResponseKind::Skip);
        }
        other => panic!("Unexpected event: {:?}", other),
    }
}

#[test]
fn test_parse_rejects_unknown_response() {
    let frame = json!({
        "event": "respondCard",
        "data": { "sessionId": SessionId::new(), "response": "superlike" }
    });
    assert!(serde_json::from_value::<ClientEvent>(frame).is_err());
}

#[test]
fn test_parse_submit_card() {
    let frame = json!({
        "event": "submitCard",
        "data": {
            "sessionId": SessionId::new(),
            "card": { "question": "Tea or coffee?", "answer": "Tea" }
        }
    });
    let event: ClientEvent = serde_json::from_value(frame).unwrap();
    assert_eq!(event.name(), "submitCard");
}

#[test]
fn test_server_event_wire_format() {
    let value = serde_json::to_value(ServerEvent::WaitingCount(3)).unwrap();
    assert_eq!(value, json!({ "event": "waitingCount", "data": 3 }));

    let value = serde_json::to_value(ServerEvent::QueueStatus(QueueStatus {
        position: 0,
        message: "You have left the waiting queue".to_string(),
    }))
    .unwrap();
    assert_eq!(value["event"], "queueStatus");
    assert_eq!(value["data"]["position"], 0);

    let session_id = SessionId::new();
    let value = serde_json::to_value(ServerEvent::StageComplete(StageComplete { session_id, stage: 2 })).unwrap();
    assert_eq!(value["event"], "stageComplete");
    assert_eq!(value["data"]["sessionId"], json!(session_id));
    assert_eq!(value["data"]["stage"], 2);

    let value = serde_json::to_value(ServerEvent::Error(ErrorResponse {
        error: "wrong_turn".to_string(),
        message: "Not your turn".to_string(),
        status_code: None,
    }))
    .unwrap();
    assert_eq!(value, json!({ "event": "error", "data": { "error": "wrong_turn", "message": "Not your turn" } }));
}

#[test]
fn test_matchmaker_prefers_longest_waiting() {
    let mut pool = WaitingPool::new();
    let now = Utc::now();
    let requester = PlayerId::new();
    let recent = PlayerId::new();
    let oldest = PlayerId::new();

    pool.insert(recent, create_profile("u2", 30), now - Duration::seconds(1));
    pool.insert(oldest, create_profile("u3", 30), now - Duration::minutes(5));
    pool.insert(requester, create_profile("u1", 30), now);

    let result = Matchmaker::new().find_partner(&pool, requester).unwrap();
    assert_eq!(result.partner, oldest);
}

#[test]
fn test_catalog_round_robin_is_infinite() {
    let catalog = Catalog::default();
    let mut cursor = catalog.cursor();
    let mut seen = Vec::new();

    for _ in 0..(catalog.total_prompts() * 2 + 3) {
        seen.push(catalog.prompt_at(&cursor).unwrap().to_string());
        cursor.advance(&catalog);
    }

    let total = catalog.total_prompts();
    assert_eq!(seen[0], seen[total]);
    assert_eq!(seen[3], seen[total + 3]);
    assert_eq!(seen[5], "What's your favorite weekend activity?");
}
