//! Integration tests for the script editor routes.

mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_script_edit_round_trip() {
    let test_app = common::build_test_app();

    // POST /api/v1/script/steps appends an empty nice step.
    let (status, json) =
        common::empty_request(test_app.app(), "POST", "/api/v1/script/steps").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["script"]["steps"].as_array().unwrap().len(), 2);
    assert_eq!(json["script"]["steps"][1]["usable"], false);
    assert_eq!(json["script"]["usable_count"], 1);

    // Fill it in and make it evil.
    common::put_json(
        test_app.app(),
        "/api/v1/script/steps/1/text",
        &json!({ "text": "Pay up." }),
    )
    .await;
    let (_, json) = common::put_json(
        test_app.app(),
        "/api/v1/script/steps/1/evil",
        &json!({ "evil": true }),
    )
    .await;
    assert_eq!(json["applied"], true);
    assert_eq!(
        json["script"]["steps"][1],
        json!({ "index": 1, "text": "Pay up.", "evil": true, "usable": true })
    );

    // GET /api/v1/script reflects the edits.
    let (status, json) = common::get_json(test_app.app(), "/api/v1/script").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["usable_count"], 2);
}

#[tokio::test]
async fn test_script_blank_tagline_displays_default() {
    let test_app = common::build_test_app();

    let (_, json) = common::put_json(
        test_app.app(),
        "/api/v1/script/tagline",
        &json!({ "text": "   " }),
    )
    .await;

    assert_eq!(json["script"]["tagline"], "   ");
    assert_eq!(
        json["script"]["display_tagline"],
        "Fast, friendly tax guidance for every filer."
    );
}

#[tokio::test]
async fn test_script_initial_step_edit_syncs_pristine_greeting() {
    let test_app = common::build_test_app();

    common::put_json(
        test_app.app(),
        "/api/v1/script/initial-step",
        &json!({ "text": "Welcome, taxpayer.", "evil": true }),
    )
    .await;

    let (_, json) = common::get_json(test_app.app(), "/api/v1/chat").await;
    assert_eq!(
        json["messages"],
        json!([{ "role": "assistant", "content": "Welcome, taxpayer." }])
    );
    assert_eq!(json["theme"]["evil"], true);
}

#[tokio::test]
async fn test_script_removing_consumed_step_clamps_playback() {
    // Arrange
    let test_app = common::build_test_app();
    common::post_json(
        test_app.app(),
        "/api/v1/chat/send",
        &json!({ "text": "hello" }),
    )
    .await;
    test_app.advance(5_000);

    // Act
    let (status, json) =
        common::empty_request(test_app.app(), "DELETE", "/api/v1/script/steps/0").await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["applied"], true);
    let (_, chat) = common::get_json(test_app.app(), "/api/v1/chat").await;
    assert_eq!(chat["script_index"], 0);
    assert_eq!(chat["usable_count"], 0);
    assert_eq!(chat["theme"]["evil"], false);
}

#[tokio::test]
async fn test_script_export_then_import_round_trip() {
    let test_app = common::build_test_app();

    let (status, exported) = common::get_json(test_app.app(), "/api/v1/script/export").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        exported,
        json!({
            "version": 1,
            "tagline": "Test tagline",
            "initialStep": { "text": "Hi", "evil": false },
            "steps": [{ "text": "Step A", "evil": false }],
        })
    );
    let (_, chat) = common::get_json(test_app.app(), "/api/v1/chat").await;
    assert_eq!(chat["status"], "Exported taxbot-script.json.");

    let (status, json) = common::post_raw(
        test_app.app(),
        "/api/v1/script/import",
        &exported.to_string(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "Imported 1 script steps.");
    assert_eq!(json["script"]["tagline"], "Test tagline");
}

#[tokio::test]
async fn test_script_import_legacy_key_resets_conversation() {
    // Arrange
    let test_app = common::build_test_app();
    common::post_json(
        test_app.app(),
        "/api/v1/chat/send",
        &json!({ "text": "hello" }),
    )
    .await;

    // Act
    let (status, json) = common::post_raw(
        test_app.app(),
        "/api/v1/script/import",
        r#"{"scriptedResponses": [{"text": "Audit time.", "evil": "yes"}, {"text": 4}, "Done"]}"#,
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["script"]["steps"].as_array().unwrap().len(), 3);
    assert_eq!(json["script"]["steps"][0]["evil"], true);
    assert_eq!(json["script"]["steps"][1]["usable"], false);
    assert_eq!(json["script"]["usable_count"], 2);
    assert_eq!(
        json["script"]["display_tagline"],
        "Fast, friendly tax guidance for every filer."
    );
    test_app.advance(5_000);
    let (_, chat) = common::get_json(test_app.app(), "/api/v1/chat").await;
    assert_eq!(chat["messages"].as_array().unwrap().len(), 1);
    assert_eq!(chat["is_typing"], false);
}

#[tokio::test]
async fn test_script_failed_import_leaves_script_untouched() {
    let test_app = common::build_test_app();

    let (status, json) =
        common::post_raw(test_app.app(), "/api/v1/script/import", "{not json").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "import_error");
    let (_, script) = common::get_json(test_app.app(), "/api/v1/script").await;
    assert_eq!(script["steps"][0]["text"], "Step A");
    let (_, chat) = common::get_json(test_app.app(), "/api/v1/chat").await;
    assert!(
        chat["status"]
            .as_str()
            .unwrap()
            .starts_with("Import failed: malformed document")
    );
}
