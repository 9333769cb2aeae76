//! End-to-end tests against the full router, backed by a temp data file and a
//! scripted advisor.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use heapcal::routes::ai::MAX_UPLOAD_BYTES;
use heapcal::{AppState, build_router};
use heapcal_advisor::{Advisor, AdvisorError, AdvisorResult, VoiceTask};
use heapcal_core::{Event, Repository, Store};

#[derive(Default)]
struct FakeAdvisor {
    configured: bool,
    failing: bool,
    calls: AtomicUsize,
}

impl FakeAdvisor {
    fn configured() -> Self {
        FakeAdvisor {
            configured: true,
            ..Default::default()
        }
    }

    fn failing() -> Self {
        FakeAdvisor {
            configured: true,
            failing: true,
            ..Default::default()
        }
    }

    fn call(&self) -> AdvisorResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            Err(AdvisorError::Api {
                status: 503,
                body: "model overloaded".into(),
            })
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl Advisor for FakeAdvisor {
    fn is_configured(&self) -> bool {
        self.configured
    }

    async fn suggest_schedule(&self, fixed: &[Event], heap: &[Event]) -> AdvisorResult<Value> {
        self.call()?;
        Ok(json!({
            "recommendations": [{
                "taskId": heap[0].id,
                "fixedCount": fixed.len(),
                "reasoning": "free morning"
            }]
        }))
    }

    async fn extract_event(&self, image: &[u8], mime_type: &str) -> AdvisorResult<Value> {
        self.call()?;
        Ok(json!({ "title": "From screenshot", "bytes": image.len(), "mimeType": mime_type }))
    }

    async fn extract_task(&self, audio: Vec<u8>, file_name: &str) -> AdvisorResult<VoiceTask> {
        self.call()?;
        Ok(VoiceTask {
            transcription: format!("{} bytes from {}", audio.len(), file_name),
            task_details: json!({ "title": "Call the dentist" }),
        })
    }

    async fn suggest_deadline(&self, title: &str, description: &str) -> AdvisorResult<Value> {
        self.call()?;
        Ok(json!({ "title": title, "description": description, "priority": "high" }))
    }
}

struct TestApp {
    router: Router,
    advisor: Arc<FakeAdvisor>,
    dir: TempDir,
}

impl TestApp {
    fn new() -> Self {
        Self::with_advisor(FakeAdvisor::configured())
    }

    fn with_advisor(advisor: FakeAdvisor) -> Self {
        let dir = TempDir::new().unwrap();
        let repo = Repository::open(Store::new(dir.path().join("calendar-data.json")));
        let advisor = Arc::new(advisor);
        let router = build_router(AppState::new(repo, advisor.clone()));
        TestApp {
            router,
            advisor,
            dir,
        }
    }

    fn advisor_calls(&self) -> usize {
        self.advisor.calls.load(Ordering::SeqCst)
    }

    fn data_file(&self) -> Value {
        let raw = std::fs::read_to_string(self.dir.path().join("calendar-data.json")).unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::get(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::delete(uri).body(Body::empty()).unwrap())
            .await
    }

    async fn json(&self, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn upload(
        &self,
        uri: &str,
        field: &str,
        file_name: &str,
        content_type: &str,
        data: &[u8],
    ) -> (StatusCode, Value) {
        const BOUNDARY: &str = "heapcal-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                 Content-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let request = Request::post(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await
    }
}

fn timestamp(value: &Value) -> DateTime<Utc> {
    value.as_str().unwrap().parse().unwrap()
}

fn standup() -> Value {
    json!({
        "title": "Standup",
        "startDate": "2024-01-01T09:00Z",
        "endDate": "2024-01-01T09:30Z",
        "type": "fixed"
    })
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_create_and_get_event() {
    let app = TestApp::new();

    let (status, created) = app.json("POST", "/api/events", standup()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["title"], "Standup");
    assert_eq!(created["type"], "fixed");
    assert_eq!(created["color"], "#6B4EFF");
    assert_eq!(created["isAllDay"], false);
    assert_eq!(created["startDate"], "2024-01-01T09:00:00.000Z");
    assert_eq!(created["endDate"], "2024-01-01T09:30:00.000Z");

    let (status, fetched) = app.get("/api/events/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    assert_eq!(app.data_file()["events"][0]["title"], "Standup");
}

#[tokio::test]
async fn test_create_event_rejects_bad_body() {
    let app = TestApp::new();

    let (status, body) = app
        .json("POST", "/api/events", json!({ "title": "No times", "type": "fixed" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid event data");
    let paths: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["path"].as_str().unwrap())
        .collect();
    assert!(paths.contains(&"startDate"));
    assert!(paths.contains(&"endDate"));

    let (status, body) = app.json("POST", "/api/events", json!({ "type": "heap" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["path"], "title");

    let (status, _) = app
        .json("POST", "/api/events", json!({ "title": "x", "startDate": "yesterday-ish" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, events) = app.get("/api/events").await;
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn test_heap_task_gets_placeholder_slot() {
    let app = TestApp::new();

    let (status, task) = app
        .json("POST", "/api/events", json!({ "title": "Write report", "type": "heap" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let start = timestamp(&task["startDate"]);
    let end = timestamp(&task["endDate"]);
    assert_eq!((end - start).num_minutes(), 60);
}

#[tokio::test]
async fn test_missing_events_are_not_found() {
    let app = TestApp::new();

    for uri in ["/api/events/42", "/api/events/abc"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Event not found");
    }

    let (status, _) = app.json("PUT", "/api/events/42", json!({ "title": "x" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/events/42").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let app = TestApp::new();
    app.json("POST", "/api/events", standup()).await;

    let (status, updated) = app
        .json(
            "PUT",
            "/api/events/1",
            json!({ "title": "Daily standup", "location": "Room 4", "isPinned": true }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Daily standup");
    assert_eq!(updated["location"], "Room 4");
    assert_eq!(updated["isPinned"], true);
    assert_eq!(updated["startDate"], "2024-01-01T09:00:00.000Z");

    let (status, cleared) = app
        .json("PUT", "/api/events/1", json!({ "location": null }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["location"], Value::Null);

    let (status, body) = app.delete("/api/events/1").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = app.get("/api/events/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_heap_and_fixed_filters() {
    let app = TestApp::new();
    app.json("POST", "/api/events", standup()).await;
    app.json("POST", "/api/events", json!({ "title": "Taxes", "type": "heap" }))
        .await;
    app.json("POST", "/api/events", json!({ "title": "Groceries", "type": "heap" }))
        .await;

    let (_, heap) = app.get("/api/heap").await;
    let heap_titles: Vec<&str> = heap
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["title"].as_str().unwrap())
        .collect();
    assert_eq!(heap_titles, ["Taxes", "Groceries"]);

    let (_, fixed) = app.get("/api/fixed-events").await;
    assert_eq!(fixed.as_array().unwrap().len(), 1);
    assert_eq!(fixed[0]["title"], "Standup");

    let (_, all) = app.get("/api/events").await;
    assert_eq!(all.as_array().unwrap().len(), 3);
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_default_category_is_seeded() {
    let app = TestApp::new();

    let (status, categories) = app.get("/api/categories").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        categories,
        json!([{ "id": 1, "name": "Default", "color": "#6B4EFF" }])
    );

    let (status, category) = app.get("/api/categories/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(category["name"], "Default");
}

#[tokio::test]
async fn test_last_category_cannot_be_deleted() {
    let app = TestApp::new();

    let (status, body) = app.delete("/api/categories/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found or cannot be deleted");

    let (_, categories) = app.get("/api/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_deleting_category_reassigns_events() {
    let app = TestApp::new();

    let (status, work) = app
        .json("POST", "/api/categories", json!({ "name": "Work", "color": "#FF0000" }))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(work["id"], 2);

    let mut event = standup();
    event["categoryId"] = json!(2);
    app.json("POST", "/api/events", event).await;

    // The default category stays even when others exist
    let (status, _) = app.delete("/api/categories/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete("/api/categories/2").await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, event) = app.get("/api/events/1").await;
    assert_eq!(event["categoryId"], 1);
    assert_eq!(app.data_file()["events"][0]["categoryId"], 1);
}

#[tokio::test]
async fn test_category_validation_and_update() {
    let app = TestApp::new();

    let (status, body) = app
        .json("POST", "/api/categories", json!({ "name": "Work", "color": "red" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid category data");
    assert_eq!(body["errors"][0]["path"], "color");

    let (status, updated) = app
        .json("PUT", "/api/categories/1", json!({ "name": "Personal" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Personal");
    assert_eq!(updated["color"], "#6B4EFF");

    let (status, body) = app
        .json("PUT", "/api/categories/9", json!({ "name": "Ghost" }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Category not found");
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_settings_updates_are_stamped() {
    let app = TestApp::new();

    let (status, initial) = app.get("/api/settings").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(initial["defaultView"], "month");
    assert_eq!(initial["useAI"], true);
    assert_eq!(initial["theme"], "dark");

    let (status, first) = app
        .json("PUT", "/api/settings", json!({ "defaultView": "week" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["defaultView"], "week");
    assert_eq!(first["theme"], "dark");

    let (_, second) = app
        .json("PUT", "/api/settings", json!({ "useAI": false }))
        .await;
    assert_eq!(second["useAI"], false);
    assert_eq!(second["defaultView"], "week");
    assert!(timestamp(&second["lastUpdated"]) > timestamp(&first["lastUpdated"]));

    let (status, _) = app
        .json("PUT", "/api/settings", json!({ "defaultView": "year" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Export / import
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_export_sets_download_headers() {
    let app = TestApp::new();
    app.json("POST", "/api/events", standup()).await;

    let response = app
        .router
        .clone()
        .oneshot(Request::get("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=calendar-data.json"
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let doc: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(doc["events"][0]["title"], "Standup");
    assert_eq!(doc["categories"][0]["id"], 1);
    assert_eq!(doc["settings"]["id"], 1);
}

#[tokio::test]
async fn test_import_round_trip() {
    let source = TestApp::new();
    source.json("POST", "/api/events", standup()).await;
    source
        .json("POST", "/api/categories", json!({ "name": "Work", "color": "#00FF00" }))
        .await;
    let exported = source
        .router
        .clone()
        .oneshot(Request::get("/api/export").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let bytes = to_bytes(exported.into_body(), usize::MAX).await.unwrap();
    let document = String::from_utf8(bytes.to_vec()).unwrap();

    let target = TestApp::new();
    let (status, body) = target
        .json("POST", "/api/import", json!({ "jsonData": document }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Data imported successfully");

    let (_, events) = target.get("/api/events").await;
    assert_eq!(events[0]["title"], "Standup");
    let (_, categories) = target.get("/api/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 2);

    // Ids continue after the imported maximum
    let (_, created) = target
        .json("POST", "/api/events", json!({ "title": "Next", "type": "heap" }))
        .await;
    assert_eq!(created["id"], 2);
}

#[tokio::test]
async fn test_import_keeps_model_invariants() {
    let app = TestApp::new();

    let document = json!({ "events": [], "categories": [], "settings": { "id": 7 } });
    let (status, _) = app
        .json("POST", "/api/import", json!({ "jsonData": document.to_string() }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, categories) = app.get("/api/categories").await;
    assert_eq!(
        categories,
        json!([{ "id": 1, "name": "Default", "color": "#6B4EFF" }])
    );
    let (_, settings) = app.get("/api/settings").await;
    assert_eq!(settings["id"], 1);

    let overflowing = json!({
        "events": [{
            "id": i64::MAX,
            "title": "Far away",
            "startDate": "2024-01-01T09:00Z",
            "endDate": "2024-01-01T10:00Z"
        }],
        "categories": [],
        "settings": {}
    });
    let (status, body) = app
        .json("POST", "/api/import", json!({ "jsonData": overflowing.to_string() }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON data format");

    let (_, events) = app.get("/api/events").await;
    assert_eq!(events, json!([]));
}

#[tokio::test]
async fn test_import_rejects_bad_payloads() {
    let app = TestApp::new();
    app.json("POST", "/api/events", standup()).await;

    let (status, body) = app.json("POST", "/api/import", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No JSON data provided");

    let (status, body) = app
        .json("POST", "/api/import", json!({ "jsonData": "not json" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON data format");

    let (status, body) = app
        .json(
            "POST",
            "/api/import",
            json!({ "jsonData": r#"{"events": {}, "categories": [], "settings": {}}"# }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON data format");

    let (status, body) = app
        .json("POST", "/api/import", json!({ "jsonData": 17 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid JSON data format");

    // Nothing was replaced
    let (_, events) = app.get("/api/events").await;
    assert_eq!(events[0]["title"], "Standup");
}

// ---------------------------------------------------------------------------
// AI
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_schedule_with_empty_heap_skips_advisor() {
    let app = TestApp::with_advisor(FakeAdvisor::default());
    app.json("POST", "/api/events", standup()).await;

    let (status, body) = app.json("POST", "/api/ai/schedule", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "recommendations": [] }));
    assert_eq!(app.advisor_calls(), 0);
}

#[tokio::test]
async fn test_schedule_relays_recommendations() {
    let app = TestApp::new();
    app.json("POST", "/api/events", standup()).await;
    app.json("POST", "/api/events", json!({ "title": "Taxes", "type": "heap" }))
        .await;

    let (status, body) = app.json("POST", "/api/ai/schedule", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["recommendations"][0]["taskId"], 2);
    assert_eq!(body["recommendations"][0]["fixedCount"], 1);
    assert_eq!(app.advisor_calls(), 1);
}

#[tokio::test]
async fn test_missing_api_key_fails_before_calling_out() {
    let app = TestApp::with_advisor(FakeAdvisor::default());
    app.json("POST", "/api/events", json!({ "title": "Taxes", "type": "heap" }))
        .await;

    let (status, body) = app.json("POST", "/api/ai/schedule", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["message"].as_str().unwrap().contains("OPENAI_API_KEY"));

    let (status, _) = app
        .json("POST", "/api/ai/suggest-deadline", json!({ "title": "Taxes" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    assert_eq!(app.advisor_calls(), 0);
}

#[tokio::test]
async fn test_process_screenshot() {
    let app = TestApp::new();

    let (status, body) = app
        .upload(
            "/api/ai/process-screenshot",
            "screenshot",
            "invite.png",
            "image/png",
            b"\x89PNG fake image",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "From screenshot");
    assert_eq!(body["mimeType"], "image/png");
    assert_eq!(body["bytes"], 15);
}

#[tokio::test]
async fn test_process_voice() {
    let app = TestApp::new();

    let (status, body) = app
        .upload(
            "/api/ai/process-voice",
            "audio",
            "note.webm",
            "audio/webm",
            b"fake audio",
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["transcription"], "10 bytes from note.webm");
    assert_eq!(body["taskDetails"]["title"], "Call the dentist");
}

#[tokio::test]
async fn test_uploads_require_a_file() {
    let app = TestApp::new();

    let (status, body) = app
        .upload("/api/ai/process-screenshot", "other", "a.png", "image/png", b"x")
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No screenshot provided");

    let (status, body) = app.json("POST", "/api/ai/process-voice", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "No audio file provided");

    assert_eq!(app.advisor_calls(), 0);
}

#[tokio::test]
async fn test_upload_at_size_limit_is_accepted() {
    let app = TestApp::new();
    let image = vec![0u8; MAX_UPLOAD_BYTES];

    let (status, body) = app
        .upload(
            "/api/ai/process-screenshot",
            "screenshot",
            "full.png",
            "image/png",
            &image,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bytes"], MAX_UPLOAD_BYTES);
    assert_eq!(app.advisor_calls(), 1);
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected() {
    let app = TestApp::new();
    let image = vec![0u8; MAX_UPLOAD_BYTES + 1];

    let (status, body) = app
        .upload(
            "/api/ai/process-screenshot",
            "screenshot",
            "huge.png",
            "image/png",
            &image,
        )
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body["message"], "File too large (max 10 MB)");

    let audio = vec![0u8; MAX_UPLOAD_BYTES + 1];
    let (status, _) = app
        .upload("/api/ai/process-voice", "audio", "long.webm", "audio/webm", &audio)
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    assert_eq!(app.advisor_calls(), 0);
}

#[tokio::test]
async fn test_suggest_deadline() {
    let app = TestApp::new();

    let (status, body) = app
        .json("POST", "/api/ai/suggest-deadline", json!({ "description": "soon" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Task title is required");

    let (status, body) = app
        .json("POST", "/api/ai/suggest-deadline", json!({ "title": "File taxes" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "File taxes");
    assert_eq!(body["description"], "");
    assert_eq!(body["priority"], "high");
}

#[tokio::test]
async fn test_upstream_failure_reports_message_and_error() {
    let app = TestApp::with_advisor(FakeAdvisor::failing());

    let (status, body) = app
        .json("POST", "/api/ai/suggest-deadline", json!({ "title": "File taxes" }))
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "Failed to suggest deadline");
    assert!(body["error"].as_str().unwrap().contains("503"));
    assert_eq!(app.advisor_calls(), 1);
}
