//! Integration tests for the content service.

use std::net::SocketAddr;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;

use crate::config::Config;
use crate::console::{
    ConsoleConfig, ContentCache, ContentClient, CrudForm, MemoryStore, StagedFile,
};
use crate::models::{Faq, Tender};
use crate::{create_router, AppState};

const ADMIN_TOKEN: &str = "test-admin-token";

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    temp_dir: TempDir,
}

impl TestFixture {
    async fn new() -> Self {
        Self::with_token(Some(ADMIN_TOKEN.to_string())).await
    }

    async fn with_token(token: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let config = Config {
            admin_token: token.clone(),
            db_path: temp_dir.path().join("test.sqlite"),
            upload_dir: temp_dir.path().join("uploads"),
            bind_addr: "127.0.0.1:0".parse().unwrap(),
            log_level: "warn".to_string(),
            max_upload_bytes: 1024 * 1024,
            contact_rate_limit: 2,
            contact_window: Duration::from_secs(60),
        };

        let state = AppState::initialize(config)
            .await
            .expect("Failed to init state");
        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(Duration::from_millis(100)).await;

        let mut client_builder = Client::builder();
        if let Some(token) = token {
            let mut headers = reqwest::header::HeaderMap::new();
            headers.insert(
                reqwest::header::AUTHORIZATION,
                format!("Bearer {}", token).parse().unwrap(),
            );
            client_builder = client_builder.default_headers(headers);
        }

        TestFixture {
            client: client_builder.build().unwrap(),
            base_url,
            temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json(&self, path: &str, body: Value) -> Value {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200, "POST {} failed", path);
        resp.json().await.unwrap()
    }

    async fn get_json(&self, path: &str) -> Value {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "GET {} failed", path);
        resp.json().await.unwrap()
    }
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_write_requires_token() {
    let fixture = TestFixture::new().await;
    let anonymous = Client::new();

    // Missing token
    let resp = anonymous
        .post(fixture.url("/api/faq"))
        .json(&json!({"questionEn": "Q"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    // Wrong token
    let resp = anonymous
        .post(fixture.url("/api/faq"))
        .bearer_auth("wrong-token")
        .json(&json!({"questionEn": "Q"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    // Valid token
    let resp = anonymous
        .post(fixture.url("/api/faq"))
        .bearer_auth(ADMIN_TOKEN)
        .json(&json!({"questionEn": "Q"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}

#[tokio::test]
async fn test_public_reads_need_no_token() {
    let fixture = TestFixture::new().await;
    fixture
        .post_json("/api/flash-news", json!({"titleEn": "Holi special buses", "titleHi": "होली विशेष बसें"}))
        .await;

    let resp = Client::new()
        .get(fixture.url("/api/flash-news/hi"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["data"][0]["title"], "होली विशेष बसें");
}

#[tokio::test]
async fn test_faq_crud_and_localized_view() {
    let fixture = TestFixture::new().await;

    // Create
    let created = fixture
        .post_json(
            "/api/faq",
            json!({
                "questionEn": "How do I book?",
                "questionHi": "बुकिंग कैसे करें?",
                "answerEn": "Online"
            }),
        )
        .await;
    assert_eq!(created["success"], true);
    let id = created["data"]["_id"].as_str().unwrap().to_string();
    assert!(created["data"]["createdAt"].is_string());

    // Get by id
    let fetched = fixture.get_json(&format!("/api/faq/{}", id)).await;
    assert_eq!(fetched["data"]["questionEn"], "How do I book?");

    // Localized view fills missing halves with empty strings
    let hindi = fixture.get_json("/api/faq/hi").await;
    assert_eq!(hindi["data"][0]["question"], "बुकिंग कैसे करें?");
    assert_eq!(hindi["data"][0]["answer"], "");
    assert_eq!(hindi["data"][0]["_id"], id.as_str());

    // Partial update keeps other fields
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/faq/{}", id)))
        .json(&json!({"answerHi": "ऑनलाइन"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["data"]["answerHi"], "ऑनलाइन");
    assert_eq!(updated["data"]["questionEn"], "How do I book?");

    // Delete
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/faq/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = fixture
        .client
        .get(fixture.url(&format!("/api/faq/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_validation_error() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/faq"))
        .json(&json!({"answerEn": "No question"}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_about_us_upsert_and_lang() {
    let fixture = TestFixture::new().await;

    // Empty before anything is saved
    let empty = fixture.get_json("/api/about-us").await;
    assert_eq!(empty["data"]["aboutUsEn"], "");

    let first = fixture
        .post_json("/api/about-us", json!({"aboutUsEn": "BSRTC", "visionHi": "दृष्टि"}))
        .await;
    let second = fixture
        .post_json("/api/about-us", json!({"missionEn": "Safe travel"}))
        .await;
    assert_eq!(first["data"]["_id"], second["data"]["_id"]);
    assert_eq!(second["data"]["aboutUsEn"], "BSRTC");

    let hindi = fixture.get_json("/api/about-us?lang=hi").await;
    assert_eq!(hindi["data"]["vision"], "दृष्टि");
    assert_eq!(hindi["data"]["mission"], "");

    let resp = fixture
        .client
        .get(fixture.url("/api/about-us?lang=fr"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_tender_pdf_upload_is_served() {
    let fixture = TestFixture::new().await;

    let pdf = b"%PDF-1.4 tender".to_vec();
    let form = Form::new()
        .text("name", "Bus body building")
        .text("referenceNo", "BSRTC/2024/17")
        .text("closingDate", "2024-03-31")
        .part(
            "pdf",
            Part::bytes(pdf.clone())
                .file_name("notice.pdf")
                .mime_str("application/pdf")
                .unwrap(),
        );

    let resp = fixture
        .client
        .post(fixture.url("/api/tenders"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let path = body["data"]["pdf"].as_str().unwrap().to_string();
    assert!(path.starts_with("uploads/"));
    assert!(path.ends_with("-notice.pdf"));

    let served = fixture
        .client
        .get(fixture.url(&format!("/{}", path)))
        .send()
        .await
        .unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.bytes().await.unwrap().to_vec(), pdf);

    // Deleting the tender removes the file
    let id = body["data"]["_id"].as_str().unwrap();
    fixture
        .client
        .delete(fixture.url(&format!("/api/tenders/{}", id)))
        .send()
        .await
        .unwrap();
    let stored = fixture
        .temp_dir
        .path()
        .join("uploads")
        .join(path.trim_start_matches("uploads/"));
    assert!(!stored.exists());
}

#[tokio::test]
async fn test_upload_rejects_wrong_content_type() {
    let fixture = TestFixture::new().await;

    let form = Form::new().text("name", "Tender").part(
        "pdf",
        Part::bytes(b"not a pdf".to_vec())
            .file_name("notes.txt")
            .mime_str("text/plain")
            .unwrap(),
    );
    let resp = fixture
        .client
        .post(fixture.url("/api/tenders"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_policies_bulk_replace() {
    let fixture = TestFixture::new().await;

    let kept = fixture
        .post_json("/api/policies", json!({"nameEn": "Luggage"}))
        .await;
    let kept_id = kept["data"]["_id"].as_str().unwrap().to_string();
    fixture
        .post_json("/api/policies", json!({"nameEn": "Dropped"}))
        .await;

    let resp = fixture
        .client
        .put(fixture.url("/api/policies"))
        .json(&json!({
            "policies": [
                {"_id": kept_id, "nameEn": "Luggage allowance"},
                {"nameEn": "Refunds", "nameHi": "धनवापसी"}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let list = fixture.get_json("/api/policies").await;
    let policies = list["data"].as_array().unwrap();
    assert_eq!(policies.len(), 2);
    assert_eq!(policies[0]["_id"], kept_id.as_str());
    assert_eq!(policies[0]["nameEn"], "Luggage allowance");
    assert_eq!(policies[1]["nameHi"], "धनवापसी");
}

#[tokio::test]
async fn test_gallery_event_photo_removal() {
    let fixture = TestFixture::new().await;

    let image = |name: &str| {
        Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
            .file_name(name.to_string())
            .mime_str("image/png")
            .unwrap()
    };
    let form = Form::new()
        .text("category", "Inauguration")
        .part("photos", image("one.png"))
        .part("photos", image("two.png"));

    let resp = fixture
        .client
        .post(fixture.url("/api/gallery-events"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let id = body["data"]["_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["photos"].as_array().unwrap().len(), 2);

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/gallery-events/{}/photos/0", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let photos = body["data"]["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 1);
    assert!(photos[0].as_str().unwrap().ends_with("-two.png"));

    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/gallery-events/{}/photos/5", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn test_contact_messages_rate_limited_and_private() {
    let fixture = TestFixture::new().await;
    let anonymous = Client::new();
    let message = json!({"name": "Asha", "phone": "9800000000", "message": "Lost bag on route 12"});

    for _ in 0..2 {
        let resp = anonymous
            .post(fixture.url("/api/contact-messages"))
            .json(&message)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
    }

    let resp = anonymous
        .post(fixture.url("/api/contact-messages"))
        .json(&message)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 429);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "RATE_LIMITED");

    // Listing needs the admin token
    let resp = anonymous
        .get(fixture.url("/api/contact-messages"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 401);

    let list = fixture.get_json("/api/contact-messages").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_console_round_trip() {
    let fixture = TestFixture::new().await;
    let config = ConsoleConfig::new(fixture.base_url.clone()).with_token(ADMIN_TOKEN);
    let client = ContentClient::connect(&config).unwrap();

    let mut form = CrudForm::<Faq>::new();
    form.load(&client).await.unwrap();
    assert!(form.entries().is_empty());

    let first = form.add();
    form.change(first, |faq| {
        faq.question_en = "Is there a student pass?".to_string();
        faq.question_hi = "क्या छात्र पास है?".to_string();
    })
    .unwrap();
    let second = form.add();
    form.change(second, |faq| faq.question_en = "Night buses?".to_string())
        .unwrap();

    let report = form.submit(&client).await;
    assert!(report.is_success());
    assert_eq!(report.created, 2);
    assert!(form.entries().iter().all(|entry| entry.id.is_some()));

    // The localized views merge back into the stored records
    let merged = client.fetch_bilingual::<Faq>().await.unwrap();
    assert_eq!(merged.len(), 2);
    assert_eq!(merged[0].body.question_hi, "क्या छात्र पास है?");
    assert_eq!(merged[1].body.question_hi, "");

    // Deleting without a token fails and leaves the list alone
    let anonymous = ContentClient::connect(&ConsoleConfig::new(fixture.base_url.clone())).unwrap();
    let result = form.remove(0, &anonymous).await;
    assert!(result.is_err());
    assert_eq!(form.entries().len(), 2);
    assert!(form.error().unwrap().contains("Not authorized"));

    form.remove(0, &client).await.unwrap();
    assert_eq!(form.entries().len(), 1);

    let list = fixture.get_json("/api/faq").await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_phone_directory_bulk_replace() {
    let fixture = TestFixture::new().await;

    let created = fixture
        .post_json(
            "/api/phone-directory",
            json!({
                "nameEn": "Head Office",
                "officers": [{"_id": "o1", "nameEn": "R. Kumar", "designationEn": "Manager"}]
            }),
        )
        .await;
    assert_eq!(created["data"]["officers"][0]["_id"], "o1");
    let division_id = created["data"]["_id"].as_str().unwrap().to_string();

    let resp = fixture
        .client
        .put(fixture.url("/api/phone-directory"))
        .json(&json!({
            "divisions": [
                {
                    "_id": division_id,
                    "nameEn": "Head Office",
                    "nameHi": "मुख्यालय",
                    "officers": [
                        {"_id": "o1", "nameEn": "R. Kumar", "designationEn": "General Manager"},
                        {"nameEn": "S. Devi", "phoneNumber": "0612-222"}
                    ]
                },
                {"nameEn": "Patna Division"}
            ]
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let list = fixture.get_json("/api/phone-directory").await;
    let divisions = list["data"].as_array().unwrap();
    assert_eq!(divisions.len(), 2);
    assert_eq!(divisions[0]["_id"], division_id.as_str());
    assert_eq!(divisions[0]["nameHi"], "मुख्यालय");
    let officers = divisions[0]["officers"].as_array().unwrap();
    assert_eq!(officers[0]["_id"], "o1");
    assert_eq!(officers[0]["designationEn"], "General Manager");
    assert!(officers[1]["_id"].is_string());
    assert_eq!(divisions[1]["nameEn"], "Patna Division");

    // Officer ids survive the localized view
    let hindi = fixture.get_json("/api/phone-directory/hi").await;
    assert_eq!(hindi["data"][0]["officers"][0]["_id"], "o1");
}

#[tokio::test]
async fn test_bulk_replace_rejects_bad_ids() {
    let fixture = TestFixture::new().await;

    for policies in [
        json!([{"_id": "same", "nameEn": "A"}, {"_id": "same", "nameEn": "B"}]),
        json!([{"_id": "hindi", "nameEn": "A"}]),
    ] {
        let resp = fixture
            .client
            .put(fixture.url("/api/policies"))
            .json(&json!({ "policies": policies }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 400);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    let resp = fixture
        .client
        .put(fixture.url("/api/phone-directory"))
        .json(&json!({"divisions": [{"_id": "en", "nameEn": "Head Office"}]}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn test_json_cannot_reuse_another_documents_upload() {
    let fixture = TestFixture::new().await;

    let form = Form::new().text("name", "Tender A").part(
        "pdf",
        Part::bytes(b"%PDF-1.4 a".to_vec())
            .file_name("a.pdf")
            .mime_str("application/pdf")
            .unwrap(),
    );
    let resp = fixture
        .client
        .post(fixture.url("/api/tenders"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    let tender_a: Value = resp.json().await.unwrap();
    let a_path = tender_a["data"]["pdf"].as_str().unwrap().to_string();

    let tender_b = fixture
        .post_json("/api/tenders", json!({"name": "Tender B", "pdf": a_path}))
        .await;
    assert!(tender_b["data"].get("pdf").is_none());

    let b_id = tender_b["data"]["_id"].as_str().unwrap();
    let resp = fixture
        .client
        .delete(fixture.url(&format!("/api/tenders/{}", b_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let served = fixture
        .client
        .get(fixture.url(&format!("/{}", a_path)))
        .send()
        .await
        .unwrap();
    assert_eq!(served.status(), 200);

    // An explicit null clears the slot and removes the file
    let a_id = tender_a["data"]["_id"].as_str().unwrap();
    let resp = fixture
        .client
        .put(fixture.url(&format!("/api/tenders/{}", a_id)))
        .json(&json!({"pdf": null}))
        .send()
        .await
        .unwrap();
    let cleared: Value = resp.json().await.unwrap();
    assert!(cleared["data"].get("pdf").is_none());
    let served = fixture
        .client
        .get(fixture.url(&format!("/{}", a_path)))
        .send()
        .await
        .unwrap();
    assert_eq!(served.status(), 404);
}

#[tokio::test]
async fn test_console_uploads_attachment() {
    let fixture = TestFixture::new().await;
    let config = ConsoleConfig::new(fixture.base_url.clone()).with_token(ADMIN_TOKEN);
    let client = ContentClient::connect(&config).unwrap();
    let mut form = CrudForm::<Tender>::new();

    let index = form.add();
    form.change(index, |tender| {
        tender.name = "Depot workshop".to_string();
        tender.closing_date = "2024-06-30".to_string();
    })
    .unwrap();
    form.attach(
        index,
        StagedFile::new("pdf", "first.pdf", "application/pdf", b"%PDF first".to_vec()),
    )
    .unwrap();

    let report = form.submit(&client).await;
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.created, 1);
    let saved = &form.entries()[index];
    assert!(saved.id.is_some());
    assert!(saved.staged.is_empty());
    assert_eq!(saved.body.name, "Depot workshop");
    let first_path = saved.body.pdf.clone().unwrap();
    assert!(first_path.ends_with("-first.pdf"));

    let served = reqwest::get(client.asset_url(&first_path)).await.unwrap();
    assert_eq!(served.bytes().await.unwrap().as_ref(), b"%PDF first");

    // Replacing the file goes through a multipart PUT
    form.attach(
        index,
        StagedFile::new("pdf", "second.pdf", "application/pdf", b"%PDF second".to_vec()),
    )
    .unwrap();
    let report = form.submit(&client).await;
    assert!(report.is_success(), "{:?}", report);
    assert_eq!(report.updated, 1);
    assert_eq!(form.entries().len(), 1);
    let replaced = &form.entries()[index];
    let second_path = replaced.body.pdf.clone().unwrap();
    assert!(second_path.ends_with("-second.pdf"));
    assert_eq!(replaced.body.closing_date, "2024-06-30");
    assert!(replaced.staged.is_empty());

    let old = reqwest::get(client.asset_url(&first_path)).await.unwrap();
    assert_eq!(old.status(), 404);
}

#[tokio::test]
async fn test_console_cached_localized() {
    let fixture = TestFixture::new().await;
    fixture
        .post_json("/api/faq", json!({"questionEn": "Fare?", "questionHi": "किराया?"}))
        .await;

    let config = ConsoleConfig::new(fixture.base_url.clone()).with_locale(crate::models::Locale::Hi);
    let client = ContentClient::connect(&config).unwrap();
    let cache = ContentCache::new(MemoryStore::new());
    let now = chrono::Utc::now();

    let first = client.cached_localized(&cache, "faq", now).await.unwrap();
    assert_eq!(first[0]["question"], "किराया?");

    // A change on the server is not seen while the entry is fresh
    fixture
        .post_json("/api/faq", json!({"questionEn": "Timings?"}))
        .await;
    let second = client
        .cached_localized(&cache, "faq", now + chrono::Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(second, first);

    let expired = client
        .cached_localized(&cache, "faq", now + chrono::Duration::hours(25))
        .await
        .unwrap();
    assert_eq!(expired.as_array().unwrap().len(), 2);
}
