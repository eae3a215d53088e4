//! End-to-end behavioural tests for the upload flow over the HTTP surface.
//!
//! The full actix application is exercised with in-process port doubles so
//! every assertion covers routing, extraction, the gateway service, and the
//! error envelope together.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use async_trait::async_trait;
use bytes::Bytes;
use chrono::TimeZone;

use posterforge::Trace;
use posterforge::domain::ports::{
    ArtifactStore, ArtifactStoreError, DebitOutcome, GenerationLog, GenerationLogError,
    ProcessingUpstream, ProfileRepository, ProfileRepositoryError, SessionResolver,
    SessionResolverError, UpstreamArtifact, UpstreamError, UpstreamJob,
};
use posterforge::domain::{
    GenerationRecord, Profile, SessionToken, UploadGateway, UserId,
};
use posterforge::inbound::http::generations::{get_profile, list_generations};
use posterforge::inbound::http::state::HttpState;
use posterforge::inbound::http::upload::{multipart_form_config, upload_image};

const VALID_TOKEN: &str = "session-token-1";
const PROCESSED_BYTES: &[u8] = b"\x89PNG processed poster";

struct StubSessions {
    user_id: UserId,
}

#[async_trait]
impl SessionResolver for StubSessions {
    async fn resolve(
        &self,
        token: &SessionToken,
    ) -> Result<Option<UserId>, SessionResolverError> {
        if token.as_str() == VALID_TOKEN {
            Ok(Some(self.user_id.clone()))
        } else {
            Ok(None)
        }
    }
}

#[derive(Default)]
struct StubProfiles {
    credits: Mutex<i64>,
}

#[async_trait]
impl ProfileRepository for StubProfiles {
    async fn find_by_user_id(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Profile>, ProfileRepositoryError> {
        let credits = *self.credits.lock().expect("credits lock");
        Ok(Some(Profile {
            user_id: user_id.clone(),
            credits,
            created_at: chrono::Utc::now(),
        }))
    }

    async fn debit(
        &self,
        _user_id: &UserId,
        amount: u32,
    ) -> Result<DebitOutcome, ProfileRepositoryError> {
        let mut credits = self.credits.lock().expect("credits lock");
        let amount = i64::from(amount);
        if *credits >= amount {
            *credits -= amount;
            Ok(DebitOutcome::Applied {
                remaining: *credits,
            })
        } else {
            Ok(DebitOutcome::InsufficientCredits {
                available: *credits,
            })
        }
    }
}

#[derive(Default)]
struct StubLog {
    records: Mutex<Vec<GenerationRecord>>,
}

#[async_trait]
impl GenerationLog for StubLog {
    async fn append(&self, record: &GenerationRecord) -> Result<(), GenerationLogError> {
        self.records
            .lock()
            .expect("records lock")
            .push(record.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        _user_id: &UserId,
        limit: i64,
    ) -> Result<Vec<GenerationRecord>, GenerationLogError> {
        let mut records = self.records.lock().expect("records lock").clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(records)
    }
}

#[derive(Default)]
struct StubStore {
    objects: Mutex<HashMap<String, Bytes>>,
}

#[async_trait]
impl ArtifactStore for StubStore {
    async fn put(
        &self,
        key: &posterforge::domain::ArtifactKey,
        bytes: Bytes,
        _content_type: &str,
    ) -> Result<(), ArtifactStoreError> {
        self.objects
            .lock()
            .expect("objects lock")
            .insert(key.as_str().to_owned(), bytes);
        Ok(())
    }

    fn public_url(&self, key: &posterforge::domain::ArtifactKey) -> String {
        format!("https://cdn.test/{key}")
    }
}

struct StubUpstream;

#[async_trait]
impl ProcessingUpstream for StubUpstream {
    async fn transform(&self, _job: UpstreamJob) -> Result<UpstreamArtifact, UpstreamError> {
        Ok(UpstreamArtifact {
            content_type: "image/png".to_owned(),
            bytes: Bytes::from_static(PROCESSED_BYTES),
        })
    }
}

struct Fixture {
    profiles: Arc<StubProfiles>,
    log: Arc<StubLog>,
    store: Arc<StubStore>,
    state: HttpState,
}

impl Fixture {
    fn with_credits(credits: i64) -> Self {
        let profiles = Arc::new(StubProfiles {
            credits: Mutex::new(credits),
        });
        let log = Arc::new(StubLog::default());
        let store = Arc::new(StubStore::default());
        let sessions = Arc::new(StubSessions {
            user_id: UserId::random(),
        });

        let gateway = Arc::new(UploadGateway::new(
            profiles.clone(),
            log.clone(),
            store.clone(),
            Arc::new(StubUpstream),
        ));
        let state = HttpState::new(sessions, gateway, profiles.clone(), log.clone());

        Self {
            profiles,
            log,
            store,
            state,
        }
    }

    fn credits(&self) -> i64 {
        *self.profiles.credits.lock().expect("credits lock")
    }

    fn history_len(&self) -> usize {
        self.log.records.lock().expect("records lock").len()
    }

    fn object_count(&self) -> usize {
        self.store.objects.lock().expect("objects lock").len()
    }
}

async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(multipart_form_config())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .service(upload_image)
                    .service(get_profile)
                    .service(list_generations),
            ),
    )
    .await
}

const BOUNDARY: &str = "test-boundary-7f2a";

fn multipart_body(include_image: bool) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    if include_image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"image\"; filename=\"poster.png\"\r\n\
                 Content-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"\x89PNG raw upload");
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"mode\"\r\n\r\n\
             poster\r\n\
             --{BOUNDARY}--\r\n"
        )
        .as_bytes(),
    );
    let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
    (content_type, body)
}

fn upload_request(token: Option<&str>, include_image: bool) -> Request {
    let (content_type, body) = multipart_body(include_image);
    let mut request = TestRequest::post()
        .uri("/api/v1/uploads")
        .insert_header((header::CONTENT_TYPE, content_type))
        .set_payload(body);
    if let Some(token) = token {
        request =
            request.insert_header((header::AUTHORIZATION, format!("Bearer {token}")));
    }
    request.to_request()
}

#[actix_rt::test]
async fn unauthenticated_uploads_are_rejected_without_side_effects() {
    let fixture = Fixture::with_credits(5);
    let app = init_app(fixture.state.clone()).await;

    let response = test::call_service(&app, upload_request(None, true)).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "unauthorized");
    assert_eq!(fixture.credits(), 5);
    assert_eq!(fixture.history_len(), 0);
    assert_eq!(fixture.object_count(), 0);
}

#[actix_rt::test]
async fn successful_upload_returns_the_artifact_and_settles_everything() {
    let fixture = Fixture::with_credits(3);
    let app = init_app(fixture.state.clone()).await;

    let response = test::call_service(&app, upload_request(Some(VALID_TOKEN), true)).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("image/png")
    );
    assert!(response.headers().contains_key("trace-id"));

    let body = test::read_body(response).await;
    assert_eq!(body.as_ref(), PROCESSED_BYTES);
    assert_eq!(fixture.credits(), 2);
    assert_eq!(fixture.history_len(), 1);
    assert_eq!(fixture.object_count(), 1);
}

#[actix_rt::test]
async fn insufficient_credits_are_refused_before_any_side_effect() {
    let fixture = Fixture::with_credits(0);
    let app = init_app(fixture.state.clone()).await;

    let response = test::call_service(&app, upload_request(Some(VALID_TOKEN), true)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "insufficient_credits");
    assert_eq!(body["details"]["availableCredits"], 0);
    assert_eq!(fixture.credits(), 0);
    assert_eq!(fixture.history_len(), 0);
    assert_eq!(fixture.object_count(), 0);
}

#[actix_rt::test]
async fn missing_image_part_is_a_bad_request() {
    let fixture = Fixture::with_credits(3);
    let app = init_app(fixture.state.clone()).await;

    let response = test::call_service(&app, upload_request(Some(VALID_TOKEN), false)).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(fixture.credits(), 3);
}

#[actix_rt::test]
async fn profile_endpoint_reports_the_current_balance() {
    let fixture = Fixture::with_credits(7);
    let app = init_app(fixture.state.clone()).await;

    let request = TestRequest::get()
        .uri("/api/v1/profile")
        .insert_header((header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}")))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    assert_eq!(body["credits"], 7);
}

#[actix_rt::test]
async fn generations_are_listed_newest_first() {
    let fixture = Fixture::with_credits(3);
    let app = init_app(fixture.state.clone()).await;

    let mut older = GenerationRecord::new(
        UserId::random(),
        "https://cdn.test/older.png",
        "Poster design",
    );
    older.created_at = chrono::Utc
        .with_ymd_and_hms(2026, 1, 1, 12, 0, 0)
        .single()
        .expect("valid instant");
    let mut newer = GenerationRecord::new(
        UserId::random(),
        "https://cdn.test/newer.png",
        "Watermark removal",
    );
    newer.created_at = chrono::Utc
        .with_ymd_and_hms(2026, 2, 1, 12, 0, 0)
        .single()
        .expect("valid instant");

    // Appended oldest first; the listing must reverse that.
    for record in [&older, &newer] {
        fixture.log.append(record).await.expect("append succeeds");
    }

    let request = TestRequest::get()
        .uri("/api/v1/generations")
        .insert_header((header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}")))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    let entries = body.as_array().expect("history array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["imageUrl"], "https://cdn.test/newer.png");
    assert_eq!(entries[1]["imageUrl"], "https://cdn.test/older.png");
}

#[actix_rt::test]
async fn generations_endpoint_lists_settled_uploads() {
    let fixture = Fixture::with_credits(3);
    let app = init_app(fixture.state.clone()).await;

    let upload = test::call_service(&app, upload_request(Some(VALID_TOKEN), true)).await;
    assert_eq!(upload.status(), StatusCode::OK);

    let request = TestRequest::get()
        .uri("/api/v1/generations")
        .insert_header((header::AUTHORIZATION, format!("Bearer {VALID_TOKEN}")))
        .to_request();
    let response = test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = test::read_body_json(response).await;
    let entries = body.as_array().expect("history array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["label"], "Poster design");
    assert!(
        entries[0]["imageUrl"]
            .as_str()
            .expect("imageUrl string")
            .starts_with("https://cdn.test/")
    );
}
