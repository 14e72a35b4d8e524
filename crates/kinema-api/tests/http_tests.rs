//! HTTP surface tests against in-memory backends.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tokio::sync::watch;
use tower::ServiceExt;

use kinema_api::{create_router, ApiConfig, AppState};
use kinema_models::JobState;
use kinema_queue::{JobChannel, StatusRegistry};
use kinema_storage::MemoryStore;

fn test_state() -> (AppState, Arc<MemoryStore>) {
    let storage = Arc::new(MemoryStore::new());
    let registry = Arc::new(StatusRegistry::new());
    let transcode_queue = Arc::new(JobChannel::new(Arc::clone(&registry)));
    let subtitle_queue = Arc::new(JobChannel::new(Arc::clone(&registry)));
    let state = AppState::new(
        ApiConfig::default(),
        storage.clone(),
        registry,
        transcode_queue,
        subtitle_queue,
    );
    (state, storage)
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_ok() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn transcode_enqueue_returns_accepted_and_seeds_status() {
    let (state, _) = test_state();
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/movies/42/transcode")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"source_key": "raw/42.mkv", "profiles": ["1080", "720"], "language": "en"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    let job_id = body["job_id"].as_str().unwrap().to_string();
    assert!(!job_id.is_empty());

    let status = state
        .registry
        .get(&kinema_models::JobId::from_string(&job_id))
        .unwrap();
    assert_eq!(status.state, JobState::Queued);
    assert_eq!(status.progress, 0);

    let (_tx, mut shutdown) = watch::channel(false);
    let job = state.transcode_queue.dequeue(&mut shutdown).await.unwrap();
    assert_eq!(job.movie_id, "42");
    assert_eq!(job.source_bucket, "uploads");
    assert_eq!(job.source_key, "raw/42.mkv");
    assert_eq!(job.profiles, vec!["1080", "720"]);
}

#[tokio::test]
async fn transcode_with_empty_language_is_rejected() {
    let (state, _) = test_state();
    let app = create_router(state.clone());

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/movies/42/transcode")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"source_key": "raw/42.mkv", "language": ""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(state.transcode_queue.is_empty());
}

#[tokio::test]
async fn unknown_job_is_not_found() {
    let (state, _) = test_state();
    let app = create_router(state);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/jobs/does-not-exist")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn job_status_is_returned_verbatim() {
    let (state, _) = test_state();
    let app = create_router(state.clone());

    let job_id = state
        .transcode_queue
        .enqueue(kinema_models::TranscodeJob::new("uploads", "raw/7.mkv", "7", "en"));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/admin/jobs/{}", job_id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["job_id"], job_id.as_str());
    assert_eq!(body["state"], "queued");
    assert_eq!(body["progress"], 0);
}

#[tokio::test]
async fn subtitle_upload_stages_the_track_and_enqueues() {
    let (state, storage) = test_state();
    let app = create_router(state.clone());

    let boundary = "kinema-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\nen\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"label\"\r\n\r\nEnglish\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"en.vtt\"\r\n\
         Content-Type: text/vtt\r\n\r\n\
         WEBVTT\n\n00:00.000 --> 00:01.000\nHi\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/movies/42/subtitles")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let staged = storage.keys_in("staging");
    assert_eq!(staged.len(), 1);
    assert!(staged[0].starts_with("staging/subtitles/42/"));

    let (_tx, mut shutdown) = watch::channel(false);
    let job = state.subtitle_queue.dequeue(&mut shutdown).await.unwrap();
    assert_eq!(job.movie_id, "42");
    assert_eq!(job.language, "en");
    assert_eq!(job.label, "English");
    assert_eq!(job.dest_bucket, "media");
    assert_eq!(job.dest_key, "subtitles/movies/42/en.vtt");
}

#[tokio::test]
async fn srt_subtitle_upload_is_rejected_without_staging_anything() {
    let (state, storage) = test_state();
    let app = create_router(state.clone());

    let boundary = "kinema-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\nen\r\n\
         --{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"en.srt\"\r\n\
         Content-Type: application/x-subrip\r\n\r\n\
         1\n00:00:00,000 --> 00:00:01,000\nHi\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/movies/42/subtitles")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].as_str().unwrap().contains("en.srt"));
    assert!(storage.keys_in("staging").is_empty());
    assert!(state.subtitle_queue.is_empty());
}

#[tokio::test]
async fn subtitle_upload_without_file_is_rejected() {
    let (state, storage) = test_state();
    let app = create_router(state.clone());

    let boundary = "kinema-test-boundary";
    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"language\"\r\n\r\nen\r\n\
         --{b}--\r\n",
        b = boundary
    );

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/movies/42/subtitles")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={}", boundary),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(storage.keys_in("staging").is_empty());
    assert!(state.subtitle_queue.is_empty());
}
