//! Request handlers for the admin enqueue/status endpoints.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use kinema_models::{subtitle_key, EpisodeRef, JobId, JobStatus, SubtitleJob, TranscodeJob};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Response returned by both enqueue endpoints.
#[derive(Debug, Serialize)]
pub struct EnqueueResponse {
    pub job_id: JobId,
}

/// Episode reference in a request body.
#[derive(Debug, Deserialize, Validate)]
pub struct EpisodeRequest {
    #[validate(length(min = 1))]
    pub episode_id: String,
    #[validate(range(min = 1))]
    pub season_number: u32,
    #[validate(range(min = 1))]
    pub episode_number: u32,
}

impl EpisodeRequest {
    fn into_ref(self) -> EpisodeRef {
        EpisodeRef {
            episode_id: self.episode_id,
            season_number: self.season_number,
            episode_number: self.episode_number,
        }
    }
}

/// Body of the transcode enqueue endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct TranscodeRequest {
    /// Key of the uploaded source object
    #[validate(length(min = 1))]
    pub source_key: String,
    /// Bucket holding the source; defaults to the uploads bucket
    #[serde(default)]
    pub source_bucket: Option<String>,
    /// Requested quality profiles; empty means the default ladder
    #[serde(default)]
    pub profiles: Vec<String>,
    /// BCP-47 language tag of the primary audio
    #[validate(length(min = 2, max = 16))]
    pub language: String,
    /// Episode reference for episodic content
    #[serde(default)]
    #[validate(nested)]
    pub episode: Option<EpisodeRequest>,
}

/// POST /admin/movies/:movie_id/transcode
///
/// Enqueue an HLS transcode for an uploaded source. Returns 202 with the
/// job id; progress is polled via the jobs endpoint.
pub async fn start_transcode(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    Json(req): Json<TranscodeRequest>,
) -> ApiResult<(StatusCode, Json<EnqueueResponse>)> {
    req.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let source_bucket = req
        .source_bucket
        .unwrap_or_else(|| state.config.uploads_bucket.clone());

    let mut job =
        TranscodeJob::new(source_bucket, req.source_key, &movie_id, req.language)
            .with_profiles(req.profiles);
    if let Some(episode) = req.episode {
        job = job.with_episode(episode.into_ref());
    }

    info!("Enqueuing transcode job {} for movie {}", job.job_id, movie_id);
    let job_id = state.transcode_queue.enqueue(job);

    Ok((StatusCode::ACCEPTED, Json(EnqueueResponse { job_id })))
}

/// POST /admin/movies/:movie_id/subtitles
///
/// Accept one subtitle track as multipart form data, stage the raw bytes,
/// and enqueue the subtitle job. Fields: `file` (the track), `language`,
/// optional `label`, optional `episode_id`/`season_number`/`episode_number`.
pub async fn upload_subtitle(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<EnqueueResponse>)> {
    let mut language: Option<String> = None;
    let mut label: Option<String> = None;
    let mut episode_id: Option<String> = None;
    let mut season_number: Option<u32> = None;
    let mut episode_number: Option<u32> = None;
    let mut track: Option<Vec<u8>> = None;
    let mut track_name: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "language" => language = Some(read_text(&name, field).await?),
            "label" => label = Some(read_text(&name, field).await?),
            "episode_id" => episode_id = Some(read_text(&name, field).await?),
            "season_number" => season_number = Some(read_number(&name, field).await?),
            "episode_number" => episode_number = Some(read_number(&name, field).await?),
            "file" => {
                track_name = field.file_name().map(|n| n.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::bad_request(format!("Unreadable file field: {}", e)))?;
                track = Some(bytes.to_vec());
            }
            // Unknown fields are ignored, matching lenient form handling.
            _ => {}
        }
    }

    let language =
        language.ok_or_else(|| ApiError::bad_request("Missing language field"))?;
    let label = label.unwrap_or_else(|| language.clone());
    let track = track
        .filter(|t| !t.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing subtitle file"))?;

    // Only WebVTT tracks are accepted. Rejecting here keeps non-VTT
    // uploads out of the staging bucket entirely.
    if let Some(name) = &track_name {
        if !name.to_ascii_lowercase().ends_with(".vtt") {
            return Err(ApiError::bad_request(format!(
                "Unsupported subtitle format: {} (only WebVTT .vtt tracks are accepted)",
                name
            )));
        }
    }

    let episode = match (episode_id, season_number, episode_number) {
        (Some(id), Some(season), Some(episode)) => Some(EpisodeRef {
            episode_id: id,
            season_number: season,
            episode_number: episode,
        }),
        (None, None, None) => None,
        _ => {
            return Err(ApiError::bad_request(
                "Episode reference requires episode_id, season_number and episode_number",
            ))
        }
    };

    // Stage the raw bytes under a unique key; the worker moves them to
    // the published destination.
    let staging_key = format!("staging/subtitles/{}/{}", movie_id, Uuid::new_v4());
    state
        .storage
        .upload_bytes(
            &state.config.staging_bucket,
            &staging_key,
            track,
            "application/octet-stream",
        )
        .await?;

    let dest_key = subtitle_key(&movie_id, episode.as_ref(), &language);
    let mut job = SubtitleJob::new(
        &movie_id,
        &language,
        &label,
        &state.config.staging_bucket,
        &staging_key,
        &state.config.media_bucket,
        &dest_key,
    );
    if let Some(episode) = episode {
        job = job.with_episode(episode);
    }

    info!("Enqueuing subtitle job {} for movie {}", job.job_id, movie_id);
    let job_id = state.subtitle_queue.enqueue(job);

    Ok((StatusCode::ACCEPTED, Json(EnqueueResponse { job_id })))
}

/// GET /admin/jobs/:job_id
///
/// Return the current status record verbatim, 404 when the id is unknown.
pub async fn get_job_status(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobStatus>> {
    state
        .registry
        .get(&JobId::from_string(&job_id))
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("No job {}", job_id)))
}

/// GET /health
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn read_text(name: &str, field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("Unreadable {} field: {}", name, e)))
}

async fn read_number(name: &str, field: axum::extract::multipart::Field<'_>) -> ApiResult<u32> {
    read_text(name, field)
        .await?
        .trim()
        .parse()
        .map_err(|_| ApiError::bad_request(format!("Field {} must be a positive number", name)))
}
