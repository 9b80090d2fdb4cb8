//! Upload endpoints.
//!
//! `/text-image`, `/text-audio` and `/audio-only` differ only in which media
//! kind they accept and whether a `text` field is required, so all three run
//! through [`dispatch`] with a [`DispatchProfile`].

use crate::error::GatewayError;
use crate::media::{MediaAttachment, MediaKind};
use crate::models::{GenerationRequest, GenerationResponse};
use crate::services::metrics::{record_dispatch, record_provider_latency};
use crate::startup::AppState;
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::HeaderMap,
    Json,
};
use service_core::observability::{extract_request_id, extract_traceparent};
use std::time::Instant;

const TEXT_FIELD: &str = "text";

/// What one upload endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchProfile {
    /// Label used in logs and metrics.
    pub endpoint: &'static str,
    pub media_kind: MediaKind,
    pub expects_text: bool,
}

pub const TEXT_IMAGE: DispatchProfile = DispatchProfile {
    endpoint: "text-image",
    media_kind: MediaKind::Image,
    expects_text: true,
};

pub const TEXT_AUDIO: DispatchProfile = DispatchProfile {
    endpoint: "text-audio",
    media_kind: MediaKind::Audio,
    expects_text: true,
};

pub const AUDIO_ONLY: DispatchProfile = DispatchProfile {
    endpoint: "audio-only",
    media_kind: MediaKind::Audio,
    expects_text: false,
};

pub async fn text_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GatewayError> {
    dispatch(&state, TEXT_IMAGE, &headers, multipart).await
}

pub async fn text_audio(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GatewayError> {
    dispatch(&state, TEXT_AUDIO, &headers, multipart).await
}

pub async fn audio_only(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GatewayError> {
    dispatch(&state, AUDIO_ONLY, &headers, multipart).await
}

/// Validate an upload, forward it to the provider and map the outcome.
///
/// Every rejection happens before the provider is called.
pub async fn dispatch(
    state: &AppState,
    profile: DispatchProfile,
    headers: &HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<GenerationResponse>, GatewayError> {
    let request_id = extract_request_id(headers);

    let request = match prepare(profile, multipart).await {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(
                endpoint = profile.endpoint,
                request_id = ?request_id,
                error = %e,
                "Rejected upload"
            );
            record_dispatch(profile.endpoint, "rejected");
            return Err(e);
        }
    };

    let provider = &state.provider;
    let started = Instant::now();
    let result = provider.generate(&request, request_id.as_deref()).await;
    record_provider_latency(provider.name(), started.elapsed());

    match result {
        Ok(text) => {
            tracing::info!(
                endpoint = profile.endpoint,
                provider = provider.name(),
                request_id = ?request_id,
                response_len = text.len(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "Generation complete"
            );
            record_dispatch(profile.endpoint, "success");
            Ok(Json(GenerationResponse { response: text }))
        }
        Err(e) => {
            tracing::error!(
                endpoint = profile.endpoint,
                provider = provider.name(),
                request_id = ?request_id,
                traceparent = ?extract_traceparent(headers),
                error = %e,
                "Generation failed"
            );
            record_dispatch(profile.endpoint, e.kind());
            Err(GatewayError::generation(
                &e,
                state.config.uploads.expose_provider_errors,
            ))
        }
    }
}

/// Read the form and turn it into a request, or say why not.
async fn prepare(
    profile: DispatchProfile,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<GenerationRequest, GatewayError> {
    let form = UploadForm::read(multipart?, profile).await?;

    let text = if profile.expects_text {
        Some(form.text.ok_or(GatewayError::MissingField(TEXT_FIELD))?)
    } else {
        None
    };
    let attachment = form
        .attachment
        .ok_or(GatewayError::MissingField(profile.media_kind.field_name()))?;

    tracing::info!(
        endpoint = profile.endpoint,
        text_len = ?text.as_ref().map(String::len),
        filename = ?attachment.filename,
        bytes = attachment.bytes.len(),
        media_type = ?attachment.media_type(),
        "Received upload"
    );

    let attachment = attachment.validate(profile.media_kind.allow_list())?;
    Ok(GenerationRequest::new(text, &attachment))
}

/// Fields of an upload form relevant to one profile; others are skipped.
struct UploadForm {
    text: Option<String>,
    attachment: Option<MediaAttachment>,
}

impl UploadForm {
    async fn read(mut multipart: Multipart, profile: DispatchProfile) -> Result<Self, GatewayError> {
        let mut form = UploadForm {
            text: None,
            attachment: None,
        };

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().map(str::to_string);

            match name.as_deref() {
                Some(TEXT_FIELD) if profile.expects_text => {
                    form.text = Some(field.text().await?);
                }
                Some(name) if name == profile.media_kind.field_name() => {
                    let filename = field.file_name().map(str::to_string);
                    let bytes = field.bytes().await?;
                    form.attachment = Some(MediaAttachment::new(filename, bytes));
                }
                _ => {}
            }
        }

        Ok(form)
    }
}
