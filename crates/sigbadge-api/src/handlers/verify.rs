//! GET /verify: check a document's detached signature and answer with a badge.

use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use log::{error, info, warn};
use serde::Deserialize;
use sigbadge_core::request::VerificationRequest;
use sigbadge_core::types::{VerificationOutcome, VerificationReport};
use sigbadge_gpg::verifier::verify;

use crate::badge::{render, BadgeRenderInput};
use crate::router::{AppState, SharedState};

/// Header carrying the failure detail for non-valid outcomes.
pub static X_REASON: HeaderName = HeaderName::from_static("x-reason");

/// Query parameters for `GET /verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    /// Document URL; the signature is fetched from `<url>.asc`.
    pub url: Option<String>,
    /// Key identifier to prime into an isolated trust store.
    pub key: Option<String>,
    /// Override for where the key material is downloaded from.
    #[serde(rename = "key-url")]
    pub key_url: Option<String>,
}

/// Handle `GET /verify`.
///
/// Answers `400` if `url` is missing or unusable and `500` if the badge cannot
/// be rendered; every other path produces a badge.
pub async fn verify_handler(
    State(state): State<SharedState>,
    Query(params): Query<VerifyQuery>,
) -> Response {
    let request = match VerificationRequest::from_params(
        params.url.as_deref(),
        params.key.as_deref(),
        params.key_url.as_deref(),
    ) {
        Ok(request) => request,
        Err(e) => {
            warn!("rejecting verify request: {e}");
            return (StatusCode::BAD_REQUEST, format!("Invalid url parameter specified: {e}"))
                .into_response();
        }
    };

    let report = run_pipeline(&state, &request).await;
    info!("rendering {} badge for {}", report.outcome, request.document_url);

    let filename = request.filename();
    let input = BadgeRenderInput {
        filename: &filename,
        checked_at: Utc::now(),
        outcome: report.outcome,
        signer: report.signer.as_deref(),
    };
    match render(&state.badge_template, &input) {
        Ok(body) => badge_response(body, &report),
        Err(e) => {
            error!("badge render failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("Unable to render: {e}")).into_response()
        }
    }
}

/// Prime (if a key was given), fetch, and verify.
///
/// Any failure ends the pass with an errored or invalid report; scratch
/// directories are gone by the time this returns.
pub async fn run_pipeline(state: &AppState, request: &VerificationRequest) -> VerificationReport {
    let trust_store = match request.key_id.as_deref() {
        Some(key_id) => match state.primer().prime(key_id, request.key_url.as_deref()).await {
            Ok(store) => Some(store),
            Err(e) => {
                warn!("priming key {key_id} failed: {e}");
                return VerificationReport::errored(e.to_string());
            }
        },
        None => None,
    };

    let document = match state.fetcher.fetch(&request.document_url).await {
        Ok(document) => document,
        Err(e) => {
            warn!("document fetch failed: {e}");
            return VerificationReport::errored(e.to_string());
        }
    };
    let signature = match state.fetcher.fetch(&request.signature_url).await {
        Ok(signature) => signature,
        Err(e) => {
            warn!("signature fetch failed: {e}");
            return VerificationReport::errored(e.to_string());
        }
    };

    verify(
        state.engine.as_ref(),
        &document,
        &signature,
        trust_store.as_ref(),
        &state.scratch_dir,
    )
    .await
    .into_report()
}

/// Collapse whitespace and control runs to one space and replace non-ASCII
/// characters with `?`, so the text fits in a header value.
#[must_use]
pub fn header_safe(reason: &str) -> String {
    let mut out = String::with_capacity(reason.len());
    for word in reason
        .split(|c: char| c.is_whitespace() || c.is_control())
        .filter(|w| !w.is_empty())
    {
        if !out.is_empty() {
            out.push(' ');
        }
        out.extend(word.chars().map(|c| if c.is_ascii_graphic() { c } else { '?' }));
    }
    out
}

fn badge_response(body: Vec<u8>, report: &VerificationReport) -> Response {
    let mut response = (
        [(CONTENT_TYPE, "image/svg+xml"), (CACHE_CONTROL, "no-cache")],
        body,
    )
        .into_response();

    if report.outcome != VerificationOutcome::Valid {
        let reason = report.reason.as_deref().map(header_safe).unwrap_or_default();
        match HeaderValue::from_str(&reason) {
            Ok(value) if !reason.is_empty() => {
                response.headers_mut().insert(X_REASON.clone(), value);
            }
            Ok(_) => warn!("{} outcome without a reason", report.outcome),
            Err(e) => warn!("dropping unencodable reason: {e}"),
        }
    }
    response
}
