use super::AppState;
use crate::{
    error::ApiError,
    media::NormalizedMedia,
    payment::{CheckoutSession, PaymentStatus},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, error};

#[derive(Debug, Default, Deserialize)]
pub struct DownloadRequest {
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    #[serde(default)]
    pub session_id: Option<String>,
}

/// A body that is absent or not the expected JSON counts as empty, so the
/// handler reports missing fields in the usual error envelope.
fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Ignoring unreadable request body: {}", rejection);
            T::default()
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn download(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<NormalizedMedia>, ApiError> {
    let request = body_or_default(payload);

    let result = match (non_empty(request.platform), non_empty(request.url)) {
        (Some(platform), Some(url)) => state.media.download(&platform, &url).await,
        _ => Err(ApiError::invalid_input("Missing platform or URL")),
    };

    result.map(Json).map_err(|e| {
        error!("Fetch error: {}", e);
        e
    })
}

pub async fn checkout(State(state): State<AppState>) -> Result<Json<CheckoutSession>, ApiError> {
    state
        .payments
        .create_checkout_session()
        .await
        .map(Json)
        .map_err(|e| {
            error!("Stripe error: {}", e);
            e
        })
}

pub async fn verify(
    State(state): State<AppState>,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<PaymentStatus>, ApiError> {
    let request = body_or_default(payload);
    let session_id = request.session_id.unwrap_or_default();

    state
        .payments
        .verify_payment(&session_id)
        .await
        .map(Json)
        .map_err(|e| {
            error!("Verify error: {}", e);
            e
        })
}
