use std::{sync::Arc, time::Duration};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing, Extension, Json, Router,
};
use folio_core_contact_contracts::{ContactFeatureError, ContactFeatureService};
use tracing::debug;

use crate::{
    errors::error,
    middlewares::client_ip::ClientIp,
    models::{contact::ApiContactForm, ApiMessage},
};

pub fn router(service: Arc<impl ContactFeatureService>) -> Router<()> {
    Router::new()
        .route("/api/contact", routing::post(send_message))
        .with_state(service)
}

async fn send_message(
    service: State<Arc<impl ContactFeatureService>>,
    Extension(ClientIp(client_ip)): Extension<ClientIp>,
    form: Result<Json<ApiContactForm>, JsonRejection>,
) -> Response {
    let Json(form) = match form {
        Ok(form) => form,
        Err(rejection) => {
            debug!(%client_ip, %rejection, "rejecting malformed contact request");
            return error(StatusCode::BAD_REQUEST, "Invalid request body");
        }
    };

    match service.send_message(client_ip, form.into()).await {
        Ok(_) => Json(ApiMessage {
            message: "Message sent successfully",
        })
        .into_response(),
        Err(ContactFeatureError::RateLimited { retry_after }) => too_many_requests(retry_after),
        Err(ContactFeatureError::Validation(errors)) => error(StatusCode::BAD_REQUEST, errors),
        Err(ContactFeatureError::Delivery(reason)) if reason.is_empty() => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to send message")
        }
        Err(ContactFeatureError::Delivery(reason)) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, reason)
        }
    }
}

fn too_many_requests(retry_after: Duration) -> Response {
    let seconds = retry_after.as_secs().max(1);
    let minutes = seconds.div_ceil(60);
    (
        [(header::RETRY_AFTER, seconds.to_string())],
        error(
            StatusCode::TOO_MANY_REQUESTS,
            format!("Too many requests. Please try again in {minutes} minutes."),
        ),
    )
        .into_response()
}
