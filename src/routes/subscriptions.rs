use actix_web::http::StatusCode;
use actix_web::{web, HttpResponse, ResponseError};
use anyhow::Context;
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use tracing::field::display;
use tracing::Span;

use crate::delivery::DeliveryProvider;
use crate::domain::{NewSubscriber, SubscriberEmail};
use crate::utils::{error_chain_fmt, json_error};

const SUCCESS_MESSAGE: &str = "Subscription successful! Check your email for confirmation.";
const INVALID_EMAIL: &str = "Invalid email address";
const RETRY_LATER: &str = "Failed to process subscription. Please try again later.";

/// The `email` member of the body, kept as raw JSON until validation.
#[derive(Debug)]
pub struct SubscriptionRequest {
    email: Option<Value>,
}

impl SubscriptionRequest {
    /// Only a JSON object is a request; every other body is malformed.
    pub fn parse(body: &[u8]) -> Result<Self, anyhow::Error> {
        let value: Value =
            serde_json::from_slice(body).context("The request body is not valid JSON")?;
        let Value::Object(mut fields) = value else {
            anyhow::bail!("The request body is not a JSON object");
        };
        Ok(Self {
            email: fields.remove("email"),
        })
    }
}

impl TryFrom<SubscriptionRequest> for NewSubscriber {
    type Error = String;

    fn try_from(value: SubscriptionRequest) -> Result<Self, Self::Error> {
        let email = match value.email {
            None | Some(Value::Null) => return Err("The email field is missing.".into()),
            Some(Value::String(email)) => email,
            Some(other) => return Err(format!("{} is not a valid subscriber email.", other)),
        };
        let email = SubscriberEmail::parse(email)?;
        Ok(NewSubscriber { email })
    }
}

#[derive(Serialize)]
struct SubscribeResponse {
    success: bool,
    message: &'static str,
}

#[tracing::instrument(
    name = "Adding a new subscriber",
    skip(body, provider),
    fields(subscriber_email = tracing::field::Empty)
)]
pub async fn subscribe(
    body: web::Bytes,
    provider: web::Data<DeliveryProvider>,
) -> Result<HttpResponse, SubscribeError> {
    let request = SubscriptionRequest::parse(&body).map_err(|e| {
        tracing::error!("[SUBSCRIPTION ERROR] {:?}", e);
        e
    })?;
    let new_subscriber: NewSubscriber = request
        .try_into()
        .map_err(SubscribeError::ValidationError)?;
    Span::current().record("subscriber_email", display(&new_subscriber.email));

    log_subscription(&new_subscriber);

    // Delivery never changes what the caller sees.
    if let Err(e) = provider.deliver(&new_subscriber.email).await {
        tracing::error!(
            error.cause_chain = ?e,
            error.message = %e,
            "[EMAIL ERROR] Failed to deliver the welcome message"
        );
    }

    Ok(HttpResponse::Ok().json(SubscribeResponse {
        success: true,
        message: SUCCESS_MESSAGE,
    }))
}

/// The only durable record of a subscription is this log line.
fn log_subscription(new_subscriber: &NewSubscriber) {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    tracing::info!(
        subscriber_email = %new_subscriber.email,
        subscribed_at = %timestamp,
        "[NEWSLETTER SUBSCRIPTION] Email: {} | Time: {}",
        new_subscriber.email,
        timestamp
    );
}

/// CORS preflight: empty 200, headers come from the app-wide defaults.
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

pub async fn method_not_allowed() -> HttpResponse {
    json_error(StatusCode::METHOD_NOT_ALLOWED, "Method not allowed")
}

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) => StatusCode::BAD_REQUEST,
            SubscribeError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            SubscribeError::ValidationError(_) => INVALID_EMAIL,
            SubscribeError::UnexpectedError(_) => RETRY_LATER,
        };
        json_error(self.status_code(), message)
    }
}
