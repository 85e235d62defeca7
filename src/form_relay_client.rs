use reqwest::Client;
use secrecy::{ExposeSecret, Secret};

use crate::delivery::DeliveryError;
use crate::domain::{Sender, SubscriberEmail};

/// Client for a form-relay service (Web3Forms-compatible `POST /submit`).
///
/// The relay does not mail the subscriber directly. It forwards a note to the
/// site owner, who sends the welcome email by hand.
pub struct FormRelayClient {
    http_client: Client,
    base_url: String,
    contact: Sender,
    access_key: Secret<String>,
}

impl FormRelayClient {
    pub fn new(
        base_url: String,
        contact: Sender,
        access_key: Secret<String>,
        timeout: Option<std::time::Duration>,
    ) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http_client: builder.build()?,
            base_url,
            contact,
            access_key,
        })
    }

    #[tracing::instrument(
        name = "Relaying a new subscription notice",
        skip_all,
        fields(subscriber_email = %subscriber)
    )]
    pub async fn notify_new_subscriber(
        &self,
        subscriber: &SubscriberEmail,
    ) -> Result<(), DeliveryError> {
        let url = format!("{}/submit", self.base_url.trim_end_matches('/'));
        let message = format!(
            "New subscription from: {}\n\nPlease send them the welcome email.",
            subscriber
        );
        let request_body = SubmitRequest {
            access_key: self.access_key.expose_secret(),
            subject: "New Newsletter Subscription",
            from_name: self.contact.name(),
            email: self.contact.address().as_ref(),
            message: &message,
        };
        let response: SubmitResponse = self
            .http_client
            .post(&url)
            .json(&request_body)
            .send()
            .await?
            .json()
            .await?;

        if response.success {
            Ok(())
        } else {
            Err(DeliveryError::Rejected(
                response
                    .message
                    .unwrap_or_else(|| "form relay reported failure".into()),
            ))
        }
    }
}

#[derive(serde::Serialize)]
struct SubmitRequest<'a> {
    access_key: &'a str,
    subject: &'a str,
    from_name: &'a str,
    email: &'a str,
    message: &'a str,
}

#[derive(serde::Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    success: bool,
    message: Option<String>,
}
