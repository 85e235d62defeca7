use crate::domain::{SubscriberEmail, WelcomeEmail};
use crate::email_client::EmailClient;
use crate::form_relay_client::FormRelayClient;
use crate::utils::error_chain_fmt;

/// The one provider chosen at startup to deliver welcome messages.
pub enum DeliveryProvider {
    TransactionalEmail(EmailClient),
    FormRelay(FormRelayClient),
    NoOp,
}

#[derive(thiserror::Error)]
pub enum DeliveryError {
    // Also covers non-2xx statuses and undecodable bodies.
    #[error("Failed to reach the delivery provider")]
    Transport(#[from] reqwest::Error),
    #[error("The delivery provider rejected the request: {0}")]
    Rejected(String),
}

impl std::fmt::Debug for DeliveryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl DeliveryProvider {
    pub fn name(&self) -> &'static str {
        match self {
            DeliveryProvider::TransactionalEmail(_) => "transactional_email",
            DeliveryProvider::FormRelay(_) => "form_relay",
            DeliveryProvider::NoOp => "noop",
        }
    }

    /// Attempt to deliver the welcome message. `Ok(())` from `NoOp` means
    /// nothing was sent.
    #[tracing::instrument(
        name = "Delivering welcome message",
        skip_all,
        fields(provider = self.name(), subscriber_email = %recipient)
    )]
    pub async fn deliver(&self, recipient: &SubscriberEmail) -> Result<(), DeliveryError> {
        match self {
            DeliveryProvider::TransactionalEmail(client) => {
                let email = WelcomeEmail::new();
                client
                    .send_email(
                        recipient,
                        email.subject,
                        email.html_content,
                        email.text_content,
                    )
                    .await?;
            }
            DeliveryProvider::FormRelay(client) => {
                client.notify_new_subscriber(recipient).await?;
            }
            DeliveryProvider::NoOp => {
                tracing::info!(
                    "[EMAIL SKIPPED] No email service configured. \
                     Set a transactional API key or a form relay access key to enable emails."
                );
                return Ok(());
            }
        }
        tracing::info!("[EMAIL SENT] Confirmation sent to: {}", recipient);
        Ok(())
    }
}
