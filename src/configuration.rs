use config::ConfigError;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};

use crate::delivery::DeliveryProvider;
use crate::domain::{Sender, SubscriberEmail};
use crate::email_client::EmailClient;
use crate::form_relay_client::FormRelayClient;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub email_delivery: EmailDeliverySettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: String,
}

/// Everything needed to pick and build a delivery provider.
///
/// Both keys are optional. The transactional API wins when both are set.
#[derive(Deserialize, Clone)]
pub struct EmailDeliverySettings {
    pub sender_email: String,
    pub sender_name: String,
    pub transactional_api_key: Option<Secret<String>>,
    pub transactional_base_url: String,
    pub form_relay_access_key: Option<Secret<String>>,
    pub form_relay_base_url: String,
    /// Reply-to address the relay puts on its notice to the site owner.
    pub form_relay_contact_email: String,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub timeout_milliseconds: Option<u64>,
}

impl EmailDeliverySettings {
    pub fn sender(&self) -> Result<Sender, String> {
        let address = SubscriberEmail::parse(self.sender_email.clone())?;
        Ok(Sender::new(self.sender_name.clone(), address))
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        self.timeout_milliseconds.map(std::time::Duration::from_millis)
    }

    pub fn relay_contact(&self) -> Result<Sender, String> {
        let address = SubscriberEmail::parse(self.form_relay_contact_email.clone())?;
        Ok(Sender::new(self.sender_name.clone(), address))
    }

    /// Resolve the provider once, from whichever key is present.
    pub fn provider(&self) -> Result<DeliveryProvider, anyhow::Error> {
        let timeout = self.timeout();

        if let Some(api_key) = present(&self.transactional_api_key) {
            let client = EmailClient::new(
                self.transactional_base_url.clone(),
                self.sender().map_err(anyhow::Error::msg)?,
                api_key,
                timeout,
            )?;
            return Ok(DeliveryProvider::TransactionalEmail(client));
        }

        if let Some(access_key) = present(&self.form_relay_access_key) {
            let client = FormRelayClient::new(
                self.form_relay_base_url.clone(),
                self.relay_contact().map_err(anyhow::Error::msg)?,
                access_key,
                timeout,
            )?;
            return Ok(DeliveryProvider::FormRelay(client));
        }

        Ok(DeliveryProvider::NoOp)
    }
}

// An empty key counts as unset.
fn present(secret: &Option<Secret<String>>) -> Option<Secret<String>> {
    secret
        .as_ref()
        .filter(|s| !s.expose_secret().trim().is_empty())
        .cloned()
}

/// Runtime environments the application knows about.
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_environment() -> Result<Environment, ConfigError> {
    std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)
}

// Variable names used by the previous deployment, still honoured.
const LEGACY_OVERRIDES: [(&str, &str); 4] = [
    ("RESEND_API_KEY", "email_delivery.transactional_api_key"),
    ("WEB3FORMS_ACCESS_KEY", "email_delivery.form_relay_access_key"),
    ("SMTP_USER", "email_delivery.sender_email"),
    ("SMTP_USER", "email_delivery.form_relay_contact_email"),
];

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir().map_err(|e| {
        ConfigError::Message(format!("Failed to determine the current directory: {}", e))
    })?;
    let configuration_directory = base_path.join("configuration");
    let environment = get_environment()?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let mut builder = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")))
        .add_source(config::File::from(
            configuration_directory.join(environment_filename),
        ))
        // e.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        );

    for (variable, key) in LEGACY_OVERRIDES {
        let value = std::env::var(variable).ok().filter(|v| !v.trim().is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    builder.build()?.try_deserialize::<Settings>()
}
