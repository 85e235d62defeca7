use once_cell::sync::Lazy;
use secrecy::Secret;
use subscription_intake::{
    configuration::get_configuration,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
};
use wiremock::MockServer;

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

/// Which delivery key the application under test is started with.
pub enum ProviderSetup {
    None,
    TransactionalEmail,
    FormRelay,
    Both,
}

pub struct TestApp {
    pub address: String,
    pub email_server: MockServer,
    pub api_client: reqwest::Client,
}

impl TestApp {
    pub async fn post_subscriptions(&self, body: String) -> reqwest::Response {
        self.post_subscriptions_to("/api/subscribe", body).await
    }

    pub async fn post_subscriptions_to(&self, path: &str, body: String) -> reqwest::Response {
        self.api_client
            .post(&format!("{}{}", &self.address, path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn request_subscriptions(&self, method: reqwest::Method) -> reqwest::Response {
        self.request_path(method, "/api/subscribe").await
    }

    pub async fn request_path(&self, method: reqwest::Method, path: &str) -> reqwest::Response {
        self.api_client
            .request(method, format!("{}{}", &self.address, path))
            .send()
            .await
            .expect("Failed to execute request.")
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(ProviderSetup::None).await
}

pub async fn spawn_app_with(setup: ProviderSetup) -> TestApp {
    Lazy::force(&TRACING);

    let email_server = MockServer::start().await;

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = 0;
        c.application.host = "127.0.0.1".into();
        c.email_delivery.transactional_base_url = email_server.uri();
        c.email_delivery.form_relay_base_url = email_server.uri();
        c.email_delivery.timeout_milliseconds = Some(2_000);
        let (transactional, relay) = match setup {
            ProviderSetup::None => (None, None),
            ProviderSetup::TransactionalEmail => (Some("re_test_key"), None),
            ProviderSetup::FormRelay => (None, Some("w3f-test-key")),
            ProviderSetup::Both => (Some("re_test_key"), Some("w3f-test-key")),
        };
        c.email_delivery.transactional_api_key = transactional.map(|k| Secret::new(k.into()));
        c.email_delivery.form_relay_access_key = relay.map(|k| Secret::new(k.into()));
        c
    };

    let application = Application::build(configuration)
        .await
        .expect("Failed to build application.");
    let address = format!("http://127.0.0.1:{}", application.port());
    let _ = tokio::spawn(application.run_until_stopped());

    TestApp {
        address,
        email_server,
        api_client: reqwest::Client::new(),
    }
}
