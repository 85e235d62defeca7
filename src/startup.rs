use crate::configuration::Settings;
use crate::delivery::DeliveryProvider;
use crate::routes::{health_check, subscriptions};
use actix_web::dev::Server;
use actix_web::http::Method;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer, Resource};
use std::net::TcpListener;
use tracing_actix_web::TracingLogger;

/// Paths the subscription handler answers on. The second is kept so older
/// forms posting to it keep working.
pub const SUBSCRIPTION_PATHS: [&str; 2] = ["/api/subscribe", "/api/newsletter"];

const CORS_ALLOW_METHODS: &str = "GET,OPTIONS,PATCH,DELETE,POST,PUT";
const CORS_ALLOW_HEADERS: &str = "X-CSRF-Token, X-Requested-With, Accept, Accept-Version, \
     Content-Length, Content-MD5, Content-Type, Date, X-Api-Version";

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let provider = configuration.email_delivery.provider()?;
        tracing::info!(provider = provider.name(), "Delivery provider resolved");

        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(listener, provider)?;
        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn run(listener: TcpListener, provider: DeliveryProvider) -> Result<Server, std::io::Error> {
    let provider = web::Data::new(provider);

    let server = HttpServer::new(move || {
        App::new()
            .wrap(cors_headers())
            .wrap(TracingLogger::default())
            .route(
                "/health_check",
                web::get().to(health_check::health_check),
            )
            .service(subscription_resource(SUBSCRIPTION_PATHS[0]))
            .service(subscription_resource(SUBSCRIPTION_PATHS[1]))
            .app_data(provider.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}

fn subscription_resource(path: &str) -> Resource {
    web::resource(path)
        .route(web::post().to(subscriptions::subscribe))
        .route(web::method(Method::OPTIONS).to(subscriptions::preflight))
        .default_service(web::route().to(subscriptions::method_not_allowed))
}

// Permissive CORS on every response, errors included.
fn cors_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("Access-Control-Allow-Credentials", "true"))
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", CORS_ALLOW_METHODS))
        .add(("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS))
}
