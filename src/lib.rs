pub mod configuration;
pub mod delivery;
pub mod domain;
pub mod email_client;
pub mod form_relay_client;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod utils;
