//! Infrastructure: HTTP transport, gateway adapters and collaborator traits

pub mod api_client;
pub mod errors;
pub mod services;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use api_client::ApiClient;
pub use errors::{GatewayError, GatewayResult};
