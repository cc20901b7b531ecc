pub mod bootstrap;

pub use bootstrap::{App, ClientConfig, bootstrap, bootstrap_with};
