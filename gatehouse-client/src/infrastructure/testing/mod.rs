//! Test support for the client controllers
//!
//! In-memory gateways that behave like the server, scripted confirmation,
//! a recording notifier and a credential store that can be told to fail.
//! Every stub counts its calls so tests can assert that a guard stopped an
//! operation before it reached the network.

pub mod fixtures;
pub mod stubs;

pub use fixtures::{admin, member, population};
pub use stubs::{
    AdminCall, AuthCalls, FaultyCredentialStore, RecordingNotifier, ScriptedConfirmation,
    StubAdminGateway, StubAuthGateway, YieldingCredentialStore,
};
