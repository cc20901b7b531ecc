pub mod admin;
pub mod auth;
pub mod feedback;
pub mod storage;

pub use admin::{AdminCall, StubAdminGateway};
pub use auth::{AuthCalls, StubAuthGateway};
pub use feedback::{RecordingNotifier, ScriptedConfirmation};
pub use storage::{FaultyCredentialStore, YieldingCredentialStore};
