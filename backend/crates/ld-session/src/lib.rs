//! Session Store: the authentication lifecycle of the district client.

mod auth_handle;
mod auth_phase;
mod auth_snapshot;
#[cfg(feature = "demo")]
pub mod demo;
mod error;
mod options;
mod session_store;
mod sign_in_method;

#[cfg(test)]
mod tests;

pub use auth_handle::AuthHandle;
pub use auth_phase::AuthPhase;
pub use auth_snapshot::AuthSnapshot;
pub use error::{Result, SessionError};
pub use options::SessionStoreOptions;
pub use session_store::SessionStore;
pub use sign_in_method::SignInMethod;
