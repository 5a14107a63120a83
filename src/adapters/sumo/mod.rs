//! Sumo Logic search job adapter
//!
//! - [`transport`] - authenticated HTTP requests returning raw status and body
//! - [`api`] - the [`SearchApi`] trait and its HTTP implementation
//! - [`models`] - response envelopes

pub mod api;
pub mod models;
pub mod transport;

pub use api::{SearchApi, SumoSearchApi};
pub use models::{MessageEnvelope, MessagesResponse};
pub use transport::{basic_auth_value, HttpTransport, RawResponse};
