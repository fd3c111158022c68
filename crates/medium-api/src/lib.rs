//! Medium REST API client
//!
//! `MediumClient` turns each API operation into a single `Transport` round
//! trip plus a `ModelConverter` call. Responses may arrive wrapped in a
//! `{"data": ...}` envelope; the converter unwraps it transparently.
//!
//! The client also implements `medium_auth::CodeExchange`, so it can be handed
//! to an `AccessProvider` to complete the authorization code flow.

pub mod client;
pub mod converter;
pub mod error;
pub mod model;

pub use client::{ClientConfig, MediumClient};
pub use converter::{ConversionError, ModelConverter};
pub use error::{Error, Result};
pub use model::{
    ApiError, ApiErrorBody, ContentFormat, Contributor, License, Post, Publication,
    PublishStatus, Role, Submission, User,
};
