//! Common types for the Medium client workspace

mod error;
mod secret;
mod wire;

pub use error::{Error, Result};
pub use secret::Secret;
pub use wire::UnknownWireValue;

#[doc(hidden)]
pub use serde as __serde;
