//! Domain layer for confstore
//!
//! Entity models, the backend key schema, errors, and the backend port.

pub mod errors;
pub mod keys;
pub mod models;
pub mod ports;

pub use errors::{InvalidInputError, StoreError, StoreResult};
pub use keys::EntityKind;
