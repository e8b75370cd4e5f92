//! Data models for the markdown generator.
//!
//! Request/response DTOs for the generator endpoints and the response
//! envelope shared by every route.

mod document;
mod response;

pub use document::*;
pub use response::*;
