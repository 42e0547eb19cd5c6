//! Implementation of the steps in the service's processing pipeline.
//!
//! ```text
//! http::Request
//!     ↓ negotiation: pick the encoding, decode a graphql::Request (or answer 415/405)
//!     ↓ router: build the ExecutionInput, apply on_request, call the Engine
//!     ↓ router::assembler: apply on_result, encode one body or one frame per result
//! http::Response
//! ```

pub mod execution;
pub(crate) mod negotiation;
pub mod router;

pub(crate) const APPLICATION_JSON_HEADER_VALUE: &str = "application/json";
