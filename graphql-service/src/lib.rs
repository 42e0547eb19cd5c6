//! A single-endpoint GraphQL-over-HTTP service.
//!
//! [`GraphQLService`] accepts GraphQL requests in the three common HTTP encodings
//! (query parameters, a JSON document body, or a raw `application/graphql` body),
//! hands them to an [`Engine`], and turns whatever the engine produces (one result
//! or a stream of results) back into an HTTP response.

#![warn(unreachable_pub)]

pub mod json_ext;

pub mod axum_factory;
pub mod codec;
mod configuration;
mod context;
pub mod error;
pub mod graphql;
pub mod services;

pub use codec::Codec;
pub use codec::JsonCodec;
pub use configuration::Configuration;
pub use configuration::ConfigurationError;
pub use context::Context;
pub use context::ContextValue;
pub use error::RequestError;
pub use error::ServiceError;
pub use services::execution::Engine;
pub use services::execution::ExecutionInput;
pub use services::execution::ExecutionOutput;
pub use services::execution::ResponseStream;
pub use services::router::GraphQLService;
