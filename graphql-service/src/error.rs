//! Service errors.
//!
//! Errors are split in two kinds: [`RequestError`]s are caused by a malformed client
//! request and should be reported back to the client with a 4xx status, every other
//! [`ServiceError`] is a server fault. The service itself never picks a status code for
//! an error: that is left to the enclosing handler (see [`crate::axum_factory`]).
//!
//! Note that an unsupported request encoding is not an error: the service answers it
//! directly with `415 Unsupported Media Type`.

use displaydoc::Display;
use miette::Diagnostic;
use thiserror::Error;
use tower::BoxError;

/// Errors caused by a malformed client request.
#[derive(Error, Display, Debug, Diagnostic)]
#[non_exhaustive]
pub enum RequestError {
    /// variables must be a JSON-encoded object: {reason}
    #[diagnostic(code(GRAPHQL_SERVICE_MALFORMED_VARIABLES))]
    MalformedVariables {
        /// The variables string as sent by the client.
        variables: String,
        /// Why decoding failed.
        reason: String,
    },

    /// body must be a JSON-encoded GraphQL request: {reason}
    #[diagnostic(code(GRAPHQL_SERVICE_MALFORMED_BODY))]
    MalformedBody {
        /// Why decoding failed.
        reason: String,
    },

    /// request parameters could not be decoded: {reason}
    #[diagnostic(code(GRAPHQL_SERVICE_MALFORMED_PARAMETERS))]
    MalformedParameters {
        /// Why decoding failed.
        reason: String,
    },

    /// a non-empty 'query' is required
    #[diagnostic(code(GRAPHQL_SERVICE_MISSING_QUERY))]
    MissingQuery,

    /// request body exceeds the limit of {limit} bytes
    #[diagnostic(code(GRAPHQL_SERVICE_PAYLOAD_TOO_LARGE))]
    PayloadTooLarge {
        /// The configured limit, in bytes.
        limit: usize,
    },
}

/// Errors returned by [`GraphQLService`](crate::GraphQLService).
#[derive(Error, Display, Debug, Diagnostic)]
#[non_exhaustive]
pub enum ServiceError {
    /// invalid GraphQL request: {0}
    #[diagnostic(code(GRAPHQL_SERVICE_INVALID_REQUEST))]
    Request(#[from] RequestError),

    /// failed to read the request body: {0}
    #[diagnostic(code(GRAPHQL_SERVICE_BODY_READ))]
    BodyRead(#[source] BoxError),

    /// query execution failed: {0}
    #[diagnostic(code(GRAPHQL_SERVICE_ENGINE))]
    Engine(#[source] BoxError),

    /// failed to serialize the GraphQL response: {0}
    #[diagnostic(code(GRAPHQL_SERVICE_SERIALIZATION))]
    Serialization(#[source] serde_json::Error),

    /// the result stream was aborted: {0}
    #[diagnostic(code(GRAPHQL_SERVICE_STREAM_ABORT))]
    StreamAbort(#[source] BoxError),

    /// failed to build the HTTP response: {0}
    #[diagnostic(code(GRAPHQL_SERVICE_HTTP))]
    Http(#[from] http::Error),
}

impl ServiceError {
    /// Returns true if the client sent a request that could not be understood.
    ///
    /// Client errors must not be retried as-is; every other error is a server fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServiceError::Request(_))
    }

    /// Returns the client error, if this is one.
    pub fn as_request_error(&self) -> Option<&RequestError> {
        match self {
            ServiceError::Request(err) => Some(err),
            _ => None,
        }
    }
}
