//! The execution engine contract.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures::Stream;
use static_assertions::assert_impl_all;
use tower::BoxError;

use crate::Context;
use crate::graphql;
use crate::json_ext::Object;

/// An asynchronous [`Stream`] of GraphQL [`Response`](graphql::Response)s.
///
/// An `Err` item means the producer failed: the HTTP response is closed abnormally
/// and the stream is not polled again.
pub type ResponseStream =
    Pin<Box<dyn Stream<Item = Result<graphql::Response, BoxError>> + Send>>;

/// Transforms the execution input before the engine sees it.
pub type OnRequest = Arc<dyn Fn(&Context, ExecutionInput) -> ExecutionInput + Send + Sync>;

/// Transforms each result before it is serialized.
pub type OnResult = Arc<dyn Fn(&Context, graphql::Response) -> graphql::Response + Send + Sync>;

assert_impl_all!(ExecutionInput: Send, Sync);
/// What the engine is asked to execute.
#[derive(Clone, Debug, Default)]
#[non_exhaustive]
pub struct ExecutionInput {
    /// The GraphQL document.
    pub query: String,

    /// The operation to run when the document holds more than one.
    pub operation_name: Option<String>,

    /// The variable values, empty when the client sent none.
    pub variables: Object,

    /// Metadata for the engine. Starts as a copy of the request context; an
    /// `on_request` hook may add to it.
    pub context: Context,
}

impl ExecutionInput {
    /// Builds the input for one request.
    pub fn new(request: graphql::Request, context: Context) -> Self {
        let graphql::Request {
            query,
            operation_name,
            variables,
            ..
        } = request;
        Self {
            query,
            operation_name,
            variables: variables.unwrap_or_default(),
            context,
        }
    }
}

/// What the engine produced for one request.
pub enum ExecutionOutput {
    /// A single result, sent as one response body.
    Single(graphql::Response),

    /// A stream of results (subscriptions, incremental delivery), each sent as
    /// one frame of a streamed response body.
    Stream(ResponseStream),
}

impl fmt::Debug for ExecutionOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionOutput::Single(response) => f.debug_tuple("Single").field(response).finish(),
            ExecutionOutput::Stream(_) => f.debug_tuple("Stream").field(&"..").finish(),
        }
    }
}

impl From<graphql::Response> for ExecutionOutput {
    fn from(response: graphql::Response) -> Self {
        ExecutionOutput::Single(response)
    }
}

impl From<ResponseStream> for ExecutionOutput {
    fn from(stream: ResponseStream) -> Self {
        ExecutionOutput::Stream(stream)
    }
}

/// A GraphQL execution engine.
///
/// The service invokes `execute` exactly once per HTTP call and never retries it.
/// An `Err` is reported as a server fault.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Engine: Send + Sync + 'static {
    /// Executes one GraphQL operation.
    async fn execute(&self, input: ExecutionInput) -> Result<ExecutionOutput, BoxError>;
}

#[async_trait]
impl<E> Engine for Arc<E>
where
    E: Engine + ?Sized,
{
    async fn execute(&self, input: ExecutionInput) -> Result<ExecutionOutput, BoxError> {
        (**self).execute(input).await
    }
}
