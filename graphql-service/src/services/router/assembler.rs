//! Turns an [`ExecutionOutput`] into an HTTP response.
//!
//! A single result is encoded into one body. A result stream is encoded one value at a
//! time: the next value is only requested from the engine once the transport polls the
//! body for another frame, and dropping the body drops the engine's stream.

use std::pin::Pin;
use std::sync::Arc;
use std::task::Context as TaskContext;
use std::task::Poll;

use bytes::Bytes;
use futures::Stream;
use futures::ready;
use http::StatusCode;
use http::header::CONTENT_TYPE;

use super::body;
use super::body::RouterBody;
use crate::Context;
use crate::codec::Codec;
use crate::error::ServiceError;
use crate::graphql;
use crate::services::APPLICATION_JSON_HEADER_VALUE;
use crate::services::execution::ExecutionOutput;
use crate::services::execution::OnResult;
use crate::services::execution::ResponseStream;

/// Builds the `200 OK` response for an engine output.
///
/// Fails only if a single result cannot be serialized; failures in a stream surface as
/// an error frame of the body.
pub(crate) fn assemble(
    output: ExecutionOutput,
    context: Context,
    codec: Arc<dyn Codec>,
    on_result: Option<OnResult>,
) -> Result<http::Response<RouterBody>, ServiceError> {
    let body = match output {
        ExecutionOutput::Single(response) => {
            let bytes = encode(codec.as_ref(), on_result.as_ref(), &context, response)
                .inspect_err(|err| tracing::error!(error = %err, "cannot serialize the result"))?;
            body::full(bytes)
        }
        ExecutionOutput::Stream(results) => body::from_result_stream(FrameStream {
            results,
            codec,
            on_result,
            context: context.clone(),
            finished: false,
        }),
    };

    let mut response = http::Response::builder()
        .status(StatusCode::OK)
        .header(CONTENT_TYPE, APPLICATION_JSON_HEADER_VALUE)
        .body(body)?;
    *response.extensions_mut() = context.into();
    Ok(response)
}

fn encode(
    codec: &dyn Codec,
    on_result: Option<&OnResult>,
    context: &Context,
    response: graphql::Response,
) -> Result<Bytes, ServiceError> {
    let response = match on_result {
        Some(on_result) => on_result(context, response),
        None => response,
    };
    codec
        .encode_response(&response)
        .map_err(ServiceError::Serialization)
}

/// Encodes each value of the engine's stream into one body frame.
struct FrameStream {
    results: ResponseStream,
    codec: Arc<dyn Codec>,
    on_result: Option<OnResult>,
    context: Context,
    finished: bool,
}

impl FrameStream {
    /// Ends the stream with `err`. The engine's stream is released right away.
    fn abort(&mut self, err: ServiceError) -> Poll<Option<Result<Bytes, ServiceError>>> {
        tracing::error!(error = %err, "closing the response stream abnormally");
        self.finished = true;
        self.results = Box::pin(futures::stream::empty());
        Poll::Ready(Some(Err(err)))
    }
}

impl Stream for FrameStream {
    type Item = Result<Bytes, ServiceError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.finished {
            return Poll::Ready(None);
        }

        match ready!(this.results.as_mut().poll_next(cx)) {
            Some(Ok(response)) => {
                match encode(
                    this.codec.as_ref(),
                    this.on_result.as_ref(),
                    &this.context,
                    response,
                ) {
                    Ok(bytes) => Poll::Ready(Some(Ok(bytes))),
                    Err(err) => this.abort(err),
                }
            }
            Some(Err(err)) => this.abort(ServiceError::StreamAbort(err)),
            None => {
                this.finished = true;
                Poll::Ready(None)
            }
        }
    }
}

impl Drop for FrameStream {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!("response body dropped before the result stream completed");
        }
    }
}
