use axum::Error as AxumError;
use bytes::Bytes;
use futures::Stream;
use futures::StreamExt;
use http_body::Body as HttpBody;
use http_body::Frame;
use http_body_util::BodyExt;
use http_body_util::Empty;
use http_body_util::Full;
use http_body_util::Limited;
use http_body_util::LengthLimitError;
use http_body_util::StreamBody;
use http_body_util::combinators::UnsyncBoxBody;
use tower::BoxError;

use crate::error::RequestError;
use crate::error::ServiceError;

/// The body of every response produced by [`GraphQLService`](super::GraphQLService).
pub type RouterBody = UnsyncBoxBody<Bytes, AxumError>;

/// Reads a whole request body, failing once more than `limit` bytes were received.
pub(crate) async fn get_body_bytes<B>(body: B, limit: usize) -> Result<Bytes, ServiceError>
where
    B: HttpBody<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(err) if err.is::<LengthLimitError>() => {
            Err(RequestError::PayloadTooLarge { limit }.into())
        }
        Err(err) => Err(ServiceError::BodyRead(err)),
    }
}

/// Create an empty RouterBody
pub(crate) fn empty() -> RouterBody {
    Empty::<Bytes>::new()
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Create a Full RouterBody using the supplied chunk
pub(crate) fn full<T: Into<Bytes>>(chunk: T) -> RouterBody {
    Full::new(chunk.into())
        .map_err(|never| match never {})
        .boxed_unsync()
}

/// Create a streaming RouterBody, one data frame per item
pub(crate) fn from_result_stream<S>(data_stream: S) -> RouterBody
where
    S: Stream<Item = Result<Bytes, ServiceError>> + Send + 'static,
{
    RouterBody::new(StreamBody::new(
        data_stream.map(|chunk| chunk.map(Frame::data).map_err(AxumError::new)),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_a_body_under_the_limit() {
        let bytes = get_body_bytes(full("{ me }"), 6).await.unwrap();
        assert_eq!(bytes, Bytes::from_static(b"{ me }"));
    }

    #[tokio::test]
    async fn rejects_a_body_over_the_limit() {
        let err = get_body_bytes(full("{ me }"), 5).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Request(RequestError::PayloadTooLarge { limit: 5 })
        ));
    }

    #[tokio::test]
    async fn reports_body_read_failures() {
        let failing = from_result_stream(futures::stream::iter([Err(
            ServiceError::StreamAbort("connection reset".into()),
        )]));
        let err = get_body_bytes(failing, 1024).await.unwrap_err();
        assert!(matches!(err, ServiceError::BodyRead(_)));
    }
}
