//! The GraphQL-over-HTTP tower service.

use std::sync::Arc;
use std::task::Poll;

use bytes::Bytes;
use futures::future::BoxFuture;
use http::HeaderValue;
use http::StatusCode;
use http::header::ALLOW;
use http_body::Body as HttpBody;
use static_assertions::assert_impl_all;
use tower::BoxError;
use tower::Service;
use tracing::Instrument;

use crate::Context;
use crate::codec::Codec;
use crate::codec::JsonCodec;
use crate::configuration::Configuration;
use crate::configuration::ConfigurationError;
use crate::error::ServiceError;
use crate::graphql;
use crate::services::execution::Engine;
use crate::services::execution::ExecutionInput;
use crate::services::execution::OnRequest;
use crate::services::execution::OnResult;
use crate::services::negotiation;
use crate::services::negotiation::Negotiation;

mod assembler;
pub mod body;

pub use self::body::RouterBody;

pub type ServiceResult = Result<http::Response<RouterBody>, ServiceError>;

assert_impl_all!(GraphQLService: Send, Sync, Clone);

/// Serves GraphQL requests on a single HTTP endpoint.
///
/// Each call decodes the request (query parameters, a JSON body or an
/// `application/graphql` body), runs it once through the [`Engine`] and encodes the
/// result(s) as JSON. Requests in an unsupported encoding are answered with
/// `415 Unsupported Media Type`; any method but GET and POST with `405 Method Not Allowed`.
///
/// Malformed requests and server faults are returned as [`ServiceError`]s: see
/// [`crate::axum_factory`] for a handler turning them into responses.
#[derive(Clone)]
pub struct GraphQLService {
    inner: Arc<Inner>,
}

struct Inner {
    engine: Arc<dyn Engine>,
    codec: Arc<dyn Codec>,
    on_request: Option<OnRequest>,
    on_result: Option<OnResult>,
    configuration: Configuration,
}

impl GraphQLService {
    pub fn builder() -> GraphQLServiceBuilder {
        GraphQLServiceBuilder::default()
    }

    pub fn configuration(&self) -> &Configuration {
        &self.inner.configuration
    }

    async fn call_inner<B>(self, request: http::Request<B>) -> ServiceResult
    where
        B: HttpBody<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let (mut parts, body) = request.into_parts();
        let bytes = if negotiation::reads_body(&parts.method) {
            body::get_body_bytes(body, self.inner.configuration.max_request_length).await?
        } else {
            Bytes::new()
        };

        let request = match negotiation::negotiate(&parts, &bytes, self.inner.codec.as_ref())? {
            Negotiation::Execute(request) => request,
            Negotiation::UnsupportedMediaType => {
                return Ok(empty_response(StatusCode::UNSUPPORTED_MEDIA_TYPE));
            }
            Negotiation::MethodNotAllowed => {
                let mut response = empty_response(StatusCode::METHOD_NOT_ALLOWED);
                response
                    .headers_mut()
                    .insert(ALLOW, HeaderValue::from_static("GET, POST"));
                return Ok(response);
            }
        };

        let context = Context::from(std::mem::take(&mut parts.extensions));
        self.execute(request, context).await
    }

    async fn execute(&self, request: graphql::Request, context: Context) -> ServiceResult {
        let mut input = ExecutionInput::new(request, context.clone());
        if let Some(on_request) = &self.inner.on_request {
            input = on_request(&context, input);
        }

        tracing::debug!(
            operation_name = input.operation_name.as_deref(),
            "executing GraphQL request"
        );
        let output = self
            .inner
            .engine
            .execute(input)
            .await
            .map_err(ServiceError::Engine)?;

        assembler::assemble(
            output,
            context,
            self.inner.codec.clone(),
            self.inner.on_result.clone(),
        )
    }
}

fn empty_response(status: StatusCode) -> http::Response<RouterBody> {
    let mut response = http::Response::new(body::empty());
    *response.status_mut() = status;
    response
}

impl<B> Service<http::Request<B>> for GraphQLService
where
    B: HttpBody<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError>,
{
    type Response = http::Response<RouterBody>;
    type Error = ServiceError;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut std::task::Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        let this = self.clone();
        let span = tracing::info_span!("graphql_request", http.method = %req.method());
        Box::pin(async move { this.call_inner(req).await }.instrument(span))
    }
}

/// Builds a [`GraphQLService`]. Everything set here is frozen by [`build`](Self::build).
#[derive(Default)]
pub struct GraphQLServiceBuilder {
    engine: Option<Arc<dyn Engine>>,
    codec: Option<Arc<dyn Codec>>,
    on_request: Option<OnRequest>,
    on_result: Option<OnResult>,
    configuration: Option<Configuration>,
}

impl GraphQLServiceBuilder {
    /// The engine executing every request. Required.
    pub fn engine(mut self, engine: impl Engine) -> Self {
        self.engine = Some(Arc::new(engine));
        self
    }

    /// Replaces the [`JsonCodec`].
    pub fn codec(mut self, codec: impl Codec) -> Self {
        self.codec = Some(Arc::new(codec));
        self
    }

    /// Transforms the engine input of every request before execution.
    pub fn on_request<F>(mut self, on_request: F) -> Self
    where
        F: Fn(&Context, ExecutionInput) -> ExecutionInput + Send + Sync + 'static,
    {
        self.on_request = Some(Arc::new(on_request));
        self
    }

    /// Transforms every result (each value of a stream) before it is serialized.
    pub fn on_result<F>(mut self, on_result: F) -> Self
    where
        F: Fn(&Context, graphql::Response) -> graphql::Response + Send + Sync + 'static,
    {
        self.on_result = Some(Arc::new(on_result));
        self
    }

    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = Some(configuration);
        self
    }

    pub fn build(self) -> Result<GraphQLService, ConfigurationError> {
        let engine = self.engine.ok_or(ConfigurationError::MissingEngine)?;
        let configuration = self.configuration.unwrap_or_default().validate()?;
        Ok(GraphQLService {
            inner: Arc::new(Inner {
                engine,
                codec: self.codec.unwrap_or_else(|| Arc::new(JsonCodec)),
                on_request: self.on_request,
                on_result: self.on_result,
                configuration,
            }),
        })
    }
}
