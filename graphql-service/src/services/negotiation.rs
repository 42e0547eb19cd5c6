//! Picks the encoding of an incoming GraphQL request and decodes it.
//!
//! Three encodings are accepted:
//! * parameters (`query`, `operationName`, `variables`) in the URI query string, or in an
//!   `application/x-www-form-urlencoded` POST body,
//! * a JSON document in an `application/json` POST body,
//! * the query text itself in an `application/graphql` POST body.
//!
//! On POST, `application/json` wins over a `query` parameter, which in turn wins over
//! `application/graphql`. Anything else is answered with `415 Unsupported Media Type`.

use bytes::Bytes;
use http::HeaderMap;
use http::Method;
use http::header::CONTENT_TYPE;
use http::request::Parts;
use mediatype::MediaType;
use mediatype::names::APPLICATION;

use crate::codec::Codec;
use crate::error::RequestError;
use crate::graphql;
use crate::graphql::decode_variables;

/// The outcome of negotiation.
#[derive(Debug, PartialEq)]
pub(crate) enum Negotiation {
    /// A well-formed request with a non-empty query.
    Execute(graphql::Request),
    /// A POST that matches no supported encoding.
    UnsupportedMediaType,
    /// Neither GET nor POST.
    MethodNotAllowed,
}

/// The request encoding announced by the `content-type` header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ContentType {
    Json,
    GraphQL,
    FormUrlEncoded,
    Other,
}

impl ContentType {
    fn from_headers(headers: &HeaderMap) -> Self {
        let Some(media_type) = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| MediaType::parse(value).ok())
        else {
            return ContentType::Other;
        };
        if media_type.ty != APPLICATION || media_type.suffix.is_some() {
            return ContentType::Other;
        }
        let subtype = media_type.subty.as_str();
        if subtype.eq_ignore_ascii_case("json") {
            ContentType::Json
        } else if subtype.eq_ignore_ascii_case("graphql") {
            ContentType::GraphQL
        } else if subtype.eq_ignore_ascii_case("x-www-form-urlencoded") {
            ContentType::FormUrlEncoded
        } else {
            ContentType::Other
        }
    }
}

/// Returns true if negotiating a request with this method looks at the body.
pub(crate) fn reads_body(method: &Method) -> bool {
    method == Method::POST
}

/// Decodes the request, or tells why it cannot be executed.
///
/// `body` is only looked at for POST requests.
pub(crate) fn negotiate(
    parts: &Parts,
    body: &Bytes,
    codec: &dyn Codec,
) -> Result<Negotiation, RequestError> {
    match parts.method {
        Method::GET => {
            let parameters = Parameters::from_uri(&parts.uri)?;
            tracing::debug!("decoding GraphQL request from parameters");
            parameters.into_request(codec).map(Negotiation::Execute)
        }
        Method::POST => negotiate_post(parts, body, codec),
        _ => {
            tracing::debug!(method = %parts.method, "method not allowed");
            Ok(Negotiation::MethodNotAllowed)
        }
    }
}

fn negotiate_post(
    parts: &Parts,
    body: &Bytes,
    codec: &dyn Codec,
) -> Result<Negotiation, RequestError> {
    let content_type = ContentType::from_headers(&parts.headers);

    // The JSON document is authoritative even when a `query` parameter is present.
    if content_type == ContentType::Json {
        tracing::debug!("decoding GraphQL request from a JSON body");
        let request = codec
            .decode_request(body)
            .map_err(|err| RequestError::MalformedBody {
                reason: err.to_string(),
            })?;
        return ensure_query(request).map(Negotiation::Execute);
    }

    let mut parameters = Parameters::from_uri(&parts.uri)?;
    if content_type == ContentType::FormUrlEncoded {
        parameters.extend_from_urlencoded(body)?;
    }
    if parameters.query.is_some() {
        tracing::debug!("decoding GraphQL request from parameters");
        return parameters.into_request(codec).map(Negotiation::Execute);
    }

    if content_type == ContentType::GraphQL {
        tracing::debug!("decoding GraphQL request from a raw query body");
        let query = std::str::from_utf8(body).map_err(|err| RequestError::MalformedBody {
            reason: err.to_string(),
        })?;
        return ensure_query(graphql::Request::builder().query(query).build())
            .map(Negotiation::Execute);
    }

    tracing::debug!(
        content_type = ?parts.headers.get(CONTENT_TYPE),
        "no GraphQL encoding matches the request"
    );
    Ok(Negotiation::UnsupportedMediaType)
}

fn ensure_query(request: graphql::Request) -> Result<graphql::Request, RequestError> {
    if request.query.is_empty() {
        Err(RequestError::MissingQuery)
    } else {
        Ok(request)
    }
}

/// The GraphQL request parameters. The first occurrence of a parameter wins.
#[derive(Debug, Default)]
struct Parameters {
    query: Option<String>,
    operation_name: Option<String>,
    variables: Option<String>,
}

impl Parameters {
    fn from_uri(uri: &http::Uri) -> Result<Self, RequestError> {
        let mut parameters = Parameters::default();
        if let Some(query_string) = uri.query() {
            parameters.extend_from_urlencoded(query_string.as_bytes())?;
        }
        Ok(parameters)
    }

    fn extend_from_urlencoded(&mut self, input: &[u8]) -> Result<(), RequestError> {
        let pairs: Vec<(String, String)> =
            serde_urlencoded::from_bytes(input).map_err(|err| {
                RequestError::MalformedParameters {
                    reason: err.to_string(),
                }
            })?;
        for (name, value) in pairs {
            let slot = match name.as_str() {
                "query" => &mut self.query,
                "operationName" => &mut self.operation_name,
                "variables" => &mut self.variables,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        Ok(())
    }

    fn into_request(self, codec: &dyn Codec) -> Result<graphql::Request, RequestError> {
        let query = self.query.ok_or(RequestError::MissingQuery)?;
        let variables = decode_variables(codec, self.variables.as_deref())?;
        ensure_query(
            graphql::Request::builder()
                .query(query)
                .and_operation_name(self.operation_name)
                .and_variables(variables)
                .build(),
        )
    }
}
