//! The JSON encode/decode boundary of the service.

use bytes::Bytes;

use crate::graphql;
use crate::json_ext::Object;

/// Encodes and decodes the JSON documents exchanged with clients.
///
/// [`JsonCodec`] is the implementation used in production; the trait exists so that
/// alternative serializers (or failing test doubles) can be plugged into
/// [`GraphQLService`](crate::GraphQLService).
pub trait Codec: Send + Sync + 'static {
    /// Decodes a whole `application/json` request body.
    fn decode_request(&self, body: &[u8]) -> Result<graphql::Request, serde_json::Error>;

    /// Decodes a JSON-encoded variables parameter. The literal `null` decodes to `None`.
    fn decode_variables(&self, variables: &str) -> Result<Option<Object>, serde_json::Error>;

    /// Encodes one GraphQL result.
    fn encode_response(&self, response: &graphql::Response) -> Result<Bytes, serde_json::Error>;
}

/// The `serde_json` codec.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn decode_request(&self, body: &[u8]) -> Result<graphql::Request, serde_json::Error> {
        serde_json::from_slice(body)
    }

    fn decode_variables(&self, variables: &str) -> Result<Option<Object>, serde_json::Error> {
        serde_json::from_str(variables)
    }

    fn encode_response(&self, response: &graphql::Response) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(response).map(Bytes::from)
    }
}
