use crate::codec::Codec;
use crate::error::RequestError;
use crate::json_ext::Object;

/// Decodes the `variables` parameter of a parameter-encoded request.
///
/// An absent parameter stays absent (`Ok(None)`), and so does the JSON literal `null`.
/// Anything that is not a JSON object is a [`RequestError::MalformedVariables`]
/// carrying the offending string. Values are left as opaque JSON.
pub fn decode_variables(
    codec: &dyn Codec,
    variables: Option<&str>,
) -> Result<Option<Object>, RequestError> {
    let Some(variables) = variables else {
        return Ok(None);
    };
    codec
        .decode_variables(variables)
        .map_err(|err| RequestError::MalformedVariables {
            variables: variables.to_string(),
            reason: err.to_string(),
        })
}
