use serde::Deserialize;
use serde::Serialize;

use crate::json_ext::Object;

/// A normalized GraphQL request, whichever HTTP encoding it arrived in.
///
/// A `Request` is created for one HTTP call and consumed when the execution input is
/// built from it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct Request {
    /// The GraphQL operation (e.g., query, mutation) string.
    ///
    /// For historical purposes, the term "query" is commonly used to refer to
    /// *any* GraphQL operation which might be, e.g., a `mutation`.
    pub query: String,

    /// The (optional) GraphQL operation name.
    ///
    /// When specified, this name must match the name of an operation in the
    /// GraphQL document. When excluded, there must exist only a single
    /// operation in the GraphQL document.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub operation_name: Option<String>,

    /// The (optional) GraphQL variables in the form of a JSON object.
    ///
    /// Absent variables are kept distinct from an empty object here; the empty
    /// object is only substituted when the execution input is built.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub variables: Option<Object>,
}

#[buildstructor::buildstructor]
impl Request {
    /// This is the constructor (or builder) to use when constructing a GraphQL `Request`.
    #[builder(visibility = "pub")]
    fn new(query: String, operation_name: Option<String>, variables: Option<Object>) -> Self {
        Self {
            query,
            operation_name,
            variables,
        }
    }

    /// Returns the variables, or an empty object if none were sent.
    pub fn variables_or_default(&self) -> Object {
        self.variables.clone().unwrap_or_default()
    }
}
