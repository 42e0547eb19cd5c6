//! Types related to GraphQL requests, responses, etc.

mod request;
mod response;
mod variables;

pub use request::Request;
pub use response::Error;
pub use response::Location;
pub use response::Response;
pub use variables::decode_variables;
