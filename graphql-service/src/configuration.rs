use displaydoc::Display;
use schemars::JsonSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Configuration error.
#[derive(Debug, Error, Display)]
#[non_exhaustive]
pub enum ConfigurationError {
    /// could not deserialize configuration: {0}
    DeserializeConfigError(serde_yaml::Error),
    /// invalid 'path' {path}: it must start with '/'
    InvalidPath { path: String },
    /// 'max_request_length' must be greater than zero
    InvalidMaxRequestLength,
    /// an engine is required to build the GraphQL service
    MissingEngine,
}

/// The configuration of a [`GraphQLService`](crate::GraphQLService).
///
/// Can be created through `serde::Deserialize` from various formats,
/// or from YAML with [`Configuration::from_yaml`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct Configuration {
    /// The path the GraphQL endpoint is served on. Defaults to `/graphql`.
    #[serde(default = "default_graphql_path")]
    pub path: String,

    /// Largest accepted request body, in bytes. Defaults to 10 MiB.
    #[serde(default = "default_max_request_length")]
    pub max_request_length: usize,
}

fn default_graphql_path() -> String {
    String::from("/graphql")
}

fn default_max_request_length() -> usize {
    10 * 1024 * 1024
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            path: default_graphql_path(),
            max_request_length: default_max_request_length(),
        }
    }
}

#[buildstructor::buildstructor]
impl Configuration {
    #[builder]
    pub fn new(path: Option<String>, max_request_length: Option<usize>) -> Self {
        Self {
            path: path.unwrap_or_else(default_graphql_path),
            max_request_length: max_request_length.unwrap_or_else(default_max_request_length),
        }
    }

    /// Parses and validates a YAML document. An empty document yields the defaults.
    pub fn from_yaml(raw_yaml: &str) -> Result<Self, ConfigurationError> {
        if raw_yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let configuration: Configuration =
            serde_yaml::from_str(raw_yaml).map_err(ConfigurationError::DeserializeConfigError)?;
        configuration.validate()
    }

    pub fn validate(self) -> Result<Self, ConfigurationError> {
        if !self.path.starts_with('/') {
            return Err(ConfigurationError::InvalidPath { path: self.path });
        }
        if self.max_request_length == 0 {
            return Err(ConfigurationError::InvalidMaxRequestLength);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let configuration = Configuration::from_yaml("").unwrap();
        assert_eq!(configuration, Configuration::default());
        assert_eq!(configuration.path, "/graphql");
        assert_eq!(configuration.max_request_length, 10 * 1024 * 1024);
    }

    #[test]
    fn reads_yaml() {
        let configuration = Configuration::from_yaml(
            r#"
path: /api/graphql
max_request_length: 1024
"#,
        )
        .unwrap();
        assert_eq!(
            configuration,
            Configuration::builder()
                .path("/api/graphql")
                .max_request_length(1024)
                .build()
        );
    }

    #[test]
    fn partial_documents_keep_other_defaults() {
        let configuration = Configuration::from_yaml("max_request_length: 2048").unwrap();
        assert_eq!(configuration.path, "/graphql");
        assert_eq!(configuration.max_request_length, 2048);
    }

    #[test]
    fn rejects_unknown_fields() {
        let err = Configuration::from_yaml("listen: 127.0.0.1:4000").unwrap_err();
        assert!(matches!(err, ConfigurationError::DeserializeConfigError(_)));
    }

    #[test]
    fn rejects_invalid_values() {
        let err = Configuration::from_yaml("path: graphql").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid 'path' graphql: it must start with '/'"
        );

        let err = Configuration::from_yaml("max_request_length: 0").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidMaxRequestLength));
    }
}
