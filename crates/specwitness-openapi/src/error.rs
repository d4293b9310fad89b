use thiserror::Error;

pub type OpenApiResult<T> = Result<T, OpenApiError>;

#[derive(Debug, Error)]
pub enum OpenApiError {
    #[error("invalid contract url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("malformed fragment: {0}")]
    MalformedFragment(String),

    #[error("unsupported lint selector '{0}' (expected the '$..field' form)")]
    UnsupportedSelector(String),

    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
}
