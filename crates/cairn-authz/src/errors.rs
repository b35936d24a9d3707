use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("unknown permission key: {0}")]
    UnknownPermission(String),
    #[error("unknown feature key: {0}")]
    UnknownFeature(String),
    #[error("invalid support mode: {0}")]
    InvalidMode(String),
}

pub type AuthzResult<T> = Result<T, AuthzError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_variants() {
        let errors = vec![
            AuthzError::UnknownPermission("canFly".to_string()),
            AuthzError::UnknownFeature("teleport".to_string()),
            AuthzError::InvalidMode("admin".to_string()),
        ];

        for error in errors {
            let rendered = error.to_string();
            assert!(!rendered.is_empty());
        }
    }
}
