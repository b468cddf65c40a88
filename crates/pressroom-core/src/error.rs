use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("expected a number, got {0}")]
    NotANumber(String),

    #[error("invalid setting {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },
}
