use thiserror::Error;

pub type SvgXmlResult<T> = Result<T, SvgXmlError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SvgXmlError {
    #[error("Malformed SVG markup: {reason}")]
    MalformedMarkup { reason: String },

    #[error("Self-closing <svg/> root is not supported. Enable 'allowSelfClosing' to accept it")]
    UnsupportedSelfClosing,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(String),
}

impl SvgXmlError {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        SvgXmlError::MalformedMarkup {
            reason: reason.into(),
        }
    }
}

impl From<serde_yaml::Error> for SvgXmlError {
    fn from(err: serde_yaml::Error) -> Self {
        SvgXmlError::InvalidConfig(err.to_string())
    }
}

impl From<std::io::Error> for SvgXmlError {
    fn from(err: std::io::Error) -> Self {
        SvgXmlError::Io(err.to_string())
    }
}
