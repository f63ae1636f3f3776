
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MsrswdbError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Unknown element kind '{tag}'")]
    UnknownElementKind { tag: String },
    #[error("Unknown attribute '{attribute}' on {tag}")]
    UnknownAttribute { tag: &'static str, attribute: String },
    #[error("No child slot for '{child}' under {parent}")]
    UnknownChildSlot { parent: &'static str, child: &'static str },
    #[error("Cannot coerce '{value}' to {target}: {message}")]
    ScalarCoercion { value: String, target: &'static str, message: String },
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
}

pub type Result<T> = std::result::Result<T, MsrswdbError>;

// Helper conversions
impl From<rusqlite::Error> for MsrswdbError {
    fn from(e: rusqlite::Error) -> Self { Self::Persistence(e.to_string()) }
}

impl From<roxmltree::Error> for MsrswdbError {
    fn from(e: roxmltree::Error) -> Self { Self::Parse(e.to_string()) }
}
