use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("configuration error: {0}")]
    Config(#[from] technique_protocol::ConfigError),
}
