pub mod config;
pub mod error;
pub mod exit;
pub mod http;
pub mod token;

pub use config::Config;
pub use error::RuntimeError;
pub use exit::ExitStatus;
pub use token::{ConfigTokenProvider, TokenProvider};
