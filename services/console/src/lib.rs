pub mod adapters;
pub mod config;
pub mod error;
pub mod screens;
pub mod state;

pub use adapters::HttpGateway;
pub use config::Config;
pub use error::ConsoleError;
pub use state::AppState;
