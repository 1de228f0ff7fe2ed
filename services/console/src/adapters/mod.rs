pub mod rest;

pub use rest::HttpGateway;
