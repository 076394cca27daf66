pub mod config;
pub mod error;
pub mod handler;
pub mod paths;
pub mod protocol;
pub mod request;
pub mod server;

#[cfg(test)]
mod tests;
