pub mod config;
pub mod logging;

pub mod executor;
pub mod request;
pub mod retry;
pub mod sim;
