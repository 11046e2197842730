pub mod config;
pub mod logging;

pub mod client;
pub mod error;
pub mod filename;
pub mod storage;
pub mod upload;
