pub mod cli;
pub mod collate;
pub mod config;
pub mod http;
pub mod log;
