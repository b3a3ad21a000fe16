pub mod catalog;
pub mod config;
pub mod generators;
pub mod types;
