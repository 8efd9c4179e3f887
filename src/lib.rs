pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod inspect;
pub mod reader;
pub mod scanner;
pub mod split;
