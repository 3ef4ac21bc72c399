pub mod assets;
pub mod config;
pub mod domain;
pub mod execution;
pub mod logging;
pub mod wallet;
