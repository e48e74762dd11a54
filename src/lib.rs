pub mod config;
pub mod deploy;
pub mod env;
pub mod pipeline;
pub mod template;
pub mod upload;
