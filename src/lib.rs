pub mod actuators;
pub mod config;
pub mod logging;
pub mod service;

#[cfg(feature = "infer")]
pub mod infer;

#[cfg(feature = "infer")]
pub mod prompts;
