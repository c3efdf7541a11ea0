pub mod config;
pub mod engine;
pub mod import;
pub mod install;
pub mod interrupt;
pub mod package;
pub mod runtime;
pub mod session;
pub mod shell;
pub mod validate;
