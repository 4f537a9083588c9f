//! Tipos compartilhados do decor.

pub mod args;
pub mod config;
pub mod errors;

pub use args::{ArgValue, CallArgs};
