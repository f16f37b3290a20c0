#[macro_use]
mod log_macros;

pub mod error;
pub mod lifecycle;
pub mod scheduler;
pub mod tracing_init;
