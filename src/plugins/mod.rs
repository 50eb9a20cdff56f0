pub mod log_sinks;
pub mod replay;
