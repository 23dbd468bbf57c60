// file: src/utils/mod.rs
// description: shared utilities (logging setup)

pub mod logging;

pub use logging::init_logger;
