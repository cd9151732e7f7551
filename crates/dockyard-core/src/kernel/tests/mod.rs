pub mod logging_tests;
pub mod signal_tests;
