pub mod config_tests;
pub mod settings_tests;
