pub mod registry_tests;
pub mod version_tests;
