use crate::kernel::constants;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::ffi::API_VERSION_CSTR;
use crate::plugin_system::version::check_api_compatibility;

#[test]
fn test_exported_api_version_matches_host() {
    assert_eq!(API_VERSION_CSTR.to_str().unwrap(), constants::API_VERSION);
}

#[test]
fn test_same_and_patch_versions_are_compatible() {
    assert!(check_api_compatibility("p", constants::API_VERSION).is_ok());
    assert!(check_api_compatibility("p", "0.1.7").is_ok());
}

#[test]
fn test_minor_bump_is_incompatible_before_1_0() {
    let err = check_api_compatibility("p", "0.2.0").unwrap_err();
    assert!(matches!(err, PluginSystemError::IncompatibleApi { ref plugin_api, .. } if plugin_api == "0.2.0"));
}

#[test]
fn test_garbage_version_is_a_loading_error() {
    let err = check_api_compatibility("p", "not-a-version").unwrap_err();
    assert!(matches!(err, PluginSystemError::LoadingError { .. }));
}
