use semver::{Version, VersionReq};

use crate::kernel::constants;
use crate::plugin_system::error::{PluginSystemError, PluginSystemErrorSource};

/// Requirement a plugin's API version must satisfy (`^API_VERSION`).
pub fn host_requirement() -> Result<VersionReq, semver::Error> {
    VersionReq::parse(&format!("^{}", constants::API_VERSION))
}

/// Checks a plugin-reported API version string against the host.
pub fn check_api_compatibility(plugin_id: &str, plugin_api: &str) -> Result<(), PluginSystemError> {
    let requirement = host_requirement()
        .map_err(|e| PluginSystemError::loading(plugin_id, None, PluginSystemErrorSource::from(e)))?;
    let version = Version::parse(plugin_api.trim())
        .map_err(|e| PluginSystemError::loading(plugin_id, None, PluginSystemErrorSource::from(e)))?;

    if requirement.matches(&version) {
        Ok(())
    } else {
        Err(PluginSystemError::IncompatibleApi {
            plugin_id: plugin_id.to_string(),
            plugin_api: version.to_string(),
            host_api: constants::API_VERSION.to_string(),
        })
    }
}
