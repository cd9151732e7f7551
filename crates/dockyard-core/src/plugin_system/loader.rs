use std::ffi::{CStr, CString, OsString, c_void};
use std::fmt;
use std::os::raw::c_char;
use std::panic;
use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use log::{debug, warn};

use crate::kernel::constants;
use crate::plugin_system::error::PluginSystemError;
use crate::plugin_system::ffi::{FfiResult, PLUGIN_INIT_SYMBOL, PluginInitFn, PluginVTable};
use crate::plugin_system::traits::{Plugin, PluginError};
use crate::plugin_system::version::check_api_compatibility;
use crate::storage::config::ConfigNode;
use crate::utils;

/// Constructor for a statically linked plugin.
pub type PluginFactory = fn() -> Box<dyn Plugin>;

/// Default per-user plugin directory (`~/.ignition/gui/plugins`).
pub fn default_home_plugin_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join(constants::HOME_CONFIG_DIR)
            .join(constants::HOME_PLUGINS_DIR)
    })
}

/// Directories searched for plugin libraries.
///
/// Resolution order is: explicitly added paths (in insertion order), then the
/// entries of the environment variable, then the home-directory default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchPaths {
    explicit: Vec<PathBuf>,
    env_var: String,
    home_default: Option<PathBuf>,
}

impl Default for SearchPaths {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchPaths {
    pub fn new() -> Self {
        Self {
            explicit: Vec::new(),
            env_var: constants::DEFAULT_PLUGIN_PATH_ENV.to_string(),
            home_default: default_home_plugin_dir(),
        }
    }

    /// Overrides (or removes) the home-directory default.
    pub fn with_home_default(mut self, dir: Option<PathBuf>) -> Self {
        self.home_default = dir;
        self
    }

    pub fn add_path<P: AsRef<Path>>(&mut self, dir: P) {
        let dir = dir.as_ref().to_path_buf();
        if !self.explicit.contains(&dir) {
            self.explicit.push(dir);
        }
    }

    pub fn set_env_var(&mut self, name: impl Into<String>) {
        self.env_var = name.into();
    }

    pub fn env_var(&self) -> &str {
        &self.env_var
    }

    pub fn explicit(&self) -> &[PathBuf] {
        &self.explicit
    }

    pub fn home_default(&self) -> Option<&Path> {
        self.home_default.as_deref()
    }

    /// Directories in resolution order, reading the environment variable now.
    pub fn directories(&self) -> Vec<PathBuf> {
        let env_value = if self.env_var.is_empty() {
            None
        } else {
            std::env::var_os(&self.env_var)
        };
        self.directories_with(env_value)
    }

    /// Directories in resolution order for a given environment value.
    pub fn directories_with(&self, env_value: Option<OsString>) -> Vec<PathBuf> {
        let mut dirs = self.explicit.clone();
        if let Some(value) = env_value {
            dirs.extend(
                std::env::split_paths(&value).filter(|p| !p.as_os_str().is_empty()),
            );
        }
        if let Some(home) = &self.home_default {
            dirs.push(home.clone());
        }
        utils::dedup_paths(dirs)
    }
}

/// Where a plugin name resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PluginLocation {
    Builtin(String),
    Library(PathBuf),
}

impl fmt::Display for PluginLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PluginLocation::Builtin(name) => write!(f, "builtin:{}", name),
            PluginLocation::Library(path) => write!(f, "{}", path.display()),
        }
    }
}

/// One entry of [`PluginLoader::list_plugins`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginListing {
    pub name: String,
    pub location: PluginLocation,
}

/// Resolves plugin names and instantiates plugins.
///
/// Builtin factories are matched by exact name before any filesystem lookup.
#[derive(Clone, Default)]
pub struct PluginLoader {
    search_paths: SearchPaths,
    builtins: Vec<(String, PluginFactory)>,
}

impl PluginLoader {
    pub fn new(search_paths: SearchPaths) -> Self {
        Self {
            search_paths,
            builtins: Vec::new(),
        }
    }

    pub fn search_paths(&self) -> &SearchPaths {
        &self.search_paths
    }

    pub fn search_paths_mut(&mut self) -> &mut SearchPaths {
        &mut self.search_paths
    }

    /// Registers a statically linked plugin; a later registration with the same name wins.
    pub fn register_builtin(&mut self, name: impl Into<String>, factory: PluginFactory) {
        let name = name.into();
        self.builtins.retain(|(existing, _)| *existing != name);
        self.builtins.push((name, factory));
    }

    pub fn builtin_names(&self) -> Vec<&str> {
        self.builtins.iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Finds the plugin named `filename`.
    pub fn resolve(&self, filename: &str) -> Result<PluginLocation, PluginSystemError> {
        if self.builtins.iter().any(|(name, _)| name == filename) {
            return Ok(PluginLocation::Builtin(filename.to_string()));
        }

        if utils::looks_like_path(filename) {
            let path = Path::new(filename);
            if path.is_file() {
                return Ok(PluginLocation::Library(path.to_path_buf()));
            }
        }

        let dirs = self.search_paths.directories();
        let candidates = utils::library_candidates(filename);
        for dir in &dirs {
            for candidate in &candidates {
                let path = dir.join(candidate);
                if path.is_file() {
                    debug!("Resolved plugin '{}' to {}", filename, path.display());
                    return Ok(PluginLocation::Library(path));
                }
            }
        }

        Err(PluginSystemError::NotFound {
            filename: filename.to_string(),
            searched: dirs,
        })
    }

    /// Creates a plugin instance from a resolved location.
    pub fn instantiate(&self, location: &PluginLocation) -> Result<Box<dyn Plugin>, PluginSystemError> {
        match location {
            PluginLocation::Builtin(name) => self
                .builtins
                .iter()
                .find(|(builtin, _)| builtin == name)
                .map(|(_, factory)| factory())
                .ok_or_else(|| PluginSystemError::NotFound {
                    filename: name.clone(),
                    searched: Vec::new(),
                }),
            PluginLocation::Library(path) => load_library_plugin(path),
        }
    }

    /// Resolve then instantiate.
    pub fn load(&self, filename: &str) -> Result<(PluginLocation, Box<dyn Plugin>), PluginSystemError> {
        let location = self.resolve(filename)?;
        let plugin = self.instantiate(&location)?;
        Ok((location, plugin))
    }

    /// Builtins followed by the shared libraries on the search paths, in resolution order.
    pub fn list_plugins(&self) -> Vec<PluginListing> {
        let mut listings: Vec<PluginListing> = self
            .builtins
            .iter()
            .map(|(name, _)| PluginListing {
                name: name.clone(),
                location: PluginLocation::Builtin(name.clone()),
            })
            .collect();

        for dir in self.search_paths.directories() {
            match utils::find_libraries(&dir) {
                Ok(libraries) => listings.extend(libraries.into_iter().map(|path| PluginListing {
                    name: path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default(),
                    location: PluginLocation::Library(path),
                })),
                Err(e) => warn!("Could not scan plugin directory {}: {}", dir.display(), e),
            }
        }
        listings
    }
}

// Loads a shared library and wraps the vtable returned by its init symbol.
fn load_library_plugin(lib_path: &Path) -> Result<Box<dyn Plugin>, PluginSystemError> {
    let plugin_id = lib_path.to_string_lossy().into_owned();
    let library = unsafe { Library::new(lib_path) }
        .map_err(|e| PluginSystemError::loading(plugin_id.clone(), Some(lib_path.to_path_buf()), e))?;

    let init_symbol: Symbol<PluginInitFn> = unsafe { library.get(PLUGIN_INIT_SYMBOL) }
        .map_err(|e| PluginSystemError::loading(plugin_id.clone(), Some(lib_path.to_path_buf()), e))?;
    let init_fn: PluginInitFn = *init_symbol;

    let vtable_ptr = match panic::catch_unwind(|| unsafe { init_fn() }) {
        Ok(ptr) if !ptr.is_null() => ptr,
        Ok(_) => {
            return Err(PluginSystemError::loading(
                plugin_id,
                Some(lib_path.to_path_buf()),
                "plugin init returned a null vtable".to_string(),
            ));
        }
        Err(panic_obj) => {
            return Err(PluginSystemError::FfiError {
                plugin_id,
                operation: "init".to_string(),
                message: format!("panic: {}", panic_message(panic_obj.as_ref())),
            });
        }
    };

    let wrapper = unsafe { VTablePluginWrapper::new(vtable_ptr, Some(library), plugin_id)? };
    Ok(Box::new(wrapper))
}

fn panic_message(panic_obj: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_obj.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic_obj.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic reason".to_string()
    }
}

/// Safely converts an FFI C string pointer to a Rust String.
/// # Safety
/// `ptr` must be null or point to a null-terminated string that stays valid
/// for the duration of the call.
unsafe fn ffi_string_from_ptr(ptr: *const c_char) -> Result<String, FfiResult> {
    if ptr.is_null() {
        return Err(FfiResult::NullPointer);
    }
    unsafe { CStr::from_ptr(ptr) }
        .to_str()
        .map(str::to_owned)
        .map_err(|_| FfiResult::Utf8Error)
}

/// [`Plugin`] implemented by calling through a [`PluginVTable`].
pub(crate) struct VTablePluginWrapper {
    vtable: *mut PluginVTable,
    // Dropped after the instance is destroyed.
    library: Option<Library>,
    plugin_id: String,
}

impl VTablePluginWrapper {
    /// # Safety
    /// `vtable_ptr` must come from a Dockyard init function (or
    /// [`build_vtable`](crate::plugin_system::ffi::build_vtable)) and must not
    /// be used by the caller afterwards.
    pub(crate) unsafe fn new(
        vtable_ptr: *mut PluginVTable,
        library: Option<Library>,
        plugin_id: String,
    ) -> Result<Self, PluginSystemError> {
        if vtable_ptr.is_null() {
            return Err(PluginSystemError::loading(
                plugin_id,
                None,
                "received a null vtable pointer".to_string(),
            ));
        }

        let wrapper = Self {
            vtable: vtable_ptr,
            library,
            plugin_id,
        };
        // On error the wrapper drops here, destroying the instance first.
        let api = unsafe { ffi_string_from_ptr((*vtable_ptr).api_version) }.map_err(|e| {
            PluginSystemError::FfiError {
                plugin_id: wrapper.plugin_id.clone(),
                operation: "api_version".to_string(),
                message: format!("{:?}", e),
            }
        })?;
        check_api_compatibility(&wrapper.plugin_id, &api)?;
        Ok(wrapper)
    }

    fn vtable(&self) -> &PluginVTable {
        unsafe { &*self.vtable }
    }
}

impl Plugin for VTablePluginWrapper {
    fn title(&self) -> String {
        let vtable = self.vtable();
        let title_ptr = (vtable.title)(vtable.instance as *const c_void);
        let title = unsafe { ffi_string_from_ptr(title_ptr) };
        (vtable.free_string)(title_ptr);
        title.unwrap_or_else(|e| {
            warn!("Plugin '{}' returned no usable title ({:?})", self.plugin_id, e);
            self.plugin_id.clone()
        })
    }

    fn load(&mut self, config: Option<&ConfigNode>) -> Result<(), PluginError> {
        let xml = config
            .map(|node| node.to_xml_string())
            .transpose()
            .map_err(|e| PluginError::ConfigError(e.to_string()))?
            .map(CString::new)
            .transpose()
            .map_err(|e| PluginError::ConfigError(e.to_string()))?;
        let xml_ptr = xml.as_ref().map_or(std::ptr::null(), |s| s.as_ptr());

        let vtable = self.vtable();
        match (vtable.load)(vtable.instance, xml_ptr) {
            FfiResult::Ok => Ok(()),
            other => Err(PluginError::Ffi(format!("load returned {:?}", other))),
        }
    }
}

impl Drop for VTablePluginWrapper {
    fn drop(&mut self) {
        if !self.vtable.is_null() {
            let destroy = self.vtable().destroy;
            destroy(self.vtable);
            self.vtable = std::ptr::null_mut();
        }
        drop(self.library.take());
    }
}
