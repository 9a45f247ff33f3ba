//! Configuration manager.
//!
//! Holds named configurations in memory, seeded with the standard entries,
//! and loads further entries from JSON or TOML documents.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::bootstrap::BootstrapConfig;
use crate::curve::CurveConfig;
use crate::error::{ConfigError, ConfigResult, Validate};
use crate::surface::SurfaceConfig;

// =============================================================================
// CONFIG FILE
// =============================================================================

/// On-disk layout of a configuration document.
///
/// ```toml
/// [[curves]]
/// name = "EUR.DISC"
/// interpolation = "LogLinearInterpolation"
///
/// [[surfaces]]
/// name = "EQ.VOL"
/// strike_interpolation = "SABRModelInterpolation"
/// sabr = { beta = 0.7 }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Curve configurations.
    #[serde(default)]
    pub curves: Vec<CurveConfig>,
    /// Surface configurations.
    #[serde(default)]
    pub surfaces: Vec<SurfaceConfig>,
    /// Bootstrap configurations.
    #[serde(default)]
    pub bootstraps: Vec<BootstrapConfig>,
}

/// Configuration types held by the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigType {
    /// Curve configuration.
    Curve,
    /// Surface configuration.
    Surface,
    /// Bootstrap configuration.
    Bootstrap,
}

impl ConfigType {
    /// Returns the string identifier for this config type.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curve => "curve",
            Self::Surface => "surface",
            Self::Bootstrap => "bootstrap",
        }
    }
}

/// Entries the manager can store: validatable, named, possibly read-only.
trait Entry: Validate + Clone {
    const TYPE: ConfigType;
    fn name(&self) -> &str;
    fn read_only(&self) -> bool;
}

impl Entry for CurveConfig {
    const TYPE: ConfigType = ConfigType::Curve;
    fn name(&self) -> &str {
        &self.name
    }
    fn read_only(&self) -> bool {
        self.read_only
    }
}

impl Entry for SurfaceConfig {
    const TYPE: ConfigType = ConfigType::Surface;
    fn name(&self) -> &str {
        &self.name
    }
    fn read_only(&self) -> bool {
        self.read_only
    }
}

impl Entry for BootstrapConfig {
    const TYPE: ConfigType = ConfigType::Bootstrap;
    fn name(&self) -> &str {
        &self.name
    }
    fn read_only(&self) -> bool {
        self.read_only
    }
}

fn lock_error(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Conflict(format!("Lock error: {e}"))
}

fn insert<T: Entry>(cache: &RwLock<HashMap<String, T>>, config: T) -> ConfigResult<()> {
    config.validate_or_error()?;

    let mut cache = cache.write().map_err(lock_error)?;
    if cache.get(config.name()).is_some_and(Entry::read_only) {
        return Err(ConfigError::ReadOnly {
            key: config.name().to_string(),
        });
    }

    log::debug!("registered {} configuration '{}'", T::TYPE.as_str(), config.name());
    cache.insert(config.name().to_string(), config);
    Ok(())
}

fn fetch<T: Entry>(cache: &RwLock<HashMap<String, T>>, name: &str) -> ConfigResult<T> {
    let cache = cache.read().map_err(lock_error)?;
    cache.get(name).cloned().ok_or_else(|| ConfigError::NotFound {
        key: format!("{}/{name}", T::TYPE.as_str()),
    })
}

fn names<T: Entry>(cache: &RwLock<HashMap<String, T>>) -> ConfigResult<Vec<String>> {
    let cache = cache.read().map_err(lock_error)?;
    let mut names: Vec<String> = cache.keys().cloned().collect();
    names.sort();
    Ok(names)
}

fn remove<T: Entry>(cache: &RwLock<HashMap<String, T>>, name: &str) -> ConfigResult<bool> {
    let mut cache = cache.write().map_err(lock_error)?;
    if cache.get(name).is_some_and(Entry::read_only) {
        return Err(ConfigError::ReadOnly {
            key: name.to_string(),
        });
    }
    Ok(cache.remove(name).is_some())
}

fn read_file(path: &Path) -> ConfigResult<String> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

// =============================================================================
// CONFIGURATION MANAGER
// =============================================================================

/// Central configuration manager.
///
/// # Example
///
/// ```rust
/// use strata_config::{ConfigManager, CurveConfig};
///
/// let manager = ConfigManager::new();
/// let curve = manager.get_curve("DISCOUNT").unwrap();
/// assert_eq!(curve.interpolation, "LinearRateInterpolation");
///
/// manager
///     .register_curve(CurveConfig::new("MY.CURVE").with_interpolation("LogLinearInterpolation"))
///     .unwrap();
/// assert!(manager.get_curve("MY.CURVE").is_ok());
/// ```
pub struct ConfigManager {
    curves: RwLock<HashMap<String, CurveConfig>>,
    surfaces: RwLock<HashMap<String, SurfaceConfig>>,
    bootstraps: RwLock<HashMap<String, BootstrapConfig>>,
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigManager {
    /// Creates a manager holding the standard configurations.
    pub fn new() -> Self {
        let manager = Self::empty();
        manager.load_standard_configs();
        manager
    }

    /// Creates a manager with no configurations.
    pub fn empty() -> Self {
        Self {
            curves: RwLock::new(HashMap::new()),
            surfaces: RwLock::new(HashMap::new()),
            bootstraps: RwLock::new(HashMap::new()),
        }
    }

    /// Manager with the standard configurations plus a TOML document.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let manager = Self::new();
        manager.load_toml_str(text)?;
        Ok(manager)
    }

    fn load_standard_configs(&self) {
        let _ = self.register_curve(CurveConfig::discount());
        let _ = self.register_curve(CurveConfig::log_linear_discount());
        let _ = self.register_curve(CurveConfig::hermite());

        let _ = self.register_surface(SurfaceConfig::bilinear());
        let _ = self.register_surface(SurfaceConfig::sabr());
        let _ = self.register_surface(SurfaceConfig::wing());

        let _ = self.register_bootstrap(BootstrapConfig::standard());
    }

    // =========================================================================
    // LOADING
    // =========================================================================

    /// Registers every entry of a parsed document.
    ///
    /// Entries are validated before any is registered, so an invalid
    /// document leaves the manager unchanged.
    pub fn load(&self, file: ConfigFile) -> ConfigResult<usize> {
        for curve in &file.curves {
            curve.validate_or_error()?;
        }
        for surface in &file.surfaces {
            surface.validate_or_error()?;
        }
        for bootstrap in &file.bootstraps {
            bootstrap.validate_or_error()?;
        }

        let count = file.curves.len() + file.surfaces.len() + file.bootstraps.len();
        for curve in file.curves {
            self.register_curve(curve)?;
        }
        for surface in file.surfaces {
            self.register_surface(surface)?;
        }
        for bootstrap in file.bootstraps {
            self.register_bootstrap(bootstrap)?;
        }
        Ok(count)
    }

    /// Loads a TOML document from a string.
    pub fn load_toml_str(&self, text: &str) -> ConfigResult<usize> {
        self.load(toml::from_str(text)?)
    }

    /// Loads a JSON document from a string.
    pub fn load_json_str(&self, text: &str) -> ConfigResult<usize> {
        self.load(serde_json::from_str(text)?)
    }

    /// Loads a TOML file.
    pub fn load_toml(&self, path: impl AsRef<Path>) -> ConfigResult<usize> {
        self.load_toml_str(&read_file(path.as_ref())?)
    }

    /// Loads a JSON file.
    pub fn load_json(&self, path: impl AsRef<Path>) -> ConfigResult<usize> {
        self.load_json_str(&read_file(path.as_ref())?)
    }

    /// Snapshot of every registered configuration.
    pub fn export(&self) -> ConfigResult<ConfigFile> {
        let mut file = ConfigFile::default();
        for name in self.list_curves()? {
            file.curves.push(self.get_curve(&name)?);
        }
        for name in self.list_surfaces()? {
            file.surfaces.push(self.get_surface(&name)?);
        }
        for name in self.list_bootstraps()? {
            file.bootstraps.push(self.get_bootstrap(&name)?);
        }
        Ok(file)
    }

    // =========================================================================
    // CURVE CONFIGURATION
    // =========================================================================

    /// Registers a curve configuration.
    pub fn register_curve(&self, config: CurveConfig) -> ConfigResult<()> {
        insert(&self.curves, config)
    }

    /// Gets a curve configuration by name.
    pub fn get_curve(&self, name: &str) -> ConfigResult<CurveConfig> {
        fetch(&self.curves, name)
    }

    /// Lists curve configuration names, sorted.
    pub fn list_curves(&self) -> ConfigResult<Vec<String>> {
        names(&self.curves)
    }

    /// Deletes a curve configuration.
    pub fn delete_curve(&self, name: &str) -> ConfigResult<bool> {
        remove(&self.curves, name)
    }

    // =========================================================================
    // SURFACE CONFIGURATION
    // =========================================================================

    /// Registers a surface configuration.
    pub fn register_surface(&self, config: SurfaceConfig) -> ConfigResult<()> {
        insert(&self.surfaces, config)
    }

    /// Gets a surface configuration by name.
    pub fn get_surface(&self, name: &str) -> ConfigResult<SurfaceConfig> {
        fetch(&self.surfaces, name)
    }

    /// Lists surface configuration names, sorted.
    pub fn list_surfaces(&self) -> ConfigResult<Vec<String>> {
        names(&self.surfaces)
    }

    /// Deletes a surface configuration.
    pub fn delete_surface(&self, name: &str) -> ConfigResult<bool> {
        remove(&self.surfaces, name)
    }

    // =========================================================================
    // BOOTSTRAP CONFIGURATION
    // =========================================================================

    /// Registers a bootstrap configuration.
    pub fn register_bootstrap(&self, config: BootstrapConfig) -> ConfigResult<()> {
        insert(&self.bootstraps, config)
    }

    /// Gets a bootstrap configuration by name.
    pub fn get_bootstrap(&self, name: &str) -> ConfigResult<BootstrapConfig> {
        fetch(&self.bootstraps, name)
    }

    /// Lists bootstrap configuration names, sorted.
    pub fn list_bootstraps(&self) -> ConfigResult<Vec<String>> {
        names(&self.bootstraps)
    }

    /// Deletes a bootstrap configuration.
    pub fn delete_bootstrap(&self, name: &str) -> ConfigResult<bool> {
        remove(&self.bootstraps, name)
    }
}
