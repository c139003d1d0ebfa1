use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::ExclusionList;
use crate::sys::settings::{SettingsError, SettingsStore};

const MIN_RATIO: f64 = 1.0;

pub fn config_file() -> Option<PathBuf> { dirs::home_dir().map(|home| home.join(".lonely.toml")) }

/// Window classes that ship excluded: calendar/settings/clock style utilities
/// and chat clients that look wrong when stretched.
pub fn default_excluded_classes() -> ExclusionList {
    [
        "org.gnome.Calendar",
        "org.gnome.Settings",
        "org.gnome.clocks",
        "org.telegram.desktop",
        "Slack",
        "threema-web",
        "chrome-avaremotecit.cloud.com__Citrix_StoreWeb_-Default",
    ]
    .into_iter()
    .collect()
}

/// Which already-present windows count toward "is this monitor lonely".
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OccupancyRule {
    /// Only windows maximized along at least one axis. Floating windows the
    /// user arranged by hand do not block auto-tiling.
    #[default]
    Maximized,
    /// Every otherwise eligible window.
    All,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Landscape-normalized width/height ratio above which a monitor is
    /// split into two columns.
    #[serde(default = "default_ultrawide_ratio")]
    pub ultrawide_ratio: f64,
    /// Ratio above which a monitor is split into three columns.
    #[serde(default = "default_extra_ultrawide_ratio")]
    pub extra_ultrawide_ratio: f64,
    #[serde(default)]
    pub occupancy: OccupancyRule,
    /// Window roles treated as transient popups.
    #[serde(default = "default_popup_roles")]
    pub popup_roles: Vec<String>,
    #[serde(default = "default_excluded_classes")]
    pub excluded_classes: ExclusionList,
}

fn default_ultrawide_ratio() -> f64 { 1.9 }
fn default_extra_ultrawide_ratio() -> f64 { 3.2 }
fn default_popup_roles() -> Vec<String> { vec!["pop-up".to_string()] }

impl Default for Settings {
    fn default() -> Self {
        Self {
            ultrawide_ratio: default_ultrawide_ratio(),
            extra_ultrawide_ratio: default_extra_ultrawide_ratio(),
            occupancy: OccupancyRule::default(),
            popup_roles: default_popup_roles(),
            excluded_classes: default_excluded_classes(),
        }
    }
}

impl Settings {
    pub fn is_popup_role(&self, role: Option<&str>) -> bool {
        role.is_some_and(|r| self.popup_roles.iter().any(|p| p == r))
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !(self.ultrawide_ratio > MIN_RATIO) {
            issues.push(format!(
                "ultrawide_ratio must be greater than {MIN_RATIO} (got {})",
                self.ultrawide_ratio
            ));
        }
        if !(self.extra_ultrawide_ratio > self.ultrawide_ratio) {
            issues.push(format!(
                "extra_ultrawide_ratio ({}) must be greater than ultrawide_ratio ({})",
                self.extra_ultrawide_ratio, self.ultrawide_ratio
            ));
        }
        if self.popup_roles.iter().any(|r| r.trim().is_empty()) {
            issues.push("popup_roles must not contain empty entries".to_string());
        }

        issues
    }

    pub fn auto_fix_values(&mut self) -> usize {
        let mut fixes = 0;

        if !(self.ultrawide_ratio > MIN_RATIO) {
            self.ultrawide_ratio = default_ultrawide_ratio();
            fixes += 1;
        }
        if !(self.extra_ultrawide_ratio > self.ultrawide_ratio) {
            self.extra_ultrawide_ratio =
                default_extra_ultrawide_ratio().max(self.ultrawide_ratio + 1.0);
            fixes += 1;
        }
        let before = self.popup_roles.len();
        self.popup_roles.retain(|r| !r.trim().is_empty());
        if self.popup_roles.len() != before {
            fixes += 1;
        }

        fixes
    }
}

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
}

impl Config {
    pub fn read(path: &Path) -> Result<Config, SettingsError> {
        let buf = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&buf)
    }

    /// Like [`Config::read`] but a missing file yields the defaults.
    pub fn read_or_default(path: &Path) -> Result<Config, SettingsError> {
        if path.exists() {
            Self::read(path)
        } else {
            debug!(?path, "settings file missing, using defaults");
            Ok(Config::default())
        }
    }

    pub fn parse(buf: &str) -> Result<Config, SettingsError> { Ok(toml::from_str(buf)?) }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let buf = toml::to_string_pretty(self)?;
        fs::write(path, buf).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Vec<String> { self.settings.validate() }

    pub fn auto_fix_values(&mut self) -> usize { self.settings.auto_fix_values() }
}

/// Settings backed by the TOML file on disk. Every read goes to the file so
/// edits made by other processes are picked up on the next change
/// notification.
#[derive(Debug, Clone)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self { Self { path: path.into() } }

    pub fn at_default_location() -> Result<Self, SettingsError> {
        config_file().map(Self::new).ok_or(SettingsError::NoLocation)
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn load(&self) -> Result<Config, SettingsError> { Config::read_or_default(&self.path) }

    /// Applies `edit` to the stored exclusion list and writes the file back
    /// if the edit reports a change.
    pub fn edit_exclusions<T, E>(
        &self,
        edit: impl FnOnce(&mut ExclusionList) -> Result<(T, bool), E>,
    ) -> anyhow::Result<T>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut config = self.load()?;
        let (value, changed) = edit(&mut config.settings.excluded_classes)?;
        if changed {
            config.save(&self.path)?;
            debug!(path = ?self.path, "exclusion list saved");
        }
        Ok(value)
    }
}

impl SettingsStore for FileSettings {
    fn exclusion_list(&self) -> Result<ExclusionList, SettingsError> {
        Ok(self.load()?.settings.excluded_classes)
    }
}
