//! Fixed locations of the optional config layers

use crate::config::defaults::{APP_NAME, CONFIG_FILE_NAME};
use crate::system::System;
use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where a config layer comes from, lowest precedence first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// Shipped next to the executable
    Bundled,
    /// Machine-wide policy under `/etc`
    Shared,
    /// The user's own config
    Home,
    /// Project-local config in the working directory
    Workdir,
}

impl ConfigLayer {
    /// Every layer, in the order it is applied
    pub const ORDER: [Self; 4] = [Self::Bundled, Self::Shared, Self::Home, Self::Workdir];

    /// Short name used in log and error messages
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bundled => "bundled",
            Self::Shared => "shared",
            Self::Home => "home",
            Self::Workdir => "workdir",
        }
    }
}

/// The four config file locations, computed once at startup
///
/// A location that cannot be determined (no home directory, unknown install
/// directory) is `None` and behaves exactly like a missing file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysPaths {
    pub bundled: Option<PathBuf>,
    pub shared: Option<PathBuf>,
    pub home: Option<PathBuf>,
    pub workdir: Option<PathBuf>,
}

impl SysPaths {
    /// Compute the config locations from the install directory, home directory and working directory
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be determined
    #[inline]
    pub fn discover(system: &dyn System) -> Result<Self> {
        let bundled = match system.exe_dir() {
            Ok(dir) => Some(dir.join("defaults").join(CONFIG_FILE_NAME)),
            Err(err) => {
                debug!("Install directory unknown, skipping bundled config: {err}");
                None
            }
        };

        let home = system.home_dir().map(|dir| {
            dir.join(".config")
                .join(APP_NAME)
                .join(CONFIG_FILE_NAME)
        });

        let workdir = system
            .current_dir()
            .context("Failed to determine the current working directory")?
            .join(format!(".{APP_NAME}.config.{CONFIG_FILE_NAME}"));

        Ok(Self {
            bundled,
            shared: Some(
                Path::new("/etc")
                    .join(APP_NAME)
                    .join(CONFIG_FILE_NAME),
            ),
            home,
            workdir: Some(workdir),
        })
    }

    /// Path for one layer, if known
    #[must_use]
    #[inline]
    pub fn get(&self, layer: ConfigLayer) -> Option<&Path> {
        match layer {
            ConfigLayer::Bundled => self.bundled.as_deref(),
            ConfigLayer::Shared => self.shared.as_deref(),
            ConfigLayer::Home => self.home.as_deref(),
            ConfigLayer::Workdir => self.workdir.as_deref(),
        }
    }

    /// Every known location, lowest precedence first
    #[inline]
    pub fn ordered(&self) -> impl Iterator<Item = (ConfigLayer, &Path)> {
        ConfigLayer::ORDER
            .into_iter()
            .filter_map(|layer| self.get(layer).map(|path| (layer, path)))
    }
}
