//! Persisted panel settings and change notification to the live panel.
//!
//! Settings live in `settings.toml` under the config directory. Stored values
//! are merged over the defaults; missing, unknown or malformed values fall back
//! to the default rather than failing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::{AppError, Result};
use crate::event::Event;

/// Arrangement of the two panes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Layout {
    /// Files to the right of the folder tree.
    Vertical,
    /// Files below the folder tree.
    #[default]
    Horizontal,
}

impl Layout {
    pub fn as_str(self) -> &'static str {
        match self {
            Layout::Vertical => "vertical",
            Layout::Horizontal => "horizontal",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "vertical" => Some(Layout::Vertical),
            "horizontal" => Some(Layout::Horizontal),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Layout::Vertical => "Vertical (files on the right)",
            Layout::Horizontal => "Horizontal (files below)",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Layout::Vertical => Layout::Horizontal,
            Layout::Horizontal => Layout::Vertical,
        }
    }
}

/// How names wider than their row are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameDisplay {
    /// Cut with an ellipsis.
    #[default]
    Truncate,
    /// Continue on the following lines.
    Wrap,
}

impl NameDisplay {
    pub fn as_str(self) -> &'static str {
        match self {
            NameDisplay::Truncate => "truncate",
            NameDisplay::Wrap => "wrap",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "truncate" => Some(NameDisplay::Truncate),
            "wrap" => Some(NameDisplay::Wrap),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NameDisplay::Truncate => "Truncate with ...",
            NameDisplay::Wrap => "Wrap onto next line",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            NameDisplay::Truncate => NameDisplay::Wrap,
            NameDisplay::Wrap => NameDisplay::Truncate,
        }
    }
}

/// Effective panel settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PanelSettings {
    pub layout: Layout,
    pub name_display: NameDisplay,
}

/// A single setting that changed, delivered to the subscribed panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsChange {
    Layout(Layout),
    NameDisplay(NameDisplay),
}

/// On-disk shape. Values stay raw strings so unknown ones can default.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SettingsFile {
    layout: Option<String>,
    name_display: Option<String>,
}

impl SettingsFile {
    fn resolve(&self) -> PanelSettings {
        let defaults = PanelSettings::default();
        PanelSettings {
            layout: self
                .layout
                .as_deref()
                .and_then(Layout::parse)
                .unwrap_or(defaults.layout),
            name_display: self
                .name_display
                .as_deref()
                .and_then(NameDisplay::parse)
                .unwrap_or(defaults.name_display),
        }
    }
}

impl From<&PanelSettings> for SettingsFile {
    fn from(settings: &PanelSettings) -> Self {
        Self {
            layout: Some(settings.layout.as_str().to_string()),
            name_display: Some(settings.name_display.as_str().to_string()),
        }
    }
}

/// Default location: `<config dir>/vault-panes/settings.toml`.
pub fn default_settings_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("vault-panes").join("settings.toml"))
}

/// Loads, saves and broadcasts panel settings.
pub struct SettingsStore {
    path: Option<PathBuf>,
    settings: PanelSettings,
    subscriber: Option<mpsc::UnboundedSender<Event>>,
}

impl SettingsStore {
    /// Load settings from `path`. Without a path, settings are kept in memory only.
    pub fn load(path: Option<PathBuf>) -> Self {
        let settings = path
            .as_deref()
            .map(read_settings)
            .unwrap_or_default();
        tracing::debug!(
            layout = settings.layout.as_str(),
            name_display = settings.name_display.as_str(),
            "settings loaded"
        );
        Self {
            path,
            settings,
            subscriber: None,
        }
    }

    pub fn settings(&self) -> PanelSettings {
        self.settings
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Register the live panel for change notifications. Replaces any previous one.
    pub fn subscribe(&mut self, tx: mpsc::UnboundedSender<Event>) {
        tracing::debug!(replaced = self.has_subscriber(), "settings subscriber registered");
        self.subscriber = Some(tx);
    }

    pub fn unsubscribe(&mut self) {
        self.subscriber = None;
    }

    pub fn has_subscriber(&self) -> bool {
        self.subscriber.is_some()
    }

    pub fn set_layout(&mut self, layout: Layout) -> Result<()> {
        if self.settings.layout == layout {
            return Ok(());
        }
        let next = PanelSettings {
            layout,
            ..self.settings
        };
        self.commit(next, SettingsChange::Layout(layout))
    }

    pub fn set_name_display(&mut self, name_display: NameDisplay) -> Result<()> {
        if self.settings.name_display == name_display {
            return Ok(());
        }
        let next = PanelSettings {
            name_display,
            ..self.settings
        };
        self.commit(next, SettingsChange::NameDisplay(name_display))
    }

    /// Persist `next` and only then adopt and broadcast it. A failed write
    /// leaves the current settings in place.
    fn commit(&mut self, next: PanelSettings, change: SettingsChange) -> Result<()> {
        self.save(&next)?;
        self.settings = next;
        self.notify(change);
        Ok(())
    }

    fn notify(&mut self, change: SettingsChange) {
        if let Some(tx) = &self.subscriber {
            if tx.send(Event::Settings(change)).is_err() {
                self.subscriber = None;
            }
        }
    }

    /// Write `settings`, creating the parent directory if needed.
    fn save(&self, settings: &PanelSettings) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let content = toml::to_string(&SettingsFile::from(settings))
            .map_err(|e| AppError::Settings(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        tracing::debug!(path = %path.display(), "settings saved");
        Ok(())
    }
}

fn read_settings(path: &Path) -> PanelSettings {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return PanelSettings::default(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read settings");
            return PanelSettings::default();
        }
    };
    match toml::from_str::<SettingsFile>(&content) {
        Ok(file) => file.resolve(),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to parse settings");
            PanelSettings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn no_saved_data_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::load(Some(dir.path().join("settings.toml")));
        assert_eq!(
            store.settings(),
            PanelSettings {
                layout: Layout::Horizontal,
                name_display: NameDisplay::Truncate,
            }
        );
    }

    #[test]
    fn stored_values_win_over_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "layout = \"vertical\"\n").unwrap();
        let store = SettingsStore::load(Some(path));
        assert_eq!(store.settings().layout, Layout::Vertical);
        assert_eq!(store.settings().name_display, NameDisplay::Truncate);
    }

    #[test]
    fn unknown_values_and_keys_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "layout = \"diagonal\"\nname_display = \"wrap\"\nextra = 1\n")
            .unwrap();
        let store = SettingsStore::load(Some(path));
        assert_eq!(store.settings().layout, Layout::Horizontal);
        assert_eq!(store.settings().name_display, NameDisplay::Wrap);
    }

    #[test]
    fn malformed_file_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "this is { not toml").unwrap();
        let store = SettingsStore::load(Some(path));
        assert_eq!(store.settings(), PanelSettings::default());
    }

    #[test]
    fn changes_are_saved_and_reloaded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("settings.toml");
        let mut store = SettingsStore::load(Some(path.clone()));
        store.set_layout(Layout::Vertical).unwrap();
        store.set_name_display(NameDisplay::Wrap).unwrap();

        let reloaded = SettingsStore::load(Some(path));
        assert_eq!(reloaded.settings().layout, Layout::Vertical);
        assert_eq!(reloaded.settings().name_display, NameDisplay::Wrap);
    }

    #[test]
    fn subscriber_receives_changes_until_unsubscribed() {
        let mut store = SettingsStore::load(None);
        let (tx, mut rx) = mpsc::unbounded_channel();
        store.subscribe(tx);
        store.set_layout(Layout::Vertical).unwrap();
        assert!(matches!(
            rx.try_recv(),
            Ok(Event::Settings(SettingsChange::Layout(Layout::Vertical)))
        ));

        // Unchanged value is not broadcast.
        store.set_layout(Layout::Vertical).unwrap();
        assert!(rx.try_recv().is_err());

        store.unsubscribe();
        store.set_name_display(NameDisplay::Wrap).unwrap();
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn failed_save_keeps_previous_value() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be makes every write fail.
        let path = dir.path().join("settings.toml");
        std::fs::create_dir(&path).unwrap();
        let mut store = SettingsStore::load(Some(path));
        let (tx, mut rx) = mpsc::unbounded_channel();
        store.subscribe(tx);

        assert!(store.set_layout(Layout::Vertical).is_err());
        assert!(store.set_name_display(NameDisplay::Wrap).is_err());
        assert_eq!(store.settings(), PanelSettings::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn toggled_cycles_both_values() {
        assert_eq!(Layout::Horizontal.toggled(), Layout::Vertical);
        assert_eq!(Layout::Vertical.toggled(), Layout::Horizontal);
        assert_eq!(NameDisplay::Truncate.toggled(), NameDisplay::Wrap);
    }
}
