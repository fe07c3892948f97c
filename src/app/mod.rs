//! Application-wide UI state: loading flag, theme and locale.
//!
//! Theme and locale survive restarts through an injected [`KeyValueStore`].

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

pub mod store;

pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

use crate::error::Result;

const THEME_KEY: &str = "theme";
const LOCALE_KEY: &str = "locale";

/// Application theme options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("Unknown theme: {}", other)),
        }
    }
}

/// Supported UI languages
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "ko" => Ok(Locale::Ko),
            "en" => Ok(Locale::En),
            other => Err(format!("Unknown locale: {}", other)),
        }
    }
}

/// Shared UI state owned by the application root
pub struct AppState {
    is_loading: bool,
    theme: Theme,
    locale: Locale,
    store: Box<dyn KeyValueStore>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("is_loading", &self.is_loading)
            .field("theme", &self.theme)
            .field("locale", &self.locale)
            .finish()
    }
}

impl AppState {
    pub fn new(store: Box<dyn KeyValueStore>) -> Self {
        Self::with_defaults(store, Theme::default(), Locale::default())
    }

    /// Start from the given theme and locale until [`initialize`] restores
    /// stored values.
    ///
    /// [`initialize`]: AppState::initialize
    pub fn with_defaults(store: Box<dyn KeyValueStore>, theme: Theme, locale: Locale) -> Self {
        Self {
            is_loading: false,
            theme,
            locale,
            store,
        }
    }

    /// Restore theme and locale from the store; unknown values are ignored
    pub fn initialize(&mut self) {
        if let Some(saved) = self.store.get(THEME_KEY) {
            match saved.parse() {
                Ok(theme) => self.theme = theme,
                Err(e) => warn!(error = %e, "ignoring stored theme"),
            }
        }
        if let Some(saved) = self.store.get(LOCALE_KEY) {
            match saved.parse() {
                Ok(locale) => self.locale = locale,
                Err(e) => warn!(error = %e, "ignoring stored locale"),
            }
        }
        debug!(theme = self.theme.as_str(), locale = self.locale.as_str(), "app state initialized");
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.is_loading = loading;
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn is_dark_mode(&self) -> bool {
        self.theme == Theme::Dark
    }

    pub fn toggle_theme(&mut self) -> Result<Theme> {
        self.set_theme(self.theme.toggled())?;
        Ok(self.theme)
    }

    pub fn set_theme(&mut self, theme: Theme) -> Result<()> {
        self.theme = theme;
        self.store.set(THEME_KEY, theme.as_str())
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn set_locale(&mut self, locale: Locale) -> Result<()> {
        self.locale = locale;
        self.store.set(LOCALE_KEY, locale.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = AppState::new(Box::new(MemoryStore::new()));
        assert!(!state.is_loading());
        assert_eq!(state.theme(), Theme::Light);
        assert_eq!(state.locale(), Locale::Ko);
        assert!(!state.is_dark_mode());
    }

    #[test]
    fn test_toggle_theme_persists() {
        let mut state = AppState::new(Box::new(MemoryStore::new()));
        assert_eq!(state.toggle_theme().unwrap(), Theme::Dark);
        assert!(state.is_dark_mode());
        assert_eq!(state.store.get(THEME_KEY).as_deref(), Some("dark"));

        assert_eq!(state.toggle_theme().unwrap(), Theme::Light);
    }

    #[test]
    fn test_initialize_restores_and_ignores_unknown() {
        let mut store = MemoryStore::new();
        store.set(THEME_KEY, "dark").unwrap();
        store.set(LOCALE_KEY, "fr").unwrap();

        let mut state = AppState::new(Box::new(store));
        state.initialize();

        assert_eq!(state.theme(), Theme::Dark);
        assert_eq!(state.locale(), Locale::Ko);
    }

    #[test]
    fn test_loading_flag() {
        let mut state = AppState::new(Box::new(MemoryStore::new()));
        state.set_loading(true);
        assert!(state.is_loading());
        state.set_locale(Locale::En).unwrap();
        assert_eq!(state.locale(), Locale::En);
    }
}
