//! Theme modes and the colours derived from them.
//!
//! The live UI owns a [`ThemeService`]. Exports bracket rendering with a
//! [`ThemeOverride`] so output always uses the light palette, then hand the
//! resulting [`Palette`] down the draw calls explicitly.

use std::cell::Cell;

use serde::{Deserialize, Serialize};

use crate::style::Color;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for ThemeMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            other => Err(crate::Error::Config(format!("unknown theme mode '{}'", other))),
        }
    }
}

/// Resolved colours used while drawing pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub page: Color,
    pub text: Color,
    pub header: Color,
    pub on_header: Color,
    pub banding: Color,
    pub divider: Color,
    pub border: Color,
    pub label: Color,
}

impl Palette {
    pub fn for_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                page: Color::WHITE,
                text: Color::BLACK,
                header: Color::rgb(0.169, 0.357, 0.518),
                on_header: Color::WHITE,
                banding: Color::rgb(0.922, 0.937, 0.961),
                divider: Color::rgb(0.78, 0.78, 0.78),
                border: Color::rgb(0.45, 0.45, 0.45),
                label: Color::rgb(0.35, 0.35, 0.35),
            },
            ThemeMode::Dark => Self {
                page: Color::rgb(0.125, 0.125, 0.125),
                text: Color::rgb(0.867, 0.867, 0.867),
                header: Color::rgb(0.227, 0.416, 0.58),
                on_header: Color::rgb(0.95, 0.95, 0.95),
                banding: Color::rgb(0.18, 0.18, 0.2),
                divider: Color::rgb(0.3, 0.3, 0.3),
                border: Color::rgb(0.55, 0.55, 0.55),
                label: Color::rgb(0.7, 0.7, 0.7),
            },
        }
    }
}

/// The application's theme state.
///
/// Methods take `&self`: the service is shared with the live UI and is
/// expected to use interior mutability.
pub trait ThemeService {
    fn mode(&self) -> ThemeMode;

    fn set_mode(&self, mode: ThemeMode);

    /// Recompute colours that depend on the current mode.
    fn rebuild_dynamic_colors(&self);

    /// Colours as of the last rebuild.
    fn palette(&self) -> Palette;
}

/// A single-threaded theme service.
#[derive(Debug)]
pub struct LiveTheme {
    mode: Cell<ThemeMode>,
    palette: Cell<Palette>,
}

impl LiveTheme {
    pub fn new(mode: ThemeMode) -> Self {
        Self {
            mode: Cell::new(mode),
            palette: Cell::new(Palette::for_mode(mode)),
        }
    }
}

impl Default for LiveTheme {
    fn default() -> Self {
        Self::new(ThemeMode::Light)
    }
}

impl ThemeService for LiveTheme {
    fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    fn set_mode(&self, mode: ThemeMode) {
        self.mode.set(mode);
    }

    fn rebuild_dynamic_colors(&self) {
        self.palette.set(Palette::for_mode(self.mode.get()));
    }

    fn palette(&self) -> Palette {
        self.palette.get()
    }
}

/// Forces the light theme for as long as it lives.
///
/// The previous mode is restored when the guard drops, which covers early
/// returns through `?` as well as unwinding.
pub struct ThemeOverride<'t> {
    service: &'t dyn ThemeService,
    saved: ThemeMode,
}

impl<'t> ThemeOverride<'t> {
    pub fn light(service: &'t dyn ThemeService) -> Self {
        let saved = service.mode();
        service.set_mode(ThemeMode::Light);
        service.rebuild_dynamic_colors();
        log::debug!("theme forced to light for export (was {:?})", saved);
        Self { service, saved }
    }

    /// The palette in effect while the override holds.
    pub fn palette(&self) -> Palette {
        self.service.palette()
    }
}

impl Drop for ThemeOverride<'_> {
    fn drop(&mut self) {
        self.service.set_mode(self.saved);
        self.service.rebuild_dynamic_colors();
    }
}
