//! Configuration of a scrollbar emulation.
//!
//! [`Options`] are given once at initialization. Individual entries can be
//! read or replaced later through [`ScrollEmulator::option`] and
//! [`ScrollEmulator::set_option`], using an [`OptionKey`].
//!
//! [`Settings`] hold the tunable numbers and can be loaded from toml:
//!
//! ```toml
//! # Delay, in milliseconds, before the handle hides again.
//! flash_delay = 1000
//!
//! # Free space, in pixels, at each end of the track.
//! handle_margin = 2.0
//! ```
//!
//! [`ScrollEmulator::option`]: crate::ScrollEmulator::option
//! [`ScrollEmulator::set_option`]: crate::ScrollEmulator::set_option

use std::time::Duration;

use crate::event::Callback;
use crate::flash::DEFAULT_FLASH_DELAY;
use crate::geometry::{is_valid_margin, HANDLE_MARGIN};
use crate::with::With;
use crate::Error;

/// Tunable numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settings {
    /// Delay between the last activity and hiding the handle.
    pub flash_delay: Duration,
    /// Free space at each end of the track, in pixels.
    pub handle_margin: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            flash_delay: DEFAULT_FLASH_DELAY,
            handle_margin: HANDLE_MARGIN,
        }
    }
}

#[cfg(feature = "toml")]
impl Settings {
    fn load(&mut self, table: &toml::Table) {
        for (key, value) in table {
            match (key.as_str(), value) {
                ("flash_delay", &toml::Value::Integer(ms)) if ms >= 0 => {
                    self.flash_delay = Duration::from_millis(ms as u64);
                }
                ("handle_margin", &toml::Value::Float(margin)) if is_valid_margin(margin) => {
                    self.handle_margin = margin;
                }
                ("handle_margin", &toml::Value::Integer(margin)) if margin >= 0 => {
                    self.handle_margin = margin as f64;
                }
                _ => log::warn!("Ignoring setting `{}` = {}", key, value),
            }
        }
    }

    /// Loads settings from a toml string.
    ///
    /// Missing fields keep their default value.
    pub fn load_toml(content: &str) -> Result<Self, Error> {
        let table: toml::Table = toml::from_str(content)?;

        let mut settings = Settings::default();
        settings.load(&table);

        Ok(settings)
    }

    /// Loads settings from a toml file.
    pub fn load_toml_file<P: AsRef<std::path::Path>>(filename: P) -> Result<Self, Error> {
        let content = std::fs::read_to_string(filename)?;
        Self::load_toml(&content)
    }
}

/// Configuration given to [`ScrollEmulator::initialize`].
///
/// Unset callbacks are no-ops.
///
/// [`ScrollEmulator::initialize`]: crate::ScrollEmulator::initialize
#[derive(Clone, Debug, Default)]
pub struct Options {
    /// Called once after setup, with the host element.
    pub on_init: Option<Callback>,
    /// Called once during teardown, with the host element.
    pub on_destroy: Option<Callback>,
    /// Tunable numbers.
    pub settings: Settings,
}

impl Options {
    /// Creates default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the callback run after setup.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn on_init<F>(self, f: F) -> Self
    where
        F: 'static + Fn(crate::platform::ElementId),
    {
        self.with(|s| s.on_init = Some(Callback::from_fn(f)))
    }

    /// Sets the callback run during teardown.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn on_destroy<F>(self, f: F) -> Self
    where
        F: 'static + Fn(crate::platform::ElementId),
    {
        self.with(|s| s.on_destroy = Some(Callback::from_fn(f)))
    }

    /// Sets the tunable numbers.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn settings(self, settings: Settings) -> Self {
        self.with(|s| s.settings = settings)
    }

    /// Returns the value of an option.
    ///
    /// Unset callbacks are returned as no-op callbacks.
    pub fn get(&self, key: OptionKey) -> OptionValue {
        match key {
            OptionKey::OnInit => {
                OptionValue::Callback(self.on_init.clone().unwrap_or_else(Callback::dummy))
            }
            OptionKey::OnDestroy => {
                OptionValue::Callback(self.on_destroy.clone().unwrap_or_else(Callback::dummy))
            }
            OptionKey::FlashDelay => OptionValue::Duration(self.settings.flash_delay),
            OptionKey::HandleMargin => OptionValue::Number(self.settings.handle_margin),
        }
    }

    /// Replaces the value of an option.
    pub fn set(&mut self, key: OptionKey, value: OptionValue) -> Result<(), Error> {
        match (key, value) {
            (OptionKey::OnInit, OptionValue::Callback(cb)) => self.on_init = Some(cb),
            (OptionKey::OnDestroy, OptionValue::Callback(cb)) => self.on_destroy = Some(cb),
            (OptionKey::FlashDelay, OptionValue::Duration(delay)) => {
                self.settings.flash_delay = delay;
            }
            (OptionKey::HandleMargin, OptionValue::Number(margin)) if is_valid_margin(margin) => {
                self.settings.handle_margin = margin;
            }
            (key, _) => {
                return Err(Error::OptionType {
                    key: key.name().to_string(),
                    expected: key.expected(),
                })
            }
        }
        Ok(())
    }
}

/// Names an entry of [`Options`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OptionKey {
    /// `onInit`
    OnInit,
    /// `onDestroy`
    OnDestroy,
    /// `flashDelay`
    FlashDelay,
    /// `handleMargin`
    HandleMargin,
}

impl OptionKey {
    /// Canonical name of this key.
    pub fn name(self) -> &'static str {
        match self {
            OptionKey::OnInit => "onInit",
            OptionKey::OnDestroy => "onDestroy",
            OptionKey::FlashDelay => "flashDelay",
            OptionKey::HandleMargin => "handleMargin",
        }
    }

    fn expected(self) -> &'static str {
        match self {
            OptionKey::OnInit | OptionKey::OnDestroy => "callback",
            OptionKey::FlashDelay => "duration",
            OptionKey::HandleMargin => "non-negative number",
        }
    }
}

impl std::str::FromStr for OptionKey {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "onInit" | "on_init" => OptionKey::OnInit,
            "onDestroy" | "on_destroy" => OptionKey::OnDestroy,
            "flashDelay" | "flash_delay" => OptionKey::FlashDelay,
            "handleMargin" | "handle_margin" => OptionKey::HandleMargin,
            _ => return Err(Error::NoSuchOption(s.to_string())),
        })
    }
}

/// Value of an option.
#[derive(Clone, Debug)]
pub enum OptionValue {
    /// A lifecycle hook.
    Callback(Callback),
    /// A delay.
    Duration(Duration),
    /// A length, in pixels.
    Number(f64),
}

impl OptionValue {
    /// Returns the callback, if this is one.
    pub fn as_callback(&self) -> Option<&Callback> {
        match self {
            OptionValue::Callback(cb) => Some(cb),
            _ => None,
        }
    }

    /// Returns the duration, if this is one.
    pub fn as_duration(&self) -> Option<Duration> {
        match *self {
            OptionValue::Duration(d) => Some(d),
            _ => None,
        }
    }

    /// Returns the number, if this is one.
    pub fn as_number(&self) -> Option<f64> {
        match *self {
            OptionValue::Number(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Callback> for OptionValue {
    fn from(cb: Callback) -> Self {
        OptionValue::Callback(cb)
    }
}

impl From<Duration> for OptionValue {
    fn from(d: Duration) -> Self {
        OptionValue::Duration(d)
    }
}

impl From<f64> for OptionValue {
    fn from(n: f64) -> Self {
        OptionValue::Number(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ElementId;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn parse_keys() {
        assert_eq!("onInit".parse::<OptionKey>().unwrap(), OptionKey::OnInit);
        assert_eq!("on_destroy".parse::<OptionKey>().unwrap(), OptionKey::OnDestroy);
        assert_eq!("flashDelay".parse::<OptionKey>().unwrap(), OptionKey::FlashDelay);

        match "colour".parse::<OptionKey>() {
            Err(Error::NoSuchOption(key)) => assert_eq!(key, "colour"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn unset_callbacks_are_noops() {
        let options = Options::new();
        let value = options.get(OptionKey::OnInit);
        let cb = value.as_callback().unwrap();
        cb(ElementId(0));
    }

    #[test]
    fn set_and_get() {
        let calls = Rc::new(Cell::new(0));
        let mut options = {
            let calls = Rc::clone(&calls);
            Options::new().on_destroy(move |_| calls.set(calls.get() + 1))
        };

        options.get(OptionKey::OnDestroy).as_callback().unwrap()(ElementId(1));
        assert_eq!(calls.get(), 1);

        options
            .set(OptionKey::FlashDelay, Duration::from_millis(50).into())
            .unwrap();
        assert_eq!(
            options.get(OptionKey::FlashDelay).as_duration(),
            Some(Duration::from_millis(50))
        );

        match options.set(OptionKey::HandleMargin, Duration::from_millis(1).into()) {
            Err(Error::OptionType { key, expected }) => {
                assert_eq!(key, "handleMargin");
                assert_eq!(expected, "non-negative number");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn invalid_margins_are_rejected() {
        let mut options = Options::new();

        for &margin in &[-50.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                options.set(OptionKey::HandleMargin, margin.into()),
                Err(Error::OptionType { .. })
            ));
        }
        assert_eq!(options.settings.handle_margin, HANDLE_MARGIN);

        options.set(OptionKey::HandleMargin, 0.0.into()).unwrap();
        assert_eq!(options.get(OptionKey::HandleMargin).as_number(), Some(0.0));
    }

    #[cfg(feature = "toml")]
    #[test]
    fn load_toml() {
        let settings = Settings::load_toml("flash_delay = 250\nhandle_margin = 3\n").unwrap();
        assert_eq!(settings.flash_delay, Duration::from_millis(250));
        assert_eq!(settings.handle_margin, 3.0);

        let settings = Settings::load_toml("unknown = true").unwrap();
        assert_eq!(settings, Settings::default());

        let settings = Settings::load_toml("handle_margin = -3").unwrap();
        assert_eq!(settings.handle_margin, HANDLE_MARGIN);

        let settings = Settings::load_toml("handle_margin = nan").unwrap();
        assert_eq!(settings.handle_margin, HANDLE_MARGIN);

        assert!(matches!(
            Settings::load_toml("flash_delay = "),
            Err(Error::Parse(_))
        ));
    }
}
