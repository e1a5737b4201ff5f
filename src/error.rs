//! Errors returned by the scrollbar emulation.

use std::fmt;
use std::io;

/// Possible error returned by a [`ScrollEmulator`](crate::ScrollEmulator)
/// or when loading [`Settings`](crate::options::Settings).
#[derive(Debug)]
pub enum Error {
    /// No operation with this name exists.
    NoSuchMethod(String),
    /// No option with this key exists.
    NoSuchOption(String),
    /// The value given for an option has the wrong kind.
    OptionType {
        /// The option key.
        key: String,
        /// Kind of value the option accepts.
        expected: &'static str,
    },
    /// The instance was already destroyed.
    Destroyed,
    /// The host element has no content element to scroll.
    MissingContent,
    /// An error occured when reading a settings file.
    Io(io::Error),
    /// An error occured when parsing the toml content.
    #[cfg(feature = "toml")]
    Parse(toml::de::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::NoSuchMethod(name) => {
                write!(f, "Method {} does not exist on TrackpadScrollEmulator", name)
            }
            Error::NoSuchOption(key) => write!(f, "Unknown option `{}`", key),
            Error::OptionType { key, expected } => {
                write!(f, "Option `{}` expects a {}", key, expected)
            }
            Error::Destroyed => write!(f, "The scrollbar emulation was destroyed"),
            Error::MissingContent => write!(f, "Could not find the content element"),
            Error::Io(err) => write!(f, "Could not read settings: {}", err),
            #[cfg(feature = "toml")]
            Error::Parse(err) => write!(f, "Could not parse settings: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            #[cfg(feature = "toml")]
            Error::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Parse(err)
    }
}
