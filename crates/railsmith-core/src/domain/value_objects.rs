//! Domain value objects: Database, CssFramework, Port.
//!
//! These are pure value types: `Copy`, equality-by-value, no identity. The
//! generation script branches on them once at the top; nothing else in the
//! engine looks at them.

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Database ──────────────────────────────────────────────────────────────────

/// The database backend the application was generated with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Database {
    #[default]
    #[serde(alias = "sqlite3")]
    Sqlite,
    #[serde(alias = "postgres", alias = "pg")]
    Postgresql,
    /// Any other adapter (mysql, trilogy, ...). Gets the generic steps only.
    Other,
}

impl Database {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgresql => "postgresql",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for Database {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Database {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(DomainError::InvalidConfiguration(
                "database name cannot be empty".into(),
            )),
            "sqlite" | "sqlite3" => Ok(Self::Sqlite),
            "postgresql" | "postgres" | "pg" => Ok(Self::Postgresql),
            _ => Ok(Self::Other),
        }
    }
}

// ── CssFramework ──────────────────────────────────────────────────────────────

/// The CSS framework the application was generated with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CssFramework {
    #[default]
    Tailwind,
    Other,
}

impl CssFramework {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Tailwind => "tailwind",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for CssFramework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CssFramework {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" => Err(DomainError::InvalidConfiguration(
                "css framework cannot be empty".into(),
            )),
            "tailwind" | "tailwindcss" => Ok(Self::Tailwind),
            _ => Ok(Self::Other),
        }
    }
}

// ── Port ──────────────────────────────────────────────────────────────────────

/// TCP port the development server listens on.
///
/// Invariant: never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Port(u16);

impl Port {
    pub const DEFAULT: Port = Port(3000);

    pub fn new(value: u16) -> Result<Self, DomainError> {
        if value == 0 {
            return Err(DomainError::InvalidConfiguration(
                "port must be a positive integer".into(),
            ));
        }
        Ok(Self(value))
    }

    /// Interpret operator input from the port prompt.
    ///
    /// Blank input, non-numeric input, zero, and values above 65535 all fall
    /// back to [`Port::DEFAULT`].
    pub fn from_input(input: &str) -> Self {
        input
            .trim()
            .parse::<u16>()
            .ok()
            .and_then(|value| Self::new(value).ok())
            .unwrap_or(Self::DEFAULT)
    }

    pub const fn get(&self) -> u16 {
        self.0
    }
}

impl Default for Port {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u16> for Port {
    type Error = DomainError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
