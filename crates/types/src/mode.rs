//! POSIX permission modes
//!
//! Modes compare with exact bitwise equality. A check that expects
//! `0755` must not accept `0775` or `0777`.

use std::fmt;
use std::str::FromStr;

use imgcheck_errors::ConfigError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Permission bits of a file, masked to the low 12 bits
/// (setuid/setgid/sticky plus rwx for owner, group, other).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileMode(u32);

impl FileMode {
    /// Mask covering the permission bits carried by a mode.
    pub const PERMISSION_MASK: u32 = 0o7777;

    /// Build a mode from raw `st_mode` bits, discarding the file type.
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Self(raw & Self::PERMISSION_MASK)
    }

    /// The permission bits as an integer.
    #[must_use]
    pub fn bits(self) -> u32 {
        self.0
    }
}

impl fmt::Display for FileMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04o}", self.0)
    }
}

impl FromStr for FileMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0o").unwrap_or(s);
        if digits.is_empty() || digits.len() > 4 {
            return Err(ConfigError::InvalidMode {
                value: s.to_string(),
            });
        }
        u32::from_str_radix(digits, 8)
            .map(Self::from_raw)
            .map_err(|_| ConfigError::InvalidMode {
                value: s.to_string(),
            })
    }
}

impl Serialize for FileMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for FileMode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_octal_strings() {
        assert_eq!("0755".parse::<FileMode>().unwrap().bits(), 0o755);
        assert_eq!("755".parse::<FileMode>().unwrap().bits(), 0o755);
        assert_eq!("0o644".parse::<FileMode>().unwrap().bits(), 0o644);
        assert_eq!("4755".parse::<FileMode>().unwrap().bits(), 0o4755);
    }

    #[test]
    fn rejects_invalid_strings() {
        for bad in ["", "abc", "0788", "07550", "rwxr-xr-x"] {
            assert!(bad.parse::<FileMode>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn display_is_four_digit_octal() {
        assert_eq!(FileMode::from_raw(0o755).to_string(), "0755");
        assert_eq!(FileMode::from_raw(0o20).to_string(), "0020");
    }

    #[test]
    fn from_raw_discards_file_type_bits() {
        // st_mode for a regular file with 0755
        assert_eq!(FileMode::from_raw(0o100_755).bits(), 0o755);
    }

    #[test]
    fn exact_equality_only() {
        let expected = FileMode::from_raw(0o755);
        for other in [0o750, 0o775, 0o777] {
            assert_ne!(expected, FileMode::from_raw(other));
        }
        assert_eq!(expected, FileMode::from_raw(0o755));
    }

    #[test]
    fn serde_round_trip() {
        let mode = FileMode::from_raw(0o755);
        let json = serde_json::to_string(&mode).unwrap();
        assert_eq!(json, "\"0755\"");
        let back: FileMode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, mode);
    }
}
