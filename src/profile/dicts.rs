// ssprs-profile/src/profile/dicts.rs

//! Closed enumerations for cast descriptors and per-sample markers.
//!
//! Each enum has a stable numeric code (the value stored in binary formats)
//! and a lowercase name. Reverse lookups fail with [`DictError`] on unknown
//! values.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum DictError {
    #[error("Unknown {0} code: {1}")]
    UnknownCode(&'static str, u8),
    #[error("Unknown {0} name: {1}")]
    UnknownName(&'static str, String),
}

macro_rules! dict_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$vmeta:meta])* $variant:ident = ($code:expr, $label:expr)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "lowercase")]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn code(&self) -> u8 {
                match self {
                    $($name::$variant => $code),+
                }
            }

            pub fn name(&self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }
        }

        impl TryFrom<u8> for $name {
            type Error = DictError;

            fn try_from(code: u8) -> Result<Self, Self::Error> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.code() == code)
                    .ok_or(DictError::UnknownCode(stringify!($name), code))
            }
        }

        impl FromStr for $name {
            type Err = DictError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|value| value.name() == wanted)
                    .ok_or_else(|| DictError::UnknownName(stringify!($name), s.to_string()))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.name())
            }
        }
    };
}

dict_enum! {
    /// Instrument family that acquired the cast.
    SensorType {
        Unknown = (0, "unknown"),
        Future = (1, "future"),
        Synthetic = (2, "synthetic"),
        Ctd = (3, "ctd"),
        Xbt = (4, "xbt"),
        Xsv = (5, "xsv"),
        Svp = (6, "svp"),
        Mvp = (7, "mvp"),
        Castaway = (8, "castaway"),
        Digibar = (9, "digibar"),
    }
}

dict_enum! {
    ProbeType {
        Unknown = (0, "unknown"),
        Future = (1, "future"),
        T5 = (2, "t5"),
        T7 = (3, "t7"),
        T10 = (4, "t10"),
        T11 = (5, "t11"),
        DeepBlue = (6, "deepblue"),
        FastDeep = (7, "fastdeep"),
        Svp = (8, "svp"),
        Ctd = (9, "ctd"),
        Xsv1 = (10, "xsv1"),
        Xsv2 = (11, "xsv2"),
        Xsv5 = (12, "xsv5"),
        Castaway = (13, "castaway"),
    }
}

dict_enum! {
    /// Provenance of a single sample.
    Source {
        Raw = (0, "raw"),
        User = (1, "user"),
        Woa09 = (2, "woa09"),
        Woa13 = (3, "woa13"),
        Rtofs = (4, "rtofs"),
        Ref = (5, "ref"),
        Sis = (6, "sis"),
        Extension = (7, "extension"),
    }
}

dict_enum! {
    /// Whether a sample takes part in the output.
    Flag {
        Valid = (0, "valid"),
        /// Acquired while the instrument moved in the discarded direction.
        Direction = (1, "direction"),
        /// Invalidated by the user.
        User = (2, "user"),
        Filtered = (3, "filtered"),
        /// Kept by thinning; only meaningful on `sis` samples.
        Thin = (4, "thin"),
    }
}

dict_enum! {
    /// Cast direction retained by direction reduction.
    Direction {
        Up = (0, "up"),
        Down = (1, "down"),
    }
}

impl Default for SensorType {
    fn default() -> Self {
        SensorType::Unknown
    }
}

impl Default for ProbeType {
    fn default() -> Self {
        ProbeType::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip() {
        for flag in Flag::ALL {
            assert_eq!(Flag::try_from(flag.code()), Ok(*flag));
        }
        for source in Source::ALL {
            assert_eq!(source.name().parse::<Source>(), Ok(*source));
        }
    }

    #[test]
    fn test_unknown_values_fail() {
        assert_eq!(
            Flag::try_from(42),
            Err(DictError::UnknownCode("Flag", 42))
        );
        assert_eq!(
            "sideways".parse::<Direction>(),
            Err(DictError::UnknownName("Direction", "sideways".to_string()))
        );
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        assert_eq!("DeepBlue".parse::<ProbeType>(), Ok(ProbeType::DeepBlue));
        assert_eq!(" Down ".parse::<Direction>(), Ok(Direction::Down));
        assert_eq!(SensorType::Xbt.to_string(), "xbt");
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<u8> = SensorType::ALL.iter().map(|v| v.code()).collect();
        codes.dedup();
        assert_eq!(codes.len(), SensorType::ALL.len());
    }
}
