//! Tri-state mode flag used by `single` and `consume`

use serde::{Deserialize, Serialize};

/// Value of a mode that can be off, on, or on for a single song
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OffOnOneshot {
    Off,
    On,
    Oneshot,
    #[default]
    Unknown,
}

impl OffOnOneshot {
    /// Parse "0", "1" or "oneshot"; anything else is `Unknown`
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "0" => OffOnOneshot::Off,
            "1" => OffOnOneshot::On,
            "oneshot" => OffOnOneshot::Oneshot,
            _ => OffOnOneshot::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OffOnOneshot::Off => "0",
            OffOnOneshot::On => "1",
            OffOnOneshot::Oneshot => "oneshot",
            OffOnOneshot::Unknown => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("0", OffOnOneshot::Off)]
    #[case("1", OffOnOneshot::On)]
    #[case("oneshot", OffOnOneshot::Oneshot)]
    #[case("ONESHOT", OffOnOneshot::Oneshot)]
    #[case("2", OffOnOneshot::Unknown)]
    #[case("", OffOnOneshot::Unknown)]
    fn test_parse(#[case] raw: &str, #[case] expected: OffOnOneshot) {
        assert_eq!(OffOnOneshot::parse(raw), expected);
    }
}
