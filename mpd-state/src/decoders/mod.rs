//! Attribute decoders
//!
//! Turn `Attrs` reply records into snapshot types. Decoding never fails:
//! unknown keys are skipped and malformed numbers leave the field at zero.

mod playlist;
mod status;

/// Integer value, zero when malformed
pub(crate) fn int<T: std::str::FromStr + Default>(value: &str) -> T {
    value.trim().parse().unwrap_or_default()
}

/// Leading integer of an `N` or `N/M` value (track and disc numbers)
pub(crate) fn leading_int(value: &str) -> u32 {
    int(value.split('/').next().unwrap_or(value))
}

/// Finite float value, zero when malformed
pub(crate) fn float(value: &str) -> f32 {
    value
        .trim()
        .parse::<f32>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

/// "1" is on, anything else off
pub(crate) fn flag(value: &str) -> bool {
    value.trim() == "1"
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("42", 42)]
    #[case(" 7 ", 7)]
    #[case("", 0)]
    #[case("forty", 0)]
    #[case("-3", 0)]
    fn test_unsigned_int(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(int::<u32>(raw), expected);
    }

    #[rstest]
    #[case("3/12", 3)]
    #[case("5", 5)]
    #[case("/12", 0)]
    fn test_leading_int(#[case] raw: &str, #[case] expected: u32) {
        assert_eq!(leading_int(raw), expected);
    }

    #[rstest]
    #[case("12.5", 12.5)]
    #[case("NaN", 0.0)]
    #[case("inf", 0.0)]
    #[case("x", 0.0)]
    fn test_float(#[case] raw: &str, #[case] expected: f32) {
        assert_eq!(float(raw), expected);
    }
}
