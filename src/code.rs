//! GNSS observation codes (RINEX 3.04 identities).

/// Closed set of observation codes. The two character RINEX
/// string ("1C", "2W", "5X", ..) is the protocol interchange form:
/// MSM signal tables and code priority tables are keyed on it.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub enum ObsCode {
    /// Unknown or absent observation code
    #[default]
    Unknown,
    // L1 band
    L1C,
    L1P,
    L1W,
    L1Y,
    L1M,
    L1N,
    L1S,
    L1L,
    L1E,
    L1A,
    L1B,
    L1X,
    L1Z,
    // L2 band
    L2C,
    L2D,
    L2S,
    L2L,
    L2X,
    L2P,
    L2W,
    L2Y,
    L2M,
    L2N,
    // L5/E5a/B2a band
    L5I,
    L5Q,
    L5X,
    // E5b/B2b band
    L7I,
    L7Q,
    L7X,
    // E6/L6/B3 band
    L6A,
    L6B,
    L6C,
    L6X,
    L6Z,
    L6S,
    L6L,
    // E5a+b/B2a+b band
    L8I,
    L8Q,
    L8X,
    // BeiDou B1-2
    L2I,
    L2Q,
    L6I,
    L6Q,
    // Glonass G3
    L3I,
    L3Q,
    L3X,
    // BeiDou B1 (obsolete)
    L1I,
    L1Q,
    // IRNSS L5/S
    L5A,
    L5B,
    L5C,
    L9A,
    L9B,
    L9C,
    L9X,
    // modernized BeiDou / QZSS
    L1D,
    L5D,
    L5P,
    L5Z,
    L6E,
    L7D,
    L7P,
    L7Z,
    L8D,
    L8P,
    // Glonass G1a
    L4A,
    L4B,
    L4X,
}

impl ObsCode {
    /// Returns the RINEX style two character string,
    /// empty when [ObsCode::Unknown].
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "",
            Self::L1C => "1C",
            Self::L1P => "1P",
            Self::L1W => "1W",
            Self::L1Y => "1Y",
            Self::L1M => "1M",
            Self::L1N => "1N",
            Self::L1S => "1S",
            Self::L1L => "1L",
            Self::L1E => "1E",
            Self::L1A => "1A",
            Self::L1B => "1B",
            Self::L1X => "1X",
            Self::L1Z => "1Z",
            Self::L2C => "2C",
            Self::L2D => "2D",
            Self::L2S => "2S",
            Self::L2L => "2L",
            Self::L2X => "2X",
            Self::L2P => "2P",
            Self::L2W => "2W",
            Self::L2Y => "2Y",
            Self::L2M => "2M",
            Self::L2N => "2N",
            Self::L5I => "5I",
            Self::L5Q => "5Q",
            Self::L5X => "5X",
            Self::L7I => "7I",
            Self::L7Q => "7Q",
            Self::L7X => "7X",
            Self::L6A => "6A",
            Self::L6B => "6B",
            Self::L6C => "6C",
            Self::L6X => "6X",
            Self::L6Z => "6Z",
            Self::L6S => "6S",
            Self::L6L => "6L",
            Self::L8I => "8I",
            Self::L8Q => "8Q",
            Self::L8X => "8X",
            Self::L2I => "2I",
            Self::L2Q => "2Q",
            Self::L6I => "6I",
            Self::L6Q => "6Q",
            Self::L3I => "3I",
            Self::L3Q => "3Q",
            Self::L3X => "3X",
            Self::L1I => "1I",
            Self::L1Q => "1Q",
            Self::L5A => "5A",
            Self::L5B => "5B",
            Self::L5C => "5C",
            Self::L9A => "9A",
            Self::L9B => "9B",
            Self::L9C => "9C",
            Self::L9X => "9X",
            Self::L1D => "1D",
            Self::L5D => "5D",
            Self::L5P => "5P",
            Self::L5Z => "5Z",
            Self::L6E => "6E",
            Self::L7D => "7D",
            Self::L7P => "7P",
            Self::L7Z => "7Z",
            Self::L8D => "8D",
            Self::L8P => "8P",
            Self::L4A => "4A",
            Self::L4B => "4B",
            Self::L4X => "4X",
        }
    }

    /// Band character: first character of the RINEX string,
    /// NUL for [ObsCode::Unknown].
    pub(crate) fn band_char(&self) -> char {
        self.as_str().chars().next().unwrap_or('\0')
    }

    /// Attribute character: second character of the RINEX string,
    /// NUL for [ObsCode::Unknown].
    pub(crate) fn attr_char(&self) -> char {
        self.as_str().chars().nth(1).unwrap_or('\0')
    }
}

impl std::fmt::Display for ObsCode {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl From<&str> for ObsCode {
    fn from(s: &str) -> Self {
        match s {
            "1C" => Self::L1C,
            "1P" => Self::L1P,
            "1W" => Self::L1W,
            "1Y" => Self::L1Y,
            "1M" => Self::L1M,
            "1N" => Self::L1N,
            "1S" => Self::L1S,
            "1L" => Self::L1L,
            "1E" => Self::L1E,
            "1A" => Self::L1A,
            "1B" => Self::L1B,
            "1X" => Self::L1X,
            "1Z" => Self::L1Z,
            "2C" => Self::L2C,
            "2D" => Self::L2D,
            "2S" => Self::L2S,
            "2L" => Self::L2L,
            "2X" => Self::L2X,
            "2P" => Self::L2P,
            "2W" => Self::L2W,
            "2Y" => Self::L2Y,
            "2M" => Self::L2M,
            "2N" => Self::L2N,
            "5I" => Self::L5I,
            "5Q" => Self::L5Q,
            "5X" => Self::L5X,
            "7I" => Self::L7I,
            "7Q" => Self::L7Q,
            "7X" => Self::L7X,
            "6A" => Self::L6A,
            "6B" => Self::L6B,
            "6C" => Self::L6C,
            "6X" => Self::L6X,
            "6Z" => Self::L6Z,
            "6S" => Self::L6S,
            "6L" => Self::L6L,
            "8I" => Self::L8I,
            "8Q" => Self::L8Q,
            "8X" => Self::L8X,
            "2I" => Self::L2I,
            "2Q" => Self::L2Q,
            "6I" => Self::L6I,
            "6Q" => Self::L6Q,
            "3I" => Self::L3I,
            "3Q" => Self::L3Q,
            "3X" => Self::L3X,
            "1I" => Self::L1I,
            "1Q" => Self::L1Q,
            "5A" => Self::L5A,
            "5B" => Self::L5B,
            "5C" => Self::L5C,
            "9A" => Self::L9A,
            "9B" => Self::L9B,
            "9C" => Self::L9C,
            "9X" => Self::L9X,
            "1D" => Self::L1D,
            "5D" => Self::L5D,
            "5P" => Self::L5P,
            "5Z" => Self::L5Z,
            "6E" => Self::L6E,
            "7D" => Self::L7D,
            "7P" => Self::L7P,
            "7Z" => Self::L7Z,
            "8D" => Self::L8D,
            "8P" => Self::L8P,
            "4A" => Self::L4A,
            "4B" => Self::L4B,
            "4X" => Self::L4X,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
mod test {
    use super::ObsCode;

    #[test]
    fn string_mirror() {
        for code in [
            ObsCode::L1C,
            ObsCode::L2W,
            ObsCode::L5X,
            ObsCode::L7I,
            ObsCode::L8I,
            ObsCode::L9X,
            ObsCode::L4X,
        ] {
            assert_eq!(ObsCode::from(code.as_str()), code);
        }
    }

    #[test]
    fn unknown_codes() {
        assert_eq!(ObsCode::from(""), ObsCode::Unknown);
        assert_eq!(ObsCode::from("0Z"), ObsCode::Unknown);
        assert_eq!(ObsCode::Unknown.as_str(), "");
        assert_eq!(ObsCode::default(), ObsCode::Unknown);
    }

    #[test]
    fn characters() {
        assert_eq!(ObsCode::L7I.band_char(), '7');
        assert_eq!(ObsCode::L7I.attr_char(), 'I');
        assert_eq!(ObsCode::Unknown.band_char(), '\0');
    }
}
