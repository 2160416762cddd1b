//! Command tag lookup

use std::fmt;

/// Handler selected by the first field of an inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Joystick,
    ColorPicker,
    ButtonArray,
    Slider,
    /// Echo request, answered with `sms,<value>`
    Cms,
    /// Handshake or out-of-band host command
    Serial,
    Unknown,
}

/// Wire spelling of every known tag
const TAG_TABLE: &[(&str, Tag)] = &[
    ("joystick", Tag::Joystick),
    ("cpk", Tag::ColorPicker),
    ("bar", Tag::ButtonArray),
    ("slider", Tag::Slider),
    ("cms", Tag::Cms),
    ("serial", Tag::Serial),
];

impl Tag {
    /// Look up a tag field (exact, case-sensitive match)
    pub fn parse(field: &str) -> Self {
        TAG_TABLE
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, tag)| *tag)
            .unwrap_or(Tag::Unknown)
    }

    /// Wire spelling, `None` for [`Tag::Unknown`]
    pub fn as_str(&self) -> Option<&'static str> {
        TAG_TABLE
            .iter()
            .find(|(_, tag)| tag == self)
            .map(|(name, _)| *name)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str().unwrap_or("<unknown>"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_tags() {
        assert_eq!(Tag::parse("joystick"), Tag::Joystick);
        assert_eq!(Tag::parse("cpk"), Tag::ColorPicker);
        assert_eq!(Tag::parse("bar"), Tag::ButtonArray);
        assert_eq!(Tag::parse("slider"), Tag::Slider);
        assert_eq!(Tag::parse("cms"), Tag::Cms);
        assert_eq!(Tag::parse("serial"), Tag::Serial);
    }

    #[test]
    fn test_parse_is_case_sensitive_and_exact() {
        assert_eq!(Tag::parse("Joystick"), Tag::Unknown);
        assert_eq!(Tag::parse("joystick "), Tag::Unknown);
        assert_eq!(Tag::parse(""), Tag::Unknown);
    }

    #[test]
    fn test_round_trip_through_table() {
        for (name, tag) in TAG_TABLE {
            assert_eq!(Tag::parse(name), *tag);
            assert_eq!(tag.as_str(), Some(*name));
        }
        assert_eq!(Tag::Unknown.as_str(), None);
    }
}
