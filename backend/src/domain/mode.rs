//! Operation modes and their credit costs.

/// Requested processing behaviour for an uploaded image.
///
/// The enumeration is closed: unrecognised inputs fall back to the default
/// [`ToolMode::Poster`] rather than failing, so a stale client never breaks
/// an upload over a mode string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ToolMode {
    /// Redesign a hand-drawn poster into a finished design.
    #[default]
    Poster,
    /// Remove a watermark from the uploaded image.
    Watermark,
}

/// Credit cost per mode. Modes absent from this table cost one credit.
const MODE_COSTS: &[(ToolMode, u32)] = &[(ToolMode::Poster, 1), (ToolMode::Watermark, 1)];

impl ToolMode {
    /// Parse a mode string, falling back to the default for unknown values.
    ///
    /// # Examples
    /// ```
    /// use posterforge::domain::ToolMode;
    ///
    /// assert_eq!(ToolMode::parse_or_default("watermark"), ToolMode::Watermark);
    /// assert_eq!(ToolMode::parse_or_default("sticker"), ToolMode::Poster);
    /// ```
    pub fn parse_or_default(raw: &str) -> Self {
        match raw {
            "poster" => Self::Poster,
            "watermark" => Self::Watermark,
            _ => Self::default(),
        }
    }

    /// The wire representation sent to the processing webhook.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Poster => "poster",
            Self::Watermark => "watermark",
        }
    }

    /// Integer credit cost of one invocation of this mode.
    pub fn cost(self) -> u32 {
        MODE_COSTS
            .iter()
            .find(|(mode, _)| *mode == self)
            .map_or(1, |(_, cost)| *cost)
    }

    /// Human-readable label recorded in the generation history.
    pub const fn history_label(self) -> &'static str {
        match self {
            Self::Poster => "Poster design",
            Self::Watermark => "Watermark removal",
        }
    }
}

impl std::fmt::Display for ToolMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::poster("poster", ToolMode::Poster)]
    #[case::watermark("watermark", ToolMode::Watermark)]
    #[case::unknown("sticker", ToolMode::Poster)]
    #[case::empty("", ToolMode::Poster)]
    fn parses_with_default_fallback(#[case] raw: &str, #[case] expected: ToolMode) {
        assert_eq!(ToolMode::parse_or_default(raw), expected);
    }

    #[test]
    fn every_mode_has_a_defined_cost() {
        for mode in [ToolMode::Poster, ToolMode::Watermark] {
            assert!(mode.cost() >= 1, "{mode} must cost at least one credit");
        }
    }
}
