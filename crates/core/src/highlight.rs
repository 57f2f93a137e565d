pub const HIGHLIGHT_PRE_TAG: &str = "@BEGIN-LOGSEARCH-HIGHLIGHT@";
pub const HIGHLIGHT_POST_TAG: &str = "@END-LOGSEARCH-HIGHLIGHT@";

const ANSI_HIGHLIGHT: &str = "\x1b[1;31m";
const ANSI_RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MarkerStyle {
    /// Bold red terminal escape codes.
    #[default]
    Ansi,
    /// Square brackets around each match.
    Brackets,
    /// Markers removed, text left as is.
    Strip,
}

impl MarkerStyle {
    fn tags(self) -> (&'static str, &'static str) {
        match self {
            MarkerStyle::Ansi => (ANSI_HIGHLIGHT, ANSI_RESET),
            MarkerStyle::Brackets => ("[", "]"),
            MarkerStyle::Strip => ("", ""),
        }
    }
}

/// Replaces the highlight markers in a fragment returned by the search engine.
pub fn render_fragment(fragment: &str, style: MarkerStyle) -> String {
    let (open, close) = style.tags();
    fragment
        .replace(HIGHLIGHT_PRE_TAG, open)
        .replace(HIGHLIGHT_POST_TAG, close)
}
