//! Model-generated narrative text
//!
//! Scenario analyses come back from the model as markdown. The text is
//! untrusted: it is never interpreted as live markup. Terminal output has
//! control and escape sequences stripped; HTML output is fully escaped with
//! line breaks turned into `<br>`.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Narrative text as returned by the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Narrative(String);

impl Narrative {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    /// The unmodified model output
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// Text safe to print to a terminal
    pub fn to_terminal(&self) -> String {
        strip_control(&self.0)
    }

    /// Text safe to embed in an HTML page
    pub fn to_html(&self) -> String {
        let text = strip_control(&self.0);
        let mut out = String::with_capacity(text.len());
        for c in text.chars() {
            match c {
                '&' => out.push_str("&amp;"),
                '<' => out.push_str("&lt;"),
                '>' => out.push_str("&gt;"),
                '"' => out.push_str("&quot;"),
                '\'' => out.push_str("&#39;"),
                '\n' => out.push_str("<br>"),
                _ => out.push(c),
            }
        }
        out
    }
}

impl std::fmt::Display for Narrative {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_terminal())
    }
}

fn escape_sequences() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // CSI sequences, OSC sequences (BEL or ST terminated), and lone escapes
    RE.get_or_init(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]|\x1b\][^\x07\x1b]*(?:\x07|\x1b\\)|\x1b")
            .expect("escape sequence pattern is valid")
    })
}

fn strip_control(text: &str) -> String {
    let normalized = text.replace("\r\n", "\n");
    escape_sequences()
        .replace_all(&normalized, "")
        .chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_markdown_passes_through() {
        let n = Narrative::new("**Impact**\n- Car: +2 months");
        assert_eq!(n.to_terminal(), "**Impact**\n- Car: +2 months");
        assert_eq!(n.raw(), "**Impact**\n- Car: +2 months");
    }

    #[test]
    fn test_terminal_strips_escape_sequences() {
        let n = Narrative::new("\x1b[31mred\x1b[0m text\x1b]0;title\x07 done\r\n");
        assert_eq!(n.to_terminal(), "red text done\n");
    }

    #[test]
    fn test_html_escapes_markup() {
        let n = Narrative::new("<script>alert('x')</script>\nA & B");
        assert_eq!(
            n.to_html(),
            "&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;<br>A &amp; B"
        );
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let n = Narrative::new("hello");
        assert_eq!(serde_json::to_string(&n).unwrap(), "\"hello\"");
    }
}
