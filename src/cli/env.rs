//! Shell assignment rendering for `kv env`

use crate::models::Store;
use anyhow::{Context, Result};
use regex::Regex;
use std::io::Write;

/// Keys must look like shell variable names to be emitted
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// Values made only of these characters need no quoting
const SHELL_SAFE_PATTERN: &str = r"^[A-Za-z0-9_@%+=:,./-]+$";

/// Renders store entries as `KEY=value` lines
pub struct EnvRenderer {
    identifier: Regex,
    shell_safe: Regex,
}

impl EnvRenderer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            identifier: Regex::new(IDENTIFIER_PATTERN)
                .context("Failed to compile identifier regex")?,
            shell_safe: Regex::new(SHELL_SAFE_PATTERN)
                .context("Failed to compile shell-safe regex")?,
        })
    }

    /// Check whether `key` can be used as a shell variable name
    pub fn is_identifier(&self, key: &str) -> bool {
        self.identifier.is_match(key)
    }

    /// Quote `value` for POSIX shells
    ///
    /// Safe values pass through unchanged; everything else is single-quoted
    /// with embedded quotes written as `'"'"'`.
    pub fn quote(&self, value: &str) -> String {
        if value.is_empty() {
            return "''".to_string();
        }
        if self.shell_safe.is_match(value) {
            return value.to_string();
        }
        format!("'{}'", value.replace('\'', r#"'"'"'"#))
    }

    /// Render a single assignment line (without trailing newline)
    pub fn line(&self, key: &str, value: &str, export: bool) -> String {
        format!(
            "{}{}={}",
            if export { "export " } else { "" },
            key,
            self.quote(value)
        )
    }

    /// Write one line per identifier-safe key, in store order
    ///
    /// Returns the number of lines written.
    pub fn render(&self, store: &Store, export: bool, out: &mut impl Write) -> Result<usize> {
        let mut written = 0;
        for (key, entry) in store.iter() {
            if !self.is_identifier(key) {
                tracing::info!(
                    "Key {} isn't a valid environment variable identifier, skipping...",
                    key
                );
                continue;
            }
            writeln!(out, "{}", self.line(key, &entry.value, export))?;
            written += 1;
        }
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renderer() -> EnvRenderer {
        EnvRenderer::new().unwrap()
    }

    #[test]
    fn test_identifier_grammar() {
        let r = renderer();
        assert!(r.is_identifier("GOOD_KEY"));
        assert!(r.is_identifier("_private"));
        assert!(r.is_identifier("a1"));
        assert!(!r.is_identifier("1bad"));
        assert!(!r.is_identifier("also-bad"));
        assert!(!r.is_identifier(""));
        assert!(!r.is_identifier("has space"));
        assert!(!r.is_identifier("trailing\n"));
    }

    #[test]
    fn test_quote_safe_value() {
        assert_eq!(renderer().quote("/usr/local/bin:/usr/bin"), "/usr/local/bin:/usr/bin");
        assert_eq!(renderer().quote("1"), "1");
    }

    #[test]
    fn test_quote_empty_value() {
        assert_eq!(renderer().quote(""), "''");
    }

    #[test]
    fn test_quote_spaces_and_specials() {
        assert_eq!(renderer().quote("hello world"), "'hello world'");
        assert_eq!(renderer().quote("$HOME"), "'$HOME'");
        assert_eq!(renderer().quote("a;b"), "'a;b'");
    }

    #[test]
    fn test_quote_embedded_single_quote() {
        assert_eq!(renderer().quote("it's"), r#"'it'"'"'s'"#);
    }

    #[test]
    fn test_line_export_prefix() {
        let r = renderer();
        assert_eq!(r.line("KEY", "v", false), "KEY=v");
        assert_eq!(r.line("KEY", "v", true), "export KEY=v");
    }

    #[test]
    fn test_render_filters_invalid_keys() {
        let mut store = Store::new();
        store.set("GOOD_KEY", "1");
        store.set("1bad", "2");
        store.set("also-bad", "3");

        let mut out = Vec::new();
        let written = renderer().render(&store, false, &mut out).unwrap();

        assert_eq!(written, 1);
        assert_eq!(String::from_utf8(out).unwrap(), "GOOD_KEY=1\n");
    }

    #[test]
    fn test_render_export() {
        let mut store = Store::new();
        store.set("GOOD_KEY", "1");
        store.set("1bad", "2");

        let mut out = Vec::new();
        renderer().render(&store, true, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "export GOOD_KEY=1\n");
    }

    #[test]
    fn test_render_empty_store() {
        let mut out = Vec::new();
        let written = renderer().render(&Store::new(), false, &mut out).unwrap();
        assert_eq!(written, 0);
        assert!(out.is_empty());
    }
}
