// SPDX-FileCopyrightText: 2026 Herald Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Strips active HTML from text destined for a browser.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<\s*script[^>]*>.*?</\s*script\s*>").expect("script pattern must compile")
});

static EVENT_HANDLER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s*on\w+\s*=\s*["'][^"']*["']"#).expect("handler pattern must compile")
});

static JAVASCRIPT_SCHEME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)javascript\s*:").expect("scheme pattern must compile"));

/// Removes `<script>` blocks, inline `on*="..."` handlers and `javascript:`
/// URI schemes. Everything else is returned unchanged.
pub fn sanitize_html(input: &str) -> String {
    let without_scripts = SCRIPT_BLOCK.replace_all(input, "");
    let without_handlers = EVENT_HANDLER.replace_all(&without_scripts, "");
    JAVASCRIPT_SCHEME
        .replace_all(&without_handlers, "")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_script_blocks_across_lines() {
        let html = "before<SCRIPT type=\"text/javascript\">\nalert(1)\n</script >after";
        assert_eq!(sanitize_html(html), "beforeafter");
    }

    #[test]
    fn removes_inline_handlers() {
        let html = r#"<img src="a.png" onerror="steal()"><a onclick='go()'>x</a>"#;
        assert_eq!(sanitize_html(html), r#"<img src="a.png"><a>x</a>"#);
    }

    #[test]
    fn removes_javascript_scheme() {
        assert_eq!(
            sanitize_html(r#"<a href="JavaScript :alert(1)">x</a>"#),
            r#"<a href="alert(1)">x</a>"#
        );
    }

    #[test]
    fn plain_text_is_untouched() {
        let text = "Jai is a software engineer. He likes Rust.";
        assert_eq!(sanitize_html(text), text);
    }
}
