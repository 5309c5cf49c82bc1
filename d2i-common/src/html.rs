//! HTML escaping for server-rendered fragments

/// Escape text for use in element content and double-quoted attributes
///
/// ```
/// use d2i_common::html::escape_html;
///
/// assert_eq!(escape_html("AC/DC & <Friends>"), "AC/DC &amp; &lt;Friends&gt;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_unchanged() {
        assert_eq!(escape_html("Abbey Road"), "Abbey Road");
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn test_quotes_escaped_for_attributes() {
        assert_eq!(escape_html(r#"say "hi" it's"#), "say &quot;hi&quot; it&#39;s");
    }

    #[test]
    fn test_script_tag_neutralized() {
        assert_eq!(
            escape_html("<script>alert(1)</script>"),
            "&lt;script&gt;alert(1)&lt;/script&gt;"
        );
    }
}
