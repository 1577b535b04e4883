//! HTML escaping for user content.
//!
//! Every byte of document text passes through one of these functions exactly
//! once, when the HTML emitter writes it out. Markup produced by the renderer
//! itself is written directly and never escaped.

/// Append `text` to `out`, escaping the characters that are significant in
/// HTML element content.
pub fn escape_text(out: &mut String, text: &str) {
    let mut last = 0;
    for (idx, byte) in text.bytes().enumerate() {
        let replacement = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            _ => continue,
        };
        out.push_str(&text[last..idx]);
        out.push_str(replacement);
        last = idx + 1;
    }
    out.push_str(&text[last..]);
}

/// Append `value` to `out`, escaping it for use inside a double-quoted
/// attribute value.
pub fn escape_attr(out: &mut String, value: &str) {
    let mut last = 0;
    for (idx, byte) in value.bytes().enumerate() {
        let replacement = match byte {
            b'&' => "&amp;",
            b'<' => "&lt;",
            b'>' => "&gt;",
            b'"' => "&quot;",
            b'\'' => "&#39;",
            _ => continue,
        };
        out.push_str(&value[last..idx]);
        out.push_str(replacement);
        last = idx + 1;
    }
    out.push_str(&value[last..]);
}

/// Owned variant of [`escape_text`].
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    escape_text(&mut out, text);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_markup_characters_in_text() {
        assert_eq!(
            escape_html("<script>a && b</script>"),
            "&lt;script&gt;a &amp;&amp; b&lt;/script&gt;"
        );
    }

    #[test]
    fn leaves_quotes_alone_in_text() {
        assert_eq!(escape_html(r#"say "hi" it's"#), r#"say "hi" it's"#);
    }

    #[test]
    fn escapes_quotes_in_attributes() {
        let mut out = String::new();
        escape_attr(&mut out, r#"x" onerror="alert('1')"#);
        assert_eq!(out, "x&quot; onerror=&quot;alert(&#39;1&#39;)");
    }

    #[test]
    fn preserves_multibyte_text() {
        assert_eq!(escape_html("文档 <手册>"), "文档 &lt;手册&gt;");
    }
}
