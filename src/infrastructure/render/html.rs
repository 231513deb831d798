use serde::Serialize;

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// JSON literal safe to embed inside an inline `<script>`.
pub(crate) fn script_json<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| "null".to_string())
        .replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Porto" & 'Faro'</b>"#),
            "&lt;b&gt;&quot;Porto&quot; &amp; &#x27;Faro&#x27;&lt;/b&gt;"
        );
        assert_eq!(escape_html("Évora ☀️"), "Évora ☀️");
    }

    #[test]
    fn test_script_json_cannot_close_script_tag() {
        let json = script_json("</script><script>alert(1)</script>");
        assert!(!json.contains("</script>"));
        assert!(json.starts_with('"'));
    }
}
