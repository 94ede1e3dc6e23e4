//! HTML helper functions

use crate::content::{RichTextBlock, Span};

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render structured-text blocks as HTML
///
/// Consecutive list items share one `<ul>`/`<ol>`. Block types without an
/// HTML counterpart (embeds, unknown types) are skipped.
///
/// # Examples
/// ```ignore
/// rich_text_to_html(&[RichTextBlock::paragraph("Olá")]) // -> "<p>Olá</p>"
/// ```
pub fn rich_text_to_html(blocks: &[RichTextBlock]) -> String {
    let mut html = String::new();
    let mut open_list: Option<&str> = None;

    for block in blocks {
        let list = match block.kind.as_str() {
            "list-item" => Some("ul"),
            "o-list-item" => Some("ol"),
            _ => None,
        };
        if open_list != list {
            if let Some(tag) = open_list {
                html.push_str(&format!("</{}>", tag));
            }
            if let Some(tag) = list {
                html.push_str(&format!("<{}>", tag));
            }
            open_list = list;
        }

        let tag = match block.kind.as_str() {
            "paragraph" => "p",
            "heading1" => "h1",
            "heading2" => "h2",
            "heading3" => "h3",
            "heading4" => "h4",
            "heading5" => "h5",
            "heading6" => "h6",
            "preformatted" => "pre",
            "list-item" | "o-list-item" => "li",
            "image" => {
                if let Some(url) = block.url.as_deref() {
                    html.push_str(&format!(
                        r#"<p class="block-img"><img src="{}" alt="{}"></p>"#,
                        html_escape(url),
                        html_escape(block.alt.as_deref().unwrap_or(""))
                    ));
                }
                continue;
            }
            other => {
                tracing::debug!("Skipping {} block", other);
                continue;
            }
        };

        html.push_str(&format!(
            "<{}>{}</{}>",
            tag,
            render_spans(&block.text, &block.spans),
            tag
        ));
    }

    if let Some(tag) = open_list {
        html.push_str(&format!("</{}>", tag));
    }

    html
}

/// Apply inline spans to a block's text
///
/// Span offsets count characters. Nested spans are closed innermost first;
/// when spans cross, the inner tags are closed and reopened around the end
/// of the outer one.
fn render_spans(text: &str, spans: &[Span]) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut spans: Vec<&Span> = spans
        .iter()
        .filter(|s| s.start < s.end && s.start < chars.len())
        .collect();
    // Outer spans open first
    spans.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));

    let mut out = String::with_capacity(text.len());
    let mut open: Vec<&Span> = Vec::new();
    let mut pending = spans.into_iter().peekable();

    for (i, c) in chars.iter().enumerate() {
        if open.iter().any(|s| s.end <= i) {
            let mut reopen = Vec::new();
            while let Some(span) = open.pop() {
                out.push_str(&closing_tag(span));
                if span.end > i {
                    reopen.push(span);
                }
                if !open.iter().any(|s| s.end <= i) {
                    break;
                }
            }
            for span in reopen.into_iter().rev() {
                out.push_str(&opening_tag(span));
                open.push(span);
            }
        }
        while let Some(span) = pending.next_if(|s| s.start == i) {
            out.push_str(&opening_tag(span));
            open.push(span);
        }

        match c {
            '\n' => out.push_str("<br />"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(*c),
        }
    }

    while let Some(span) = open.pop() {
        out.push_str(&closing_tag(span));
    }

    out
}

fn opening_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "<strong>".to_string(),
        "em" => "<em>".to_string(),
        "hyperlink" => {
            let href = html_escape(span.data.url.as_deref().unwrap_or("#"));
            if span.data.target.as_deref() == Some("_blank") {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">"#,
                    href
                )
            } else {
                format!(r#"<a href="{}">"#, href)
            }
        }
        _ => String::new(),
    }
}

fn closing_tag(span: &Span) -> String {
    match span.kind.as_str() {
        "strong" => "</strong>",
        "em" => "</em>",
        "hyperlink" => "</a>",
        _ => "",
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::SpanData;

    fn span(start: usize, end: usize, kind: &str) -> Span {
        Span {
            start,
            end,
            kind: kind.to_string(),
            data: SpanData::default(),
        }
    }

    fn block(kind: &str, text: &str, spans: Vec<Span>) -> RichTextBlock {
        RichTextBlock {
            kind: kind.to_string(),
            text: text.to_string(),
            spans,
            url: None,
            alt: None,
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_paragraphs_and_headings() {
        let html = rich_text_to_html(&[
            block("heading2", "Título", vec![]),
            RichTextBlock::paragraph("a < b\nc"),
        ]);
        assert_eq!(html, "<h2>Título</h2><p>a &lt; b<br />c</p>");
    }

    #[test]
    fn test_lists_are_grouped() {
        let html = rich_text_to_html(&[
            block("list-item", "um", vec![]),
            block("list-item", "dois", vec![]),
            block("o-list-item", "três", vec![]),
            RichTextBlock::paragraph("fim"),
        ]);
        assert_eq!(
            html,
            "<ul><li>um</li><li>dois</li></ul><ol><li>três</li></ol><p>fim</p>"
        );
    }

    #[test]
    fn test_trailing_list_is_closed() {
        let html = rich_text_to_html(&[block("list-item", "só", vec![])]);
        assert_eq!(html, "<ul><li>só</li></ul>");
    }

    #[test]
    fn test_spans() {
        let html = rich_text_to_html(&[block(
            "paragraph",
            "muito bom mesmo",
            vec![span(0, 9, "strong"), span(6, 9, "em")],
        )]);
        assert_eq!(html, "<p><strong>muito <em>bom</em></strong> mesmo</p>");
    }

    #[test]
    fn test_crossing_spans() {
        let html = rich_text_to_html(&[block(
            "paragraph",
            "abcdefgh",
            vec![span(0, 5, "strong"), span(3, 8, "em")],
        )]);
        assert_eq!(
            html,
            "<p><strong>abc<em>de</em></strong><em>fgh</em></p>"
        );
    }

    #[test]
    fn test_spans_count_characters() {
        let html = rich_text_to_html(&[block("paragraph", "ação final", vec![span(0, 4, "em")])]);
        assert_eq!(html, "<p><em>ação</em> final</p>");
    }

    #[test]
    fn test_hyperlink() {
        let mut link = span(4, 8, "hyperlink");
        link.data = SpanData {
            url: Some("https://example.com/?a=1&b=2".to_string()),
            target: Some("_blank".to_string()),
        };
        let html = rich_text_to_html(&[block("paragraph", "see here", vec![link])]);
        assert_eq!(
            html,
            r#"<p>see <a href="https://example.com/?a=1&amp;b=2" target="_blank" rel="noopener noreferrer">here</a></p>"#
        );
    }

    #[test]
    fn test_images_and_unknown_blocks() {
        let mut image = block("image", "", vec![]);
        image.url = Some("https://images.example.com/x.png".to_string());
        image.alt = Some("x".to_string());
        let html = rich_text_to_html(&[image, block("embed", "", vec![])]);
        assert_eq!(
            html,
            r#"<p class="block-img"><img src="https://images.example.com/x.png" alt="x"></p>"#
        );
    }
}
