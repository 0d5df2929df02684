//! The small markdown subset generated articles use, converted to HTML.
//!
//! Supported: `#`/`##` headings (h2), `###` and deeper (h3), `**bold**`,
//! `-`/`*`/`•` bullet lists, `1.`/`1)` numbered lists, and paragraphs
//! separated by blank lines. Everything is HTML-escaped before markup is
//! added, so model output can never inject tags.

use std::sync::LazyLock;

use regex::Regex;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"));
static NUMBERED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+[.)]\s+(.*)$").expect("valid regex"));

enum Block {
    Paragraph(Vec<String>),
    List { ordered: bool, items: Vec<String> },
}

#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out = String::new();
    let mut open: Option<Block> = None;

    for line in markdown.lines().map(str::trim) {
        if line.is_empty() {
            flush(&mut out, open.take());
            continue;
        }

        if let Some((level, text)) = heading(line) {
            flush(&mut out, open.take());
            out.push_str(&format!("<h{level}>{}</h{level}>\n", inline(text)));
            continue;
        }

        if let Some((ordered, item)) = list_item(line) {
            let continues = matches!(&open, Some(Block::List { ordered: o, .. }) if *o == ordered);
            if !continues {
                flush(&mut out, open.take());
                open = Some(Block::List {
                    ordered,
                    items: Vec::new(),
                });
            }
            if let Some(Block::List { items, .. }) = &mut open {
                items.push(inline(item));
            }
            continue;
        }

        if let Some(Block::Paragraph(lines)) = &mut open {
            lines.push(inline(line));
        } else {
            flush(&mut out, open.take());
            open = Some(Block::Paragraph(vec![inline(line)]));
        }
    }
    flush(&mut out, open);

    out
}

fn flush(out: &mut String, block: Option<Block>) {
    match block {
        None => {}
        Some(Block::Paragraph(lines)) => {
            out.push_str("<p>");
            out.push_str(&lines.join("<br>"));
            out.push_str("</p>\n");
        }
        Some(Block::List { ordered, items }) => {
            let tag = if ordered { "ol" } else { "ul" };
            out.push_str(&format!("<{tag}>"));
            for item in items {
                out.push_str(&format!("<li>{item}</li>"));
            }
            out.push_str(&format!("</{tag}>\n"));
        }
    }
}

/// Heading level (2 or 3) and text for `#`-prefixed lines.
fn heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.chars().take_while(|&c| c == '#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let text = rest.trim();
    if text.is_empty() {
        return None;
    }
    Some((if hashes <= 2 { 2 } else { 3 }, text))
}

fn list_item(line: &str) -> Option<(bool, &str)> {
    for marker in ["- ", "* ", "• "] {
        if let Some(item) = line.strip_prefix(marker) {
            return Some((false, item.trim()));
        }
    }
    NUMBERED_ITEM
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| (true, m.as_str().trim()))
}

fn inline(text: &str) -> String {
    let escaped = html_escape::encode_text(text);
    BOLD.replace_all(&escaped, "<strong>$1</strong>").into_owned()
}
