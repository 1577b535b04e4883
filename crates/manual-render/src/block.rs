use crate::inline::{parse_inlines, standalone_image, Inline};

/// Top-level document structure. Block elements are never nested inside a
/// paragraph; the emitter writes each one at the top level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, content: Vec<Inline> },
    CodeBlock { code: String },
    Quote { lines: Vec<Vec<Inline>> },
    List { items: Vec<Vec<Inline>> },
    Rule,
    Image { alt: String, src: String },
    Paragraph { lines: Vec<Vec<Inline>> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind<'a> {
    Blank,
    Heading(u8, &'a str),
    Quote(&'a str),
    ListItem(&'a str),
    Rule,
    Image(&'a str, &'a str),
    Text,
}

pub fn parse_blocks(input: &str) -> Vec<Block> {
    let lines: Vec<&str> = input
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();

    // Longest closing fence at or after each line; an opener longer than
    // anything below it can never close.
    let mut longest_closer = vec![0usize; lines.len() + 1];
    for idx in (0..lines.len()).rev() {
        longest_closer[idx] = longest_closer[idx + 1].max(closing_fence_len(lines[idx]));
    }

    let mut blocks = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut idx = 0usize;

    while idx < lines.len() {
        let line = lines[idx];

        if let Some(fence) =
            detect_fence_start(line).filter(|fence| longest_closer[idx + 1] >= fence.len)
        {
            if let Some((code, next_idx)) = collect_fenced(&lines, idx, fence) {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push(Block::CodeBlock { code });
                idx = next_idx;
                continue;
            }
        }

        match classify(line) {
            LineKind::Blank => flush_paragraph(&mut blocks, &mut paragraph),
            LineKind::Heading(level, text) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push(Block::Heading {
                    level,
                    content: parse_inlines(text),
                });
            }
            LineKind::Quote(first) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                let mut quoted = vec![parse_inlines(first)];
                while let Some(LineKind::Quote(text)) = lines.get(idx + 1).copied().map(classify) {
                    quoted.push(parse_inlines(text));
                    idx += 1;
                }
                blocks.push(Block::Quote { lines: quoted });
            }
            LineKind::ListItem(first) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                let mut items = vec![parse_inlines(first)];
                while let Some(LineKind::ListItem(text)) =
                    lines.get(idx + 1).copied().map(classify)
                {
                    items.push(parse_inlines(text));
                    idx += 1;
                }
                blocks.push(Block::List { items });
            }
            LineKind::Rule => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push(Block::Rule);
            }
            LineKind::Image(alt, src) => {
                flush_paragraph(&mut blocks, &mut paragraph);
                blocks.push(Block::Image {
                    alt: alt.to_owned(),
                    src: src.to_owned(),
                });
            }
            LineKind::Text => paragraph.push(line),
        }

        idx += 1;
    }

    flush_paragraph(&mut blocks, &mut paragraph);
    blocks
}

fn flush_paragraph(blocks: &mut Vec<Block>, paragraph: &mut Vec<&str>) {
    if paragraph.is_empty() {
        return;
    }
    let lines = paragraph.drain(..).map(parse_inlines).collect();
    blocks.push(Block::Paragraph { lines });
}

fn classify(line: &str) -> LineKind<'_> {
    if line.trim().is_empty() {
        return LineKind::Blank;
    }

    if let Some((level, text)) = heading(line) {
        return LineKind::Heading(level, text);
    }

    if let Some(text) = marker_content(line, "> ") {
        return LineKind::Quote(text);
    }

    if let Some(text) = marker_content(line, "- ") {
        return LineKind::ListItem(text);
    }

    if line.trim_end() == "---" {
        return LineKind::Rule;
    }

    if let Some((alt, src)) = standalone_image(line.trim()) {
        return LineKind::Image(alt, src);
    }

    LineKind::Text
}

/// `#`, `##` or `###`, one space, then non-blank text. Deeper headings are
/// plain text.
fn heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|&b| b == b'#').count();
    if level == 0 || level > 3 {
        return None;
    }
    let text = marker_content(&line[level..], " ")?;
    Some((level as u8, text))
}

fn marker_content<'a>(line: &'a str, marker: &str) -> Option<&'a str> {
    let text = line.strip_prefix(marker)?;
    if text.trim().is_empty() {
        return None;
    }
    Some(text)
}

#[derive(Clone, Copy, Debug)]
struct Fence {
    len: usize,
}

fn detect_fence_start(line: &str) -> Option<Fence> {
    let (indent_width, rest) = split_indent(line);
    if indent_width > 3 {
        return None;
    }

    let len = rest.bytes().take_while(|&b| b == b'`').count();
    if len < 3 {
        return None;
    }

    // The info string is discarded, but a backtick in it means this is an
    // inline code span rather than a fence.
    if rest[len..].contains('`') {
        return None;
    }

    Some(Fence { len })
}

fn is_closing_fence(line: &str, fence: Fence) -> bool {
    closing_fence_len(line) >= fence.len
}

/// Backtick count of a line that could close a fence, or zero.
fn closing_fence_len(line: &str) -> usize {
    let (indent_width, rest) = split_indent(line);
    if indent_width > 3 {
        return 0;
    }

    let trimmed = rest.trim_end();
    if trimmed.bytes().all(|b| b == b'`') {
        trimmed.len()
    } else {
        0
    }
}

/// Returns the verbatim contents and the index of the line after the closing
/// fence, or `None` when the fence is never closed.
fn collect_fenced(lines: &[&str], open_idx: usize, fence: Fence) -> Option<(String, usize)> {
    let mut code = String::new();
    for (offset, line) in lines[open_idx + 1..].iter().enumerate() {
        if is_closing_fence(line, fence) {
            return Some((code, open_idx + offset + 2));
        }
        code.push_str(line);
        code.push('\n');
    }
    None
}

fn split_indent(line: &str) -> (usize, &str) {
    let mut width = 0usize;
    for (idx, ch) in line.char_indices() {
        match ch {
            ' ' => width += 1,
            '\t' => width += 4,
            _ => return (width, &line[idx..]),
        }
    }
    (width, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(value: &str) -> Inline {
        Inline::Text(value.to_owned())
    }

    #[test]
    fn counts_heading_markers() {
        assert_eq!(heading("# One"), Some((1, "One")));
        assert_eq!(heading("### Three"), Some((3, "Three")));
        assert_eq!(heading("#### Four"), None);
        assert_eq!(heading("#NoSpace"), None);
        assert_eq!(heading("## "), None);
    }

    #[test]
    fn classifies_block_lines() {
        assert_eq!(classify("> quoted"), LineKind::Quote("quoted"));
        assert_eq!(classify("- item"), LineKind::ListItem("item"));
        assert_eq!(classify("---"), LineKind::Rule);
        assert_eq!(classify("--- "), LineKind::Rule);
        assert_eq!(classify("----"), LineKind::Text);
        assert_eq!(classify(">no space"), LineKind::Text);
        assert_eq!(classify("   "), LineKind::Blank);
        assert_eq!(classify(" ![a](b.png) "), LineKind::Image("a", "b.png"));
    }

    #[test]
    fn detects_fences_with_info_strings() {
        assert!(detect_fence_start("```").is_some());
        assert!(detect_fence_start("```rust").is_some());
        assert!(detect_fence_start("   ````").is_some());
        assert!(detect_fence_start("    ```").is_none());
        assert!(detect_fence_start("``").is_none());
        assert!(detect_fence_start("```a```").is_none());
    }

    #[test]
    fn closing_fence_must_be_long_enough() {
        let fence = Fence { len: 4 };
        assert!(!is_closing_fence("```", fence));
        assert!(is_closing_fence("````", fence));
        assert!(is_closing_fence("`````  ", fence));
        assert!(!is_closing_fence("```` x", fence));
    }

    #[test]
    fn fenced_code_keeps_lines_verbatim() {
        let blocks = parse_blocks("```js\n# not a heading\n*x*\n```");
        assert_eq!(
            blocks,
            vec![Block::CodeBlock {
                code: "# not a heading\n*x*\n".into()
            }]
        );
    }

    #[test]
    fn unterminated_fence_is_text() {
        let blocks = parse_blocks("```\ncode");
        assert_eq!(
            blocks,
            vec![Block::Paragraph {
                lines: vec![vec![text("```")], vec![text("code")]]
            }]
        );
    }

    #[test]
    fn short_closers_leave_long_fences_open() {
        let blocks = parse_blocks("`````\n````\na\n```\nb\n```");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    lines: vec![vec![text("`````")], vec![text("````")], vec![text("a")]]
                },
                Block::CodeBlock { code: "b\n".into() },
            ]
        );
    }

    #[test]
    fn groups_consecutive_list_items() {
        let blocks = parse_blocks("- a\n- b\n\n- c");
        assert_eq!(
            blocks,
            vec![
                Block::List {
                    items: vec![vec![text("a")], vec![text("b")]]
                },
                Block::List {
                    items: vec![vec![text("c")]]
                },
            ]
        );
    }

    #[test]
    fn block_lines_interrupt_paragraphs() {
        let blocks = parse_blocks("one\ntwo\n# Head\nthree");
        assert_eq!(
            blocks,
            vec![
                Block::Paragraph {
                    lines: vec![vec![text("one")], vec![text("two")]]
                },
                Block::Heading {
                    level: 1,
                    content: vec![text("Head")]
                },
                Block::Paragraph {
                    lines: vec![vec![text("three")]]
                },
            ]
        );
    }

    #[test]
    fn strips_carriage_returns() {
        let blocks = parse_blocks("# Title\r\n\r\nbody\r\n");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                lines: vec![vec![text("body")]]
            }
        );
    }
}
