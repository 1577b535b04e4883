//! Inline span parsing: code spans, images, links and emphasis.
//!
//! Inline content never spans lines; the block parser hands each line over
//! separately. Anything that does not form a complete construct is kept as
//! literal text.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Code(String),
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    StrongEmphasis(Vec<Inline>),
    Link { label: Vec<Inline>, href: String },
    Image { alt: String, src: String },
}

pub fn parse_inlines(text: &str) -> Vec<Inline> {
    InlineParser::new(text).parse()
}

/// Returns the inline image when `text` consists of exactly one image and
/// nothing else.
pub fn standalone_image(text: &str) -> Option<(&str, &str)> {
    let (alt, src, end) = InlineParser::new(text).image(0)?;
    (end == text.len()).then_some((alt, src))
}

struct InlineParser<'t> {
    text: &'t str,
    marks: Marks,
}

impl<'t> InlineParser<'t> {
    fn new(text: &'t str) -> Self {
        InlineParser {
            text,
            marks: Marks::scan(text.as_bytes()),
        }
    }

    fn parse(&self) -> Vec<Inline> {
        let text = self.text;
        let bytes = text.as_bytes();
        let mut nodes = InlineBuffer::default();
        let mut plain_start = 0usize;
        let mut idx = 0usize;

        while idx < bytes.len() {
            let matched = match bytes[idx] {
                b'`' => self
                    .code_span(idx)
                    .map(|(content, end)| (0, Inline::Code(content.to_owned()), end)),
                b'!' => self.image(idx).map(|(alt, src, end)| {
                    (
                        0,
                        Inline::Image {
                            alt: alt.to_owned(),
                            src: src.to_owned(),
                        },
                        end,
                    )
                }),
                b'[' => self.link(idx).map(|(label, href, end)| {
                    (
                        0,
                        Inline::Link {
                            label: parse_inlines(label),
                            href: href.to_owned(),
                        },
                        end,
                    )
                }),
                b'*' => self.emphasis(idx),
                _ => None,
            };

            match matched {
                Some((literal_stars, node, end)) => {
                    nodes.push_text(&text[plain_start..idx + literal_stars]);
                    nodes.push(node);
                    idx = end;
                    plain_start = end;
                }
                None if bytes[idx] == b'*' => {
                    // An unmatched run stays literal as a whole.
                    idx += star_run(bytes, idx);
                }
                None => idx += 1,
            }
        }

        nodes.push_text(&text[plain_start..]);
        nodes.finish()
    }

    fn code_span(&self, start: usize) -> Option<(&'t str, usize)> {
        let content_start = start + 1;
        let close = next_at_or_after(&self.marks.backticks, content_start)?;
        if close == content_start {
            return None;
        }
        Some((&self.text[content_start..close], close + 1))
    }

    fn image(&self, start: usize) -> Option<(&'t str, &'t str, usize)> {
        if !self.text[start..].starts_with("![") {
            return None;
        }
        self.bracketed_target(start + 1)
    }

    fn link(&self, start: usize) -> Option<(&'t str, &'t str, usize)> {
        let (label, url, end) = self.bracketed_target(start)?;
        if label.is_empty() {
            return None;
        }
        Some((label, url, end))
    }

    /// Parses `[label](target)` starting at the opening bracket. The label
    /// may be empty, the target may not.
    fn bracketed_target(&self, open: usize) -> Option<(&'t str, &'t str, usize)> {
        let label_start = open + 1;
        let label_end = next_at_or_after(&self.marks.brackets, label_start)?;
        if self.text.as_bytes().get(label_end + 1) != Some(&b'(') {
            return None;
        }
        let target_start = label_end + 2;
        let target_end = next_at_or_after(&self.marks.parens, target_start)?;
        if target_end == target_start {
            return None;
        }
        Some((
            &self.text[label_start..label_end],
            &self.text[target_start..target_end],
            target_end + 1,
        ))
    }

    /// Tries the widest delimiter first (`***`, then `**`, then `*`). The
    /// closing run must have exactly the delimiter's width; surplus opening
    /// stars are reported as literal so the caller keeps them in the text.
    fn emphasis(&self, start: usize) -> Option<(usize, Inline, usize)> {
        let run = star_run(self.text.as_bytes(), start);
        let content_start = start + run;

        for width in (1..=run.min(3)).rev() {
            let Some(close) = self.marks.closing_run(content_start, width) else {
                continue;
            };
            let inner = parse_inlines(&self.text[content_start..close]);
            let node = match width {
                3 => Inline::StrongEmphasis(inner),
                2 => Inline::Strong(inner),
                _ => Inline::Emphasis(inner),
            };
            return Some((run - width, node, close + width));
        }

        None
    }
}

/// Delimiter offsets for one line, collected in a single pass so lookahead
/// never rescans the text.
#[derive(Default)]
struct Marks {
    len: usize,
    backticks: Vec<usize>,
    brackets: Vec<usize>,
    parens: Vec<usize>,
    /// Starts of star runs exactly 1, 2 and 3 stars wide.
    runs: [Vec<usize>; 3],
    /// Per width, the closer a scan reaches once it steps onto backtick `k`.
    after_backtick: [Vec<Option<usize>>; 3],
}

impl Marks {
    fn scan(bytes: &[u8]) -> Self {
        let mut marks = Marks {
            len: bytes.len(),
            ..Marks::default()
        };

        let mut idx = 0usize;
        while idx < bytes.len() {
            match bytes[idx] {
                b'`' => marks.backticks.push(idx),
                b']' => marks.brackets.push(idx),
                b')' => marks.parens.push(idx),
                b'*' => {
                    let run = star_run(bytes, idx);
                    if run <= 3 {
                        marks.runs[run - 1].push(idx);
                    }
                    idx += run;
                    continue;
                }
                _ => {}
            }
            idx += 1;
        }

        marks.after_backtick = [1, 2, 3].map(|width| marks.closers_after_backticks(width));
        marks
    }

    /// First run of exactly `width` stars at or after `from`, skipping code
    /// spans the way a left-to-right scan from `from` pairs backticks.
    fn closing_run(&self, from: usize, width: usize) -> Option<usize> {
        let tick = self.backticks.partition_point(|&pos| pos < from);
        let until = self.backticks.get(tick).copied().unwrap_or(self.len);
        self.run_between(width, from, until)
            .or_else(|| self.after_backtick[width - 1].get(tick).copied().flatten())
    }

    fn run_between(&self, width: usize, from: usize, until: usize) -> Option<usize> {
        next_at_or_after(&self.runs[width - 1], from).filter(|&pos| pos < until)
    }

    fn closers_after_backticks(&self, width: usize) -> Vec<Option<usize>> {
        let ticks = &self.backticks;
        let mut closers = vec![None; ticks.len()];
        for k in (0..ticks.len()).rev() {
            closers[k] = match ticks.get(k + 1) {
                // No partner: the backtick is literal and the scan runs on.
                None => self.run_between(width, ticks[k] + 1, self.len),
                // Empty span: the next backtick starts its own attempt.
                Some(&next) if next == ticks[k] + 1 => closers[k + 1],
                Some(&next) => {
                    let until = ticks.get(k + 2).copied().unwrap_or(self.len);
                    self.run_between(width, next + 1, until)
                        .or_else(|| closers.get(k + 2).copied().flatten())
                }
            };
        }
        closers
    }
}

fn next_at_or_after(positions: &[usize], from: usize) -> Option<usize> {
    positions
        .get(positions.partition_point(|&pos| pos < from))
        .copied()
}

#[derive(Default)]
struct InlineBuffer {
    nodes: Vec<Inline>,
}

impl InlineBuffer {
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text(existing)) = self.nodes.last_mut() {
            existing.push_str(text);
        } else {
            self.nodes.push(Inline::Text(text.to_owned()));
        }
    }

    fn push(&mut self, node: Inline) {
        self.nodes.push(node);
    }

    fn finish(self) -> Vec<Inline> {
        self.nodes
    }
}

fn star_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'*').count()
}
