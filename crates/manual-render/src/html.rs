use crate::block::Block;
use crate::escape::{escape_attr, escape_text};
use crate::inline::Inline;
use crate::options::RenderOptions;
use crate::url::sanitize_url;

pub(crate) struct HtmlWriter<'o> {
    out: String,
    options: &'o RenderOptions,
}

impl<'o> HtmlWriter<'o> {
    pub(crate) fn new(options: &'o RenderOptions, capacity: usize) -> Self {
        Self {
            out: String::with_capacity(capacity),
            options,
        }
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }

    pub(crate) fn blocks(&mut self, blocks: &[Block]) {
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                self.out.push('\n');
            }
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Heading { level, content } => {
                self.out.push_str(&format!("<h{level}>"));
                self.inlines(content);
                self.out.push_str(&format!("</h{level}>"));
            }
            Block::CodeBlock { code } => {
                self.out.push_str("<pre><code>");
                escape_text(&mut self.out, code);
                self.out.push_str("</code></pre>");
            }
            Block::Quote { lines } => {
                self.out.push_str("<blockquote>");
                self.lines(lines);
                self.out.push_str("</blockquote>");
            }
            Block::List { items } => {
                self.out.push_str("<ul>");
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        self.out.push('\n');
                    }
                    self.out.push_str("<li>");
                    self.inlines(item);
                    self.out.push_str("</li>");
                }
                self.out.push_str("</ul>");
            }
            Block::Rule => self.out.push_str("<hr>"),
            Block::Image { alt, src } => self.image(alt, src),
            Block::Paragraph { lines } => {
                self.out.push_str("<p>");
                self.lines(lines);
                self.out.push_str("</p>");
            }
        }
    }

    fn lines(&mut self, lines: &[Vec<Inline>]) {
        for (idx, line) in lines.iter().enumerate() {
            if idx > 0 {
                self.out.push('\n');
            }
            self.inlines(line);
        }
    }

    fn inlines(&mut self, nodes: &[Inline]) {
        for node in nodes {
            self.inline(node);
        }
    }

    fn inline(&mut self, node: &Inline) {
        match node {
            Inline::Text(text) => escape_text(&mut self.out, text),
            Inline::Code(code) => {
                self.out.push_str("<code>");
                escape_text(&mut self.out, code);
                self.out.push_str("</code>");
            }
            Inline::Emphasis(inner) => self.wrapped("em", inner),
            Inline::Strong(inner) => self.wrapped("strong", inner),
            Inline::StrongEmphasis(inner) => {
                self.out.push_str("<strong><em>");
                self.inlines(inner);
                self.out.push_str("</em></strong>");
            }
            Inline::Link { label, href } => {
                let href = self.url(href, false);
                self.out.push_str("<a href=\"");
                escape_attr(&mut self.out, href);
                self.out.push('"');
                if let Some(target) = &self.options.link_target {
                    self.out.push_str(" target=\"");
                    escape_attr(&mut self.out, target);
                    self.out.push_str("\" rel=\"noopener noreferrer\"");
                }
                self.out.push('>');
                self.inlines(label);
                self.out.push_str("</a>");
            }
            Inline::Image { alt, src } => self.image(alt, src),
        }
    }

    fn wrapped(&mut self, tag: &str, inner: &[Inline]) {
        self.out.push('<');
        self.out.push_str(tag);
        self.out.push('>');
        self.inlines(inner);
        self.out.push_str("</");
        self.out.push_str(tag);
        self.out.push('>');
    }

    fn image(&mut self, alt: &str, src: &str) {
        let src = self.url(src, true);
        self.out.push_str("<img src=\"");
        escape_attr(&mut self.out, src);
        self.out.push_str("\" alt=\"");
        escape_attr(&mut self.out, alt);
        self.out.push('"');
        if let Some(class) = &self.options.image_class {
            self.out.push_str(" class=\"");
            escape_attr(&mut self.out, class);
            self.out.push('"');
        }
        self.out.push('>');
    }

    fn url<'u>(&self, url: &'u str, image: bool) -> &'u str {
        if self.options.safe_urls {
            sanitize_url(url, image)
        } else {
            url
        }
    }
}
