//! Markdown-to-HTML rendering for manual documents.
//!
//! Rendering runs in three steps: the input is split into [`Block`]s, each
//! block's text is parsed into [`Inline`] spans, and the tree is written out
//! as an HTML fragment. User text is escaped exactly once, while it is being
//! written, so no markup in the source document survives into the output.
//!
//! The renderer never fails. Constructs it cannot complete (an unterminated
//! fence, an unmatched `*`) come out as literal text.
//!
//! ```
//! let html = manual_render::render("# Guide\n\n- **fast**\n- safe");
//! assert_eq!(
//!     html,
//!     "<h1>Guide</h1>\n<ul><li><strong>fast</strong></li>\n<li>safe</li></ul>"
//! );
//! ```

mod block;
mod escape;
mod html;
mod inline;
mod options;
mod url;

pub use block::{parse_blocks, Block};
pub use escape::{escape_attr, escape_html, escape_text};
pub use inline::{parse_inlines, Inline};
pub use options::RenderOptions;

use html::HtmlWriter;

/// Render `text` with the default [`RenderOptions`].
pub fn render(text: &str) -> String {
    render_with(text, &RenderOptions::default())
}

/// Render `text` with caller-supplied link and image attributes.
pub fn render_with(text: &str, options: &RenderOptions) -> String {
    let blocks = parse_blocks(text);
    write_html(&blocks, options, text.len() + text.len() / 2)
}

/// Write an already-parsed document out as HTML.
pub fn render_blocks(blocks: &[Block], options: &RenderOptions) -> String {
    write_html(blocks, options, 0)
}

fn write_html(blocks: &[Block], options: &RenderOptions, capacity: usize) -> String {
    let mut writer = HtmlWriter::new(options, capacity);
    writer.blocks(blocks);
    writer.finish()
}
