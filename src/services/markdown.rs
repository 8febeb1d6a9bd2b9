//! Markdown rendering for blog post bodies
//!
//! Raw HTML in the source passes through untouched, so posts written in an
//! HTML editor render as before.

use pulldown_cmark::{html, Options, Parser};

/// Markdown to HTML renderer
#[derive(Debug, Clone)]
pub struct MarkdownRenderer {
    options: Options,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_SMART_PUNCTUATION);
        Self { options }
    }

    /// Render Markdown text to HTML
    pub fn render(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::push_html(&mut html_output, parser);
        html_output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_heading_and_emphasis() {
        let html = MarkdownRenderer::new().render("# Title\n\nSome **bold** text");
        assert!(html.contains("<h1>Title</h1>"));
        assert!(html.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let html = MarkdownRenderer::new().render("<p class=\"lead\">Hello</p>");
        assert!(html.contains("<p class=\"lead\">Hello</p>"));
    }

    #[test]
    fn test_table() {
        let html = MarkdownRenderer::new().render("| Crop | Yield |\n|---|---|\n| Rice | 40% |");
        assert!(html.contains("<table>"));
        assert!(html.contains("<td>Rice</td>"));
    }

    #[test]
    fn test_fenced_code_keeps_language_class() {
        let html = MarkdownRenderer::new().render("```python\nprint(1)\n```");
        assert!(html.contains("language-python"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(MarkdownRenderer::new().render(""), "");
    }
}
