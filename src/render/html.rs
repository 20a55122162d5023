use std::io::{self, Write};

use super::{NO_RESULTS, PROMPT, Render};
use crate::catalog::DestinationRecord;
use crate::session::{View, ViewKind};

/// `city-card` fragments for the `#recommendation-results` container.
pub struct HtmlRenderer<W> {
    out: W,
}

impl<W: Write> HtmlRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Render for HtmlRenderer<W> {
    fn render(&mut self, view: &View) -> io::Result<()> {
        let html = format_view(view);
        self.out.write_all(html.as_bytes())?;
        self.out.flush()
    }
}

fn format_view(view: &View) -> String {
    if view.kind == ViewKind::Prompt {
        return format!("<p>{}</p>\n", escape_html(PROMPT));
    }
    if view.records.is_empty() {
        return format!("<p>{NO_RESULTS}</p>\n");
    }
    view.records.iter().map(format_card).collect()
}

fn format_card(record: &DestinationRecord) -> String {
    let name = escape_html(&record.name);
    let mut card = String::from("<div class=\"city-card\">\n");
    card.push_str(&format!("  <h3>{name}</h3>\n"));
    card.push_str(&format!(
        "  <p><strong>Category:</strong> {}</p>\n",
        record.category
    ));
    if !record.parent_name.is_empty() {
        card.push_str(&format!(
            "  <p><strong>Parent:</strong> {}</p>\n",
            escape_html(&record.parent_name)
        ));
    }
    card.push_str(&format!(
        "  <img src=\"{}\" alt=\"{name}\" style=\"max-width: 300px; display: block;\">\n",
        escape_html(&record.image_url)
    ));
    card.push_str(&format!("  <p>{}</p>\n", escape_html(&record.description)));
    card.push_str("</div>\n");
    card
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
