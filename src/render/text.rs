use std::io::{self, Write};

use super::{NO_RESULTS, PROMPT, Render};
use crate::catalog::DestinationRecord;
use crate::session::{View, ViewKind};

/// Markdown-style cards, one per record.
pub struct TextRenderer<W> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Render for TextRenderer<W> {
    fn render(&mut self, view: &View) -> io::Result<()> {
        let text = format_view(view);
        self.out.write_all(text.as_bytes())?;
        self.out.flush()
    }
}

fn format_view(view: &View) -> String {
    let mut out = match &view.kind {
        ViewKind::Prompt => return format!("{PROMPT}\n"),
        ViewKind::Everything => format!("{}\n\n", count(view.records.len())),
        ViewKind::Results { query } => format!(
            "Found {} matching \"{}\"\n\n",
            count(view.records.len()),
            sanitize_heading(query)
        ),
    };

    if view.records.is_empty() {
        out.push_str(NO_RESULTS);
        out.push('\n');
        return out;
    }

    for record in &view.records {
        format_card(record, &mut out);
    }
    out
}

fn count(n: usize) -> String {
    if n == 1 {
        "1 destination".to_string()
    } else {
        format!("{n} destinations")
    }
}

fn format_card(record: &DestinationRecord, out: &mut String) {
    out.push_str(&format!("### {}\n\n", sanitize_heading(&record.name)));
    out.push_str(&format!("**Category:** {}\n", record.category));
    if !record.parent_name.is_empty() {
        out.push_str(&format!("**Parent:** {}\n", sanitize_heading(&record.parent_name)));
    }
    if !record.image_url.is_empty() {
        out.push_str(&format!(
            "![{}]({})\n",
            escape_md_link(&record.name),
            escape_md_link(&record.image_url)
        ));
    }
    if !record.description.is_empty() {
        out.push('\n');
        out.push_str(&escape_block(&record.description));
        out.push('\n');
    }
    out.push('\n');
}

/// Escape characters that break Markdown link syntax: `[`, `]`, `(`, `)`.
fn escape_md_link(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if matches!(c, '[' | ']' | '(' | ')') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Newlines would break the heading line.
fn sanitize_heading(s: &str) -> String {
    s.chars()
        .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
        .collect()
}

/// Descriptions may span lines; a line starting with `#` or `>` would turn
/// into a heading or quote, so the marker is escaped.
fn escape_block(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, line) in s.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let body = line.trim_start();
        if body.starts_with('#') || body.starts_with('>') {
            out.push_str(&line[..line.len() - body.len()]);
            out.push('\\');
            out.push_str(body);
        } else {
            out.push_str(line);
        }
    }
    out
}
