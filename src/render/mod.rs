//! Display collaborators: turn a [`View`] into cards on some output.

mod html;
mod text;

pub use html::HtmlRenderer;
pub use text::TextRenderer;

use std::io::{self, Write};

use clap::ValueEnum;

use crate::session::View;

pub const NO_RESULTS: &str = "No recommendations found.";
pub const PROMPT: &str = "Enter a destination or keyword (beach, temple, country) to search.";

/// Rendering capability the session output is handed to.
pub trait Render {
    fn render(&mut self, view: &View) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// Markdown-style cards
    #[default]
    Text,
    /// `city-card` HTML fragments
    Html,
    /// The view as JSON
    Json,
}

pub fn renderer<'a>(format: Format, out: impl Write + 'a) -> Box<dyn Render + 'a> {
    match format {
        Format::Text => Box::new(TextRenderer::new(out)),
        Format::Html => Box::new(HtmlRenderer::new(out)),
        Format::Json => Box::new(JsonRenderer::new(out)),
    }
}

pub struct JsonRenderer<W> {
    out: W,
}

impl<W: Write> JsonRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Render for JsonRenderer<W> {
    fn render(&mut self, view: &View) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, view)?;
        writeln!(self.out)?;
        self.out.flush()
    }
}
