//! Interactive session. The dataset loads while the prompt is already
//! accepting input; actions issued before it finishes get a "not ready" notice.

use std::error::Error;
use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::dataset::Retrieve;
use crate::query::EmptyQueryPolicy;
use crate::render::Render;
use crate::session::{Session, SessionError, View};

const PROMPT_MARK: &str = "> ";

#[derive(Debug, PartialEq, Eq)]
enum ShellCommand<'a> {
    Search(&'a str),
    Reset,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse_command(line: &str) -> ShellCommand<'_> {
    match line.trim() {
        ":reset" | ":r" => ShellCommand::Reset,
        ":help" | ":h" | ":?" => ShellCommand::Help,
        ":quit" | ":q" | ":exit" => ShellCommand::Quit,
        cmd if cmd.starts_with(':') => ShellCommand::Unknown(cmd),
        _ => ShellCommand::Search(line),
    }
}

/// Drive one session from `input` until `:quit` or end of input. Views go to
/// `renderer`; prompts and notices go to `console`. A failed load is reported
/// as soon as it happens and returned once the session ends.
pub(super) async fn run<R>(
    session: &mut Session,
    source: &impl Retrieve,
    input: R,
    renderer: &mut dyn Render,
    console: &mut impl Write,
) -> Result<(), Box<dyn Error>>
where
    R: AsyncBufRead + Unpin,
{
    session.begin_load();
    let load = source.retrieve();
    tokio::pin!(load);
    let mut loading = true;
    let mut failure = None;
    let mut lines = input.lines();

    prompt(console)?;
    loop {
        tokio::select! {
            biased;

            outcome = &mut load, if loading => {
                loading = false;
                match session.finish_load(outcome) {
                    Ok(view) => renderer.render(&view)?,
                    Err(e) => {
                        writeln!(console, "error: {e}")?;
                        failure = Some(e);
                    }
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    ShellCommand::Quit => break,
                    ShellCommand::Help => writeln!(console, "{}", help(session))?,
                    ShellCommand::Unknown(cmd) => {
                        writeln!(console, "unknown command {cmd}; type :help for commands")?
                    }
                    ShellCommand::Reset => show(session.reset(), renderer, console)?,
                    ShellCommand::Search(query) => show(session.search(query), renderer, console)?,
                }
            }
        }
        prompt(console)?;
    }
    match failure {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn show(
    result: Result<View, SessionError>,
    renderer: &mut dyn Render,
    console: &mut impl Write,
) -> io::Result<()> {
    match result {
        Ok(view) => renderer.render(&view),
        Err(e) => writeln!(console, "{e}"),
    }
}

fn prompt(console: &mut impl Write) -> io::Result<()> {
    write!(console, "{PROMPT_MARK}")?;
    console.flush()
}

fn help(session: &Session) -> String {
    let engine = session.engine();
    let mut out = String::from(
        "Type a destination, country, or description to search.\n\
         :reset  show the starting view again\n\
         :help   show this help\n\
         :quit   leave\n",
    );
    if !engine.aliases().is_empty() {
        let keywords: Vec<_> = engine.aliases().keywords().collect();
        out.push_str(&format!("Category keywords: {}\n", keywords.join(", ")));
    }
    out.push_str(match engine.empty_query() {
        EmptyQueryPolicy::ShowAll => "An empty search lists every destination.",
        EmptyQueryPolicy::ShowNone => "An empty search lists nothing.",
    });
    out
}
