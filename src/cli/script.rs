//! Command grammar shared by the REPL and `run` scripts
//!
//! One command per line, words separated by whitespace. `#` starts a
//! comment. Key commands accept several keys and expand into one request
//! per key; without a key they still produce a request so the session can
//! narrate the missing input.

use std::str::FromStr;

use thiserror::Error;

use crate::application::{OperationKind, OperationRequest};
use crate::domain::Canvas;

#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    Request(OperationRequest),
    Show,
    Layout,
    Resize(Canvas),
    Help,
    Quit,
}

/// Reasons a line is not a command.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}'")]
    UnknownCommand(String),

    #[error("bad arguments for '{command}', usage: {usage}")]
    BadArguments { command: String, usage: &'static str },
}

pub const HELP: &str = "\
insert|i K...   insert keys
delete|d K...   delete keys
search|s K      animated search
traverse|t      in-, pre- and post-order
clear|c         empty the tree
show            print the current frame
layout          print node positions and edges
resize W H      change the canvas
help            this text
quit|q          leave";

/// Parse one line into zero or more directives.
pub fn parse_line(line: &str) -> Result<Vec<Directive>, ParseError> {
    let content = line.split('#').next().unwrap_or_default();
    let mut words = content.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(Vec::new());
    };
    let args: Vec<&str> = words.collect();

    if let Ok(kind) = OperationKind::from_str(command) {
        return Ok(requests(kind, &args));
    }

    let directive = match command.to_ascii_lowercase().as_str() {
        "show" => Directive::Show,
        "layout" => Directive::Layout,
        "help" | "?" => Directive::Help,
        "quit" | "q" | "exit" => Directive::Quit,
        "resize" => Directive::Resize(parse_canvas(command, &args)?),
        _ => return Err(ParseError::UnknownCommand(command.to_string())),
    };
    Ok(vec![directive])
}

fn requests(kind: OperationKind, args: &[&str]) -> Vec<Directive> {
    if !kind.takes_key() || args.is_empty() {
        return vec![Directive::Request(OperationRequest::new(kind, ""))];
    }
    args.iter()
        .map(|raw| Directive::Request(OperationRequest::new(kind, *raw)))
        .collect()
}

fn parse_canvas(command: &str, args: &[&str]) -> Result<Canvas, ParseError> {
    let bad = || ParseError::BadArguments {
        command: command.to_string(),
        usage: "resize WIDTH HEIGHT",
    };
    let [width, height] = args else {
        return Err(bad());
    };
    let width: f64 = width.parse().map_err(|_| bad())?;
    let height: f64 = height.parse().map_err(|_| bad())?;
    Ok(Canvas { width, height })
}
