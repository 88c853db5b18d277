//! Terminal host: applies directives to a session and prints the result.
//!
//! Output goes to any `Write` so scripts can be replayed into a buffer.

use std::io::Write;
use std::sync::Arc;

use colored::Colorize;
use tracing::{debug, info, instrument};

use crate::application::{OperationRequest, Session, TickOutcome};
use crate::cli::args::OutputFormat;
use crate::cli::output;
use crate::cli::player;
use crate::cli::render;
use crate::cli::script::{self, Directive};
use crate::cli::{CliError, CliResult};
use crate::domain::Canvas;
use crate::infrastructure::{InfraError, Pacer};

/// Whether the host keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Host<W: Write> {
    session: Session,
    pacer: Arc<dyn Pacer>,
    format: OutputFormat,
    animate: bool,
    out: W,
}

impl<W: Write> Host<W> {
    pub fn new(session: Session, pacer: Arc<dyn Pacer>, format: OutputFormat, animate: bool, out: W) -> Self {
        Self {
            session,
            pacer,
            format,
            animate,
            out,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Apply one directive and print what it produced.
    #[instrument(level = "debug", skip(self))]
    pub fn execute(&mut self, directive: Directive) -> CliResult<Flow> {
        match directive {
            Directive::Request(request) => self.apply(&request)?,
            Directive::Show => self.print_frame()?,
            Directive::Layout => {
                let table = render::layout_table(&self.session.layout());
                self.emit(&table)?;
            }
            Directive::Resize(canvas) => self.resize(canvas)?,
            Directive::Help => self.emit(script::HELP)?,
            Directive::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Execute a whole script. The first malformed line aborts with a usage
    /// error naming `origin` and the line number.
    #[instrument(level = "debug", skip(self, content))]
    pub fn run_script(&mut self, origin: &str, content: &str) -> CliResult<()> {
        for (index, line) in content.lines().enumerate() {
            let directives = script::parse_line(line)
                .map_err(|e| CliError::Usage(format!("{origin}:{}: {e}", index + 1)))?;
            for directive in directives {
                if self.execute(directive)? == Flow::Quit {
                    debug!("script quit at line {}", index + 1);
                    return Ok(());
                }
            }
        }
        Ok(())
    }

    fn apply(&mut self, request: &OperationRequest) -> CliResult<()> {
        let frame = self.session.handle(request);
        if self.format == OutputFormat::Toml {
            // one settled document per request
            self.session.finish_animation();
            return self.print_frame();
        }

        if !frame.narration.is_empty() {
            self.emit(&frame.narration)?;
        }
        self.emit_status()?;
        if self.session.is_animating() {
            self.animate_search()?;
        }
        let outline = render::outline(self.session.tree(), &self.session.frame());
        self.emit(&outline)
    }

    fn animate_search(&mut self) -> CliResult<()> {
        if !self.animate {
            self.session.finish_animation();
            return Ok(());
        }
        if let Some(first) = self.session.highlight() {
            self.emit(&format!("{} visit {}", "→".magenta(), first))?;
        }

        let out = &mut self.out;
        let mut write_error = None;
        let ticks = player::play(&mut self.session, self.pacer.as_ref(), |outcome| {
            let line = match outcome {
                TickOutcome::Highlight(key) => format!("{} visit {}", "→".magenta(), key),
                TickOutcome::Finished(Some(key)) => format!("{} found {}", "→".magenta(), key),
                TickOutcome::Finished(None) => format!("{} no match", "→".magenta()),
                TickOutcome::Idle | TickOutcome::Stale => return,
            };
            // flush per step so the pacing is visible
            if let Err(e) = writeln!(out, "{line}").and_then(|_| out.flush()) {
                write_error.get_or_insert(e);
            }
        });
        if let Some(e) = write_error {
            return Err(InfraError::io("write animation step", e).into());
        }
        debug!("animation printed {} step(s)", ticks);
        Ok(())
    }

    fn resize(&mut self, canvas: Canvas) -> CliResult<()> {
        self.session.resize(canvas)?;
        info!("canvas resized to {}x{}", canvas.width, canvas.height);
        self.emit(&format!("canvas: {}x{}", canvas.width, canvas.height))
    }

    fn print_frame(&mut self) -> CliResult<()> {
        let frame = self.session.frame();
        match self.format {
            OutputFormat::Toml => {
                let text = render::frame_toml(&frame)?;
                self.emit(&text)
            }
            OutputFormat::Text => {
                if !frame.narration.is_empty() {
                    self.emit(&frame.narration)?;
                }
                self.emit_status()?;
                let outline = render::outline(self.session.tree(), &frame);
                self.emit(&outline)
            }
        }
    }

    fn emit_status(&mut self) -> CliResult<()> {
        let status = self.session.status();
        let line = format!("{} {}", output::tone_marker(status.tone), status.message);
        self.emit(&line)
    }

    fn emit(&mut self, text: &str) -> CliResult<()> {
        writeln!(self.out, "{text}").map_err(|e| InfraError::io("write output", e))?;
        Ok(())
    }
}
