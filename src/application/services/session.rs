//! Session controller
//!
//! Owns the current tree and everything a renderer shows next to it:
//! narration, status line, highlighted key and the search animation.
//! Requests arrive strictly one after another; every request replaces the
//! tree value atomically.

use std::time::Duration;

use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

use crate::application::animation::{AnimationTicket, SearchAnimation, TickOutcome};
use crate::application::boundary::{Frame, OperationKind, OperationRequest, StatusLine, Tone};
use crate::application::{ApplicationError, ApplicationResult};
use crate::config::Settings;
use crate::domain::narration::{self, Operation, EMPTY_TREE_LINE};
use crate::domain::{
    compute_positions, parse_key, Canvas, DeletionCase, Key, Layout, LayoutParams, NodeFactory,
    Tree,
};

pub const INITIAL_STATUS: &str = "Tree is empty. Add the first element.";
pub const CLEARED_STATUS: &str = "Tree cleared. Add a new element.";

#[derive(Debug)]
pub struct Session {
    factory: NodeFactory,
    tree: Tree,
    narration: Vec<String>,
    status: StatusLine,
    highlight: Option<Key>,
    animation: SearchAnimation,
    canvas: Canvas,
    params: LayoutParams,
    tick_interval: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Settings::default())
    }
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        Self {
            factory: NodeFactory::new(),
            tree: Tree::new(),
            narration: Vec::new(),
            status: StatusLine::new(Tone::Neutral, INITIAL_STATUS),
            highlight: None,
            animation: SearchAnimation::new(),
            canvas: settings.canvas,
            params: settings.layout,
            tick_interval: settings.animation.interval(),
        }
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn narration(&self) -> &[String] {
        &self.narration
    }

    pub fn narration_text(&self) -> String {
        self.narration.join("\n")
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn highlight(&self) -> Option<Key> {
        self.highlight
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_running()
    }

    pub fn active_ticket(&self) -> Option<AnimationTicket> {
        self.animation.ticket()
    }

    /// Delay the host should wait between two ticks.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Dispatch a boundary request and return the resulting frame.
    pub fn handle(&mut self, request: &OperationRequest) -> Frame {
        match request.kind {
            OperationKind::Insert => self.request_insert(&request.raw_input),
            OperationKind::Delete => self.request_delete(&request.raw_input),
            OperationKind::Search => self.request_search(&request.raw_input),
            OperationKind::Traversals => self.request_traversals(),
            OperationKind::Clear => self.request_clear(),
        }
        self.frame()
    }

    #[instrument(level = "debug", skip(self))]
    pub fn request_insert(&mut self, raw: &str) {
        let Some(key) = self.accept_key(raw) else {
            return;
        };
        self.cancel_animation();

        let path = self.tree.search_path(key);
        self.narration = narration::narrate_insert(key, &path);
        self.status = if path.is_empty() {
            StatusLine::new(Tone::Success, format!("Inserted key {key} as root."))
        } else if path.is_found() {
            StatusLine::new(
                Tone::Warning,
                format!("Key {key} already exists. Duplicate ignored."),
            )
        } else {
            StatusLine::new(Tone::Success, format!("Inserted key {key}."))
        };

        let tree = self.tree.insert(&mut self.factory, key);
        self.replace_tree(tree);
        info!("insert {}: {} node(s)", key, self.tree.len());
    }

    #[instrument(level = "debug", skip(self))]
    pub fn request_delete(&mut self, raw: &str) {
        let Some(key) = self.accept_key(raw) else {
            return;
        };
        self.cancel_animation();

        if self.tree.is_empty() {
            self.narration = vec![EMPTY_TREE_LINE.to_string()];
            self.status = StatusLine::new(Tone::Error, "Tree is empty. Nothing to delete.");
            return;
        }

        let path = self.tree.search_path(key);
        let case = path.found_node().map(DeletionCase::classify);
        self.narration = narration::narrate_delete(key, &path, case);
        if case.is_none() {
            self.status =
                StatusLine::new(Tone::Error, format!("Key {key} not found. Nothing to delete."));
            return;
        }

        let tree = self.tree.delete(key);
        self.replace_tree(tree);
        self.status = StatusLine::new(Tone::Success, format!("Deleted key {key}."));
        info!("delete {}: {} node(s)", key, self.tree.len());
    }

    #[instrument(level = "debug", skip(self))]
    pub fn request_search(&mut self, raw: &str) {
        let Some(key) = self.accept_key(raw) else {
            return;
        };
        self.cancel_animation();

        let path = self.tree.search_path(key);
        self.narration = narration::narrate(key, &path, Operation::Search);
        if path.is_empty() {
            self.status = StatusLine::new(Tone::Error, "Tree is empty. Nothing to search.");
            return;
        }

        let found = path.is_found();
        let steps = path.len();
        self.status = if found {
            StatusLine::new(
                Tone::Info,
                format!("Searching for {key}: {steps} step(s). Target found."),
            )
        } else {
            StatusLine::new(
                Tone::Error,
                format!("Searching for {key}: {steps} step(s). Target NOT found."),
            )
        };
        let (ticket, first) = self.animation.start(key, path.keys(), found);
        self.highlight = first;
        debug!("search {}: animation {:?} over {} step(s)", key, ticket, steps);
    }

    #[instrument(level = "debug", skip(self))]
    pub fn request_traversals(&mut self) {
        self.narration = narration::describe_traversals(&self.tree);
        self.status = StatusLine::new(
            Tone::Info,
            format!("Traversals of {} node(s).", self.tree.len()),
        );
    }

    #[instrument(level = "debug", skip(self))]
    pub fn request_clear(&mut self) {
        self.cancel_animation();
        self.tree = Tree::new();
        self.narration.clear();
        self.status = StatusLine::new(Tone::Neutral, CLEARED_STATUS);
    }

    /// Advance the search animation by one step.
    ///
    /// Ticks carrying the ticket of a cancelled animation change nothing.
    pub fn tick(&mut self, ticket: AnimationTicket) -> TickOutcome {
        let outcome = self.animation.tick(ticket);
        match outcome {
            TickOutcome::Highlight(key) => self.highlight = Some(key),
            TickOutcome::Finished(last) => self.highlight = last,
            TickOutcome::Stale => debug!("ignoring stale tick {:?}", ticket),
            TickOutcome::Idle => {}
        }
        outcome
    }

    /// Run the active animation to its end without waiting.
    pub fn finish_animation(&mut self) {
        while let Some(ticket) = self.animation.ticket() {
            self.tick(ticket);
        }
    }

    /// Change the canvas the layout is computed for.
    pub fn resize(&mut self, canvas: Canvas) -> ApplicationResult<()> {
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ApplicationError::Config {
                message: format!("canvas must be positive, got {}x{}", canvas.width, canvas.height),
            });
        }
        self.canvas = canvas;
        Ok(())
    }

    /// Preload the tree from trusted key text, e.g. a `--seed` option.
    ///
    /// Unlike user requests, an invalid key is an error here.
    pub fn seed<S: AsRef<str>>(&mut self, raw_keys: &[S]) -> ApplicationResult<usize> {
        let keys: Vec<Key> = raw_keys
            .iter()
            .map(|raw| parse_key(raw.as_ref()))
            .collect::<Result<_, _>>()?;
        self.cancel_animation();
        let tree = keys
            .iter()
            .fold(self.tree.clone(), |tree, &key| tree.insert(&mut self.factory, key));
        self.replace_tree(tree);
        self.narration = vec![format!("Seeded keys: {}", keys.iter().join(" "))];
        self.status = StatusLine::new(
            Tone::Success,
            format!("Tree holds {} node(s).", self.tree.len()),
        );
        Ok(keys.len())
    }

    pub fn layout(&self) -> Layout {
        compute_positions(&self.tree, self.canvas, &self.params)
    }

    /// Snapshot of everything the renderer needs.
    pub fn frame(&self) -> Frame {
        let layout = self.layout();
        Frame {
            narration: self.narration_text(),
            status: self.status.clone(),
            highlight: self.highlight,
            tree_height: self.tree.height(),
            animating: self.is_animating(),
            ticket: self.active_ticket(),
            nodes: layout.nodes,
            edges: layout.edges,
        }
    }

    fn accept_key(&mut self, raw: &str) -> Option<Key> {
        match parse_key(raw) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!("rejected input {:?}: {}", raw, e);
                self.narration = vec![e.to_string()];
                self.status = StatusLine::new(Tone::Error, format!("Input error: {e}"));
                None
            }
        }
    }

    fn cancel_animation(&mut self) {
        self.animation.cancel();
        self.highlight = None;
    }

    fn replace_tree(&mut self, tree: Tree) {
        debug_assert!(tree.is_valid_bst(), "BST invariant violated");
        self.tree = tree;
    }
}
