//! Terminal-backed mount points.

use std::collections::BTreeMap;

use ratatui::Terminal;
use ratatui::backend::Backend;
use ratatui::layout::Rect;

use pickem_engine::{Host, MountError, ROOT_MOUNT_ID, Store};
use pickem_types::UiOptions;

use crate::components::{Provider, app_tree};

/// Named regions of the terminal that a tree can be mounted into.
///
/// An element without a rectangle covers the whole frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    elements: BTreeMap<String, Option<Rect>>,
}

impl Default for Document {
    fn default() -> Self {
        Self::empty().with_element(ROOT_MOUNT_ID, None)
    }
}

impl Document {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            elements: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_element(mut self, id: impl Into<String>, area: Option<Rect>) -> Self {
        self.elements.insert(id.into(), area);
        self
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.elements.contains_key(id)
    }

    /// Area of `id` clipped to `frame`.
    #[must_use]
    pub fn resolve(&self, id: &str, frame: Rect) -> Option<Rect> {
        self.elements
            .get(id)
            .map(|area| area.map_or(frame, |rect| rect.intersection(frame)))
    }
}

struct Mounted {
    target: String,
    tree: Provider,
}

/// [`Host`] that draws into a ratatui terminal.
pub struct TerminalHost<B: Backend> {
    terminal: Terminal<B>,
    document: Document,
    options: UiOptions,
    mounted: Option<Mounted>,
}

impl<B: Backend> TerminalHost<B> {
    pub fn new(terminal: Terminal<B>, options: UiOptions) -> Self {
        Self {
            terminal,
            document: Document::default(),
            options,
            mounted: None,
        }
    }

    #[must_use]
    pub fn with_document(mut self, document: Document) -> Self {
        self.document = document;
        self
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }

    #[must_use]
    pub fn mounted_store(&self) -> Option<&Store> {
        self.mounted.as_ref().map(|mounted| mounted.tree.store())
    }

    /// Draw the mounted tree again. Does nothing before the first mount.
    pub fn redraw(&mut self) -> Result<(), B::Error> {
        let Some(mounted) = &self.mounted else {
            return Ok(());
        };
        let document = &self.document;
        self.terminal.draw(|frame| {
            if let Some(area) = document.resolve(&mounted.target, frame.area()) {
                mounted.tree.render(frame, area);
            }
        })?;
        Ok(())
    }
}

impl<B: Backend> Host for TerminalHost<B> {
    fn mount(&mut self, target: &str, store: &Store) -> Result<(), MountError> {
        if !self.document.contains(target) {
            tracing::error!(mount_target = target, "mount target not found");
            return Err(MountError::TargetNotFound(target.to_string()));
        }

        self.mounted = Some(Mounted {
            target: target.to_string(),
            tree: app_tree(store.clone(), self.options),
        });
        if let Err(err) = self.redraw() {
            self.mounted = None;
            return Err(MountError::Render(err.to_string()));
        }
        Ok(())
    }
}
