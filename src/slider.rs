use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::projects::{group_by_category, CategoryGroup, ContentRecord, ProjectsEnvelope};

/// Card width plus gap, in CSS pixels.
pub const SCROLL_STEP: f64 = 320.0;

pub const PLACEHOLDER_IMAGE: &str = "/images/placeholder.svg";

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Empty,
    Populated(Vec<CategoryGroup>),
}

impl LoadState {
    pub fn settled(groups: Vec<CategoryGroup>) -> Self {
        if groups.is_empty() {
            Self::Empty
        } else {
            Self::Populated(groups)
        }
    }

    /// A failed proxy response settles to the empty state.
    pub fn from_envelope(envelope: &ProjectsEnvelope) -> Self {
        match envelope {
            ProjectsEnvelope::Success { results, .. } => Self::settled(group_by_category(results)),
            ProjectsEnvelope::Failure { .. } => Self::Empty,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Left,
    Right,
}

impl ScrollDirection {
    pub fn delta(self) -> f64 {
        match self {
            Self::Left => -SCROLL_STEP,
            Self::Right => SCROLL_STEP,
        }
    }
}

/// Whether a strip gets navigation buttons.
pub fn shows_navigation(group: &CategoryGroup) -> bool {
    group.projects.len() > 1
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Follow the external link in a new tab.
    Open(String),
    /// Show the cover image in the overlay.
    Preview(String),
}

impl CardAction {
    pub fn for_record(record: &ContentRecord) -> Self {
        match &record.link {
            Some(link) => Self::Open(link.clone()),
            None => Self::Preview(record.image.clone()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissTrigger {
    Backdrop,
    CloseButton,
    Escape,
}

/// The full-size image modal. One instance is shared by every card.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    image: Option<String>,
    unavailable: bool,
}

impl Overlay {
    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn is_open(&self) -> bool {
        self.image.is_some()
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn open(&mut self, image: impl Into<String>) {
        self.image = Some(image.into());
        self.unavailable = false;
    }

    /// Returns whether there was anything to close.
    pub fn close(&mut self, _trigger: DismissTrigger) -> bool {
        let was_open = self.is_open();
        self.image = None;
        self.unavailable = false;
        was_open
    }

    pub fn mark_unavailable(&mut self) {
        if self.image.is_some() {
            self.unavailable = true;
        }
    }
}

/// Scroll container handles keyed by category name.
#[derive(Debug, Clone)]
pub struct ScrollRegistry<H> {
    handles: HashMap<String, H>,
}

impl<H> Default for ScrollRegistry<H> {
    fn default() -> Self {
        Self {
            handles: HashMap::new(),
        }
    }
}

impl<H> ScrollRegistry<H> {
    pub fn register(&mut self, category: impl Into<String>, handle: H) {
        self.handles.insert(category.into(), handle);
    }

    pub fn get(&self, category: &str) -> Option<&H> {
        self.handles.get(category)
    }

    pub fn clear(&mut self) {
        self.handles.clear();
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket(u64);

/// Hands out fetch tickets; only the latest ticket stays current until the
/// owner invalidates them all on teardown.
#[derive(Debug, Clone, Default)]
pub struct FetchGuard {
    generation: Arc<AtomicU64>,
}

impl FetchGuard {
    pub fn begin(&self) -> FetchTicket {
        FetchTicket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: FetchTicket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}
