//! One pipeline per dashboard page.
//!
//! Each page has a pure `build_*` step over already-read text, and an async
//! `load_*` entry point that resolves sources through the [`Loader`](crate::fetch::Loader)
//! and hands the text to the build step.

pub mod news;
pub mod performance;
pub mod post_mix;
pub mod post_types;
pub mod sentiment;
pub mod summary;

use serde::Serialize;

use crate::config::ALL_CATEGORY;

/// Which category a chart is isolated to, if any.
///
/// Owned by whoever renders the page; nothing in the pipelines keeps it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeriesFilter {
    active: Option<String>,
}

impl SeriesFilter {
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Isolates `key`; selecting the isolated category again (or "All") shows everything.
    pub fn toggle(&mut self, key: &str) {
        if key == ALL_CATEGORY || self.active.as_deref() == Some(key) {
            self.active = None;
        } else {
            self.active = Some(key.to_string());
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.active.as_deref().is_none_or(|active| active == key)
    }
}
