//! Fetch-and-render lifecycle of the gallery container and its trigger control.

use catalog_client::{CatalogPayload, FetchError};
use serde::{Deserialize, Serialize};
use shared::domain::CatalogRecord;
use tracing::{debug, error, info, warn};

use crate::{
    dom::{Document, NodeId},
    format::DateFormatter,
    render::render_item,
    view::{Element, Tag},
};

pub const TRIGGER_LABEL: &str = "Fetch Space Images";
pub const TRIGGER_BUSY_LABEL: &str = "Loading...";
pub const LOADING_MESSAGE: &str = "🔄 Loading space photos…";
pub const EMPTY_MESSAGE: &str = "No images found.";
pub const ERROR_MESSAGE: &str = "Failed to load images. Please try again later.";

#[derive(Debug, Clone, PartialEq)]
pub enum GalleryState {
    Idle,
    Loading,
    Populated(Vec<CatalogRecord>),
    Empty,
    /// Internal failure detail; the page only shows [`ERROR_MESSAGE`].
    Error(String),
}

/// How a parsed body that is not an array is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePolicy {
    #[default]
    TreatAsEmpty,
    TreatAsError,
}

/// Token of one fetch cycle. Only the most recently issued ticket may finish it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket {
    token: u64,
}

#[derive(Debug)]
pub struct GalleryController {
    trigger: NodeId,
    container: NodeId,
    formatter: DateFormatter,
    shape_policy: ShapePolicy,
    state: GalleryState,
    latest_token: u64,
}

impl GalleryController {
    pub fn new(trigger: NodeId, container: NodeId, formatter: DateFormatter) -> Self {
        Self {
            trigger,
            container,
            formatter,
            shape_policy: ShapePolicy::default(),
            state: GalleryState::Idle,
            latest_token: 0,
        }
    }

    #[must_use]
    pub fn with_shape_policy(mut self, shape_policy: ShapePolicy) -> Self {
        self.shape_policy = shape_policy;
        self
    }

    pub fn state(&self) -> &GalleryState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == GalleryState::Loading
    }

    /// Enters the loading state and issues a new ticket.
    pub fn begin(&mut self, doc: &mut Document) -> FetchTicket {
        self.latest_token += 1;
        let ticket = FetchTicket {
            token: self.latest_token,
        };

        doc.clear_children(self.container);
        doc.set_attr(self.container, "aria-live", "polite");
        doc.attach(
            self.container,
            placeholder(LOADING_MESSAGE).attr("role", "status").into(),
        );
        doc.set_attr(self.trigger, "disabled", "");
        doc.set_text(self.trigger, TRIGGER_BUSY_LABEL);

        self.state = GalleryState::Loading;
        info!(token = ticket.token, "catalog fetch started");
        ticket
    }

    /// Applies the outcome of the cycle identified by `ticket`.
    ///
    /// Returns `None` without touching the document when a newer cycle has
    /// been started since. Otherwise the trigger control is always restored.
    pub fn finish(
        &mut self,
        doc: &mut Document,
        ticket: FetchTicket,
        result: Result<CatalogPayload, FetchError>,
    ) -> Option<&GalleryState> {
        if ticket.token != self.latest_token {
            debug!(
                token = ticket.token,
                latest = self.latest_token,
                "discarding stale catalog response"
            );
            return None;
        }

        self.state = self.apply(doc, result);
        self.restore_trigger(doc);
        Some(&self.state)
    }

    fn apply(
        &self,
        doc: &mut Document,
        result: Result<CatalogPayload, FetchError>,
    ) -> GalleryState {
        doc.clear_children(self.container);
        match result {
            Ok(CatalogPayload::Records(records)) if !records.is_empty() => {
                for record in &records {
                    doc.attach(self.container, render_item(record, &self.formatter));
                }
                info!(count = records.len(), "rendered catalog");
                GalleryState::Populated(records)
            }
            Ok(CatalogPayload::Records(_)) => self.show_empty(doc),
            Ok(CatalogPayload::ShapeMismatch { found }) => match self.shape_policy {
                ShapePolicy::TreatAsEmpty => {
                    warn!(found, "catalog body is not an array; showing empty gallery");
                    self.show_empty(doc)
                }
                ShapePolicy::TreatAsError => {
                    error!(found, "catalog body is not an array");
                    self.show_error(doc, format!("expected a JSON array, found {found}"))
                }
            },
            Err(err) => {
                error!(error = %err, "catalog fetch failed");
                self.show_error(doc, err.to_string())
            }
        }
    }

    fn show_empty(&self, doc: &mut Document) -> GalleryState {
        doc.attach(self.container, placeholder(EMPTY_MESSAGE).into());
        GalleryState::Empty
    }

    fn show_error(&self, doc: &mut Document, detail: String) -> GalleryState {
        doc.attach(self.container, placeholder(ERROR_MESSAGE).into());
        GalleryState::Error(detail)
    }

    fn restore_trigger(&self, doc: &mut Document) {
        doc.remove_attr(self.trigger, "disabled");
        doc.set_text(self.trigger, TRIGGER_LABEL);
    }
}

fn placeholder(message: &str) -> Element {
    Element::new(Tag::Div).class("placeholder").text(message)
}

#[cfg(test)]
#[path = "tests/gallery_tests.rs"]
mod tests;
