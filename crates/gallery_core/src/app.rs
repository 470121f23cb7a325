//! Application context: the page document, its anchors, the controllers and the data source.

use catalog_client::CatalogSource;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    dom::{Document, Key, Navigation, NodeId},
    facts::{render_fact, FactPicker},
    format::{DateFormatter, DateStyle},
    gallery::{FetchTicket, GalleryController, GalleryState, ShapePolicy},
    html,
    modal::ModalController,
    view::{Action, Tag},
};

pub const TRIGGER_ID: &str = "getImageBtn";
pub const GALLERY_ID: &str = "gallery";
pub const FACT_ID: &str = "randomFact";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AttachError {
    #[error("page is missing required element #{0}")]
    MissingAnchor(&'static str),
}

/// Pre-existing page elements the gallery attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchors {
    pub trigger: NodeId,
    pub gallery: NodeId,
    pub fact: Option<NodeId>,
}

impl Anchors {
    pub fn resolve(doc: &Document) -> Result<Self, AttachError> {
        let trigger = doc
            .element_by_id(TRIGGER_ID)
            .ok_or(AttachError::MissingAnchor(TRIGGER_ID))?;
        let gallery = doc
            .element_by_id(GALLERY_ID)
            .ok_or(AttachError::MissingAnchor(GALLERY_ID))?;
        Ok(Self {
            trigger,
            gallery,
            fact: doc.element_by_id(FACT_ID),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GalleryOptions {
    pub date_style: DateStyle,
    pub shape_policy: ShapePolicy,
}

pub struct Gallery<S> {
    document: Document,
    anchors: Anchors,
    source: S,
    gallery: GalleryController,
    modal: ModalController,
    facts: FactPicker,
    navigations: Vec<Navigation>,
}

impl<S: CatalogSource> Gallery<S> {
    /// Binds the gallery to the anchors of `document` and registers the trigger handler.
    pub fn attach(
        mut document: Document,
        source: S,
        options: GalleryOptions,
    ) -> Result<Self, AttachError> {
        let anchors = Anchors::resolve(&document)?;
        document.set_on_click(anchors.trigger, Action::FetchRequested);

        let formatter = DateFormatter::new(options.date_style);
        let gallery = GalleryController::new(anchors.trigger, anchors.gallery, formatter)
            .with_shape_policy(options.shape_policy);

        Ok(Self {
            document,
            anchors,
            source,
            gallery,
            modal: ModalController::new(formatter),
            facts: FactPicker::default(),
            navigations: Vec::new(),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn anchors(&self) -> Anchors {
        self.anchors
    }

    pub fn state(&self) -> &GalleryState {
        self.gallery.state()
    }

    pub fn modal(&self) -> &ModalController {
        &self.modal
    }

    /// Links activated so far, in order.
    pub fn navigations(&self) -> &[Navigation] {
        &self.navigations
    }

    /// Cards currently shown in the gallery container.
    pub fn cards(&self) -> Vec<NodeId> {
        self.document.find_all(self.anchors.gallery, Tag::Article)
    }

    pub fn to_html(&self) -> String {
        html::to_html(&self.document)
    }

    /// Writes a random fact into the fact region, if the page has one.
    pub fn start(&mut self) -> Option<&'static str> {
        let fact = self.facts.pick()?;
        self.show_fact(fact).then_some(fact)
    }

    pub fn show_fact(&mut self, fact: &str) -> bool {
        let Some(region) = self.anchors.fact else {
            debug!("page has no fact region");
            return false;
        };
        self.document.clear_children(region);
        for view in render_fact(fact) {
            self.document.attach(region, view);
        }
        true
    }

    /// Dispatches a click on `target` and runs the handlers it reached.
    pub async fn click(&mut self, target: NodeId) {
        let event = self.document.click(target);

        for handler in &event.handlers {
            match handler.action {
                Action::FetchRequested => {
                    self.request_fetch().await;
                }
                Action::OpenModal => {
                    if event.within_link() {
                        continue;
                    }
                    if let Some(record) = self.document.record(handler.current).cloned() {
                        self.modal.open(&mut self.document, record);
                    }
                }
                Action::CloseModal => {
                    self.modal.close(&mut self.document);
                }
                Action::BackdropClick => {
                    self.modal.backdrop_clicked(&mut self.document, &event);
                }
            }
        }

        if let Some(navigation) = event.link {
            info!(href = %navigation.href, "opening link in a new browsing context");
            self.navigations.push(navigation);
        }
    }

    pub fn key_down(&mut self, key: Key) {
        for action in self.document.key_down(key) {
            if action == Action::CloseModal {
                self.modal.close(&mut self.document);
            }
        }
    }

    /// Runs one full fetch cycle.
    pub async fn request_fetch(&mut self) -> &GalleryState {
        let ticket = self.begin_fetch();
        let result = self.source.fetch().await;
        self.gallery.finish(&mut self.document, ticket, result);
        self.gallery.state()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.gallery.begin(&mut self.document)
    }

    /// Fetches from the source and applies the result for `ticket`.
    ///
    /// Returns `false` when a newer cycle superseded `ticket`.
    pub async fn complete_fetch(&mut self, ticket: FetchTicket) -> bool {
        let result = self.source.fetch().await;
        self.gallery
            .finish(&mut self.document, ticket, result)
            .is_some()
    }
}

#[cfg(test)]
#[path = "tests/app_tests.rs"]
mod tests;
