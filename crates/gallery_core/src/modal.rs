//! Detail overlay for a single catalog record.
//!
//! At most one overlay exists at a time: opening while another is shown
//! closes the previous one first. The overlay owns its subtree and its
//! Escape listener, and both are released by every close path.

use shared::domain::{CatalogRecord, Media};
use tracing::debug;
use url::Url;

use crate::{
    dom::{ClickEvent, Document, Key, ListenerId, NodeId},
    format::DateFormatter,
    render::{alt_text, external_link, media_image, IMAGE_ALT, VIDEO_ALT},
    view::{Action, Element, Tag, View},
};

pub const CLOSE_LABEL: &str = "Close";
pub const OPEN_VIDEO_TEXT: &str = "Open video";
pub const EMBED_PERMISSIONS: &str =
    "accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture";

const EMBEDDABLE_HOSTS: [&str; 3] = ["youtube.com", "youtube-nocookie.com", "vimeo.com"];

#[derive(Debug)]
struct OpenOverlay {
    backdrop: NodeId,
    escape: ListenerId,
    record: CatalogRecord,
}

#[derive(Debug, Default)]
pub struct ModalController {
    formatter: DateFormatter,
    open: Option<OpenOverlay>,
}

impl ModalController {
    pub fn new(formatter: DateFormatter) -> Self {
        Self {
            formatter,
            open: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn backdrop(&self) -> Option<NodeId> {
        self.open.as_ref().map(|open| open.backdrop)
    }

    pub fn record(&self) -> Option<&CatalogRecord> {
        self.open.as_ref().map(|open| &open.record)
    }

    /// Shows the overlay for `record` under the document body and returns its backdrop.
    pub fn open(&mut self, doc: &mut Document, record: CatalogRecord) -> NodeId {
        if self.close(doc) {
            debug!("replaced open modal");
        }

        let body = doc.body();
        let backdrop = doc.attach(body, modal_view(&record, &self.formatter));
        let escape = doc.add_key_listener(Key::Escape, Action::CloseModal);
        debug!(title = record.display_title(), "opened modal");
        self.open = Some(OpenOverlay {
            backdrop,
            escape,
            record,
        });
        backdrop
    }

    /// Closes the overlay. Returns `false` when nothing was open.
    pub fn close(&mut self, doc: &mut Document) -> bool {
        let Some(open) = self.open.take() else {
            return false;
        };
        doc.remove_key_listener(open.escape);
        if doc.is_attached(open.backdrop) {
            doc.detach(open.backdrop);
        }
        true
    }

    /// Closes the overlay only if `event` targeted the backdrop itself.
    pub fn backdrop_clicked(&mut self, doc: &mut Document, event: &ClickEvent) -> bool {
        match self.backdrop() {
            Some(backdrop) if event.target == backdrop => self.close(doc),
            _ => false,
        }
    }
}

/// Builds the overlay tree: backdrop, dialog, close control, media, meta, explanation.
pub fn modal_view(record: &CatalogRecord, formatter: &DateFormatter) -> View {
    let mut dialog = Element::new(Tag::Div)
        .class("modal")
        .attr("role", "dialog")
        .attr("aria-modal", "true")
        .child(
            Element::new(Tag::Button)
                .class("close-btn")
                .on_click(Action::CloseModal)
                .text(CLOSE_LABEL),
        );

    if let Some(media) = modal_media(record) {
        dialog = dialog.child(media);
    }

    dialog = dialog.child(
        Element::new(Tag::Div)
            .class("meta")
            .child(Element::new(Tag::H2).text(record.display_title()))
            .child(
                Element::new(Tag::Div)
                    .class("date")
                    .text(formatter.format(record.date_or_empty())),
            ),
    );

    if let Some(explanation) = record.explanation.as_deref().filter(|e| !e.is_empty()) {
        dialog = dialog.child(
            Element::new(Tag::Div)
                .class("explanation")
                .text(explanation),
        );
    }

    Element::new(Tag::Div)
        .class("modal-backdrop")
        .on_click(Action::BackdropClick)
        .child(dialog)
        .into()
}

fn modal_media(record: &CatalogRecord) -> Option<Element> {
    match &record.media {
        Media::Image { .. } => Some(media_image(
            record.media.image_source(),
            alt_text(record, IMAGE_ALT),
        )),
        Media::Video {
            url: Some(url),
            ..
        } if is_embeddable(url) => Some(
            Element::new(Tag::Iframe)
                .attr("src", url.as_str())
                .attr("width", "100%")
                .attr("height", "500")
                .attr("frameborder", "0")
                .attr("allow", EMBED_PERMISSIONS)
                .attr("allowfullscreen", ""),
        ),
        Media::Video {
            thumbnail_url: Some(thumbnail),
            ..
        } => Some(media_image(Some(thumbnail), alt_text(record, VIDEO_ALT))),
        Media::Video { url, .. } => Some(external_link(url.as_deref()).text(OPEN_VIDEO_TEXT)),
        Media::Other { .. } => None,
    }
}

/// Whether `url` points at a video platform that can be shown in an inline player.
pub fn is_embeddable(url: &str) -> bool {
    // Scheme-relative urls resolve to https; bare paths stay on the local page.
    let base = Url::parse("https://localhost/").ok();
    let Ok(parsed) = Url::options().base_url(base.as_ref()).parse(url) else {
        return false;
    };
    let Some(host) = parsed.host_str() else {
        return false;
    };
    EMBEDDABLE_HOSTS.iter().any(|platform| {
        host == *platform
            || host
                .strip_suffix(platform)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

#[cfg(test)]
#[path = "tests/modal_tests.rs"]
mod tests;
