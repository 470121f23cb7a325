//! Maps one catalog record to its gallery card.

use shared::domain::{CatalogRecord, Media};

use crate::{
    format::DateFormatter,
    view::{Action, Element, Tag, View},
};

pub const IMAGE_ALT: &str = "APOD Image";
pub const VIDEO_ALT: &str = "APOD Video";
pub const VIDEO_LINK_LABEL: &str = "Open video in new tab";
pub const VIDEO_LINK_TEXT: &str = "View video";
pub const RESOURCE_LINK_TEXT: &str = "Open resource";
/// Link target used when a record has no url.
pub const PLACEHOLDER_HREF: &str = "#";

/// Renders the card for `record`: media block, title and display date.
///
/// The card carries the record and an [`Action::OpenModal`] handler; links
/// inside it open in a new browsing context.
pub fn render_item(record: &CatalogRecord, formatter: &DateFormatter) -> View {
    Element::new(Tag::Article)
        .class("gallery-item")
        .on_click(Action::OpenModal)
        .with_record(record.clone())
        .child(media_block(record))
        .child(Element::new(Tag::H3).text(record.display_title()))
        .child(
            Element::new(Tag::P)
                .class("date")
                .text(formatter.format(record.date_or_empty())),
        )
        .into()
}

fn media_block(record: &CatalogRecord) -> View {
    match &record.media {
        Media::Image { url, .. } => external_link(url.as_deref())
            .child(media_image(
                record.media.image_source(),
                alt_text(record, IMAGE_ALT),
            ))
            .into(),
        Media::Video {
            url,
            thumbnail_url: Some(thumbnail),
        } => external_link(url.as_deref())
            .attr("aria-label", VIDEO_LINK_LABEL)
            .child(media_image(Some(thumbnail), alt_text(record, VIDEO_ALT)))
            .into(),
        Media::Video {
            url,
            thumbnail_url: None,
        } => Element::new(Tag::Div)
            .class("link-box")
            .child(external_link(url.as_deref()).text(VIDEO_LINK_TEXT))
            .into(),
        Media::Other { url, .. } => external_link(url.as_deref())
            .text(RESOURCE_LINK_TEXT)
            .into(),
    }
}

pub(crate) fn external_link(href: Option<&str>) -> Element {
    Element::new(Tag::A)
        .attr("href", href.unwrap_or(PLACEHOLDER_HREF))
        .attr("target", "_blank")
        .attr("rel", "noopener noreferrer")
}

pub(crate) fn media_image(src: Option<&str>, alt: &str) -> Element {
    Element::new(Tag::Img).attr_opt("src", src).attr("alt", alt)
}

pub(crate) fn alt_text<'a>(record: &'a CatalogRecord, fallback: &'a str) -> &'a str {
    record.title.as_deref().unwrap_or(fallback)
}

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
