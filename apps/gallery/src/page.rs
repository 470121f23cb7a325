//! Static page shell the gallery attaches to.

use gallery_core::{
    app::{FACT_ID, GALLERY_ID, TRIGGER_ID},
    dom::Document,
    gallery::TRIGGER_LABEL,
    html::escape_text,
    view::{Element, Tag},
};

pub const PAGE_TITLE: &str = "NASA Space Explorer";
pub const INITIAL_PROMPT: &str = "Click the button to load space images.";

pub fn scaffold() -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    doc.attach(
        body,
        Element::new(Tag::Main)
            .class("container")
            .child(Element::new(Tag::H1).text(PAGE_TITLE))
            .child(Element::new(Tag::P).attr("id", FACT_ID).class("random-fact"))
            .child(
                Element::new(Tag::Button)
                    .attr("id", TRIGGER_ID)
                    .text(TRIGGER_LABEL),
            )
            .child(
                Element::new(Tag::Div)
                    .attr("id", GALLERY_ID)
                    .class("gallery")
                    .child(
                        Element::new(Tag::Div)
                            .class("placeholder")
                            .text(INITIAL_PROMPT),
                    ),
            )
            .into(),
    );
    doc
}

/// Wraps serialized `<body>` markup into a standalone page.
pub fn render_page(body_html: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{}</title>\n<link rel=\"stylesheet\" href=\"style.css\">\n</head>\n{body_html}\n</html>\n",
        escape_text(PAGE_TITLE)
    )
}
