//! HTML serialization of an attached document.

use tracing::warn;

use crate::dom::{Document, NodeId};

/// Attributes whose presence alone carries their meaning.
const BOOLEAN_ATTRS: [&str; 2] = ["disabled", "allowfullscreen"];

/// Serializes the document body and everything attached under it.
pub fn to_html(doc: &Document) -> String {
    node_html(doc, doc.body())
}

pub fn node_html(doc: &Document, id: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, id, &mut out);
    out
}

fn write_node(doc: &Document, id: NodeId, out: &mut String) {
    if let Some(text) = doc.text(id) {
        out.push_str(&escape_text(text));
        return;
    }
    let Some(tag) = doc.tag(id) else {
        return;
    };

    out.push('<');
    out.push_str(tag.name());
    for (name, value) in doc.attrs(id) {
        push_attr(out, name, value);
    }
    if let Some(record) = doc.record(id) {
        match serde_json::to_string(record) {
            Ok(json) => push_attr(out, "data-apod", &json),
            Err(err) => warn!(error = %err, "could not serialize attached record"),
        }
    }
    out.push('>');

    if tag.is_void() {
        return;
    }
    for child in doc.children(id) {
        write_node(doc, *child, out);
    }
    out.push_str("</");
    out.push_str(tag.name());
    out.push('>');
}

fn push_attr(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    if BOOLEAN_ATTRS.contains(&name) {
        return;
    }
    out.push_str("=\"");
    out.push_str(&escape_attr(value));
    out.push('"');
}

pub fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{Action, Element, Tag};

    #[test]
    fn serializes_nested_elements_with_escaping() {
        let mut doc = Document::new();
        let body = doc.body();
        doc.attach(
            body,
            Element::new(Tag::Div)
                .class("meta")
                .child(Element::new(Tag::H2).text("Tom & <Jerry>"))
                .child(Element::new(Tag::Img).attr("alt", "say \"hi\""))
                .into(),
        );

        assert_eq!(
            to_html(&doc),
            "<body><div class=\"meta\"><h2>Tom &amp; &lt;Jerry&gt;</h2>\
             <img alt=\"say &quot;hi&quot;\"></div></body>"
        );
    }

    #[test]
    fn boolean_attributes_have_no_value() {
        let mut doc = Document::new();
        let body = doc.body();
        let button = doc.attach(
            body,
            Element::new(Tag::Button)
                .attr("disabled", "")
                .on_click(Action::FetchRequested)
                .text("Loading...")
                .into(),
        );
        assert_eq!(node_html(&doc, button), "<button disabled>Loading...</button>");
    }

    #[test]
    fn empty_values_of_ordinary_attributes_are_kept() {
        let mut doc = Document::new();
        let body = doc.body();
        let frame = doc.attach(
            body,
            Element::new(Tag::Iframe)
                .attr("title", "")
                .attr("allowfullscreen", "")
                .into(),
        );
        let img = doc.attach(body, Element::new(Tag::Img).attr("alt", "").into());

        assert_eq!(
            node_html(&doc, frame),
            "<iframe title=\"\" allowfullscreen></iframe>"
        );
        assert_eq!(node_html(&doc, img), "<img alt=\"\">");
    }

    #[test]
    fn attached_records_are_embedded_as_data_attribute() {
        let record = serde_json::from_value(serde_json::json!({"title": "M1", "media_type": "image"}))
            .expect("record");
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.attach(body, Element::new(Tag::Article).with_record(record).into());

        let html = node_html(&doc, card);
        assert!(html.starts_with("<article data-apod=\"{&quot;title&quot;:&quot;M1&quot;"));
    }
}
