use std::collections::VecDeque;

use async_trait::async_trait;
use catalog_client::{CatalogPayload, FetchError, StatusCode};
use shared::domain::CatalogRecord;
use tokio::sync::Mutex;

use super::*;
use crate::{
    facts::{FACT_LABEL, SPACE_FACTS},
    gallery::{EMPTY_MESSAGE, ERROR_MESSAGE, TRIGGER_LABEL},
    view::Element,
};

struct ScriptedSource {
    responses: Mutex<VecDeque<Result<CatalogPayload, FetchError>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<Result<CatalogPayload, FetchError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    fn records(json: serde_json::Value) -> Self {
        let records: Vec<CatalogRecord> = serde_json::from_value(json).expect("records");
        Self::new(vec![Ok(CatalogPayload::Records(records))])
    }
}

#[async_trait]
impl CatalogSource for ScriptedSource {
    async fn fetch(&self) -> Result<CatalogPayload, FetchError> {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or(Ok(CatalogPayload::Records(Vec::new())))
    }
}

fn shell(with_fact_region: bool) -> Document {
    let mut doc = Document::new();
    let body = doc.body();
    doc.attach(
        body,
        Element::new(Tag::Button)
            .attr("id", TRIGGER_ID)
            .text(TRIGGER_LABEL)
            .into(),
    );
    if with_fact_region {
        doc.attach(body, Element::new(Tag::P).attr("id", FACT_ID).into());
    }
    doc.attach(body, Element::new(Tag::Div).attr("id", GALLERY_ID).into());
    doc
}

fn gallery(source: ScriptedSource) -> Gallery<ScriptedSource> {
    Gallery::attach(shell(true), source, GalleryOptions::default()).expect("attach")
}

fn apod_sample() -> serde_json::Value {
    serde_json::json!([
        {"title": "M1", "date": "2024-01-01", "media_type": "image", "url": "a.jpg",
         "explanation": "Crab."},
        {"title": "Launch", "date": "2024-01-02", "media_type": "video",
         "url": "https://www.youtube.com/embed/launch"},
        {"title": "Tone", "date": "2024-01-03", "media_type": "audio", "url": "tone.mp3"}
    ])
}

#[test]
fn missing_required_anchor_is_reported() {
    let mut doc = Document::new();
    let body = doc.body();
    doc.attach(body, Element::new(Tag::Div).attr("id", GALLERY_ID).into());

    let err = Gallery::attach(doc, ScriptedSource::new(Vec::new()), GalleryOptions::default())
        .err()
        .expect("trigger is required");
    assert_eq!(err, AttachError::MissingAnchor(TRIGGER_ID));
}

#[test]
fn start_writes_a_fact_into_the_region() {
    let mut app = gallery(ScriptedSource::new(Vec::new()));

    let fact = app.start().expect("fact shown");
    assert!(SPACE_FACTS.contains(&fact));
    let region = app.anchors().fact.expect("region");
    let text = app.document().text_content(region);
    assert!(text.starts_with(FACT_LABEL));
    assert!(text.contains(fact));
}

#[test]
fn start_without_fact_region_is_silent() {
    let mut app = Gallery::attach(
        shell(false),
        ScriptedSource::new(Vec::new()),
        GalleryOptions::default(),
    )
    .expect("fact region is optional");
    assert_eq!(app.start(), None);
}

#[tokio::test]
async fn clicking_the_trigger_populates_the_gallery_in_order() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    let trigger = app.anchors().trigger;

    app.click(trigger).await;

    assert!(matches!(app.state(), GalleryState::Populated(records) if records.len() == 3));
    let titles: Vec<String> = app
        .cards()
        .into_iter()
        .map(|card| {
            let heading = app.document().find(card, Tag::H3).expect("title");
            app.document().text_content(heading)
        })
        .collect();
    assert_eq!(titles, ["M1", "Launch", "Tone"]);
    assert!(!app.document().has_attr(trigger, "disabled"));
    assert_eq!(app.document().text_content(trigger), TRIGGER_LABEL);
}

#[tokio::test]
async fn empty_and_failed_fetches_restore_the_trigger() {
    let mut app = gallery(ScriptedSource::new(vec![
        Ok(CatalogPayload::Records(Vec::new())),
        Err(FetchError::Status(StatusCode::BAD_GATEWAY)),
    ]));
    let trigger = app.anchors().trigger;
    let container = app.anchors().gallery;

    app.click(trigger).await;
    assert_eq!(app.state(), &GalleryState::Empty);
    assert_eq!(app.document().text_content(container), EMPTY_MESSAGE);
    assert!(app.cards().is_empty());
    assert!(!app.document().has_attr(trigger, "disabled"));

    app.click(trigger).await;
    assert!(matches!(app.state(), GalleryState::Error(_)));
    assert_eq!(app.document().text_content(container), ERROR_MESSAGE);
    assert!(!app.document().has_attr(trigger, "disabled"));
    assert_eq!(app.document().text_content(trigger), TRIGGER_LABEL);
}

#[tokio::test]
async fn clicking_a_card_opens_the_modal_and_escape_closes_it() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    app.request_fetch().await;
    let card = app.cards()[0];
    let title = app.document().find(card, Tag::H3).expect("title");

    app.click(title).await;
    let backdrop = app.modal().backdrop().expect("modal open");
    assert!(app.document().is_attached(backdrop));
    assert_eq!(app.modal().record().map(CatalogRecord::display_title), Some("M1"));
    assert!(app.document().text_content(backdrop).contains("Crab."));

    app.key_down(Key::Character('x'));
    assert!(app.modal().is_open(), "other keys leave the modal open");

    app.key_down(Key::Escape);
    assert!(!app.modal().is_open());
    assert!(!app.document().exists(backdrop));
    assert_eq!(app.document().key_listener_count(), 0);
}

#[tokio::test]
async fn backdrop_click_closes_but_inside_click_does_not() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    app.request_fetch().await;
    let card = app.cards()[1];

    app.click(card).await;
    let backdrop = app.modal().backdrop().expect("modal open");
    assert!(app.document().find(backdrop, Tag::Iframe).is_some());

    let heading = app.document().find(backdrop, Tag::H2).expect("title");
    app.click(heading).await;
    assert!(app.modal().is_open());

    app.click(backdrop).await;
    assert!(!app.modal().is_open());
    assert!(!app.document().exists(backdrop));
}

#[tokio::test]
async fn close_button_closes_the_modal() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    app.request_fetch().await;
    let card = app.cards()[0];

    app.click(card).await;
    let backdrop = app.modal().backdrop().expect("modal open");
    let close = app.document().find(backdrop, Tag::Button).expect("close");

    app.click(close).await;
    assert!(!app.modal().is_open());
    assert_eq!(app.document().key_listener_count(), 0);
}

#[tokio::test]
async fn clicking_a_link_inside_a_card_navigates_without_opening_the_modal() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    app.request_fetch().await;
    let card = app.cards()[0];
    let img = app.document().find(card, Tag::Img).expect("image");

    app.click(img).await;

    assert!(!app.modal().is_open());
    assert_eq!(
        app.navigations(),
        &[Navigation {
            href: "a.jpg".into(),
            target: Some("_blank".into())
        }]
    );
}

#[tokio::test]
async fn opening_another_card_replaces_the_modal() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    app.request_fetch().await;
    let cards = app.cards();

    app.click(cards[0]).await;
    let first = app.modal().backdrop().expect("first");
    app.click(cards[2]).await;
    let second = app.modal().backdrop().expect("second");

    assert_ne!(first, second);
    assert!(!app.document().exists(first));
    assert_eq!(app.document().key_listener_count(), 1);
    assert_eq!(app.modal().record().map(CatalogRecord::display_title), Some("Tone"));
}

#[tokio::test]
async fn disabled_trigger_ignores_clicks_while_loading() {
    let mut app = gallery(ScriptedSource::records(apod_sample()));
    let trigger = app.anchors().trigger;

    let ticket = app.begin_fetch();
    app.click(trigger).await;
    assert_eq!(app.state(), &GalleryState::Loading);

    assert!(app.complete_fetch(ticket).await);
    assert!(matches!(app.state(), GalleryState::Populated(_)));
}

#[tokio::test]
async fn superseded_fetch_does_not_overwrite_newer_results() {
    let mut app = gallery(ScriptedSource::new(vec![
        Ok(CatalogPayload::Records(
            serde_json::from_value(serde_json::json!([{"title": "New", "media_type": "image"}]))
                .expect("records"),
        )),
        Err(FetchError::Status(StatusCode::INTERNAL_SERVER_ERROR)),
    ]));

    let stale = app.begin_fetch();
    let latest = app.begin_fetch();
    assert!(app.complete_fetch(latest).await);
    assert!(!app.complete_fetch(stale).await);

    assert!(matches!(app.state(), GalleryState::Populated(records) if records[0].display_title() == "New"));
}
