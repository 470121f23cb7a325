//! Rendering and interaction core of the picture gallery.
//!
//! Catalog records are mapped to a pure [`view::View`] tree by [`render`] and
//! [`modal`], then attached into a [`dom::Document`] owned by the
//! [`app::Gallery`] context. Controllers mutate only the document regions
//! they were handed at construction.

pub mod app;
pub mod dom;
pub mod facts;
pub mod format;
pub mod gallery;
pub mod html;
pub mod modal;
pub mod render;
pub mod view;

pub use app::{Anchors, AttachError, Gallery, GalleryOptions};
pub use format::{format_date, DateFormatter, DateStyle};
pub use gallery::{GalleryController, GalleryState, ShapePolicy};
pub use modal::ModalController;
