use serde::{Deserialize, Serialize};

pub const UNTITLED: &str = "Untitled";

/// Record shape as published by the APOD JSON feed.
///
/// Every field is optional; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WireRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hdurl: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copyright: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Media {
    Image {
        url: Option<String>,
        hd_url: Option<String>,
    },
    Video {
        url: Option<String>,
        thumbnail_url: Option<String>,
    },
    /// Any `media_type` other than `image`/`video`, including a missing one.
    Other {
        kind: Option<String>,
        url: Option<String>,
    },
}

impl Default for Media {
    fn default() -> Self {
        Self::Other {
            kind: None,
            url: None,
        }
    }
}

impl Media {
    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Image { url, .. } | Self::Video { url, .. } | Self::Other { url, .. } => {
                url.as_deref()
            }
        }
    }

    /// Source shown for an image: the HD variant when published, else the base url.
    pub fn image_source(&self) -> Option<&str> {
        match self {
            Self::Image { url, hd_url } => hd_url.as_deref().or(url.as_deref()),
            _ => None,
        }
    }
}

/// One dated entry of the picture catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "WireRecord", into = "WireRecord")]
pub struct CatalogRecord {
    pub title: Option<String>,
    pub date: Option<String>,
    pub media: Media,
    pub explanation: Option<String>,
    pub copyright: Option<String>,
    pub service_version: Option<String>,
}

impl CatalogRecord {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(UNTITLED)
    }

    pub fn date_or_empty(&self) -> &str {
        self.date.as_deref().unwrap_or_default()
    }
}

// Empty strings count as absent, matching how the feed is consumed by browsers.
fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl From<WireRecord> for CatalogRecord {
    fn from(wire: WireRecord) -> Self {
        let url = present(wire.url);
        let media = match wire.media_type.as_deref() {
            Some("image") => Media::Image {
                url,
                hd_url: present(wire.hdurl),
            },
            Some("video") => Media::Video {
                url,
                thumbnail_url: present(wire.thumbnail_url),
            },
            _ => Media::Other {
                kind: present(wire.media_type),
                url,
            },
        };

        Self {
            title: present(wire.title),
            date: present(wire.date),
            media,
            explanation: present(wire.explanation),
            copyright: present(wire.copyright),
            service_version: present(wire.service_version),
        }
    }
}

impl From<CatalogRecord> for WireRecord {
    fn from(record: CatalogRecord) -> Self {
        let (media_type, url, hdurl, thumbnail_url) = match record.media {
            Media::Image { url, hd_url } => (Some("image".to_string()), url, hd_url, None),
            Media::Video { url, thumbnail_url } => {
                (Some("video".to_string()), url, None, thumbnail_url)
            }
            Media::Other { kind, url } => (kind, url, None, None),
        };

        Self {
            title: record.title,
            date: record.date,
            media_type,
            url,
            hdurl,
            thumbnail_url,
            explanation: record.explanation,
            copyright: record.copyright,
            service_version: record.service_version,
        }
    }
}
