//! Pure description of what to render, independent of any attached document.

use shared::domain::CatalogRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Body,
    Main,
    Article,
    A,
    Img,
    Iframe,
    Div,
    H1,
    H2,
    H3,
    P,
    Button,
    Strong,
    Small,
}

impl Tag {
    pub fn name(self) -> &'static str {
        match self {
            Self::Body => "body",
            Self::Main => "main",
            Self::Article => "article",
            Self::A => "a",
            Self::Img => "img",
            Self::Iframe => "iframe",
            Self::Div => "div",
            Self::H1 => "h1",
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::P => "p",
            Self::Button => "button",
            Self::Strong => "strong",
            Self::Small => "small",
        }
    }

    /// Elements serialized without a closing tag.
    pub fn is_void(self) -> bool {
        matches!(self, Self::Img)
    }
}

/// Click behaviour registered on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    FetchRequested,
    /// Open the detail overlay for the record attached to the handling element.
    OpenModal,
    CloseModal,
    /// Close the overlay only when the click target is the handling element itself.
    BackdropClick,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: Tag,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<View>,
    pub on_click: Option<Action>,
    pub record: Option<CatalogRecord>,
}

impl Element {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
            on_click: None,
            record: None,
        }
    }

    #[must_use]
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(existing, _)| *existing == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name, value)),
        }
        self
    }

    #[must_use]
    pub fn attr_opt(self, name: impl Into<String>, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    #[must_use]
    pub fn child(mut self, child: impl Into<View>) -> Self {
        self.children.push(child.into());
        self
    }

    #[must_use]
    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(View::Text(text.into()))
    }

    #[must_use]
    pub fn on_click(mut self, action: Action) -> Self {
        self.on_click = Some(action);
        self
    }

    #[must_use]
    pub fn with_record(mut self, record: CatalogRecord) -> Self {
        self.record = Some(record);
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }
}

impl From<Element> for View {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl View {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Elements with `tag` in document order, this node included.
    pub fn find_all(&self, tag: Tag) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_tag(tag, &mut found);
        found
    }

    pub fn find(&self, tag: Tag) -> Option<&Element> {
        self.find_all(tag).into_iter().next()
    }

    fn collect_tag<'a>(&'a self, tag: Tag, found: &mut Vec<&'a Element>) {
        if let Self::Element(element) = self {
            if element.tag == tag {
                found.push(element);
            }
            for child in &element.children {
                child.collect_tag(tag, found);
            }
        }
    }
}
