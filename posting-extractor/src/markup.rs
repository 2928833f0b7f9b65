//! A minimal queryable view over parsed page markup.
//!
//! The extractor only needs a handful of tree operations, so it is written
//! against [`MarkupDocument`] and [`MarkupElement`] rather than a concrete
//! parser. [`HtmlDocument`] provides them on top of `scraper`.

use scraper::{ElementRef, Html, Node, Selector};

pub trait MarkupDocument {
    type Element<'a>: MarkupElement
    where
        Self: 'a;

    /// All elements with the given tag carrying the given class, in document order.
    fn select_all(&self, tag: &str, class: &str) -> Vec<Self::Element<'_>>;
}

pub trait MarkupElement: Sized {
    fn tag_name(&self) -> &str;

    fn has_class(&self, class: &str) -> bool;

    /// Concatenated text of every descendant text node.
    fn text(&self) -> String;

    fn trimmed_text(&self) -> String {
        self.text().trim().to_owned()
    }

    /// The next sibling that is an element, skipping text and comment nodes.
    fn next_sibling_element(&self) -> Option<Self>;

    /// Text content of the node directly after this one, whatever its kind.
    fn next_sibling_text(&self) -> Option<String>;

    fn first_descendant(&self, tag: &str) -> Option<Self>;

    fn descendants(&self, tag: &str) -> Vec<Self>;
}

pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
        }
    }
}

fn selector(css: &str) -> Option<Selector> {
    match Selector::parse(css) {
        Ok(selector) => Some(selector),
        Err(e) => {
            log::warn!("ignoring invalid selector '{}': {:?}", css, e);
            None
        }
    }
}

impl MarkupDocument for HtmlDocument {
    type Element<'a> = ElementRef<'a>;

    fn select_all(&self, tag: &str, class: &str) -> Vec<ElementRef<'_>> {
        match selector(&format!("{}.{}", tag, class)) {
            Some(selector) => self.html.select(&selector).collect(),
            None => Vec::new(),
        }
    }
}

impl<'a> MarkupElement for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn has_class(&self, class: &str) -> bool {
        self.value().classes().any(|c| c == class)
    }

    fn text(&self) -> String {
        ElementRef::text(self).collect()
    }

    fn next_sibling_element(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn next_sibling_text(&self) -> Option<String> {
        let sibling = self.next_sibling()?;
        match sibling.value() {
            Node::Text(text) => Some(text.text.to_string()),
            Node::Comment(comment) => Some(comment.comment.to_string()),
            Node::Element(_) => ElementRef::wrap(sibling).map(|el| MarkupElement::text(&el)),
            _ => None,
        }
    }

    fn first_descendant(&self, tag: &str) -> Option<Self> {
        MarkupElement::descendants(self, tag).into_iter().next()
    }

    fn descendants(&self, tag: &str) -> Vec<Self> {
        let Some(selector) = selector(tag) else {
            return Vec::new();
        };
        let own_id = self.id();
        self.select(&selector)
            .filter(|el| el.id() != own_id)
            .collect()
    }
}
