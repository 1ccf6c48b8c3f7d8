//! Resource element types.

use std::fmt;

/// Identity of an embedded resource element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub u64);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "resource#{}", self.0)
    }
}

/// The kinds of resource the guard knows how to retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// A `<script>` include.
    Script,
    /// A `<link>` stylesheet include.
    Style,
}

impl ResourceKind {
    /// Recognises a kind from an element tag name (case-insensitive).
    pub fn from_tag(tag_name: &str) -> Option<Self> {
        if tag_name.eq_ignore_ascii_case("script") {
            Some(Self::Script)
        } else if tag_name.eq_ignore_ascii_case("link") {
            Some(Self::Style)
        } else {
            None
        }
    }

    /// Returns the tag name used to create an element of this kind.
    pub fn tag_name(&self) -> &'static str {
        match self {
            Self::Script => "script",
            Self::Style => "link",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Script => write!(f, "script"),
            Self::Style => write!(f, "style"),
        }
    }
}

/// Loading attributes carried over to a retried element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadAttributes {
    /// Script `async` flag.
    pub async_load: bool,
    /// Script `defer` flag.
    pub defer: bool,
    /// Link `rel` attribute (e.g. `stylesheet`).
    pub rel: Option<String>,
}

impl LoadAttributes {
    /// Attributes for a script include.
    pub fn script(async_load: bool, defer: bool) -> Self {
        Self {
            async_load,
            defer,
            rel: None,
        }
    }

    /// Attributes for a stylesheet include.
    pub fn style(rel: impl Into<String>) -> Self {
        Self {
            rel: Some(rel.into()),
            ..Self::default()
        }
    }

    /// Keeps only the attributes that apply to `kind`.
    pub fn retained_for(&self, kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Script => Self::script(self.async_load, self.defer),
            ResourceKind::Style => Self {
                rel: self.rel.clone(),
                ..Self::default()
            },
        }
    }
}

/// An element reported by a resource-load failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceElement {
    /// Element identity.
    pub id: ResourceId,
    /// Raw tag name as reported by the platform.
    pub tag_name: String,
    /// `src` attribute, if any.
    pub src: Option<String>,
    /// `href` attribute, if any.
    pub href: Option<String>,
    /// Loading attributes.
    pub attributes: LoadAttributes,
}

impl ResourceElement {
    /// Creates an element with the given tag and no source.
    pub fn new(id: ResourceId, tag_name: impl Into<String>) -> Self {
        Self {
            id,
            tag_name: tag_name.into(),
            src: None,
            href: None,
            attributes: LoadAttributes::default(),
        }
    }

    /// Creates a script element.
    pub fn script(id: ResourceId, src: impl Into<String>, async_load: bool, defer: bool) -> Self {
        Self {
            src: Some(src.into()),
            attributes: LoadAttributes::script(async_load, defer),
            ..Self::new(id, "script")
        }
    }

    /// Creates a stylesheet link element.
    pub fn stylesheet(id: ResourceId, href: impl Into<String>) -> Self {
        Self {
            href: Some(href.into()),
            attributes: LoadAttributes::style("stylesheet"),
            ..Self::new(id, "link")
        }
    }

    /// Returns the resource kind, or `None` for unsupported tags.
    pub fn kind(&self) -> Option<ResourceKind> {
        ResourceKind::from_tag(&self.tag_name)
    }

    /// Returns the first non-empty of `src` and `href`.
    pub fn source_url(&self) -> Option<&str> {
        [self.src.as_deref(), self.href.as_deref()]
            .into_iter()
            .flatten()
            .find(|url| !url.is_empty())
    }
}

/// A fresh element to be attached to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewResource {
    /// Kind of element to create.
    pub kind: ResourceKind,
    /// Source (`src` for scripts, `href` for styles).
    pub source_url: String,
    /// Loading attributes copied from the failed element.
    pub attributes: LoadAttributes,
}

impl NewResource {
    /// Converts into the element as it appears once attached.
    pub fn into_element(self, id: ResourceId) -> ResourceElement {
        let mut element = ResourceElement::new(id, self.kind.tag_name());
        match self.kind {
            ResourceKind::Script => element.src = Some(self.source_url),
            ResourceKind::Style => element.href = Some(self.source_url),
        }
        element.attributes = self.attributes;
        element
    }
}
