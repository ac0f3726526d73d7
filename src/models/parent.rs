use std::fmt;

/// Entity kinds that own a widget list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentKind {
    Page,
    Product,
    BlogPost,
}

impl fmt::Display for ParentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segment())
    }
}

impl ParentKind {
    /// URL / CLI segment (`pages`, `products`, `posts`).
    pub fn segment(&self) -> &'static str {
        match self {
            ParentKind::Page => "pages",
            ParentKind::Product => "products",
            ParentKind::BlogPost => "posts",
        }
    }

    pub fn from_segment(s: &str) -> Option<Self> {
        match s {
            "pages" | "page" => Some(ParentKind::Page),
            "products" | "product" => Some(ParentKind::Product),
            "posts" | "post" | "blog" => Some(ParentKind::BlogPost),
            _ => None,
        }
    }

    pub(crate) fn table(&self) -> &'static str {
        match self {
            ParentKind::Page => "pages",
            ParentKind::Product => "products",
            ParentKind::BlogPost => "blog_posts",
        }
    }

    /// Column holding the persisted widget JSON.
    pub(crate) fn widgets_column(&self) -> &'static str {
        match self {
            ParentKind::BlogPost => "post_widgets",
            _ => "widgets",
        }
    }

    /// Column used as the display title of the parent.
    pub(crate) fn title_column(&self) -> &'static str {
        match self {
            ParentKind::Product => "name",
            _ => "title",
        }
    }
}

/// A specific parent entity, addressed as `<kind>/<slug>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParentRef {
    pub kind: ParentKind,
    pub slug: String,
}

impl ParentRef {
    pub fn new(kind: ParentKind, slug: impl Into<String>) -> Self {
        Self {
            kind,
            slug: slug.into(),
        }
    }

    /// Parse `pages/home`, `products/mug`, `posts/launch`.
    pub fn parse(s: &str) -> Option<Self> {
        let (kind, slug) = s.trim_matches('/').split_once('/')?;
        let kind = ParentKind::from_segment(kind)?;
        if slug.is_empty() || slug.contains('/') {
            return None;
        }
        Some(Self::new(kind, slug))
    }
}

impl fmt::Display for ParentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.segment(), self.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_parent_ref() {
        let r = ParentRef::parse("pages/home").unwrap();
        assert_eq!(r.kind, ParentKind::Page);
        assert_eq!(r.slug, "home");
        assert_eq!(r.to_string(), "pages/home");

        let r = ParentRef::parse("/post/launch-day/").unwrap();
        assert_eq!(r.kind, ParentKind::BlogPost);
        assert_eq!(r.slug, "launch-day");
    }

    #[test]
    fn parse_parent_ref_rejects_garbage() {
        assert!(ParentRef::parse("home").is_none());
        assert!(ParentRef::parse("widgets/home").is_none());
        assert!(ParentRef::parse("pages/").is_none());
        assert!(ParentRef::parse("pages/a/b").is_none());
    }

    #[test]
    fn blog_posts_use_post_widgets_column() {
        assert_eq!(ParentKind::BlogPost.widgets_column(), "post_widgets");
        assert_eq!(ParentKind::Page.widgets_column(), "widgets");
        assert_eq!(ParentKind::Product.title_column(), "name");
    }
}
