//! Widget type registry.
//!
//! The compiled-in catalog of every widget type the renderer knows: the
//! editor-facing metadata (name, icon, category, description), the external
//! data the type depends on, and the config fields its editor panel exposes.
//! The admin sidebar, the config panels and the data resolver are all driven
//! from this table.

use serde::Serialize;

/// External data a widget type needs before it can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataNeed {
    HeroSlides,
    Products,
    Testimonials,
    Reviews,
    Faqs,
    InstagramPosts,
    BlogPosts,
}

/// Input control used for a config field in the editor panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    LongText,
    Number,
    Toggle,
    Url,
    Select(&'static [&'static str]),
}

/// One editable config key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConfigField {
    pub key: &'static str,
    pub label: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
    /// Human-readable default shown as the input placeholder.
    pub default: Option<&'static str>,
}

impl ConfigField {
    const fn new(key: &'static str, label: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            label,
            kind,
            default: None,
        }
    }

    const fn or(self, default: &'static str) -> Self {
        Self {
            default: Some(default),
            ..self
        }
    }
}

/// Registry entry for one widget type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WidgetTypeDefinition {
    #[serde(rename = "type")]
    pub widget_type: &'static str,
    pub name: &'static str,
    pub icon: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub requires: Option<DataNeed>,
    pub fields: &'static [ConfigField],
}

/// Types of one sidebar category, in catalog order.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: &'static str,
    pub types: Vec<&'static WidgetTypeDefinition>,
}

// ── Catalog ───────────────────────────────────────────────────────

use FieldKind::*;

const ALIGNMENTS: &[&str] = &["left", "center", "right"];
const SPEEDS: &[&str] = &["slow", "normal", "fast"];
const DIRECTIONS: &[&str] = &["left", "right"];
const LAYOUTS: &[&str] = &["carousel", "grid"];

static WIDGET_TYPES: &[WidgetTypeDefinition] = &[
    WidgetTypeDefinition {
        widget_type: "hero_carousel",
        name: "Hero Carousel",
        icon: "images",
        category: "Hero",
        description: "Full-width rotating slides with a call to action",
        requires: Some(DataNeed::HeroSlides),
        fields: &[
            ConfigField::new("autoplay", "Autoplay", Toggle).or("on"),
            ConfigField::new("intervalMs", "Interval (ms)", Number).or("5000"),
            ConfigField::new("showArrows", "Show arrows", Toggle).or("on"),
            ConfigField::new("maxSlides", "Max slides", Number),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "product_grid",
        name: "Product Grid",
        icon: "grid",
        category: "Commerce",
        description: "Grid of active products, optionally filtered by category",
        requires: Some(DataNeed::Products),
        fields: &[
            ConfigField::new("title", "Heading", Text).or("Featured Products"),
            ConfigField::new("columns", "Columns", Number).or("4"),
            ConfigField::new("limit", "Max products", Number).or("8"),
            ConfigField::new("category", "Category", Text),
            ConfigField::new("showPrices", "Show prices", Toggle).or("on"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "featured_product",
        name: "Featured Product",
        icon: "star",
        category: "Commerce",
        description: "Spotlight a single product with image and price",
        requires: Some(DataNeed::Products),
        fields: &[
            ConfigField::new("productSlug", "Product", Text),
            ConfigField::new("ctaLabel", "Button label", Text).or("Shop now"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "testimonials",
        name: "Testimonials",
        icon: "message-circle",
        category: "Social Proof",
        description: "Customer testimonials as a carousel or grid",
        requires: Some(DataNeed::Testimonials),
        fields: &[
            ConfigField::new("layout", "Layout", Select(LAYOUTS)).or("carousel"),
            ConfigField::new("limit", "Max testimonials", Number).or("6"),
            ConfigField::new("showRatings", "Show ratings", Toggle).or("on"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "reviews",
        name: "Reviews",
        icon: "thumbs-up",
        category: "Social Proof",
        description: "Approved product reviews with an average rating",
        requires: Some(DataNeed::Reviews),
        fields: &[
            ConfigField::new("productId", "Product id", Number),
            ConfigField::new("limit", "Max reviews", Number).or("5"),
            ConfigField::new("minRating", "Minimum rating", Number).or("0"),
            ConfigField::new("showSummary", "Show summary", Toggle).or("on"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "faqs",
        name: "FAQs",
        icon: "help-circle",
        category: "Content",
        description: "Frequently asked questions grouped by category",
        requires: Some(DataNeed::Faqs),
        fields: &[
            ConfigField::new("category", "Category", Text),
            ConfigField::new("expandFirst", "Expand first answer", Toggle).or("off"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "instagram",
        name: "Instagram Feed",
        icon: "instagram",
        category: "Social Proof",
        description: "Recent posts from the shop's Instagram account",
        requires: Some(DataNeed::InstagramPosts),
        fields: &[
            ConfigField::new("handle", "Handle", Text),
            ConfigField::new("limit", "Max posts", Number).or("6"),
            ConfigField::new("columns", "Columns", Number).or("3"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "blog_posts",
        name: "Blog Posts",
        icon: "book-open",
        category: "Content",
        description: "Teasers for the most recent blog posts",
        requires: Some(DataNeed::BlogPosts),
        fields: &[
            ConfigField::new("title", "Heading", Text).or("From the Blog"),
            ConfigField::new("limit", "Max posts", Number).or("3"),
            ConfigField::new("showExcerpt", "Show excerpt", Toggle).or("on"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "text",
        name: "Rich Text",
        icon: "type",
        category: "Content",
        description: "Heading and formatted body copy",
        requires: None,
        fields: &[ConfigField::new("align", "Alignment", Select(ALIGNMENTS)).or("left")],
    },
    WidgetTypeDefinition {
        widget_type: "marquee",
        name: "Marquee",
        icon: "chevrons-right",
        category: "Marketing",
        description: "Scrolling announcement strip",
        requires: None,
        fields: &[
            ConfigField::new("text", "Text", Text),
            ConfigField::new("speed", "Speed", Select(SPEEDS)).or("normal"),
            ConfigField::new("direction", "Direction", Select(DIRECTIONS)).or("left"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "quote",
        name: "Quote",
        icon: "quote",
        category: "Content",
        description: "Pull quote with attribution",
        requires: None,
        fields: &[
            ConfigField::new("text", "Quote", LongText),
            ConfigField::new("author", "Author", Text),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "image_banner",
        name: "Image Banner",
        icon: "image",
        category: "Media",
        description: "Wide image with optional link and overlay text",
        requires: None,
        fields: &[
            ConfigField::new("imageUrl", "Image URL", Url),
            ConfigField::new("alt", "Alt text", Text),
            ConfigField::new("linkUrl", "Link", Url),
            ConfigField::new("overlayText", "Overlay text", Text),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "video",
        name: "Video",
        icon: "film",
        category: "Media",
        description: "Embedded video player",
        requires: None,
        fields: &[
            ConfigField::new("url", "Video URL", Url),
            ConfigField::new("autoplay", "Autoplay", Toggle).or("off"),
            ConfigField::new("muted", "Muted", Toggle).or("on"),
            ConfigField::new("loop", "Loop", Toggle).or("off"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "call_to_action",
        name: "Call to Action",
        icon: "mouse-pointer",
        category: "Marketing",
        description: "Headline with a single prominent button",
        requires: None,
        fields: &[
            ConfigField::new("buttonLabel", "Button label", Text).or("Learn more"),
            ConfigField::new("buttonUrl", "Button link", Url).or("/"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "newsletter",
        name: "Newsletter Signup",
        icon: "mail",
        category: "Marketing",
        description: "E-mail capture form",
        requires: None,
        fields: &[
            ConfigField::new("placeholder", "Placeholder", Text).or("Enter your email"),
            ConfigField::new("buttonLabel", "Button label", Text).or("Subscribe"),
        ],
    },
    WidgetTypeDefinition {
        widget_type: "spacer",
        name: "Spacer",
        icon: "move-vertical",
        category: "Layout",
        description: "Vertical whitespace between sections",
        requires: None,
        fields: &[ConfigField::new("height", "Height (px)", Number).or("48")],
    },
];

// ── Lookups ───────────────────────────────────────────────────────

/// Look up a widget type. `None` means the type is unknown and the widget
/// must be treated as unrenderable.
pub fn lookup(widget_type: &str) -> Option<&'static WidgetTypeDefinition> {
    WIDGET_TYPES.iter().find(|d| d.widget_type == widget_type)
}

pub fn is_known(widget_type: &str) -> bool {
    lookup(widget_type).is_some()
}

/// Every registered type, in catalog order.
pub fn all() -> &'static [WidgetTypeDefinition] {
    WIDGET_TYPES
}

/// The data a type needs, if any. Unknown types need nothing.
pub fn data_need(widget_type: &str) -> Option<DataNeed> {
    lookup(widget_type).and_then(|d| d.requires)
}

/// Sidebar catalog: types grouped by category, categories in the order they
/// first appear in the catalog.
pub fn by_category() -> Vec<CategoryGroup> {
    group(WIDGET_TYPES.iter())
}

/// Sidebar filter: case-insensitive match on name, type or description.
/// An empty query returns the whole catalog.
pub fn search(query: &str) -> Vec<CategoryGroup> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return by_category();
    }
    group(WIDGET_TYPES.iter().filter(|d| {
        d.name.to_lowercase().contains(&needle)
            || d.widget_type.contains(&needle)
            || d.description.to_lowercase().contains(&needle)
    }))
}

fn group(defs: impl Iterator<Item = &'static WidgetTypeDefinition>) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for def in defs {
        match groups.iter_mut().find(|g| g.category == def.category) {
            Some(g) => g.types.push(def),
            None => groups.push(CategoryGroup {
                category: def.category,
                types: vec![def],
            }),
        }
    }
    groups
}
