//! Typed view of a widget's `type` + `config`.
//!
//! Every registered widget type has one variant carrying its own config
//! struct. Missing keys take the documented default, and so does any key
//! whose value has the wrong shape (with a warning); valid siblings stay.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use super::widget::WidgetConfig;
use crate::constants::*;

#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    HeroCarousel(HeroCarouselConfig),
    ProductGrid(ProductGridConfig),
    FeaturedProduct(FeaturedProductConfig),
    Testimonials(TestimonialsConfig),
    Reviews(ReviewsConfig),
    Faqs(FaqsConfig),
    Instagram(InstagramWidgetConfig),
    BlogPosts(BlogPostsConfig),
    Text(TextConfig),
    Marquee(MarqueeConfig),
    Quote(QuoteConfig),
    ImageBanner(ImageBannerConfig),
    Video(VideoConfig),
    CallToAction(CallToActionConfig),
    Newsletter(NewsletterConfig),
    Spacer(SpacerConfig),
    Unknown(String),
}

impl WidgetKind {
    /// Dispatch a persisted `type` string to its typed variant.
    pub fn parse(widget_type: &str, config: &WidgetConfig) -> Self {
        match widget_type {
            "hero_carousel" => WidgetKind::HeroCarousel(read_config(widget_type, config)),
            "product_grid" => WidgetKind::ProductGrid(read_config(widget_type, config)),
            "featured_product" => WidgetKind::FeaturedProduct(read_config(widget_type, config)),
            "testimonials" => WidgetKind::Testimonials(read_config(widget_type, config)),
            "reviews" => WidgetKind::Reviews(read_config(widget_type, config)),
            "faqs" => WidgetKind::Faqs(read_config(widget_type, config)),
            "instagram" => WidgetKind::Instagram(read_config(widget_type, config)),
            "blog_posts" => WidgetKind::BlogPosts(read_config(widget_type, config)),
            "text" => WidgetKind::Text(read_config(widget_type, config)),
            "marquee" => WidgetKind::Marquee(read_config(widget_type, config)),
            "quote" => WidgetKind::Quote(read_config(widget_type, config)),
            "image_banner" => WidgetKind::ImageBanner(read_config(widget_type, config)),
            "video" => WidgetKind::Video(read_config(widget_type, config)),
            "call_to_action" => WidgetKind::CallToAction(read_config(widget_type, config)),
            "newsletter" => WidgetKind::Newsletter(read_config(widget_type, config)),
            "spacer" => WidgetKind::Spacer(read_config(widget_type, config)),
            other => WidgetKind::Unknown(other.to_string()),
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            WidgetKind::HeroCarousel(_) => "hero_carousel",
            WidgetKind::ProductGrid(_) => "product_grid",
            WidgetKind::FeaturedProduct(_) => "featured_product",
            WidgetKind::Testimonials(_) => "testimonials",
            WidgetKind::Reviews(_) => "reviews",
            WidgetKind::Faqs(_) => "faqs",
            WidgetKind::Instagram(_) => "instagram",
            WidgetKind::BlogPosts(_) => "blog_posts",
            WidgetKind::Text(_) => "text",
            WidgetKind::Marquee(_) => "marquee",
            WidgetKind::Quote(_) => "quote",
            WidgetKind::ImageBanner(_) => "image_banner",
            WidgetKind::Video(_) => "video",
            WidgetKind::CallToAction(_) => "call_to_action",
            WidgetKind::Newsletter(_) => "newsletter",
            WidgetKind::Spacer(_) => "spacer",
            WidgetKind::Unknown(name) => name,
        }
    }
}

fn read_config<T: DeserializeOwned + Default>(widget_type: &str, config: &WidgetConfig) -> T {
    if config.is_empty() {
        return T::default();
    }
    if let Ok(parsed) = serde_json::from_value(Value::Object(config.clone())) {
        return parsed;
    }

    // Every field has its own default, so a key that parses alone is valid
    // on its own. Drop the keys that don't and keep their siblings.
    let mut valid = WidgetConfig::new();
    for (key, value) in config {
        let mut single = WidgetConfig::new();
        single.insert(key.clone(), value.clone());
        match serde_json::from_value::<T>(Value::Object(single)) {
            Ok(_) => {
                valid.insert(key.clone(), value.clone());
            }
            Err(e) => {
                tracing::warn!(widget_type, key = %key, error = %e, "invalid config value, using default");
            }
        }
    }
    serde_json::from_value(Value::Object(valid)).unwrap_or_default()
}

// ── Per-type configs ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroCarouselConfig {
    pub autoplay: bool,
    pub interval_ms: u64,
    pub show_arrows: bool,
    pub max_slides: Option<usize>,
}

impl Default for HeroCarouselConfig {
    fn default() -> Self {
        Self {
            autoplay: true,
            interval_ms: DEFAULT_CAROUSEL_INTERVAL_MS,
            show_arrows: true,
            max_slides: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProductGridConfig {
    /// Overrides the widget title; falls back to a localised default.
    pub title: Option<String>,
    pub columns: u8,
    pub limit: usize,
    pub category: Option<String>,
    pub show_prices: bool,
}

impl Default for ProductGridConfig {
    fn default() -> Self {
        Self {
            title: None,
            columns: DEFAULT_GRID_COLUMNS,
            limit: DEFAULT_GRID_LIMIT,
            category: None,
            show_prices: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeaturedProductConfig {
    /// Product to feature; the first active product when unset.
    pub product_slug: Option<String>,
    pub cta_label: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TestimonialLayout {
    #[default]
    Carousel,
    Grid,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TestimonialsConfig {
    pub layout: TestimonialLayout,
    pub limit: usize,
    pub show_ratings: bool,
}

impl Default for TestimonialsConfig {
    fn default() -> Self {
        Self {
            layout: TestimonialLayout::Carousel,
            limit: DEFAULT_TESTIMONIAL_LIMIT,
            show_ratings: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewsConfig {
    pub product_id: Option<i64>,
    pub limit: usize,
    pub min_rating: u8,
    pub show_summary: bool,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            product_id: None,
            limit: DEFAULT_REVIEW_LIMIT,
            min_rating: 0,
            show_summary: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaqsConfig {
    /// Only show this category; all groups when unset.
    pub category: Option<String>,
    pub expand_first: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct InstagramWidgetConfig {
    /// Handle shown in the header; the site handle when unset.
    pub handle: Option<String>,
    pub limit: usize,
    pub columns: u8,
}

impl Default for InstagramWidgetConfig {
    fn default() -> Self {
        Self {
            handle: None,
            limit: DEFAULT_INSTAGRAM_TILES,
            columns: DEFAULT_INSTAGRAM_COLUMNS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogPostsConfig {
    pub title: Option<String>,
    pub limit: usize,
    pub show_excerpt: bool,
}

impl Default for BlogPostsConfig {
    fn default() -> Self {
        Self {
            title: None,
            limit: DEFAULT_BLOG_LIMIT,
            show_excerpt: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextConfig {
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarqueeSpeed {
    Slow,
    #[default]
    Normal,
    Fast,
}

impl MarqueeSpeed {
    /// Seconds for one full scroll.
    pub fn duration_secs(&self) -> u32 {
        match self {
            MarqueeSpeed::Slow => 40,
            MarqueeSpeed::Normal => 25,
            MarqueeSpeed::Fast => 12,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarqueeDirection {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarqueeConfig {
    /// Blank text means the marquee is absent.
    pub text: String,
    pub speed: MarqueeSpeed,
    pub direction: MarqueeDirection,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuoteConfig {
    /// Falls back to the widget content when blank.
    pub text: String,
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageBannerConfig {
    pub image_url: String,
    pub alt: String,
    pub link_url: Option<String>,
    pub overlay_text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VideoConfig {
    pub url: String,
    pub autoplay: bool,
    pub muted: bool,
    #[serde(rename = "loop")]
    pub looped: bool,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            autoplay: false,
            muted: true,
            looped: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CallToActionConfig {
    pub button_label: Option<String>,
    pub button_url: String,
}

impl Default for CallToActionConfig {
    fn default() -> Self {
        Self {
            button_label: None,
            button_url: "/".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewsletterConfig {
    pub placeholder: Option<String>,
    pub button_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpacerConfig {
    pub height: u32,
}

impl Default for SpacerConfig {
    fn default() -> Self {
        Self {
            height: DEFAULT_SPACER_PX,
        }
    }
}
