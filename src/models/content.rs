use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_CURRENCY, DEFAULT_SITE_NAME};

/// A catalog product. Only active products reach widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Product {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    pub compare_at_cents: Option<i64>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub is_active: bool,
}

impl Product {
    /// Whether the product is discounted against its compare-at price.
    pub fn on_sale(&self) -> bool {
        self.compare_at_cents.is_some_and(|c| c > self.price_cents)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Testimonial {
    pub id: i64,
    pub author: String,
    pub role: Option<String>,
    pub body: String,
    pub rating: Option<u8>,
    pub is_active: bool,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqItem {
    pub id: i64,
    pub category: String,
    pub question: String,
    pub answer: String,
    pub position: i64,
}

/// FAQ entries sharing a category, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaqGroup {
    pub category: String,
    pub items: Vec<FaqItem>,
}

/// Group FAQ items by category, keeping categories in first-appearance order.
pub fn group_faqs(items: Vec<FaqItem>) -> Vec<FaqGroup> {
    let mut groups: Vec<FaqGroup> = Vec::new();
    for item in items {
        match groups.iter_mut().find(|g| g.category == item.category) {
            Some(group) => group.items.push(item),
            None => groups.push(FaqGroup {
                category: item.category.clone(),
                items: vec![item],
            }),
        }
    }
    groups
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeroSlide {
    pub id: i64,
    pub heading: String,
    pub subheading: Option<String>,
    pub image_url: String,
    pub cta_label: Option<String>,
    pub cta_url: Option<String>,
    pub position: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub id: i64,
    pub product_id: Option<i64>,
    pub author: String,
    pub rating: u8,
    pub title: Option<String>,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Average rating of a set of reviews, `None` when empty.
pub fn average_rating(reviews: &[&Review]) -> Option<f32> {
    if reviews.is_empty() {
        return None;
    }
    let total: u32 = reviews.iter().map(|r| r.rating as u32).sum();
    Some(total as f32 / reviews.len() as f32)
}

/// A recent post from the Instagram feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstagramPost {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub media_url: String,
    pub permalink: String,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Teaser data for a published blog post.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlogPostSummary {
    pub slug: String,
    pub title: String,
    pub excerpt: Option<String>,
    pub cover_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLink {
    pub label: String,
    pub url: String,
}

/// Site-wide announcement pop-up.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Popup {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
}

/// Settings shared by every widget on a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteSettings {
    pub site_name: String,
    pub tagline: Option<String>,
    pub currency: String,
    pub instagram_handle: Option<String>,
    pub nav: Vec<NavLink>,
    pub popup: Option<Popup>,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            site_name: DEFAULT_SITE_NAME.to_string(),
            tagline: None,
            currency: DEFAULT_CURRENCY.to_string(),
            instagram_handle: None,
            nav: Vec::new(),
            popup: None,
        }
    }
}
