//! Widget data resolver.
//!
//! Given the widget types present on a page, fetches exactly the external
//! data those types need in one batched pass. Fetches run concurrently and
//! the call returns once every fetch has settled. Failures are isolated: a
//! failed fetch is logged and leaves its collection empty, so the dependent
//! widgets render nothing while the rest of the page is unaffected.

mod instagram;
mod source;

pub use instagram::InstagramFeed;
pub use source::{SharedStore, SiteSource};

use std::collections::BTreeSet;

use futures_util::future::{join_all, BoxFuture};
use futures_util::FutureExt;

use crate::models::{
    BlogPostSummary, FaqGroup, HeroSlide, InstagramPost, Product, Review, SiteSettings,
    Testimonial, Widget,
};
use crate::registry::{self, DataNeed};

pub type SourceResult<T> = Result<T, SourceError>;

/// Why a single data fetch failed.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("database error: {0}")]
    Store(#[from] rusqlite::Error),
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    Status(u16),
    #[error("unreadable feed response: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
    #[error("{0}")]
    Unavailable(String),
}

/// Where widget data comes from. One method per [`DataNeed`] plus the shared
/// site settings.
pub trait ContentSource: Send + Sync {
    fn site_settings(&self) -> BoxFuture<'_, SourceResult<SiteSettings>>;
    fn products(&self) -> BoxFuture<'_, SourceResult<Vec<Product>>>;
    fn testimonials(&self) -> BoxFuture<'_, SourceResult<Vec<Testimonial>>>;
    fn faqs(&self) -> BoxFuture<'_, SourceResult<Vec<FaqGroup>>>;
    fn hero_slides(&self) -> BoxFuture<'_, SourceResult<Vec<HeroSlide>>>;
    fn instagram_posts(&self) -> BoxFuture<'_, SourceResult<Vec<InstagramPost>>>;
    fn reviews(&self) -> BoxFuture<'_, SourceResult<Vec<Review>>>;
    fn blog_posts(&self) -> BoxFuture<'_, SourceResult<Vec<BlogPostSummary>>>;
}

/// Request-scoped bag of everything the widgets on a page need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedWidgetData {
    pub settings: SiteSettings,
    pub products: Vec<Product>,
    pub testimonials: Vec<Testimonial>,
    pub faqs: Vec<FaqGroup>,
    pub hero_slides: Vec<HeroSlide>,
    pub instagram_posts: Vec<InstagramPost>,
    pub reviews: Vec<Review>,
    pub blog_posts: Vec<BlogPostSummary>,
}

/// Deduplicated types of the visible widgets in a list. Hidden widgets never
/// contribute a fetch.
pub fn needed_types(widgets: &[Widget]) -> BTreeSet<String> {
    widgets
        .iter()
        .filter(|w| w.is_visible)
        .map(|w| w.widget_type.clone())
        .collect()
}

/// Data needs for a set of types. Types sharing a need collapse into one;
/// unknown and static types contribute nothing.
pub fn needs_for<'a>(types: impl IntoIterator<Item = &'a str>) -> BTreeSet<DataNeed> {
    types.into_iter().filter_map(registry::data_need).collect()
}

/// Outcome of one fetch, tagged by what it was for.
enum Fetched {
    Settings(SourceResult<SiteSettings>),
    Products(SourceResult<Vec<Product>>),
    Testimonials(SourceResult<Vec<Testimonial>>),
    Faqs(SourceResult<Vec<FaqGroup>>),
    HeroSlides(SourceResult<Vec<HeroSlide>>),
    InstagramPosts(SourceResult<Vec<InstagramPost>>),
    Reviews(SourceResult<Vec<Review>>),
    BlogPosts(SourceResult<Vec<BlogPostSummary>>),
}

fn fetch<S: ContentSource + ?Sized>(source: &S, need: DataNeed) -> BoxFuture<'_, Fetched> {
    match need {
        DataNeed::Products => source.products().map(Fetched::Products).boxed(),
        DataNeed::Testimonials => source.testimonials().map(Fetched::Testimonials).boxed(),
        DataNeed::Faqs => source.faqs().map(Fetched::Faqs).boxed(),
        DataNeed::HeroSlides => source.hero_slides().map(Fetched::HeroSlides).boxed(),
        DataNeed::InstagramPosts => source
            .instagram_posts()
            .map(Fetched::InstagramPosts)
            .boxed(),
        DataNeed::Reviews => source.reviews().map(Fetched::Reviews).boxed(),
        DataNeed::BlogPosts => source.blog_posts().map(Fetched::BlogPosts).boxed(),
    }
}

/// Fetch the data for `types` concurrently, best effort per need.
pub async fn resolve<S: ContentSource + ?Sized>(
    source: &S,
    types: &BTreeSet<String>,
) -> ResolvedWidgetData {
    let needs = needs_for(types.iter().map(String::as_str));

    let mut fetches: Vec<BoxFuture<'_, Fetched>> = Vec::with_capacity(needs.len() + 1);
    fetches.push(source.site_settings().map(Fetched::Settings).boxed());
    fetches.extend(needs.iter().map(|need| fetch(source, *need)));

    let mut data = ResolvedWidgetData::default();
    for fetched in join_all(fetches).await {
        match fetched {
            Fetched::Settings(r) => {
                if let Some(v) = settle("settings", r) {
                    data.settings = v;
                }
            }
            Fetched::Products(r) => data.products = settle("products", r).unwrap_or_default(),
            Fetched::Testimonials(r) => {
                data.testimonials = settle("testimonials", r).unwrap_or_default()
            }
            Fetched::Faqs(r) => data.faqs = settle("faqs", r).unwrap_or_default(),
            Fetched::HeroSlides(r) => {
                data.hero_slides = settle("hero_slides", r).unwrap_or_default()
            }
            Fetched::InstagramPosts(r) => {
                data.instagram_posts = settle("instagram_posts", r).unwrap_or_default()
            }
            Fetched::Reviews(r) => data.reviews = settle("reviews", r).unwrap_or_default(),
            Fetched::BlogPosts(r) => data.blog_posts = settle("blog_posts", r).unwrap_or_default(),
        }
    }

    tracing::debug!(
        needs = needs.len(),
        products = data.products.len(),
        testimonials = data.testimonials.len(),
        faqs = data.faqs.len(),
        slides = data.hero_slides.len(),
        "resolved widget data"
    );
    data
}

/// Resolve the data for the visible widgets of a list.
pub async fn resolve_for<S: ContentSource + ?Sized>(
    source: &S,
    widgets: &[Widget],
) -> ResolvedWidgetData {
    resolve(source, &needed_types(widgets)).await
}

fn settle<T>(what: &'static str, result: SourceResult<T>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) => {
            tracing::warn!(data = what, error = %e, "widget data fetch failed, dependent widgets render empty");
            None
        }
    }
}
