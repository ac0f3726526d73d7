//! Request line → route.

use url::Url;

use crate::constants::HOME_PAGE_SLUG;
use crate::models::{Device, ParentKind, ParentRef};
use crate::render::RenderContext;

#[derive(Debug, Clone, PartialEq)]
pub enum Route {
    /// Public render of a page, product or blog post.
    Render {
        parent: ParentRef,
        ctx: RenderContext,
    },
    /// Registry catalog, optionally filtered by a search query.
    WidgetTypes { query: Option<String> },
    ListWidgets(ParentRef),
    SaveWidgets(ParentRef),
    MethodNotAllowed,
    NotFound,
}

pub fn route(method: &str, url: &str) -> Route {
    let Ok(parsed) = Url::parse(&format!("http://localhost{}", url)) else {
        return Route::NotFound;
    };
    let segments: Vec<String> = parsed
        .path_segments()
        .map(|parts| parts.filter(|s| !s.is_empty()).map(decode_segment).collect())
        .unwrap_or_default();
    let segments: Vec<&str> = segments.iter().map(String::as_str).collect();
    let params: Vec<(String, String)> = parsed.query_pairs().into_owned().collect();
    let is_get = method.eq_ignore_ascii_case("GET") || method.eq_ignore_ascii_case("HEAD");

    match segments.as_slice() {
        ["admin", "api", "widget-types"] => {
            if !is_get {
                return Route::MethodNotAllowed;
            }
            let query = param(&params, "q").filter(|q| !q.trim().is_empty());
            Route::WidgetTypes { query }
        }
        ["admin", "api", kind, slug, "widgets"] => {
            let Some(kind) = ParentKind::from_segment(kind) else {
                return Route::NotFound;
            };
            let parent = ParentRef::new(kind, *slug);
            match method.to_ascii_uppercase().as_str() {
                "GET" | "HEAD" => Route::ListWidgets(parent),
                "PUT" | "POST" => Route::SaveWidgets(parent),
                _ => Route::MethodNotAllowed,
            }
        }
        ["admin", ..] => Route::NotFound,
        _ if !is_get => Route::MethodNotAllowed,
        [] => render(ParentKind::Page, HOME_PAGE_SLUG, &params),
        ["pages", slug] => render(ParentKind::Page, slug, &params),
        ["products", slug] => render(ParentKind::Product, slug, &params),
        ["blog", slug] => render(ParentKind::BlogPost, slug, &params),
        _ => Route::NotFound,
    }
}

/// Percent-decode one path segment; undecodable bytes keep the raw text.
fn decode_segment(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}

fn render(kind: ParentKind, slug: &str, params: &[(String, String)]) -> Route {
    let device = param(params, "device").and_then(|d| d.parse::<Device>().ok());
    let preview = param(params, "preview").is_some_and(|p| matches!(p.as_str(), "1" | "true"));
    Route::Render {
        parent: ParentRef::new(kind, slug),
        ctx: RenderContext { device, preview },
    }
}

fn param(params: &[(String, String)], key: &str) -> Option<String> {
    params
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.clone())
}
