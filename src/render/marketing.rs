//! Call-to-action and newsletter sign-up widgets.

use super::helpers::{button, rich_text, section_header};
use crate::models::{CallToActionConfig, NewsletterConfig, Widget};
use crate::utils::{escape_html, non_blank};

pub fn call_to_action(widget: &Widget, cfg: &CallToActionConfig) -> String {
    let label = non_blank(cfg.button_label.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| t!("widgets.call_to_action.button").to_string());
    let url = non_blank(Some(&cfg.button_url)).unwrap_or("/");
    format!(
        r#"<div class="cta">{}{}{}</div>"#,
        section_header(widget, None),
        rich_text(widget.content.as_deref()),
        button(&label, url)
    )
}

pub fn newsletter(widget: &Widget, cfg: &NewsletterConfig) -> String {
    let placeholder = non_blank(cfg.placeholder.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| t!("widgets.newsletter.placeholder").to_string());
    let label = non_blank(cfg.button_label.as_deref())
        .map(str::to_string)
        .unwrap_or_else(|| t!("widgets.newsletter.button").to_string());
    format!(
        r#"<div class="newsletter">{}{}<form class="newsletter-form" method="post"><input type="email" name="email" required placeholder="{}"><button type="submit">{}</button></form></div>"#,
        section_header(widget, None),
        rich_text(widget.content.as_deref()),
        escape_html(&placeholder),
        escape_html(&label)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cta_defaults() {
        let w = Widget::new("c", "call_to_action");
        let html = call_to_action(&w, &CallToActionConfig::default());
        assert!(html.contains(r#"<a class="button" href="/">Learn more</a>"#));
    }

    #[test]
    fn cta_custom_button() {
        let mut w = Widget::new("c", "call_to_action");
        w.title = Some("Visit the studio".to_string());
        let cfg = CallToActionConfig {
            button_label: Some("Book a visit".to_string()),
            button_url: "/visit".to_string(),
        };
        let html = call_to_action(&w, &cfg);
        assert!(html.contains("<h2>Visit the studio</h2>"));
        assert!(html.contains(r#"href="/visit">Book a visit</a>"#));
    }

    #[test]
    fn newsletter_defaults_and_overrides() {
        let w = Widget::new("n", "newsletter");
        let html = newsletter(&w, &NewsletterConfig::default());
        assert!(html.contains(r#"placeholder="Enter your email""#));
        assert!(html.contains(">Subscribe</button>"));

        let cfg = NewsletterConfig {
            placeholder: Some("you@example.com".to_string()),
            button_label: Some("Join".to_string()),
        };
        let html = newsletter(&w, &cfg);
        assert!(html.contains(r#"placeholder="you@example.com""#));
        assert!(html.contains(">Join</button>"));
    }

    #[test]
    fn default_copy_is_translated() {
        assert_eq!(t!("widgets.newsletter.button", locale = "es"), "Suscribirse");
        assert_eq!(t!("widgets.call_to_action.button", locale = "es"), "Más información");
    }
}
