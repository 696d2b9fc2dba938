//! HTML renderings of the same data the JSON envelopes carry. Everything
//! user-supplied goes through `escape`; only advertisement fields are ever
//! rendered, so password hashes and tokens cannot leak into markup.

use crate::api::format::{AdvertisementView, ListingPage, SearchResults};

const STYLE: &str = "\
body { font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px; }
h1 { color: #333; border-bottom: 2px solid #667eea; padding-bottom: 10px; }
.ad { border: 1px solid #ddd; border-radius: 5px; padding: 15px; margin: 15px 0; background: #f9f9f9; }
.ad h3 { margin-top: 0; color: #444; }
.ad-meta { color: #666; font-size: 0.9em; margin: 10px 0; }
.own-badge { background: #4caf50; color: white; padding: 2px 6px; border-radius: 10px; font-size: 0.8em; margin-left: 10px; }
.stats { background: #e9f7fe; padding: 10px; border-radius: 5px; margin: 15px 0; }
.pagination span { margin: 0 5px; font-weight: bold; }
.pagination a { margin: 0 5px; }
a { color: #667eea; text-decoration: none; }
";

/// Replace characters with meaning in HTML so user content renders literally.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<title>{}</title>\n<style>{}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        STYLE,
        body
    )
}

fn owner_badge(view: &AdvertisementView) -> &'static str {
    if view.is_owner {
        "<span class=\"own-badge\">Yours</span>"
    } else {
        ""
    }
}

fn ad_card(view: &AdvertisementView) -> String {
    format!(
        "<div class=\"ad\">\n<h3>{title}{badge}</h3>\n<p>{description}</p>\n\
         <div class=\"ad-meta\">Created: {created} &middot; User ID: {user_id}</div>\n\
         <div class=\"actions\"><a href=\"/advertisements/{id}?format=html\">Details</a></div>\n</div>",
        title = escape(&view.title),
        badge = owner_badge(view),
        description = escape(&view.description),
        created = view.created_at.format("%Y-%m-%d %H:%M"),
        user_id = view.user_id,
        id = view.id,
    )
}

/// GET /advertisements as a page: stats, one card per advertisement in the
/// window, numbered page links.
pub fn listing_page(page: &ListingPage) -> String {
    let mut body = String::new();
    body.push_str("<h1>All advertisements</h1>\n");
    body.push_str("<div class=\"format-links\"><a href=\"/advertisements\">JSON version</a></div>\n");
    body.push_str(&format!(
        "<div class=\"stats\"><strong>Statistics:</strong> {} advertisements total<br>\
         Page {} of {}<br>Showing: {} advertisements</div>\n",
        page.total,
        page.page,
        page.pages,
        page.advertisements.len(),
    ));

    for view in &page.advertisements {
        body.push_str(&ad_card(view));
        body.push('\n');
    }

    if page.pages > 1 {
        body.push_str("<div class=\"pagination\">");
        for p in 1..=page.pages {
            if p == page.page {
                body.push_str(&format!("<span>{p}</span>"));
            } else {
                body.push_str(&format!(
                    "<a href=\"/advertisements?format=html&page={p}&per_page={}\">{p}</a>",
                    page.per_page
                ));
            }
        }
        body.push_str("</div>\n");
    }

    document("All advertisements", &body)
}

/// GET /advertisements/{id} as a page.
pub fn advertisement_page(view: &AdvertisementView) -> String {
    let body = format!(
        "<h1>{title}{badge}</h1>\n\
         <div class=\"format-links\"><a href=\"/advertisements/{id}\">JSON version</a> \
         <a href=\"/advertisements?format=html\">Back to the list</a></div>\n\
         <div class=\"ad\">\n<p>{description}</p>\n\
         <ul>\n<li><strong>Advertisement ID:</strong> {id}</li>\n\
         <li><strong>User ID:</strong> {user_id}</li>\n\
         <li><strong>Created:</strong> {created}</li>\n\
         <li><strong>Owned by you:</strong> {owned}</li>\n</ul>\n</div>",
        title = escape(&view.title),
        badge = owner_badge(view),
        id = view.id,
        description = escape(&view.description),
        user_id = view.user_id,
        created = view.created_at.format("%Y-%m-%d %H:%M"),
        owned = if view.is_owner { "Yes" } else { "No" },
    );

    document(&view.title, &body)
}

/// GET /advertisements/search as a page.
pub fn search_page(results: &SearchResults) -> String {
    let mut body = format!(
        "<h1>Search results: \"{query}\"</h1>\n<p>Found: {count} advertisements</p>\n\
         <div class=\"search-results\">\n",
        query = escape(&results.query),
        count = results.count,
    );

    if results.results.is_empty() {
        body.push_str("<p class=\"no-results\">Nothing found</p>\n");
    } else {
        for view in &results.results {
            body.push_str(&ad_card(view));
            body.push('\n');
        }
    }

    body.push_str("</div>\n<a href=\"/advertisements?format=html\">Back to the list</a>");
    document(&format!("Search: {}", results.query), &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::format::views;
    use crate::database::models::Advertisement;
    use chrono::Utc;

    fn ad(id: i64, user_id: i64, title: &str) -> Advertisement {
        Advertisement {
            id,
            title: title.to_string(),
            description: "A perfectly fine description".to_string(),
            user_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(
            escape("<b>\"bold\" & 'loud'</b>"),
            "&lt;b&gt;&quot;bold&quot; &amp; &#39;loud&#39;&lt;/b&gt;"
        );
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn listing_page_marks_only_the_callers_ads() {
        let ads = [ad(1, 10, "Mine"), ad(2, 20, "Theirs")];
        let page = ListingPage::new(views(&ads, Some(10)), 2, 1, 10);
        let html = listing_page(&page);
        assert_eq!(html.matches("own-badge\">Yours").count(), 1);
        assert!(html.contains("Mine"));
        assert!(html.contains("Theirs"));
    }

    #[test]
    fn listing_page_links_other_pages() {
        let ads = [ad(3, 1, "Only one shown")];
        let page = ListingPage::new(views(&ads, None), 3, 2, 1);
        let html = listing_page(&page);
        assert!(html.contains("<span>2</span>"));
        assert!(html.contains("page=1&per_page=1"));
        assert!(html.contains("page=3&per_page=1"));
    }

    #[test]
    fn detail_page_escapes_user_content() {
        let listing = ad(1, 2, "<script>alert(1)</script>");
        let view = AdvertisementView::new(&listing, None);
        let html = advertisement_page(&view);
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("Owned by you:</strong> No"));
    }

    #[test]
    fn search_page_reports_empty_result_sets() {
        let empty = SearchResults::new("nothing".to_string(), Vec::new());
        let html = search_page(&empty);
        assert!(html.contains("Found: 0 advertisements"));
        assert!(html.contains("Nothing found"));
    }
}
