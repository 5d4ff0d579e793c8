//! XML sitemap rendering.

use std::fmt::Write as _;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::domain::BlogPost;

/// How often a sitemap entry is expected to change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFrequency {
    Daily,
    Weekly,
}

impl ChangeFrequency {
    fn as_str(self) -> &'static str {
        match self {
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub change_frequency: ChangeFrequency,
    pub priority: f32,
}

/// Site root, blog index, then one entry per post.
pub fn entries(base_url: &str, posts: &[BlogPost]) -> Vec<SitemapEntry> {
    let base = base_url.trim_end_matches('/');

    let mut entries = vec![
        SitemapEntry {
            loc: base.to_string(),
            change_frequency: ChangeFrequency::Weekly,
            priority: 1.0,
        },
        SitemapEntry {
            loc: format!("{}/blog", base),
            change_frequency: ChangeFrequency::Weekly,
            priority: 0.8,
        },
    ];

    entries.extend(posts.iter().map(|post| SitemapEntry {
        loc: format!("{}/blog/{}", base, post.id),
        change_frequency: ChangeFrequency::Daily,
        priority: 0.6,
    }));

    entries
}

/// Render a `<urlset>` document; `now` becomes every entry's `lastmod`.
pub fn render(base_url: &str, posts: &[BlogPost], now: DateTime<Utc>) -> String {
    let lastmod = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let mut xml = String::from(concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n"
    ));

    for entry in entries(base_url, posts) {
        // Writing to a String cannot fail.
        let _ = write!(
            xml,
            "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
            escape_xml(&entry.loc),
            lastmod,
            entry.change_frequency.as_str(),
            entry.priority
        );
    }

    xml.push_str("</urlset>\n");
    xml
}

fn escape_xml(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn post(id: i64) -> BlogPost {
        BlogPost {
            id,
            title: format!("Post {}", id),
            excerpt: String::new(),
            content: String::new(),
            category: String::new(),
            subcategory: String::new(),
            tags: vec![],
            date: String::new(),
            read_time: String::new(),
            image: String::new(),
            author: String::new(),
            status: "published".into(),
            likes: 0,
            downloads: 0,
            comments: vec![],
        }
    }

    #[test]
    fn test_entries_order_and_priorities() {
        let entries = entries("https://example.blog/", &[post(1), post(2)]);
        let locs: Vec<_> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(
            locs,
            [
                "https://example.blog",
                "https://example.blog/blog",
                "https://example.blog/blog/1",
                "https://example.blog/blog/2"
            ]
        );
        assert_eq!(entries[0].priority, 1.0);
        assert_eq!(entries[1].change_frequency, ChangeFrequency::Weekly);
        assert_eq!(entries[3].change_frequency, ChangeFrequency::Daily);
    }

    #[test]
    fn test_render_document() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap();
        let xml = render("https://example.blog", &[post(3)], now);

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.contains("<loc>https://example.blog/blog/3</loc>"));
        assert!(xml.contains("<lastmod>2024-06-15T12:00:00.000Z</lastmod>"));
        assert!(xml.contains("<priority>0.6</priority>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_render_escapes_base_url() {
        let xml = render("https://example.blog/?a=1&b=2", &[], Utc::now());
        assert!(xml.contains("?a=1&amp;b=2"));
        assert!(!xml.contains("&b=2<"));
    }
}
