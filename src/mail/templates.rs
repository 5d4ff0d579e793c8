//! Minimal HTML bodies for outgoing mail.
//!
//! Every interpolated value goes through [`escape_html`].

/// Escape text for safe inclusion in HTML content and attribute values.
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

pub fn welcome(name: &str, unsubscribe_link: &str) -> String {
    let greeting = if name.trim().is_empty() {
        "Hello".to_string()
    } else {
        format!("Hello {}", escape_html(name.trim()))
    };

    format!(
        concat!(
            "<html><body style=\"font-family: Arial, sans-serif\">",
            "<h1>{greeting}, welcome aboard!</h1>",
            "<p>Thanks for subscribing. New posts will land in your inbox as soon as they are published.</p>",
            "<p style=\"font-size: 12px; color: #888\">",
            "If you no longer wish to receive these emails, <a href=\"{unsubscribe}\">unsubscribe here</a>.",
            "</p></body></html>"
        ),
        greeting = greeting,
        unsubscribe = escape_html(unsubscribe_link),
    )
}

pub fn admin_alert(name: &str, email: &str) -> String {
    format!(
        "<h1>New Subscriber</h1><p>{} ({}) just subscribed.</p>",
        escape_html(name),
        escape_html(email)
    )
}

/// Content of a new-post newsletter.
pub struct Newsletter<'a> {
    pub title: &'a str,
    pub excerpt: &'a str,
    pub post_url: &'a str,
    /// Falls back to the logo when empty.
    pub image_url: &'a str,
    pub logo_url: &'a str,
    pub unsubscribe_link: &'a str,
}

pub fn newsletter(n: &Newsletter<'_>) -> String {
    let image = if n.image_url.trim().is_empty() {
        n.logo_url
    } else {
        n.image_url
    };

    format!(
        concat!(
            "<html><body style=\"font-family: Arial, sans-serif; background: #F5F5F5\">",
            "<div style=\"max-width: 600px; margin: 0 auto; background: #fff; padding: 24px; text-align: center\">",
            "<img src=\"{logo}\" alt=\"Logo\" width=\"150\" />",
            "<img src=\"{image}\" alt=\"{title}\" style=\"width: 100%\" />",
            "<h1>{title}</h1>",
            "<p>{excerpt}</p>",
            "<p><a href=\"{post_url}\">Read More</a></p>",
            "<p style=\"font-size: 12px; color: #888\">",
            "If you no longer wish to receive these emails, <a href=\"{unsubscribe}\">unsubscribe here</a>.",
            "</p></div></body></html>"
        ),
        logo = escape_html(n.logo_url),
        image = escape_html(image),
        title = escape_html(n.title),
        excerpt = escape_html(n.excerpt),
        post_url = escape_html(n.post_url),
        unsubscribe = escape_html(n.unsubscribe_link),
    )
}
