use std::io::{Cursor, Write};

use db::models::order::Order;
use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to assemble site bundle: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub const BUNDLE_FILE_NAME: &str = "wedding.zip";

/// Renders an order into a static site bundle. Read-only over the order:
/// absent fields render as empty strings, no validation happens here.
#[derive(Clone, Default)]
pub struct SiteExportService;

impl SiteExportService {
    pub fn new() -> Self {
        Self
    }

    pub fn render_index(&self, order: &Order) -> String {
        let details = order.wedding_details.as_ref();
        let content = order.generated_content.as_ref();

        let couple = details
            .and_then(|details| details.couple_names.as_deref())
            .unwrap_or_default();
        let title = content
            .map(|content| content.seo_title.as_str())
            .filter(|value| !value.is_empty())
            .unwrap_or(couple);
        let description = content
            .map(|content| content.seo_description.as_str())
            .unwrap_or_default();
        let welcome = content
            .map(|content| content.welcome_message.as_str())
            .unwrap_or_default();
        let story = content
            .map(|content| content.our_story.as_str())
            .unwrap_or_default();
        let venue_blurb = content
            .map(|content| content.venue_details.as_str())
            .unwrap_or_default();
        let rsvp = content
            .map(|content| content.rsvp_message.as_str())
            .unwrap_or_default();
        let closing = content
            .map(|content| content.closing_message.as_str())
            .unwrap_or_default();
        let venue = details
            .and_then(|details| details.venue.as_deref())
            .unwrap_or_default();
        let venue_address = details
            .and_then(|details| details.venue_address.as_deref())
            .unwrap_or_default();
        let date = details
            .and_then(|details| details.wedding_date.as_deref())
            .unwrap_or_default();

        format!(
            "<!DOCTYPE html>\n\
<html lang=\"en\">\n\
<head>\n\
<meta charset=\"utf-8\">\n\
<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
<title>{title}</title>\n\
<meta name=\"description\" content=\"{description}\">\n\
</head>\n\
<body>\n\
<header>\n\
<h1>{couple}</h1>\n\
<p>{welcome}</p>\n\
<p>{date}</p>\n\
</header>\n\
<section id=\"story\">\n\
<p>{story}</p>\n\
</section>\n\
<section id=\"venue\">\n\
<h2>{venue}</h2>\n\
<p>{venue_address}</p>\n\
<p>{venue_blurb}</p>\n\
</section>\n\
<section id=\"rsvp\">\n\
<p>{rsvp}</p>\n\
</section>\n\
<footer>\n\
<p>{closing}</p>\n\
</footer>\n\
</body>\n\
</html>\n",
            title = escape_html(title),
            description = escape_html(description),
            couple = escape_html(couple),
            welcome = escape_html(welcome),
            date = escape_html(date),
            story = escape_html(story),
            venue = escape_html(venue),
            venue_address = escape_html(venue_address),
            venue_blurb = escape_html(venue_blurb),
            rsvp = escape_html(rsvp),
            closing = escape_html(closing),
        )
    }

    pub fn bundle(&self, order: &Order) -> Result<Vec<u8>, ExportError> {
        let html = self.render_index(order);
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer.start_file("index.html", SimpleFileOptions::default())?;
        writer.write_all(html.as_bytes())?;
        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
