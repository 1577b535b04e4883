use std::fmt::Display;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Local, TimeZone, Utc};
use manual_render::{render_with, RenderOptions};
use serde::Serialize;

use crate::model::Document;

/// Pattern used when a caller-supplied one cannot be parsed.
pub const DEFAULT_DATE_FORMAT: &str = "%Y/%m/%d %H:%M";

/// A document ready for the reader page: metadata plus rendered body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentView {
    pub id: u64,
    pub title: String,
    pub category: String,
    pub html: String,
}

pub fn view_document(doc: &Document, options: &RenderOptions) -> DocumentView {
    DocumentView {
        id: doc.id,
        title: doc.title.clone(),
        category: doc.category.clone(),
        html: render_with(&doc.content, options),
    }
}

/// Formats `timestamp` in the local time zone.
pub fn format_timestamp(timestamp: &DateTime<Utc>, pattern: &str) -> String {
    format_timestamp_in(timestamp, &Local, pattern)
}

pub fn format_timestamp_in<Tz>(timestamp: &DateTime<Utc>, zone: &Tz, pattern: &str) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        items = StrftimeItems::new(DEFAULT_DATE_FORMAT).collect();
    }
    timestamp
        .with_timezone(zone)
        .format_with_items(items.iter())
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn stamp() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 22, 15, 0).unwrap()
    }

    #[test]
    fn formats_in_requested_zone() {
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            format_timestamp_in(&stamp(), &shanghai, DEFAULT_DATE_FORMAT),
            "2024/05/21 06:15"
        );
        assert_eq!(
            format_timestamp_in(&stamp(), &Utc, "%d.%m.%Y"),
            "20.05.2024"
        );
    }

    #[test]
    fn invalid_patterns_fall_back() {
        assert_eq!(
            format_timestamp_in(&stamp(), &Utc, "%Q nonsense"),
            "2024/05/20 22:15"
        );
    }
}
