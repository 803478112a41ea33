use std::num::IntErrorKind;

use serde::{Deserialize, Deserializer};

/// `?page=` query string, 1-based.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageQuery {
    #[serde(default = "first_page", deserialize_with = "deserialize_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

// an empty value falls back to the first page; integers too large for i64 are past any data
fn deserialize_page<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(first_page());
    }
    match raw.parse::<i64>() {
        Ok(page) => Ok(page),
        Err(err) => match err.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Ok(0),
            _ => Err(serde::de::Error::custom(format!(
                "page must be an integer, got {raw:?}"
            ))),
        },
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery { page: first_page() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub limit: i64,
    pub offset: i64,
}

impl PageQuery {
    /// Rows covered by this page, `None` when the page cannot hold any row.
    pub fn window(&self, per_page: u32) -> Option<Window> {
        if self.page < 1 {
            return None;
        }
        let limit = i64::from(per_page);
        Some(Window {
            limit,
            offset: (self.page - 1).checked_mul(limit)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(query: &str) -> Result<PageQuery, serde::de::value::Error> {
        let query = serde::de::value::MapDeserializer::new(
            query
                .split('&')
                .filter(|pair| !pair.is_empty())
                .filter_map(|pair| pair.split_once('=')),
        );
        PageQuery::deserialize(query)
    }

    #[test]
    fn first_page_starts_at_zero() {
        let window = PageQuery::default().window(10).unwrap();
        assert_eq!(window, Window { limit: 10, offset: 0 });
    }

    #[test]
    fn later_pages_skip_previous_rows() {
        let window = PageQuery { page: 1000 }.window(10).unwrap();
        assert_eq!(window.offset, 9990);
    }

    #[test]
    fn pages_below_one_have_no_window() {
        assert_eq!(PageQuery { page: 0 }.window(10), None);
        assert_eq!(PageQuery { page: -1 }.window(10), None);
    }

    #[test]
    fn overflowing_offset_has_no_window() {
        assert_eq!(PageQuery { page: i64::MAX }.window(10), None);
    }

    #[test]
    fn missing_or_empty_page_defaults_to_one() {
        assert_eq!(parse("").unwrap().page, 1);
        assert_eq!(parse("page=").unwrap().page, 1);
    }

    #[test]
    fn out_of_range_integers_become_page_zero() {
        assert_eq!(parse("page=-1").unwrap().page, -1);
        assert_eq!(parse("page=99999999999").unwrap().page, 99999999999);
        assert_eq!(parse("page=99999999999999999999").unwrap().page, 0);
    }

    #[test]
    fn non_numeric_page_is_rejected() {
        assert!(parse("page=abc").is_err());
        assert!(parse("page=1.5").is_err());
    }
}
