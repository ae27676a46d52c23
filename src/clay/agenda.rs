use crate::{meeting::Link, utils, CrawlerError};
use chrono::NaiveDate;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use std::collections::HashMap;
use tracing::warn;

const E: &str = "Invalid selector";
lazy_static! {
    static ref ROW: Selector = Selector::parse("tr.meeting_widget_item").expect(E);
    static ref DATE_CELL: Selector = Selector::parse("td.mobile_hide").expect(E);
    static ref VALUE: Selector = Selector::parse("span.detail-list-value").expect(E);
    static ref A: Selector = Selector::parse("a").expect(E);
}

const DATE_FORMAT: &str = "%m/%d/%Y";

/// Document links of past meetings, keyed by meeting date.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AgendaMap {
    links: HashMap<NaiveDate, Vec<Link>>,
}

impl AgendaMap {
    pub fn new() -> AgendaMap {
        AgendaMap::default()
    }

    /// Reads the meeting widget table of the board page and returns the
    /// number of rows kept. Rows without a readable date are skipped.
    pub fn extend_from_page(&mut self, doc: &Html, page_url: &str) -> Result<usize, CrawlerError> {
        let mut rows = 0;
        for row in doc.select(&ROW) {
            let Some(cell) = utils::first_text(row.select(&DATE_CELL)) else {
                warn!("Meeting row without a date in {}", page_url);
                continue;
            };
            let value = cell.split_whitespace().next().unwrap_or_default();
            let date = match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                Ok(date) => date,
                Err(e) => {
                    warn!("Invalid meeting date `{}` in {}: {}", cell, page_url, e);
                    continue;
                }
            };

            let links = self.links.entry(date).or_default();
            for span in row.select(&VALUE) {
                let Some(a) = span.select(&A).next() else {
                    continue;
                };
                let Some(href) = a.value().attr("href") else {
                    continue;
                };
                links.push(Link {
                    href: utils::absolute_url(page_url, href)?,
                    title: a.text().collect::<String>().trim().to_string(),
                });
            }
            rows += 1;
        }
        Ok(rows)
    }

    pub fn links_for(&self, date: NaiveDate) -> Vec<Link> {
        self.links.get(&date).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}
