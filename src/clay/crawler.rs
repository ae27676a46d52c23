use super::{AgendaMap, Page, KEYWORD, LOCATION_ADDRESS, LOCATION_NAME, NAME, START_URL};
use crate::meeting::{Classification, Location, Meeting, Status};
use crate::{utils, Crawler, CrawlerError, CrawlerResult, Request};
use chrono::{Duration, NaiveDateTime};
use itertools::Itertools;
use lazy_static::lazy_static;
use scraper::{Html, Selector};
use tracing::debug;

const CALENDAR_ITEM_SELECTOR: &str = "td.calendar_day div.calendar_item";
const EVENT_LINK_SELECTOR: &str = "a.calendar_eventlink";
const TITLE_SELECTOR: &str = "h2.detail-title span";
const DESCRIPTION_SELECTOR: &str = "div.detail-content p";
const TIME_SELECTOR: &str = "span.detail-list-value";

const E: &str = "Invalid selector";
lazy_static! {
    static ref CALENDAR_ITEM: Selector = Selector::parse(CALENDAR_ITEM_SELECTOR).expect(E);
    static ref EVENT_LINK: Selector = Selector::parse(EVENT_LINK_SELECTOR).expect(E);
    static ref TITLE: Selector = Selector::parse(TITLE_SELECTOR).expect(E);
    static ref DESCRIPTION: Selector = Selector::parse(DESCRIPTION_SELECTOR).expect(E);
    static ref TIME: Selector = Selector::parse(TIME_SELECTOR).expect(E);
}

const TIME_FORMAT: &str = "%m/%d/%Y %I:%M %p";
const DURATION_HOURS: i64 = 2;

#[derive(Debug)]
pub struct ClayAdjustmentBoard {
    now: NaiveDateTime,
    agenda: AgendaMap,
}

impl Default for ClayAdjustmentBoard {
    fn default() -> Self {
        ClayAdjustmentBoard::new()
    }
}

impl ClayAdjustmentBoard {
    pub fn new() -> ClayAdjustmentBoard {
        ClayAdjustmentBoard::starting_at(utils::get_now())
    }

    /// `now` picks the calendar months to visit and decides which meetings
    /// have passed.
    pub fn starting_at(now: NaiveDateTime) -> ClayAdjustmentBoard {
        ClayAdjustmentBoard {
            now,
            agenda: AgendaMap::new(),
        }
    }

    pub fn agenda(&self) -> &AgendaMap {
        &self.agenda
    }

    pub fn calendar_requests(&self) -> Vec<Request<Page>> {
        super::month_window(self.now.date())
            .into_iter()
            .map(|month| Request::new(super::calendar_url(month), Page::Calendar))
            .collect()
    }

    /// Detail page urls of the calendar entries whose title contains the
    /// keyword.
    pub fn event_urls(&self, doc: &Html, page_url: &str) -> Result<Vec<String>, CrawlerError> {
        let mut urls = vec![];
        for item in doc.select(&CALENDAR_ITEM) {
            let Some(link) = item.select(&EVENT_LINK).next() else {
                continue;
            };
            let title = link.text().collect::<String>();
            if !title.contains(KEYWORD) {
                continue;
            }
            if let Some(href) = link.value().attr("href") {
                urls.push(utils::absolute_url(page_url, href)?);
            }
        }
        Ok(urls.into_iter().unique().collect())
    }

    pub fn parse_event(&self, doc: &Html, url: &str) -> Result<Meeting, CrawlerError> {
        let title = parse_title(doc, url)?;
        let (start, end) = parse_time(doc, url)?;

        let mut meeting = Meeting {
            title,
            description: parse_description(doc),
            classification: Classification::Board,
            start,
            end,
            all_day: false,
            time_notes: String::new(),
            location: parse_location(),
            links: self.agenda.links_for(start.date()),
            source: url.to_string(),
            status: Status::Tentative,
            id: String::new(),
        };
        meeting.status = meeting.derive_status(self.now, "");
        meeting.id = meeting.derive_id(NAME);

        Ok(meeting)
    }
}

fn parse_title(doc: &Html, url: &str) -> Result<String, CrawlerError> {
    utils::first_text(doc.select(&TITLE)).ok_or_else(|| CrawlerError::MissingElement {
        selector: TITLE_SELECTOR,
        url: url.to_string(),
    })
}

fn parse_description(doc: &Html) -> String {
    utils::first_text(doc.select(&DESCRIPTION)).unwrap_or_default()
}

/// Start as printed on the page, end two hours later.
fn parse_time(doc: &Html, url: &str) -> Result<(NaiveDateTime, NaiveDateTime), CrawlerError> {
    let value = utils::first_text(doc.select(&TIME)).ok_or_else(|| {
        CrawlerError::MissingElement {
            selector: TIME_SELECTOR,
            url: url.to_string(),
        }
    })?;
    let start = NaiveDateTime::parse_from_str(&value, TIME_FORMAT)
        .map_err(|source| CrawlerError::InvalidDate { value, source })?;
    Ok((start, start + Duration::hours(DURATION_HOURS)))
}

fn parse_location() -> Location {
    Location {
        name: LOCATION_NAME.to_string(),
        address: LOCATION_ADDRESS.to_string(),
    }
}

impl Crawler for ClayAdjustmentBoard {
    type Page = Page;
    type Item = Meeting;

    fn start_requests(&self) -> Vec<Request<Page>> {
        vec![Request::new(START_URL, Page::Board)]
    }

    fn crawl(
        &mut self,
        request: &Request<Page>,
        doc: &Html,
    ) -> Result<CrawlerResult<Page, Meeting>, CrawlerError> {
        match request.page {
            Page::Board => {
                let rows = self.agenda.extend_from_page(doc, &request.url)?;
                debug!("{} meeting rows, {} dates with links", rows, self.agenda.len());
                Ok(CrawlerResult::Requests(self.calendar_requests()))
            }
            Page::Calendar => Ok(CrawlerResult::Requests(
                self.event_urls(doc, &request.url)?
                    .into_iter()
                    .map(|url| Request::new(url, Page::Event).dont_filter())
                    .collect(),
            )),
            Page::Event => {
                let meeting = self.parse_event(doc, &request.url)?;
                debug!("Parsed meeting\n{}", meeting);
                Ok(CrawlerResult::Item(meeting))
            }
        }
    }
}
