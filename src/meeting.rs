//! The meeting record shared by every city scraper.

use chrono::NaiveDateTime;
use lazy_regex::regex;
use serde::{Deserialize, Serialize};
use std::fmt;

const CANCELLED_WORDS: [&str; 3] = ["cancel", "rescheduled", "postpone"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    #[serde(rename = "Advisory Committee")]
    AdvisoryCommittee,
    #[serde(rename = "Board")]
    Board,
    #[serde(rename = "City Council")]
    CityCouncil,
    #[serde(rename = "Commission")]
    Commission,
    #[serde(rename = "Committee")]
    Committee,
    #[serde(rename = "Forum")]
    Forum,
    #[serde(rename = "Police Beat")]
    PoliceBeat,
    #[serde(rename = "Not classified")]
    NotClassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Cancelled,
    Tentative,
    Confirmed,
    Passed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meeting {
    pub title: String,
    pub description: String,
    pub classification: Classification,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub all_day: bool,
    pub time_notes: String,
    pub location: Location,
    pub links: Vec<Link>,
    pub source: String,
    pub status: Status,
    pub id: String,
}

impl Meeting {
    /// Cancelled when the title, description or `text` mention a
    /// cancellation, otherwise passed or tentative relative to `now`.
    pub fn derive_status(&self, now: NaiveDateTime, text: &str) -> Status {
        let meeting_text = [self.title.as_str(), self.description.as_str(), text]
            .join(" ")
            .to_lowercase();

        if CANCELLED_WORDS.iter().any(|w| meeting_text.contains(w)) {
            Status::Cancelled
        } else if self.start < now {
            Status::Passed
        } else {
            Status::Tentative
        }
    }

    /// `<spider>/<start %Y%m%d%H%M>/<title_slug>`
    pub fn derive_id(&self, spider: &str) -> String {
        let title = regex!(r"[^A-Za-z0-9]+").replace_all(&self.title, " ");
        let slug = regex!(r"\s+")
            .replace_all(title.trim(), "_")
            .to_lowercase();
        format!("{}/{}/{}", spider, self.start.format("%Y%m%d%H%M"), slug)
    }
}

impl fmt::Display for Meeting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Id          : {}", self.id)?;
        writeln!(f, "Title       : {}", self.title)?;
        writeln!(f, "Status      : {:?}", self.status)?;
        writeln!(f, "Start       : {}", self.start)?;
        writeln!(f, "End         : {}", self.end)?;
        writeln!(f, "Location    : {}, {}", self.location.name, self.location.address)?;
        writeln!(f, "Source      : {}", self.source)?;
        writeln!(f, "Links       : ")?;
        for link in &self.links {
            writeln!(f, "> {} <{}>", link.title, link.href)?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    pub(crate) fn datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    pub(crate) fn sample() -> Meeting {
        Meeting {
            title: "Board of Adjustment".to_string(),
            description: "Variance requests.".to_string(),
            classification: Classification::Board,
            start: datetime("2024-10-15 19:00"),
            end: datetime("2024-10-15 21:00"),
            all_day: false,
            time_notes: String::new(),
            location: Location {
                name: "Clayton City Hall".to_string(),
                address: "10 North Bemiston Avenue".to_string(),
            },
            links: vec![Link {
                href: "https://www.claytonmo.gov/agenda.pdf".to_string(),
                title: "Agenda".to_string(),
            }],
            source: "https://www.claytonmo.gov/event/1".to_string(),
            status: Status::Tentative,
            id: String::new(),
        }
    }

    #[test]
    fn status_follows_start_time() {
        let meeting = sample();
        assert_eq!(
            meeting.derive_status(datetime("2024-11-01 00:00"), ""),
            Status::Passed
        );
        assert_eq!(
            meeting.derive_status(datetime("2024-10-15 19:00"), ""),
            Status::Tentative
        );
        assert_eq!(
            meeting.derive_status(datetime("2024-01-01 00:00"), ""),
            Status::Tentative
        );
    }

    #[test]
    fn status_detects_cancellation_words() {
        let now = datetime("2024-01-01 00:00");

        let mut meeting = sample();
        meeting.title = "Board of Adjustment - CANCELLED".to_string();
        assert_eq!(meeting.derive_status(now, ""), Status::Cancelled);

        let mut meeting = sample();
        meeting.description = "This meeting has been postponed.".to_string();
        assert_eq!(meeting.derive_status(now, ""), Status::Cancelled);

        let meeting = sample();
        assert_eq!(
            meeting.derive_status(now, "Rescheduled to next week"),
            Status::Cancelled
        );
    }

    #[test]
    fn id_uses_start_and_title_slug() {
        let mut meeting = sample();
        assert_eq!(
            meeting.derive_id("clay_adjustment_board"),
            "clay_adjustment_board/202410151900/board_of_adjustment"
        );

        meeting.title = "  Board of Adjustment -- Special Session!  ".to_string();
        assert_eq!(
            meeting.derive_id("clay_adjustment_board"),
            "clay_adjustment_board/202410151900/board_of_adjustment_special_session"
        );
    }

    #[test]
    fn serializes_in_feed_shape() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["classification"], "Board");
        assert_eq!(value["status"], "tentative");
        assert_eq!(value["start"], "2024-10-15T19:00:00");
        assert_eq!(value["end"], "2024-10-15T21:00:00");
        assert_eq!(value["all_day"], false);
        assert_eq!(value["location"]["name"], "Clayton City Hall");
        assert_eq!(value["links"][0]["title"], "Agenda");
    }
}
