//! Clayton, MO Board of Adjustment.
//!
//! The board page carries a widget table of past meetings with their
//! documents; the meetings themselves are read from the city calendar, one
//! listing page per month, and then from each event's detail page.

mod agenda;
mod crawler;

pub use agenda::AgendaMap;
pub use crawler::ClayAdjustmentBoard;

use chrono::{Datelike, Months, NaiveDate};

pub const NAME: &str = "clay_adjustment_board";
pub const AGENCY: &str = "Clayton Board of Adjustment";
pub const TIMEZONE: &str = "America/Chicago";

pub const START_URL: &str =
    "https://www.claytonmo.gov/government/boards-and-commissions/board-of-adjustment/-selyear-allyear";
const CALENDAR_URL: &str = "https://www.claytonmo.gov/calendar-6/-seldept-8/-selcat-149";

/// Calendar entries are followed only when their title contains this.
pub const KEYWORD: &str = "Adjustment";

const MONTHS_BEFORE: u32 = 9;
const MONTHS_AFTER: u32 = 1;

pub const LOCATION_NAME: &str = "Clayton City Hall";
pub const LOCATION_ADDRESS: &str =
    "Clayton City Hall, Second Floor Council Chambers of Clayton located at 10 North Bemiston Avenue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Board,
    Calendar,
    Event,
}

/// First day of every month from nine months before `today` up to the next
/// month, oldest first.
pub fn month_window(today: NaiveDate) -> Vec<NaiveDate> {
    (0..=MONTHS_BEFORE + MONTHS_AFTER)
        .filter_map(|i| {
            NaiveDate::from_ymd_opt(today.year(), today.month(), 1)?
                .checked_sub_months(Months::new(MONTHS_BEFORE))?
                .checked_add_months(Months::new(i))
        })
        .collect()
}

pub fn calendar_url(month: NaiveDate) -> String {
    format!(
        "{}/-curm-{}/-cury-{}",
        CALENDAR_URL,
        month.format("%m"),
        month.format("%Y")
    )
}
