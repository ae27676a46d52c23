use crate::CrawlerError;
use chrono::NaiveDateTime;
use scraper::ElementRef;

pub(crate) fn get_now() -> NaiveDateTime {
    chrono::offset::Local::now().naive_local()
}

/// First non-blank text node among `elements`, trimmed.
pub(crate) fn first_text<'a, I>(elements: I) -> Option<String>
where
    I: IntoIterator<Item = ElementRef<'a>>,
{
    elements
        .into_iter()
        .flat_map(|el| el.text())
        .map(str::trim)
        .find(|t| !t.is_empty())
        .map(ToString::to_string)
}

pub(crate) fn absolute_url(base: &str, href: &str) -> Result<String, CrawlerError> {
    reqwest::Url::parse(base)
        .and_then(|base| base.join(href.trim()))
        .map(|url| url.to_string())
        .map_err(|e| CrawlerError::InvalidUrl {
            url: href.to_string(),
            reason: e.to_string(),
        })
}
