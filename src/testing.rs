use crate::{CrawlerError, Fetcher, Pipeline};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Serves canned bodies by url; any other url is a not-found error.
#[derive(Debug, Default)]
pub(crate) struct FixtureFetcher {
    pages: HashMap<String, String>,
}

impl FixtureFetcher {
    pub(crate) fn with<U: Into<String>, B: Into<String>>(mut self, url: U, body: B) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }
}

#[async_trait::async_trait]
impl Fetcher for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<String, CrawlerError> {
        self.pages.get(url).cloned().ok_or_else(|| {
            CrawlerError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("no fixture for {}", url),
            ))
        })
    }
}

pub(crate) struct CollectPipeline<T> {
    items: Arc<Mutex<Vec<T>>>,
}

impl<T> Default for CollectPipeline<T> {
    fn default() -> Self {
        CollectPipeline {
            items: Arc::new(Mutex::new(vec![])),
        }
    }
}

impl<T> CollectPipeline<T> {
    pub(crate) fn items(&self) -> Arc<Mutex<Vec<T>>> {
        Arc::clone(&self.items)
    }
}

#[async_trait::async_trait]
impl<T: Send + 'static> Pipeline<T> for CollectPipeline<T> {
    async fn process(&mut self, item: T) -> Result<(), CrawlerError> {
        self.items.lock().unwrap().push(item);
        Ok(())
    }
}
