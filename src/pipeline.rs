use crate::{CrawlerError, Pipeline};
use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Writes every item as one line of compact JSON.
pub struct JsonLinesPipeline<W> {
    writer: W,
    written: u64,
}

impl<W> JsonLinesPipeline<W> {
    pub fn new(writer: W) -> JsonLinesPipeline<W> {
        JsonLinesPipeline { writer, written: 0 }
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait::async_trait]
impl<W, T> Pipeline<T> for JsonLinesPipeline<W>
where
    W: AsyncWrite + Unpin + Send,
    T: Serialize + Send + 'static,
{
    async fn process(&mut self, item: T) -> Result<(), CrawlerError> {
        let mut line = serde_json::to_vec(&item)?;
        line.push(b'\n');
        self.writer.write_all(&line).await?;
        self.written += 1;
        Ok(())
    }

    async fn close(&mut self) -> Result<(), CrawlerError> {
        self.writer.flush().await?;
        tracing::debug!("Wrote {} items", self.written);
        Ok(())
    }
}
