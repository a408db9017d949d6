// src/source/tail.rs

//! Polling follow-mode reader for a single file.
//!
//! The file is opened and positioned at its current end, so only content
//! appended after start-up is delivered. A file that does not exist yet is
//! waited for and, once it appears, read from its beginning.
//!
//! Truncation, rotation (the path now names a different file) and removal
//! end the source: the stream is closed rather than silently re-reading.

use std::fs::Metadata;
use std::future::Future;
use std::io::{ErrorKind, SeekFrom};
use std::path::PathBuf;
use std::pin::Pin;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tracing::{debug, error, info};

use crate::channel::Publisher;
use crate::errors::{Result, StreammonError};

use super::{LineSource, Ticker, trim_line_ending};

/// Follows a file, yielding each newly appended line.
pub struct TailSource<T> {
    path: PathBuf,
    ticker: T,
}

impl<T: Ticker> TailSource<T> {
    pub fn new(path: impl Into<PathBuf>, ticker: T) -> Self {
        Self {
            path: path.into(),
            ticker,
        }
    }

    async fn follow(mut self, publisher: Publisher) {
        match self.follow_inner(&publisher).await {
            Ok(()) => debug!(path = %self.path.display(), "tail finished"),
            Err(err) => error!(path = %self.path.display(), error = %err, "line source failed"),
        }
        publisher.close();
    }

    async fn follow_inner(&mut self, publisher: &Publisher) -> Result<()> {
        let Some((mut file, mut offset)) = self.open(publisher).await? else {
            return Ok(());
        };
        info!(path = %self.path.display(), offset, "following file");

        let mut pending: Vec<u8> = Vec::new();
        loop {
            if !self.ticker.tick().await || publisher.is_closed() {
                return Ok(());
            }

            let on_disk = match tokio::fs::metadata(&self.path).await {
                Ok(meta) => meta,
                Err(e) if e.kind() == ErrorKind::NotFound => {
                    return Err(self.source_error("file was removed"));
                }
                Err(e) => return Err(self.source_error(e)),
            };
            let opened = file.metadata().await.map_err(|e| self.source_error(e))?;

            if !same_file(&on_disk, &opened) {
                return Err(self.source_error("file was rotated"));
            }
            let len = opened.len();
            if len < offset {
                return Err(self.source_error(format!(
                    "file was truncated ({len} bytes, previously read {offset})"
                )));
            }
            if len == offset {
                continue;
            }

            let mut chunk = Vec::new();
            let read = file
                .read_to_end(&mut chunk)
                .await
                .map_err(|e| self.source_error(e))?;
            offset += read as u64;
            pending.extend_from_slice(&chunk);

            while let Some(pos) = pending.iter().position(|b| *b == b'\n') {
                let raw: Vec<u8> = pending.drain(..=pos).collect();
                let line = trim_line_ending(String::from_utf8_lossy(&raw).into_owned());
                if publisher.publish(line).await.is_err() {
                    return Ok(());
                }
            }
        }
    }

    /// Open the file at its end, or wait for it to be created.
    ///
    /// `None` means the ticker stopped or the channel closed while waiting.
    async fn open(&mut self, publisher: &Publisher) -> Result<Option<(File, u64)>> {
        match File::open(&self.path).await {
            Ok(mut file) => {
                let offset = file
                    .seek(SeekFrom::End(0))
                    .await
                    .map_err(|e| self.source_error(e))?;
                return Ok(Some((file, offset)));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %self.path.display(), "file does not exist yet; waiting for it");
            }
            Err(e) => return Err(self.source_error(e)),
        }

        loop {
            if !self.ticker.tick().await || publisher.is_closed() {
                return Ok(None);
            }
            match File::open(&self.path).await {
                Ok(file) => return Ok(Some((file, 0))),
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(self.source_error(e)),
            }
        }
    }

    fn source_error(&self, message: impl ToString) -> StreammonError {
        StreammonError::SourceError {
            source_name: self.path.display().to_string(),
            message: message.to_string(),
        }
    }
}

impl<T: Ticker> LineSource for TailSource<T> {
    fn run(self: Box<Self>, publisher: Publisher) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin((*self).follow(publisher))
    }
}

#[cfg(unix)]
fn same_file(a: &Metadata, b: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;
    a.dev() == b.dev() && a.ino() == b.ino()
}

#[cfg(not(unix))]
fn same_file(_a: &Metadata, _b: &Metadata) -> bool {
    true
}
