// src/source/reader.rs

use std::future::Future;
use std::pin::Pin;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, error};

use crate::channel::Publisher;
use crate::errors::StreammonError;

use super::{LineSource, trim_line_ending};

/// Reads lines from an async reader until end-of-stream.
pub struct ReaderSource<R> {
    name: String,
    reader: R,
}

impl ReaderSource<tokio::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new("stdin", tokio::io::stdin())
    }
}

impl<R> ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    async fn pump(self, publisher: Publisher) {
        let name = self.name;
        let mut reader = BufReader::new(self.reader);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => {
                    debug!(source = %name, "end of input");
                    break;
                }
                Ok(_) => {
                    if publisher.is_closed() {
                        debug!(source = %name, "channel closed; stopping reader");
                        break;
                    }
                    let line = trim_line_ending(String::from_utf8_lossy(&buf).into_owned());
                    if publisher.publish(line).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    let err = StreammonError::SourceError {
                        source_name: name.clone(),
                        message: e.to_string(),
                    };
                    error!(source = %name, error = %err, "line source failed");
                    break;
                }
            }
        }

        publisher.close();
    }
}

impl<R> LineSource for ReaderSource<R>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    fn run(self: Box<Self>, publisher: Publisher) -> Pin<Box<dyn Future<Output = ()> + Send>> {
        Box::pin((*self).pump(publisher))
    }
}
