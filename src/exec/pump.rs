// src/exec/pump.rs

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::sink::SharedWriter;

/// Copy `reader` into `writer` one line at a time until EOF.
///
/// Each line is a single sink write, so lines from concurrent pumps never
/// interleave.
pub fn spawn_line_pump<R>(task: &str, stream: &'static str, reader: R, writer: SharedWriter) -> JoinHandle<()>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let task = task.to_string();
    tokio::spawn(async move {
        let mut lines = BufReader::new(reader).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if let Err(err) = writer.write_line(&line) {
                        warn!(task = %task, stream, error = %err, "failed to forward output");
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    warn!(task = %task, stream, error = %err, "failed to read output");
                    break;
                }
            }
        }
        debug!(task = %task, stream, "output stream closed");
    })
}
