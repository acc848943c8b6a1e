// src/sink.rs

//! Serialized output sink shared by the engine and every task body.
//!
//! A [`SharedWriter`] funnels writes from any number of producers (the
//! engine's progress lines, a task's own logging, the stdout/stderr pumps of
//! a child process) into one destination. Each `write` call holds the lock
//! for its whole buffer, so two producers never interleave inside a single
//! write; ordering between producers is whatever order they acquire the lock.
//!
//! The writer can also carry a line prefix. While a prefix is set, every line
//! that starts inside a write gets the prefix inserted in front of it.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

struct SinkState {
    out: Box<dyn Write + Send>,
    prefix: Option<Vec<u8>>,
    at_line_start: bool,
}

impl SinkState {
    fn write_prefixed(&mut self, buf: &[u8]) -> io::Result<()> {
        let Some(prefix) = self.prefix.as_deref() else {
            self.out.write_all(buf)?;
            self.at_line_start = buf.last() == Some(&b'\n');
            return Ok(());
        };

        for line in buf.split_inclusive(|b| *b == b'\n') {
            if self.at_line_start {
                self.out.write_all(prefix)?;
            }
            self.out.write_all(line)?;
            self.at_line_start = line.last() == Some(&b'\n');
        }
        Ok(())
    }
}

/// Cloneable, mutex-guarded writer.
#[derive(Clone)]
pub struct SharedWriter {
    inner: Arc<Mutex<SinkState>>,
}

impl fmt::Debug for SharedWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedWriter").finish_non_exhaustive()
    }
}

impl SharedWriter {
    pub fn new<W>(out: W) -> Self
    where
        W: Write + Send + 'static,
    {
        Self {
            inner: Arc::new(Mutex::new(SinkState {
                out: Box::new(out),
                prefix: None,
                at_line_start: true,
            })),
        }
    }

    /// Writer over the process's standard output.
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }

    /// Set (or clear with `None`) the prefix inserted at the start of lines.
    pub fn set_prefix(&self, prefix: Option<&[u8]>) {
        if let Ok(mut state) = self.lock() {
            state.prefix = prefix.map(<[u8]>::to_vec);
        }
    }

    /// Write `line` followed by a newline as one atomic write.
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.write_atomic(&buf)
    }

    /// Write the whole buffer while holding the lock.
    pub fn write_atomic(&self, buf: &[u8]) -> io::Result<()> {
        let mut state = self.lock()?;
        state.write_prefixed(buf)
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, SinkState>> {
        self.inner
            .lock()
            .map_err(|_| io::Error::other("output sink mutex poisoned"))
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_atomic(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.lock()?.out.flush()
    }
}
