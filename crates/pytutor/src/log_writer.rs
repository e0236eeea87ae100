// SPDX-FileCopyrightText: 2026 PyTutor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! stderr log writer that cooperates with an on-screen spinner.
//!
//! Each log event is buffered and written in one piece. While a spinner is
//! attached the write happens inside [`ProgressBar::suspend`], so log lines
//! never interleave with the spinner frame.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indicatif::ProgressBar;
use tracing_subscriber::fmt::MakeWriter;

/// Shared handle given to the tracing subscriber and to spinner owners.
#[derive(Clone, Default)]
pub struct LogWriter {
    active: Arc<Mutex<Option<ProgressBar>>>,
}

impl LogWriter {
    /// Routes log output around `bar` until the returned guard is dropped.
    pub fn attach(&self, bar: &ProgressBar) -> SpinnerGuard<'_> {
        *self.slot() = Some(bar.clone());
        SpinnerGuard { writer: self }
    }

    fn slot(&self) -> MutexGuard<'_, Option<ProgressBar>> {
        self.active.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Detaches the spinner from the log writer on drop.
pub struct SpinnerGuard<'a> {
    writer: &'a LogWriter,
}

impl Drop for SpinnerGuard<'_> {
    fn drop(&mut self) {
        *self.writer.slot() = None;
    }
}

/// One buffered log event, flushed to stderr on drop.
pub struct LogLine {
    buf: Vec<u8>,
    spinner: Option<ProgressBar>,
}

impl Write for LogLine {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for LogLine {
    fn drop(&mut self) {
        if self.buf.is_empty() {
            return;
        }
        let emit = || {
            let _ = io::stderr().lock().write_all(&self.buf);
        };
        match &self.spinner {
            Some(bar) => bar.suspend(emit),
            None => emit(),
        }
    }
}

impl<'a> MakeWriter<'a> for LogWriter {
    type Writer = LogLine;

    fn make_writer(&'a self) -> Self::Writer {
        LogLine {
            buf: Vec::new(),
            spinner: self.slot().clone(),
        }
    }
}
