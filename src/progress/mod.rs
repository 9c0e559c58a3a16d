use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Read, Write};
use std::time::Duration;

const TRANSFER_TEMPLATE: &str =
    "{spinner:.green} {msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";
const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg} {bytes} ({bytes_per_sec})";

/// Trait for progress reporting
pub trait ProgressReporter: Send + Sync {
    fn start(&self, total: u64);
    fn finish(&self);
    fn set_message(&self, msg: &str);
    fn inc(&self, delta: u64);
}

/// Indicatif-based progress reporter
pub struct IndicatifProgress {
    bar: ProgressBar,
}

impl IndicatifProgress {
    /// Bar for a transfer of known size
    pub fn transfer(name: &str, total: u64) -> Self {
        let bar = ProgressBar::new(total);
        bar.set_style(
            ProgressStyle::default_bar()
                .template(TRANSFER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        bar.set_message(name.to_string());
        Self { bar }
    }

    /// Spinner for a transfer whose size is not known up front
    pub fn spinner(name: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template(SPINNER_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(name.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }
}

impl ProgressReporter for IndicatifProgress {
    fn start(&self, total: u64) {
        self.bar.set_length(total);
    }

    fn finish(&self) {
        self.bar.finish_with_message("Complete");
    }

    fn set_message(&self, msg: &str) {
        self.bar.set_message(msg.to_string());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }
}

/// No-op progress reporter for when progress reporting is disabled
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    fn start(&self, _total: u64) {}
    fn finish(&self) {}
    fn set_message(&self, _msg: &str) {}
    fn inc(&self, _delta: u64) {}
}

/// Progress reporter factory
pub struct ProgressFactory {
    enabled: bool,
}

impl ProgressFactory {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Reporter for a file transfer; `total_bytes` is `None` when unknown
    pub fn file_transfer(&self, file_name: &str, total_bytes: Option<u64>) -> Box<dyn ProgressReporter> {
        if !self.enabled {
            return Box::new(NoOpProgress);
        }
        match total_bytes {
            Some(total) => Box::new(IndicatifProgress::transfer(file_name, total)),
            None => Box::new(IndicatifProgress::spinner(file_name)),
        }
    }
}

/// Reader that reports every chunk it hands out
pub struct ProgressReader<'a, R> {
    inner: R,
    reporter: &'a dyn ProgressReporter,
}

impl<'a, R: Read> ProgressReader<'a, R> {
    pub fn new(inner: R, reporter: &'a dyn ProgressReporter) -> Self {
        Self { inner, reporter }
    }
}

impl<R: Read> Read for ProgressReader<'_, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.reporter.inc(n as u64);
        Ok(n)
    }
}

/// Writer that reports every chunk it accepts
pub struct ProgressWriter<'a, W> {
    inner: W,
    reporter: &'a dyn ProgressReporter,
}

impl<'a, W: Write> ProgressWriter<'a, W> {
    pub fn new(inner: W, reporter: &'a dyn ProgressReporter) -> Self {
        Self { inner, reporter }
    }
}

impl<W: Write> Write for ProgressWriter<'_, W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.reporter.inc(n as u64);
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
