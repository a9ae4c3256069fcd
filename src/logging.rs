use indicatif::ProgressBar;
use std::io::{self, Write};
use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;

/// Stderr writer that clears the progress line while a log record is written.
#[derive(Clone)]
pub struct SuspendingWriter {
    progress: ProgressBar,
}

impl SuspendingWriter {
    pub fn new(progress: ProgressBar) -> Self {
        Self { progress }
    }
}

impl Write for SuspendingWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.progress.suspend(|| io::stderr().flush())
    }
}

impl<'a> MakeWriter<'a> for SuspendingWriter {
    type Writer = SuspendingWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Installs the global subscriber; records go to stderr around `progress`.
pub fn init(debug: bool, progress: &ProgressBar) {
    tracing_subscriber::fmt()
        .with_max_level(if debug { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(SuspendingWriter::new(progress.clone()))
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_pass_through_with_hidden_bar() {
        let mut writer = SuspendingWriter::new(ProgressBar::hidden());
        let line = b"INFO Requesting: https://www.mubawab.ma/fr/t/rabat\n";

        assert_eq!(writer.write(line).unwrap(), line.len());
        writer.flush().unwrap();
    }

    #[test]
    fn made_writers_share_the_bar() {
        let progress = ProgressBar::hidden();
        let writer = SuspendingWriter::new(progress.clone());

        let mut made = writer.make_writer();
        progress.set_message("page 2");
        assert_eq!(made.write(b"x").unwrap(), 1);
        assert_eq!(made.progress.message(), "page 2");
    }
}
