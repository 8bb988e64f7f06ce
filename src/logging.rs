use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Stderr always; additionally a size-capped file when `log_file` is set.
pub fn init_logging(level: Level, log_file: Option<&str>, max_file_bytes: u64) {
    let level_filter = LevelFilter::from_level(level);
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_filter(level_filter);

    let file_layer = log_file.map(|path| {
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(CappedLogFile::new(PathBuf::from(path), max_file_bytes))
            .with_filter(level_filter)
    });

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();
}

/// Log file that, once it reaches `max_len`, keeps only its newest half.
#[derive(Clone)]
pub struct CappedLogFile {
    path: PathBuf,
    max_len: u64,
    lock: Arc<Mutex<()>>,
}

impl CappedLogFile {
    pub fn new(path: PathBuf, max_len: u64) -> Self {
        Self { path, max_len: max_len.max(1), lock: Arc::new(Mutex::new(())) }
    }

    fn shrink_if_full(&self) -> io::Result<()> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(_) => return Ok(()),
        };
        if size < self.max_len {
            return Ok(());
        }

        let keep = self.max_len / 2;
        let mut tail = Vec::with_capacity(keep as usize);
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(size.saturating_sub(keep)))?;
        file.read_to_end(&mut tail)?;

        // Drop the partial first line so the file starts on a record boundary.
        let start = tail.iter().position(|b| *b == b'\n').map(|i| i + 1).unwrap_or(0);
        std::fs::write(&self.path, &tail[start..])
    }

    fn append(&self, buf: &[u8]) -> io::Result<()> {
        // A poisoned lock only means another writer panicked mid-write.
        let _guard = self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.shrink_if_full()?;
        OpenOptions::new().create(true).append(true).open(&self.path)?.write_all(buf)
    }
}

impl Write for CappedLogFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CappedLogFile {
    type Writer = CappedLogFile;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capped_file_keeps_newest_half() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset-chat.log");
        let mut log = CappedLogFile::new(path.clone(), 100);

        for i in 0..20 {
            writeln!(log, "line {:02}", i).unwrap();
        }

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.len() <= 100 + "line 19\n".len());
        assert!(content.ends_with("line 19\n"));
        assert!(!content.contains("line 00"));
        assert!(content.starts_with("line "));
    }

    #[test]
    fn test_small_file_is_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("small.log");
        let mut log = CappedLogFile::new(path.clone(), 1024);
        log.write_all(b"first\n").unwrap();
        log.write_all(b"second\n").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }
}
