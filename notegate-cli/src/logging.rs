use std::fs::File;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// A writer for MCP-mode logging that flushes and syncs after every write.
///
/// The stdio transport owns stdout, so server logs go to a file that must be
/// readable while the server is still running. Clones share the same file.
///
/// # Example
///
/// ```no_run
/// use std::sync::{Arc, Mutex};
/// use std::fs::File;
/// use std::io::Write;
/// use notegate_cli::logging::FileWriterGuard;
///
/// let file = File::create("mcp.log").unwrap();
/// let mut guard = FileWriterGuard::new(Arc::new(Mutex::new(file)));
/// guard.write_all(b"Log message\n").unwrap();
/// ```
#[derive(Clone)]
pub struct FileWriterGuard {
    file: Arc<Mutex<File>>,
}

impl FileWriterGuard {
    /// Creates a new `FileWriterGuard` wrapping the given file.
    pub fn new(file: Arc<Mutex<File>>) -> Self {
        Self { file }
    }
}

impl Write for FileWriterGuard {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let written = file.write(buf)?;
        file.flush()?;
        file.sync_all()?;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        file.flush()?;
        file.sync_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_clones_share_one_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mcp.log");
        let guard = FileWriterGuard::new(Arc::new(Mutex::new(File::create(&path).unwrap())));

        let mut first = guard.clone();
        let mut second = guard;
        first.write_all(b"server started\n").unwrap();
        second.write_all(b"tool called\n").unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "server started\ntool called\n"
        );
    }
}
