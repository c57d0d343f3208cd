//! Line-oriented output shared between the demo and its background tasks.

use colored::Colorize;
use std::fmt::Display;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

type Sink = Box<dyn Write + Send>;

#[derive(Clone)]
pub struct Console {
    sink: Arc<Mutex<Sink>>,
    color: bool,
}

/// In-memory output captured by [`Console::capture`].
#[derive(Clone, Default)]
pub struct Captured {
    buffer: Arc<Mutex<Vec<u8>>>,
}

struct CaptureWriter(Captured);

impl Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        lock_recovering(&self.0.buffer).extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&lock_recovering(&self.buffer)).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

// A task that panicked mid-write poisons the lock; the buffer is still usable.
fn lock_recovering<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            tracing::warn!("console lock was poisoned, recovering");
            poisoned.into_inner()
        }
    }
}

impl Console {
    pub fn new(sink: impl Write + Send + 'static, color: bool) -> Self {
        Self {
            sink: Arc::new(Mutex::new(Box::new(sink))),
            color,
        }
    }

    pub fn stdout(color: bool) -> Self {
        Self::new(io::stdout(), color)
    }

    /// A colorless console writing into memory, plus the handle to read it.
    pub fn capture() -> (Self, Captured) {
        let captured = Captured::default();
        (Self::new(CaptureWriter(captured.clone()), false), captured)
    }

    pub fn line(&self, text: impl Display) -> io::Result<()> {
        let mut sink = lock_recovering(&self.sink);
        writeln!(sink, "{}", text)?;
        sink.flush()
    }

    pub fn blank(&self) -> io::Result<()> {
        self.line("")
    }

    pub fn heading(&self, title: &str) -> io::Result<()> {
        if self.color {
            self.line(format!("=== {} ===", title).bold().cyan())
        } else {
            self.line(format!("=== {} ===", title))
        }
    }
}
