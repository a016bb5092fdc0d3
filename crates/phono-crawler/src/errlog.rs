use std::fs::OpenOptions;
use std::io::{self, LineWriter, Write};
use std::path::Path;
use std::thread;

use crossbeam_channel::{select, unbounded, Sender};

/// Append-only failure log fed by many tasks and written by a single thread,
/// one line per event.
#[derive(Debug)]
pub struct ErrorLog {
    writer: thread::JoinHandle<io::Result<()>>,
    tx_stop: Sender<()>,
    sink: ErrorSink,
}

/// Cloneable handle used to record failures into an [`ErrorLog`].
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    tx_line: Option<Sender<String>>,
}

impl ErrorLog {
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        let mut wtr = LineWriter::new(file);

        let (tx_line, rx_line) = unbounded::<String>();
        let (tx_stop, rx_stop) = unbounded::<()>();

        let writer = thread::Builder::new()
            .name("error-log".into())
            .spawn(move || {
                loop {
                    select! {
                        recv(rx_line) -> line => match line {
                            Ok(line) => writeln!(wtr, "{line}")?,
                            Err(_) => break,
                        },
                        recv(rx_stop) -> _ => {
                            for line in rx_line.try_iter() {
                                writeln!(wtr, "{line}")?;
                            }
                            break;
                        }
                    }
                }
                wtr.flush()
            })?;

        Ok(Self {
            writer,
            tx_stop,
            sink: ErrorSink {
                tx_line: Some(tx_line),
            },
        })
    }

    pub fn sink(&self) -> ErrorSink {
        self.sink.clone()
    }

    /// Writes every line recorded so far and stops the writer thread.
    pub fn close(self) -> io::Result<()> {
        self.tx_stop.send(()).ok();
        self.writer
            .join()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "error log writer panicked"))?
    }
}

impl ErrorSink {
    /// A sink that drops every line, for callers running without an error log.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn record(&self, line: impl Into<String>) {
        if let Some(tx) = &self.tx_line {
            let line = line.into().replace('\n', " ");
            if let Err(e) = tx.send(line) {
                log::error!("Couldn't record error line: {e}");
            }
        }
    }
}
