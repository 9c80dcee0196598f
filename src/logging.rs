//! `tracing` output for the browser: formatted lines go to `console.log`.

use std::io;

use tracing::Level;

/// Buffers one formatted event and hands it to the console on flush/drop.
#[derive(Default)]
pub struct ConsoleWriter {
    buf: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&self.buf);
        emit(line.trim_end());
        self.buf.clear();
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let _ = io::Write::flush(self);
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(line: &str) {
    web_sys::console::log_1(&line.into());
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(line: &str) {
    eprintln!("{line}");
}

/// Install the global subscriber. Safe to call more than once.
pub fn init() {
    let installed = tracing_subscriber::fmt()
        .with_writer(ConsoleWriter::default)
        .with_ansi(false)
        .without_time()
        .with_target(false)
        .with_max_level(Level::DEBUG)
        .try_init();
    if installed.is_ok() {
        tracing::debug!("console logging ready");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn writer_buffers_until_flush() {
        let mut writer = ConsoleWriter::default();
        writer.write_all(b"game over ").unwrap();
        writer.write_all(b"total=8\n").unwrap();
        assert_eq!(writer.buf, b"game over total=8\n");
        writer.flush().unwrap();
        assert!(writer.buf.is_empty());
    }

    #[test]
    fn init_twice_is_harmless() {
        init();
        init();
    }
}
