use std::io::{self, Write};

/// Single overwriting `polling: N` line on stdout
#[derive(Debug, Default)]
pub struct PollProgress {
    enabled: bool,
    drawn: bool,
}

impl PollProgress {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            drawn: false,
        }
    }

    pub fn update(&mut self, attempt: u32) {
        if !self.enabled {
            return;
        }
        let mut out = io::stdout().lock();
        // Display only; a closed stdout must not stop the relay.
        let _ = write!(out, "\r\x1b[2Kpolling: {}", attempt);
        let _ = out.flush();
        self.drawn = true;
    }

    /// End the counter line so following log lines start clean
    pub fn finish(&mut self) {
        if self.drawn {
            let _ = writeln!(io::stdout());
            self.drawn = false;
        }
    }
}

impl Drop for PollProgress {
    fn drop(&mut self) {
        self.finish();
    }
}
