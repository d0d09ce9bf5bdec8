// src/progress.rs
use crate::model::OptionIdentifier;

/// Lightweight progress reporting used by long-running scrapes.
/// Frontends implement this to surface status to users.
pub trait Progress {
    /// Called at the start of a batch with the number of options in it.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One option's detail page was read into a record.
    fn item_done(&mut self, _ident: &OptionIdentifier) {}

    /// One option's detail page could not be fetched; a minimal record was kept.
    fn item_failed(&mut self, _ident: &OptionIdentifier) {}

    /// Called at the end of a batch, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Prints `[done/total]` lines to stderr.
#[derive(Default)]
pub struct ConsoleProgress {
    total: usize,
    done: usize,
}

impl ConsoleProgress {
    fn tick(&mut self, ident: &OptionIdentifier, tag: &str) {
        self.done += 1;
        eprintln!("[{}/{}] {tag} {}", self.done, self.total, ident.display_name);
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }

    fn item_done(&mut self, ident: &OptionIdentifier) {
        self.tick(ident, "ok  ");
    }

    fn item_failed(&mut self, ident: &OptionIdentifier) {
        self.tick(ident, "FAIL");
    }
}
