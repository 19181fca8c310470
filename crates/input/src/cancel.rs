use std::io::BufRead;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;

use crate::action::Action;

/// Shared "should stop" flag. Cloning shares the flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Watch `reader` line by line on a background thread and raise `token` on a
/// quit key. The thread ends at quit, end of input, or a read error.
pub fn spawn_key_watcher<R>(reader: R, token: CancelToken) -> JoinHandle<()>
where
    R: BufRead + Send + 'static,
{
    std::thread::spawn(move || {
        for line in reader.lines() {
            match line {
                Ok(line) if Action::from_key(&line) == Action::Quit => {
                    tracing::info!("cancellation requested");
                    token.cancel();
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "key watcher stopped");
                    return;
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());
        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn watcher_cancels_on_quit() {
        let token = CancelToken::new();
        let handle = spawn_key_watcher(Cursor::new("x\nq\n"), token.clone());
        handle.join().unwrap();
        assert!(token.is_cancelled());
    }

    #[test]
    fn watcher_ignores_end_of_input() {
        let token = CancelToken::new();
        let handle = spawn_key_watcher(Cursor::new("hello\n"), token.clone());
        handle.join().unwrap();
        assert!(!token.is_cancelled());
    }
}
