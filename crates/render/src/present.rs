use forklift_kernel::Game;
use std::io::Write;
use std::time::Duration;

use crate::scene::{DrawItem, compose};
use crate::sketch::BoardSketch;

/// Frame presentation capability: clear, draw in order, present.
///
/// A windowed backend maps these onto its swapchain; `should_close` reports
/// a close request and is polled once per command.
pub trait Presenter {
    fn clear(&mut self);
    fn draw(&mut self, item: &DrawItem);
    fn present(&mut self);

    fn should_close(&mut self) -> bool {
        false
    }
}

/// Present one full frame of `game`.
pub fn present_game<P: Presenter + ?Sized>(presenter: &mut P, game: &Game) {
    presenter.clear();
    for item in compose(game) {
        presenter.draw(&item);
    }
    presenter.present();
}

/// Keeps the last presented frame and a count. Can request a close after a
/// given number of frames.
#[derive(Debug, Default)]
pub struct FrameRecorder {
    pending: Vec<DrawItem>,
    last: Vec<DrawItem>,
    presented: u64,
    close_after: Option<u64>,
}

impl FrameRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `should_close` once `frames` frames have been presented.
    pub fn closing_after(frames: u64) -> Self {
        Self {
            close_after: Some(frames),
            ..Self::default()
        }
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn last_frame(&self) -> &[DrawItem] {
        &self.last
    }
}

impl Presenter for FrameRecorder {
    fn clear(&mut self) {
        self.pending.clear();
    }

    fn draw(&mut self, item: &DrawItem) {
        self.pending.push(*item);
    }

    fn present(&mut self) {
        std::mem::swap(&mut self.pending, &mut self.last);
        self.presented += 1;
    }

    fn should_close(&mut self) -> bool {
        self.close_after.is_some_and(|n| self.presented >= n)
    }
}

/// Writes an ASCII sketch of every `every`-th frame to `out`, optionally
/// pacing frames with a fixed delay.
pub struct TextPresenter<W: Write> {
    out: W,
    every: u64,
    delay: Duration,
    presented: u64,
    sketch: BoardSketch,
}

impl<W: Write> TextPresenter<W> {
    /// `every == 0` writes nothing per frame.
    pub fn new(out: W, every: u64) -> Self {
        Self {
            out,
            every,
            delay: Duration::ZERO,
            presented: 0,
            sketch: BoardSketch::new(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn presented(&self) -> u64 {
        self.presented
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for TextPresenter<W> {
    fn clear(&mut self) {
        self.sketch = BoardSketch::new();
    }

    fn draw(&mut self, item: &DrawItem) {
        self.sketch.place(item);
    }

    fn present(&mut self) {
        self.presented += 1;
        if self.every > 0 && self.presented % self.every == 0 {
            let written = writeln!(self.out, "-- frame {} --\n{}", self.presented, self.sketch)
                .and_then(|()| self.out.flush());
            if let Err(err) = written {
                tracing::warn!(%err, frame = self.presented, "failed to write frame");
            }
        }
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::DrawKind;
    use forklift_kernel::GameConfig;

    #[test]
    fn recorder_keeps_last_frame() {
        let game = Game::new(GameConfig::default());
        let mut rec = FrameRecorder::new();
        present_game(&mut rec, &game);
        present_game(&mut rec, &game);
        assert_eq!(rec.presented(), 2);
        assert_eq!(rec.last_frame().len(), 4);
        assert_eq!(rec.last_frame()[0].kind, DrawKind::Board);
    }

    #[test]
    fn recorder_requests_close() {
        let game = Game::new(GameConfig::default());
        let mut rec = FrameRecorder::closing_after(1);
        assert!(!rec.should_close());
        present_game(&mut rec, &game);
        assert!(rec.should_close());
    }

    #[test]
    fn text_presenter_writes_every_nth_frame() {
        let game = Game::new(GameConfig::default());
        let mut text = TextPresenter::new(Vec::new(), 2);
        for _ in 0..5 {
            present_game(&mut text, &game);
        }
        let out = String::from_utf8(text.into_inner()).unwrap();
        assert!(out.contains("-- frame 2 --"));
        assert!(out.contains("-- frame 4 --"));
        assert!(!out.contains("-- frame 5 --"));
    }

    #[test]
    fn text_presenter_silent_when_stride_is_zero() {
        let game = Game::new(GameConfig::default());
        let mut text = TextPresenter::new(Vec::new(), 0);
        present_game(&mut text, &game);
        assert_eq!(text.presented(), 1);
        assert!(text.into_inner().is_empty());
    }
}
