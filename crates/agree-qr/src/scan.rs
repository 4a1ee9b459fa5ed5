//! Cancellable camera scan task.
//!
//! The task is step-driven: whoever owns the frame cadence (an animation
//! frame loop in the browser, a plain loop in tests) calls [`ScanTask::poll_step`]
//! until it stops returning [`ScanPoll::Pending`]. Cancellation goes
//! through a [`ScanHandle`], which can be held by UI code that no longer
//! owns the task itself.
//!
//! Invariant: the frame source is released exactly once, whether the scan
//! finds a code, is cancelled, fails, or the task is simply dropped. The
//! capture device must never stay active after teardown.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::decode::decode_rgba;
use crate::error::CaptureError;

/// One camera/video frame in RGBA form.
#[derive(Debug, Clone)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Where frames come from.
pub trait FrameSource {
    /// The next frame, if one is ready. `Ok(None)` means poll again later
    /// (e.g. the video element has not buffered enough data yet).
    fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError>;

    /// Free the underlying capture device. Called at most once by the
    /// scan task.
    fn release(&mut self);
}

/// Cancellation handle for a running scan.
#[derive(Debug, Clone)]
pub struct ScanHandle {
    cancelled: Arc<AtomicBool>,
}

impl ScanHandle {
    /// Request the scan to stop. The task observes this on its next poll.
    pub fn stop(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Outcome of one polling step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanPoll {
    /// No decodable code yet; poll again.
    Pending,
    /// A code was decoded; the source has been released.
    Found(String),
    /// The scan was cancelled (or is already finished); the source has
    /// been released.
    Cancelled,
}

/// A scan over a frame source. No idle timeout: the task runs until a
/// code is found or someone stops it.
pub struct ScanTask<S: FrameSource> {
    source: Option<S>,
    cancelled: Arc<AtomicBool>,
}

impl<S: FrameSource> ScanTask<S> {
    pub fn new(source: S) -> Self {
        Self {
            source: Some(source),
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn handle(&self) -> ScanHandle {
        ScanHandle {
            cancelled: Arc::clone(&self.cancelled),
        }
    }

    /// Sample and decode one frame.
    ///
    /// Capture errors are terminal: the source is released and the error
    /// propagated for the caller to surface.
    pub fn poll_step(&mut self) -> Result<ScanPoll, CaptureError> {
        if self.cancelled.load(Ordering::SeqCst) || self.source.is_none() {
            self.finish();
            return Ok(ScanPoll::Cancelled);
        }

        let frame = match self.source.as_mut() {
            Some(source) => source.next_frame(),
            None => return Ok(ScanPoll::Cancelled),
        };

        match frame {
            Err(err) => {
                self.finish();
                Err(err)
            }
            Ok(None) => Ok(ScanPoll::Pending),
            Ok(Some(frame)) => match decode_rgba(frame.width, frame.height, &frame.rgba) {
                Ok(text) => {
                    self.finish();
                    Ok(ScanPoll::Found(text))
                }
                Err(err) => {
                    tracing::debug!(%err, "frame without decodable code, continuing");
                    Ok(ScanPoll::Pending)
                }
            },
        }
    }

    fn finish(&mut self) {
        if let Some(mut source) = self.source.take() {
            source.release();
        }
    }
}

impl<S: FrameSource> Drop for ScanTask<S> {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use super::*;
    use crate::testutil::render_rgba;

    /// Scripted frame source recording whether it was released.
    struct FakeSource {
        frames: VecDeque<Result<Option<Frame>, CaptureError>>,
        released: Arc<AtomicBool>,
    }

    impl FakeSource {
        fn new(frames: Vec<Result<Option<Frame>, CaptureError>>) -> (Self, Arc<AtomicBool>) {
            let released = Arc::new(AtomicBool::new(false));
            (
                Self {
                    frames: frames.into(),
                    released: Arc::clone(&released),
                },
                released,
            )
        }
    }

    impl FrameSource for FakeSource {
        fn next_frame(&mut self) -> Result<Option<Frame>, CaptureError> {
            self.frames.pop_front().unwrap_or(Ok(None))
        }

        fn release(&mut self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    fn qr_frame(text: &str) -> Frame {
        let (width, height, rgba) = render_rgba(text);
        Frame {
            width,
            height,
            rgba,
        }
    }

    fn noise_frame() -> Frame {
        Frame {
            width: 32,
            height: 32,
            rgba: vec![255u8; 32 * 32 * 4],
        }
    }

    #[test]
    fn scans_until_a_code_is_found_then_releases() {
        let (source, released) = FakeSource::new(vec![
            Ok(None),
            Ok(Some(noise_frame())),
            Ok(Some(qr_frame("payload-text"))),
        ]);
        let mut task = ScanTask::new(source);

        assert_eq!(task.poll_step().unwrap(), ScanPoll::Pending);
        assert_eq!(task.poll_step().unwrap(), ScanPoll::Pending);
        assert_eq!(
            task.poll_step().unwrap(),
            ScanPoll::Found("payload-text".to_string())
        );
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn stop_cancels_on_next_poll_and_releases() {
        let (source, released) = FakeSource::new(vec![Ok(Some(qr_frame("never seen")))]);
        let mut task = ScanTask::new(source);
        let handle = task.handle();

        handle.stop();
        assert_eq!(task.poll_step().unwrap(), ScanPoll::Cancelled);
        assert!(released.load(Ordering::SeqCst));
        assert!(handle.is_stopped());
    }

    #[test]
    fn drop_releases_the_source() {
        let (source, released) = FakeSource::new(vec![]);
        drop(ScanTask::new(source));
        assert!(released.load(Ordering::SeqCst));
    }

    #[test]
    fn capture_error_is_terminal_and_releases() {
        let (source, released) = FakeSource::new(vec![Err(CaptureError::Unavailable)]);
        let mut task = ScanTask::new(source);

        assert_eq!(task.poll_step(), Err(CaptureError::Unavailable));
        assert!(released.load(Ordering::SeqCst));
        // Further polls report the terminal state without re-polling.
        assert_eq!(task.poll_step().unwrap(), ScanPoll::Cancelled);
    }

    #[test]
    fn release_happens_only_once() {
        let (source, released) = FakeSource::new(vec![Ok(Some(qr_frame("x")))]);
        let mut task = ScanTask::new(source);

        assert!(matches!(task.poll_step().unwrap(), ScanPoll::Found(_)));
        released.store(false, Ordering::SeqCst);
        drop(task);
        // Drop after a terminal poll must not call release again.
        assert!(!released.load(Ordering::SeqCst));
    }
}
