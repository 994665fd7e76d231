//! Animation-frame scheduling.
//!
//! A frame request produces a [`FrameHandle`]. The handle stays pending until
//! the host's next refresh consumes it through [`FrameScheduler::take_due`], or
//! until it is cancelled. At most one frame is pending at a time.

/// Token for one requested animation frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Tracks the single pending animation frame.
#[derive(Debug, Default)]
pub struct FrameScheduler {
    next_id: u64,
    pending: Option<FrameHandle>,
    frame_count: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request the next frame.
    ///
    /// If a frame is already pending its handle is returned and no second
    /// frame is queued.
    pub fn request(&mut self) -> FrameHandle {
        if let Some(handle) = self.pending {
            return handle;
        }
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending = Some(handle);
        handle
    }

    /// Cancel `handle` if it is the pending frame. Returns whether it was.
    pub fn cancel(&mut self, handle: FrameHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancel whatever frame is pending.
    pub fn cancel_all(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Consume the pending frame at refresh time.
    ///
    /// `None` means nothing was requested or the request was cancelled, and
    /// the caller should not run a tick.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        let handle = self.pending.take()?;
        self.frame_count += 1;
        Some(handle)
    }

    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Frames consumed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
