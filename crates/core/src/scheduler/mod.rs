use std::collections::VecDeque;

/// Work to perform on the next display frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Idle/live rendering of the in-progress trail and the gallery.
    Live,
    /// One step of the synchronized replay.
    Replay,
}

/// Identifies a scheduled frame so it can be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

/// "Request next frame" abstraction. A display loop implements this by
/// forwarding to its frame callback; tests drive frames by hand.
pub trait FrameScheduler {
    fn schedule_frame(&mut self, task: FrameTask) -> FrameHandle;
    fn cancel_frame(&mut self, handle: FrameHandle);
    /// Takes the next due frame, if any.
    fn next_frame(&mut self) -> Option<FrameTask>;
}

/// FIFO scheduler with no timing of its own.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    pending: VecDeque<(FrameHandle, FrameTask)>,
    next_id: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn peek(&self) -> Option<FrameTask> {
        self.pending.front().map(|(_, task)| *task)
    }
}

impl FrameScheduler for ManualScheduler {
    fn schedule_frame(&mut self, task: FrameTask) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.pending.push_back((handle, task));
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.pending.retain(|(pending, _)| *pending != handle);
    }

    fn next_frame(&mut self) -> Option<FrameTask> {
        self.pending.pop_front().map(|(_, task)| task)
    }
}
