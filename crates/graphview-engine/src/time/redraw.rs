/// Coalesces redraw requests into at most one pending frame.
///
/// Input handlers call `request` as often as they like; the runtime calls
/// `take` once per event batch and asks the window for a single redraw.
#[derive(Debug, Default, Clone)]
pub struct RedrawScheduler {
    pending: bool,
    requested: u64,
    coalesced: u64,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules a frame. Returns `false` if one was already pending.
    pub fn request(&mut self) -> bool {
        self.requested += 1;
        if self.pending {
            self.coalesced += 1;
            return false;
        }
        self.pending = true;
        true
    }

    /// Drops the pending frame, if any.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Consumes the pending frame.
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Total `request` calls, including coalesced ones.
    #[inline]
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Requests folded into an already pending frame.
    #[inline]
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }
}
