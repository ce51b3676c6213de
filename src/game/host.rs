use super::feedback::Feedback;

/// Opaque id of a scheduled timer, as handed out by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(pub i32);

/// Environment the round state machine runs in. The browser backs this with
/// `setTimeout` and DOM/audio updates; tests back it with a virtual clock.
pub trait Host {
    /// Arrange for `Game::on_timer(handle, ..)` to be called after `delay_ms`.
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle;
    /// Drop a pending timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);
    /// Present an outcome (sound, haptics, message, background).
    fn present(&mut self, feedback: Feedback);
}
