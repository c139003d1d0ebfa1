//! Single-threaded actors and the channel type they receive events on.
//!
//! Each message carries the sender's tracing span so work done on behalf of
//! an event is logged under the span that produced it.

use tokio::sync::mpsc::error::SendError;
use tokio::sync::mpsc::{
    UnboundedReceiver, UnboundedSender, WeakUnboundedSender, unbounded_channel,
};
use tracing::Span;

pub mod executor;
pub mod placer;
pub mod settings_watcher;

pub struct Sender<Event>(UnboundedSender<(Span, Event)>);
pub type Receiver<Event> = UnboundedReceiver<(Span, Event)>;

/// A sender that does not keep the receiving actor alive.
pub struct WeakSender<Event>(WeakUnboundedSender<(Span, Event)>);

pub fn channel<Event>() -> (Sender<Event>, Receiver<Event>) {
    let (tx, rx) = unbounded_channel();
    (Sender(tx), rx)
}

impl<Event> Sender<Event> {
    /// Send errors only mean the receiving actor has shut down.
    pub fn send(&self, event: Event) { _ = self.try_send(event) }

    pub fn try_send(&self, event: Event) -> Result<(), SendError<(Span, Event)>> {
        self.0.send((Span::current(), event))
    }

    pub fn downgrade(&self) -> WeakSender<Event> { WeakSender(self.0.downgrade()) }
}

impl<Event> WeakSender<Event> {
    /// `None` once every strong sender is gone.
    pub fn upgrade(&self) -> Option<Sender<Event>> { self.0.upgrade().map(Sender) }
}

impl<Event> Clone for Sender<Event> {
    fn clone(&self) -> Self { Self(self.0.clone()) }
}
