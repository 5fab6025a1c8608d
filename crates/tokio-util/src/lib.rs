//! A broadcast-channel wrapper for fanning out engine events to an arbitrary number of listeners
//! (telemetry, tests, debug tooling) without each one needing to know about the others.

#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

use std::{
    pin::Pin,
    task::{Context, Poll},
};
use tokio::sync::broadcast;
use tokio_stream::{
    wrappers::{errors::BroadcastStreamRecvError, BroadcastStream},
    Stream,
};

/// The sending half of an event broadcast: cheap to clone, every clone shares the same set of
/// listeners.
#[derive(Debug, Clone)]
pub struct EventSender<T> {
    sender: broadcast::Sender<T>,
}

impl<T: Clone + Send + 'static> EventSender<T> {
    /// Creates a sender with room for `capacity` unread events per listener before the slowest
    /// one starts missing messages.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Broadcasts `event` to every current listener. A send with no listeners is a silent no-op,
    /// matching `broadcast::Sender::send`'s semantics.
    pub fn notify(&self, event: T) {
        let _ = self.sender.send(event);
    }

    /// Subscribes a new listener, returning a [`Stream`] of future events. Events sent before
    /// this call are never delivered to it.
    pub fn new_listener(&self) -> EventStream<T> {
        EventStream { inner: BroadcastStream::new(self.sender.subscribe()) }
    }
}

impl<T: Clone + Send + 'static> Default for EventSender<T> {
    fn default() -> Self {
        Self::new(2048)
    }
}

/// A [`Stream`] of broadcast events. Lagged events (the listener fell behind and the channel
/// wrapped) are skipped rather than surfaced as stream errors.
#[derive(Debug)]
pub struct EventStream<T> {
    inner: BroadcastStream<T>,
}

impl<T: Clone + Send + 'static> Stream for EventStream<T> {
    type Item = T;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        loop {
            return match Pin::new(&mut self.inner).poll_next(cx) {
                Poll::Ready(Some(Ok(event))) => Poll::Ready(Some(event)),
                Poll::Ready(Some(Err(BroadcastStreamRecvError::Lagged(_)))) => continue,
                Poll::Ready(None) => Poll::Ready(None),
                Poll::Pending => Poll::Pending,
            };
        }
    }
}
