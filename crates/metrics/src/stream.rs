use futures::Stream;
use metrics::Counter;
use std::{
    pin::Pin,
    task::{Context, Poll},
};

/// Adds [`MeteredStreamExt::metered`] to any [`Stream`].
pub trait MeteredStreamExt: Stream + Sized {
    /// Wraps this stream so that every item it yields increments `counter` by one.
    fn metered(self, counter: Counter) -> MeteredStream<Self> {
        MeteredStream { inner: self, counter }
    }
}

impl<S: Stream> MeteredStreamExt for S {}

/// A [`Stream`] that increments a [`Counter`] once per yielded item.
#[pin_project::pin_project]
pub struct MeteredStream<S> {
    #[pin]
    inner: S,
    counter: Counter,
}

impl<S: Stream> Stream for MeteredStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let poll = this.inner.poll_next(cx);
        if let Poll::Ready(Some(_)) = &poll {
            this.counter.increment(1);
        }
        poll
    }
}
