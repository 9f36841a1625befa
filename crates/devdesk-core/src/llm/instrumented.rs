//! Stream wrapper that keeps a tracing span alive for the streaming duration.
//!
//! Without this, a span created next to `provider.stream()` would close as
//! soon as the stream is returned, losing the instrumentation for the actual
//! network read.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures_util::Stream;
use pin_project_lite::pin_project;
use tracing::Span;

pin_project! {
    /// Enters `span` on every poll of `inner`.
    pub struct InstrumentedStream<S> {
        #[pin]
        inner: S,
        span: Span,
    }
}

impl<S> InstrumentedStream<S> {
    pub fn new(inner: S, span: Span) -> Self {
        Self { inner, span }
    }
}

impl<S: Stream> Stream for InstrumentedStream<S> {
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        let _enter = this.span.enter();
        this.inner.poll_next(cx)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;

    #[tokio::test]
    async fn passes_items_through_in_order() {
        let inner = futures_util::stream::iter(vec![1, 2, 3]);
        let wrapped = InstrumentedStream::new(inner, tracing::info_span!("test"));
        let items: Vec<i32> = wrapped.collect().await;
        assert_eq!(items, vec![1, 2, 3]);
    }
}
