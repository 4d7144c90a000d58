// Copyright 2026 sable
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A oneshot promise/future pair for load completion handoff.
//!
//! Queued load requests resolve through a [`LoadTicket`]: the producer side
//! fulfills exactly once, the consumer side polls or blocks. Backed by a
//! bounded(1) flume channel, so fulfillment never blocks the producer.

/// Creates a connected completion/ticket pair.
pub fn channel<T>() -> (LoadCompletion<T>, LoadTicket<T>) {
    let (tx, rx) = flume::bounded(1);
    (LoadCompletion { tx }, LoadTicket { rx })
}

/// The consumer half: resolves once with the load result.
///
/// If the producer is dropped without fulfilling, [`wait`](LoadTicket::wait)
/// and [`try_take`](LoadTicket::try_take) resolve to `None`.
pub struct LoadTicket<T> {
    rx: flume::Receiver<T>,
}

impl<T> LoadTicket<T> {
    /// Non-blocking poll; `None` if the result is not ready (or was already
    /// taken, or the producer vanished).
    pub fn try_take(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// Blocks until the result arrives; `None` if the producer was dropped
    /// without fulfilling.
    pub fn wait(&self) -> Option<T> {
        self.rx.recv().ok()
    }

    /// `true` if a result is waiting to be taken.
    pub fn is_ready(&self) -> bool {
        !self.rx.is_empty()
    }
}

/// The producer half: fulfills the paired ticket exactly once.
pub struct LoadCompletion<T> {
    tx: flume::Sender<T>,
}

impl<T> LoadCompletion<T> {
    /// Delivers the result. A ticket that was already dropped is ignored.
    pub fn fulfill(self, value: T) {
        let _ = self.tx.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unfulfilled_ticket_is_not_ready() {
        let (_completion, ticket) = channel::<u32>();
        assert!(!ticket.is_ready());
        assert!(ticket.try_take().is_none());
    }

    #[test]
    fn fulfilled_ticket_yields_the_value_once() {
        let (completion, ticket) = channel();
        completion.fulfill(7u32);
        assert!(ticket.is_ready());
        assert_eq!(ticket.try_take(), Some(7));
        assert_eq!(ticket.try_take(), None);
    }

    #[test]
    fn dropped_completion_resolves_to_none() {
        let (completion, ticket) = channel::<u32>();
        drop(completion);
        assert_eq!(ticket.wait(), None);
    }

    #[test]
    fn fulfilling_a_dropped_ticket_is_harmless() {
        let (completion, ticket) = channel();
        drop(ticket);
        completion.fulfill(1u8);
    }

    #[test]
    fn wait_blocks_across_threads() {
        let (completion, ticket) = channel();
        std::thread::spawn(move || completion.fulfill("done"));
        assert_eq!(ticket.wait(), Some("done"));
    }
}
