use tokio::sync::{mpsc, Mutex};

/// Unbounded FIFO shared by every pipeline of a connector.
///
/// Producers never block. Consumers wait on [`EventQueue::pop`]; several
/// consumers may pull concurrently, each item is delivered once.
#[derive(Debug)]
pub struct EventQueue<T> {
    tx: mpsc::UnboundedSender<T>,
    rx: Mutex<mpsc::UnboundedReceiver<T>>,
}

impl<T> EventQueue<T> {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(rx),
        }
    }

    pub fn push(&self, item: T) {
        // the receiver lives as long as the queue, so sending cannot fail
        let _ = self.tx.send(item);
    }

    /// Wait for the next item
    pub async fn pop(&self) -> Option<T> {
        self.rx.lock().await.recv().await
    }

    /// Next item if one is ready and no other consumer holds the queue
    pub fn try_pop(&self) -> Option<T> {
        self.rx.try_lock().ok()?.try_recv().ok()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_fifo_order() {
        let queue = EventQueue::new();
        queue.push(1);
        queue.push(2);
        queue.push(3);
        assert_eq!(queue.pop().await, Some(1));
        assert_eq!(queue.try_pop(), Some(2));
        assert_eq!(queue.pop().await, Some(3));
        assert_eq!(queue.try_pop(), None);
    }

    #[tokio::test]
    async fn test_pop_waits_for_producer() {
        let queue = Arc::new(EventQueue::new());
        let consumer = {
            let queue = queue.clone();
            tokio::spawn(async move { queue.pop().await })
        };
        tokio::task::yield_now().await;
        queue.push("event");
        assert_eq!(consumer.await.unwrap(), Some("event"));
    }
}
