//! A debounced value: it settles to the latest input once the input has been left alone for a
//! fixed delay.
//!
//! Every `set` restarts the delay, so a burst of updates produces a single emission carrying the
//! last value. The timer runs on a tokio task that is aborted when the `Debouncer` is dropped;
//! nothing is emitted after that.

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::trace;

#[derive(Debug)]
pub struct Debouncer<T> {
    input: watch::Sender<T>,
    output: watch::Receiver<T>,
    delay: Duration,
    task: JoinHandle<()>,
}

impl<T> Debouncer<T>
where
    T: Clone + PartialEq + Send + Sync + std::fmt::Debug + 'static,
{
    /// Creates a debouncer whose input and output both start at `initial`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(initial: T, delay: Duration) -> Self {
        let (input, input_rx) = watch::channel(initial.clone());
        let (output_tx, output) = watch::channel(initial);
        let task = tokio::spawn(settle(input_rx, output_tx, delay));
        Self {
            input,
            output,
            delay,
            task,
        }
    }

    /// Replaces the input value and restarts the delay.
    pub fn set(&self, value: T) {
        // the receiver lives in the task, which only ends on drop
        self.input.send_replace(value);
    }

    /// The latest input value, which may not have settled yet.
    pub fn value(&self) -> T {
        self.input.borrow().clone()
    }

    /// The settled value.
    pub fn get(&self) -> T {
        self.output.borrow().clone()
    }

    /// Watches the settled value. Subscribers are notified only when it actually changes.
    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.output.clone()
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn settle<T>(mut input: watch::Receiver<T>, output: watch::Sender<T>, delay: Duration)
where
    T: Clone + PartialEq + std::fmt::Debug,
{
    // `changed` only errors once the sender, owned by the `Debouncer`, is gone
    while input.changed().await.is_ok() {
        loop {
            tokio::select! {
                changed = input.changed() => {
                    if changed.is_err() {
                        return;
                    }
                }
                _ = tokio::time::sleep(delay) => break,
            }
        }
        let value = input.borrow_and_update().clone();
        output.send_if_modified(|current| {
            if *current == value {
                return false;
            }
            trace!("Debounced value settled to {value:?}");
            *current = value;
            true
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const DELAY: Duration = Duration::from_millis(300);

    #[tokio::test(start_paused = true)]
    async fn test_emits_after_delay() {
        let debouncer = Debouncer::new(String::new(), DELAY);
        debouncer.set("coffee".to_string());
        assert_eq!(debouncer.value(), "coffee");
        assert_eq!(debouncer.get(), "");

        sleep(Duration::from_millis(299)).await;
        assert_eq!(debouncer.get(), "");

        sleep(Duration::from_millis(2)).await;
        assert_eq!(debouncer.get(), "coffee");
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_emits_only_last_value_once() {
        let debouncer = Debouncer::new(String::new(), DELAY);
        let mut rx = debouncer.subscribe();
        let seen = tokio::spawn(async move {
            let mut seen = Vec::new();
            while rx.changed().await.is_ok() {
                seen.push(rx.borrow_and_update().clone());
            }
            seen
        });

        for text in ["c", "co", "cof", "coff"] {
            debouncer.set(text.to_string());
            sleep(Duration::from_millis(100)).await;
        }
        // 100ms since the last keystroke, nothing settled yet
        assert_eq!(debouncer.get(), "");

        sleep(Duration::from_millis(250)).await;
        assert_eq!(debouncer.get(), "coff");

        sleep(Duration::from_secs(5)).await;
        drop(debouncer);
        assert_eq!(seen.await.unwrap(), vec!["coff".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_return_to_settled_value_does_not_notify() {
        let debouncer = Debouncer::new(String::from("a"), DELAY);
        let rx = debouncer.subscribe();
        debouncer.set("ab".to_string());
        sleep(Duration::from_millis(100)).await;
        debouncer.set("a".to_string());
        sleep(Duration::from_secs(1)).await;
        assert_eq!(debouncer.get(), "a");
        assert!(!rx.has_changed().unwrap());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay() {
        let debouncer = Debouncer::new(0u32, Duration::ZERO);
        debouncer.set(7);
        sleep(Duration::from_millis(1)).await;
        assert_eq!(debouncer.get(), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_emission_after_drop() {
        let debouncer = Debouncer::new(String::new(), DELAY);
        let rx = debouncer.subscribe();
        debouncer.set("pending".to_string());
        sleep(Duration::from_millis(10)).await;
        drop(debouncer);

        sleep(Duration::from_secs(1)).await;
        // the sender went away with the aborted task and no value was ever sent
        assert_eq!(*rx.borrow(), "");
        assert!(rx.has_changed().is_err());
    }
}
