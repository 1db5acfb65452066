// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// FIFO queue that brings timer expiries and download completions back onto
// the thread that owns the ad view.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use mast_core::SessionId;
use mast_core::error::{MastError, Result};

/// Work queued for the UI thread.  Every item names the session it was
/// started for so stale completions can be discarded.
#[derive(Debug)]
pub enum UiEvent {
    /// Close-button delay elapsed.
    CloseButtonDue { session: SessionId },
    /// Interstitial display duration elapsed.
    InterstitialTimeout { session: SessionId },
    /// A `request` fetch finished.
    FetchCompleted {
        session: SessionId,
        url: String,
        result: Result<String>,
    },
    /// A `storePicture` download finished.
    PictureDownloaded {
        session: SessionId,
        url: String,
        result: Result<Vec<u8>>,
    },
}

/// Receiving end, owned by the ad view.
#[derive(Debug)]
pub struct UiDispatcher {
    tx: UnboundedSender<UiEvent>,
    rx: UnboundedReceiver<UiEvent>,
}

/// Cloneable posting end handed to background tasks.
#[derive(Debug, Clone)]
pub struct UiHandle {
    tx: UnboundedSender<UiEvent>,
}

impl UiHandle {
    pub fn post(&self, event: UiEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| MastError::DispatcherClosed)
    }
}

impl Default for UiDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl UiDispatcher {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self { tx, rx }
    }

    pub fn handle(&self) -> UiHandle {
        UiHandle {
            tx: self.tx.clone(),
        }
    }

    /// Next queued item without waiting.
    pub fn try_next(&mut self) -> Option<UiEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait for the next item.  Never returns `None` while the dispatcher
    /// itself holds a sender.
    pub async fn next(&mut self) -> Option<UiEvent> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn items_arrive_in_post_order() {
        let mut dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        let a = SessionId::new();
        let b = SessionId::new();
        handle.post(UiEvent::CloseButtonDue { session: a }).unwrap();
        handle
            .post(UiEvent::InterstitialTimeout { session: b })
            .unwrap();

        assert!(matches!(
            dispatcher.next().await,
            Some(UiEvent::CloseButtonDue { session }) if session == a
        ));
        assert!(matches!(
            dispatcher.try_next(),
            Some(UiEvent::InterstitialTimeout { session }) if session == b
        ));
        assert!(dispatcher.try_next().is_none());
    }

    #[tokio::test]
    async fn posting_after_drop_fails() {
        let dispatcher = UiDispatcher::new();
        let handle = dispatcher.handle();
        drop(dispatcher);
        assert!(matches!(
            handle.post(UiEvent::CloseButtonDue {
                session: SessionId::new()
            }),
            Err(MastError::DispatcherClosed)
        ));
    }
}
