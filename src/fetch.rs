use crate::errors::ClientError;
use std::{collections::HashMap, future::Future, sync::Arc};
use tokio::{sync::Mutex, task::AbortHandle};
use tracing::debug;

/// Data-fetching views, each owning one cancellation slot. A request only
/// ever supersedes an older one of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchKind {
    Home,
    PastMood,
    /// The JSON week endpoints.
    WeekApi,
    Stats,
    Profile,
}

/// Runs one request at a time for a view. Starting a new request aborts the
/// one still in flight, whose caller then sees `ClientError::Cancelled`.
#[derive(Clone, Default)]
pub struct FetchSlot {
    current: Arc<Mutex<Option<AbortHandle>>>,
}

impl FetchSlot {
    pub async fn run<F, T>(&self, request: F) -> Result<T, ClientError>
    where
        F: Future<Output = Result<T, ClientError>> + Send + 'static,
        T: Send + 'static,
    {
        let task = {
            let mut current = self.current.lock().await;
            let task = tokio::spawn(request);
            if let Some(previous) = current.replace(task.abort_handle()) {
                previous.abort();
            }
            task
        };

        match task.await {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => {
                debug!("request superseded");
                Err(ClientError::Cancelled)
            }
            Err(err) => Err(ClientError::Network(err.to_string())),
        }
    }

    pub async fn cancel(&self) {
        if let Some(handle) = self.current.lock().await.take() {
            handle.abort();
        }
    }
}

#[derive(Clone, Default)]
pub struct FetchSlots {
    slots: Arc<Mutex<HashMap<FetchKind, FetchSlot>>>,
}

impl FetchSlots {
    pub async fn slot(&self, kind: FetchKind) -> FetchSlot {
        self.slots.lock().await.entry(kind).or_default().clone()
    }

    /// Aborts everything in flight; used when the session changes.
    pub async fn cancel_all(&self) {
        let slots: Vec<FetchSlot> = self.slots.lock().await.values().cloned().collect();
        for slot in slots {
            slot.cancel().await;
        }
    }
}
