use crate::errors::AppError;
use crate::models::{ClientData, UserCache};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::{fs, sync::Mutex};
use tracing::error;

/// Persisted client-side state shared by every view.
#[derive(Clone)]
pub struct ClientStore {
    path: PathBuf,
    data: Arc<Mutex<ClientData>>,
}

impl ClientStore {
    pub fn new(path: PathBuf, data: ClientData) -> Self {
        Self {
            path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn open(path: PathBuf) -> Self {
        let data = load_data(&path).await;
        Self::new(path, data)
    }

    pub async fn snapshot(&self) -> ClientData {
        self.data.lock().await.clone()
    }

    pub async fn user_cache(&self, user_id: &str) -> UserCache {
        let data = self.data.lock().await;
        data.users.get(user_id).cloned().unwrap_or_default()
    }

    /// Applies `f` to the cache of `user_id` and writes the store back.
    /// A failed write is logged; the in-memory update still stands.
    pub async fn update_user<R>(&self, user_id: &str, f: impl FnOnce(&mut UserCache) -> R) -> R {
        self.update(|data| f(data.users.entry(user_id.to_string()).or_default()))
            .await
    }

    pub(crate) async fn update<R>(&self, f: impl FnOnce(&mut ClientData) -> R) -> R {
        let mut data = self.data.lock().await;
        let result = f(&mut data);
        if let Err(err) = persist_data(&self.path, &data).await {
            error!(path = %self.path.display(), "failed to persist client store: {}", err.message);
        }
        result
    }
}

pub async fn load_data(path: &Path) -> ClientData {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(data) => data,
            Err(err) => {
                error!("failed to parse client store: {err}");
                ClientData::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => ClientData::default(),
        Err(err) => {
            error!("failed to read client store: {err}");
            ClientData::default()
        }
    }
}

pub async fn persist_data(path: &Path, data: &ClientData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await?;
    }
    fs::write(path, payload).await?;
    Ok(())
}
