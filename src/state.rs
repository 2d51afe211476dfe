use crate::api::ApiClient;
use crate::fetch::FetchSlots;
use crate::storage::ClientStore;

#[derive(Clone)]
pub struct AppState {
    pub api: ApiClient,
    pub store: ClientStore,
    pub fetches: FetchSlots,
}

impl AppState {
    pub fn new(api: ApiClient, store: ClientStore) -> Self {
        Self {
            api,
            store,
            fetches: FetchSlots::default(),
        }
    }
}
