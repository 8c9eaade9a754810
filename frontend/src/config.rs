use gloo_storage::errors::StorageError;
use gloo_storage::{LocalStorage, Storage};
use shared::ApiBase;

const STORAGE_KEY: &str = "smartag.api_base";

/// Local-storage override, then the build-time `SMARTAG_API_BASE`, then same origin.
pub fn api_base() -> ApiBase {
    match LocalStorage::get::<String>(STORAGE_KEY) {
        Ok(stored) if !stored.trim().is_empty() => ApiBase::new(stored),
        _ => ApiBase::new(option_env!("SMARTAG_API_BASE").unwrap_or_default()),
    }
}

/// Stores an override; an empty value removes it.
pub fn save_api_base(value: &str) -> Result<ApiBase, StorageError> {
    let value = value.trim();
    if value.is_empty() {
        LocalStorage::delete(STORAGE_KEY);
    } else {
        LocalStorage::set(STORAGE_KEY, value)?;
    }
    log::info!("API base set to {:?}", value);
    Ok(api_base())
}
