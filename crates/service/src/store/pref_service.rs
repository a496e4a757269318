use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::StoreSetting;
use crate::errors::ServiceError;
use crate::repository::PreferenceRepository;

/// Store-wide preference reads and single-key updates.
pub struct StorePreferenceService {
    prefs: Arc<dyn PreferenceRepository>,
}

impl StorePreferenceService {
    pub fn new(prefs: Arc<dyn PreferenceRepository>) -> Self {
        Self { prefs }
    }

    pub async fn all_prefs(&self) -> Result<StoreSetting, ServiceError> {
        Ok(self.prefs.all().await?)
    }

    /// Update an existing preference; unknown keys are NotFound, never created.
    #[instrument(skip(self, value))]
    pub async fn update_prefs(&self, key: &str, value: &str) -> Result<StoreSetting, ServiceError> {
        self.prefs.find(key).await?;
        let updated = self.prefs.update(key, value).await.map_err(ServiceError::internal)?;
        info!("store_pref_updated");
        Ok(updated)
    }
}
