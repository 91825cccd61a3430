mod cached;
mod http;
mod traits;

pub use cached::{CachedApi, TranslationKey};
pub use http::{Endpoint, HttpApi};
pub use traits::{ApiInfo, SummarizerApi};

use crate::config::AppConfig;
use crate::error::Result;
use std::sync::Arc;

/// Create an API client from configuration
pub fn create_api(config: &AppConfig) -> Result<Arc<dyn SummarizerApi>> {
    let http = HttpApi::new(&config.api)?;

    if config.translate_cache.enabled {
        Ok(Arc::new(CachedApi::new(http, &config.translate_cache)))
    } else {
        Ok(Arc::new(http))
    }
}
