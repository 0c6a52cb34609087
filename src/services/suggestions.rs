use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::SuggestionSettings;
use crate::services::error::ServiceError;
use crate::services::lex::LexModelsClient;

pub const CACHE_TTL: Duration = Duration::from_secs(5 * 60);
/// Upper bound on quick replies pushed into one ElicitSlot directive.
pub const MAX_QUICK_REPLIES: usize = 8;

/// Where slot-type sample values come from when nothing is configured.
#[async_trait]
pub trait SlotTypeSource: Send + Sync {
    /// Cache identity of one slot type, unique per bot, version and locale.
    fn cache_key(&self, slot_type_name: &str) -> String;

    async fn slot_type_values(&self, slot_type_name: &str) -> Result<Vec<String>, ServiceError>;
}

#[async_trait]
impl SlotTypeSource for LexModelsClient {
    fn cache_key(&self, slot_type_name: &str) -> String {
        LexModelsClient::cache_key(self, slot_type_name)
    }

    async fn slot_type_values(&self, slot_type_name: &str) -> Result<Vec<String>, ServiceError> {
        LexModelsClient::slot_type_values(self, slot_type_name).await
    }
}

struct CachedValues {
    fetched_at: Instant,
    values: Vec<String>,
}

/// Quick-reply suggestions per slot name.
///
/// Configured values win; otherwise the slot type's sample values are read from
/// the Lex models API and cached. Failures degrade to "no suggestions".
pub struct SuggestionProvider {
    configured: HashMap<String, Vec<String>>,
    slot_types: HashMap<String, String>,
    models: Option<Arc<dyn SlotTypeSource>>,
    cache: Mutex<HashMap<String, CachedValues>>,
    ttl: Duration,
}

impl SuggestionProvider {
    pub fn new(settings: &SuggestionSettings, models: Option<Arc<dyn SlotTypeSource>>) -> Self {
        let mut configured = HashMap::new();
        configured.insert("Branch".to_string(), settings.branch_values.clone());
        configured.insert("CourseName".to_string(), settings.course_values.clone());

        let mut slot_types = HashMap::new();
        slot_types.insert("Branch".to_string(), "BranchType".to_string());
        slot_types.insert("CourseName".to_string(), "CourseType".to_string());

        Self {
            configured,
            slot_types,
            models,
            cache: Mutex::new(HashMap::new()),
            ttl: CACHE_TTL,
        }
    }

    /// Provider with no configured values and no models API.
    pub fn empty() -> Self {
        Self::new(
            &SuggestionSettings {
                branch_values: Vec::new(),
                course_values: Vec::new(),
            },
            None,
        )
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub async fn suggestions(&self, slot: &str) -> Vec<String> {
        // 1. Configured values
        if let Some(values) = self.configured.get(slot).filter(|v| !v.is_empty()) {
            return values.clone();
        }

        // 2. Models API, through the cache
        let (Some(models), Some(slot_type)) = (&self.models, self.slot_types.get(slot)) else {
            return Vec::new();
        };

        let key = models.cache_key(slot_type);
        if let Some(values) = self.cached(&key) {
            debug!("suggestions cache hit for {}", key);
            return values;
        }

        match models.slot_type_values(slot_type).await {
            Ok(values) => {
                self.store(key, values.clone());
                values
            }
            Err(e) => {
                // Usually missing lex:ListSlotTypes / DescribeSlotType permissions.
                warn!("slot type lookup failed for {}: {}", slot_type, e);
                Vec::new()
            }
        }
    }

    /// Number of slot types currently held in the cache, stale entries included.
    pub fn cached_len(&self) -> usize {
        self.cache.lock().map(|cache| cache.len()).unwrap_or(0)
    }

    fn cached(&self, key: &str) -> Option<Vec<String>> {
        let cache = self.cache.lock().ok()?;
        cache
            .get(key)
            .filter(|entry| entry.fetched_at.elapsed() < self.ttl)
            .map(|entry| entry.values.clone())
    }

    fn store(&self, key: String, values: Vec<String>) {
        if let Ok(mut cache) = self.cache.lock() {
            cache.retain(|_, entry| entry.fetched_at.elapsed() < self.ttl);
            cache.insert(
                key,
                CachedValues {
                    fetched_at: Instant::now(),
                    values,
                },
            );
        }
    }
}

/// First `MAX_QUICK_REPLIES` suggestions.
pub fn quick_replies(mut suggestions: Vec<String>) -> Vec<String> {
    suggestions.truncate(MAX_QUICK_REPLIES);
    suggestions
}
