use async_trait::async_trait;
use lex_chat::config::SuggestionSettings;
use lex_chat::services::suggestions::{SlotTypeSource, SuggestionProvider};
use lex_chat::services::ServiceError;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counts lookups; answers `<slotType>-1`, `<slotType>-2` or fails.
struct CountingSource {
    calls: AtomicUsize,
    fail: bool,
}

impl CountingSource {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail,
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SlotTypeSource for CountingSource {
    fn cache_key(&self, slot_type_name: &str) -> String {
        format!("ap-northeast-2:BOT1:DRAFT:ko_KR:{}", slot_type_name)
    }

    async fn slot_type_values(&self, slot_type_name: &str) -> Result<Vec<String>, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ServiceError::Upstream {
                status: 403,
                body: "AccessDeniedException".to_string(),
            });
        }
        Ok(vec![format!("{}-1", slot_type_name), format!("{}-2", slot_type_name)])
    }
}

fn no_configured_values() -> SuggestionSettings {
    SuggestionSettings {
        branch_values: Vec::new(),
        course_values: Vec::new(),
    }
}

fn provider(source: &Arc<CountingSource>) -> SuggestionProvider {
    SuggestionProvider::new(&no_configured_values(), Some(source.clone() as Arc<dyn SlotTypeSource>))
}

#[tokio::test]
async fn test_slot_type_values_are_cached() {
    let source = CountingSource::new(false);
    let provider = provider(&source);

    assert_eq!(provider.suggestions("Branch").await, vec!["BranchType-1", "BranchType-2"]);
    assert_eq!(provider.suggestions("Branch").await, vec!["BranchType-1", "BranchType-2"]);
    assert_eq!(source.calls(), 1);

    assert_eq!(provider.suggestions("CourseName").await, vec!["CourseType-1", "CourseType-2"]);
    assert_eq!(source.calls(), 2);
    assert_eq!(provider.cached_len(), 2);
}

#[tokio::test]
async fn test_expired_entries_are_refetched_and_evicted() {
    let source = CountingSource::new(false);
    let provider = provider(&source).with_ttl(Duration::ZERO);

    provider.suggestions("Branch").await;
    provider.suggestions("Branch").await;
    assert_eq!(source.calls(), 2);

    // Storing CourseType drops the stale BranchType entry
    provider.suggestions("CourseName").await;
    assert_eq!(source.calls(), 3);
    assert_eq!(provider.cached_len(), 1);
}

#[tokio::test]
async fn test_unmapped_slot_skips_lookup() {
    let source = CountingSource::new(false);
    let provider = provider(&source);

    assert!(provider.suggestions("Date").await.is_empty());
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_lookup_failure_degrades_to_empty() {
    let source = CountingSource::new(true);
    let provider = provider(&source);

    assert!(provider.suggestions("Branch").await.is_empty());
    assert_eq!(provider.cached_len(), 0);
    // Failures are not cached
    assert!(provider.suggestions("Branch").await.is_empty());
    assert_eq!(source.calls(), 2);
}

#[tokio::test]
async fn test_configured_values_bypass_source() {
    let source = CountingSource::new(false);
    let settings = SuggestionSettings {
        branch_values: vec!["강남점".to_string()],
        course_values: Vec::new(),
    };
    let provider = SuggestionProvider::new(&settings, Some(source.clone() as Arc<dyn SlotTypeSource>));

    assert_eq!(provider.suggestions("Branch").await, vec!["강남점"]);
    assert_eq!(source.calls(), 0);
}
