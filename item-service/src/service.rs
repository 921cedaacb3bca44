use std::sync::Arc;

use shared::{Item, ItemChange, ItemDraft, LookupField, PageRequest, Pagination, RECENT_LIMIT};
use tracing::info;

use crate::error::{AppError, Result};
use crate::events::ChangeFeed;
use crate::store::{ItemStore, StoreStatus};

/// Reads and writes against the item store.
///
/// Input is validated here, before any store call, so a bad request never
/// costs a query. Successful mutations are announced on the change feed.
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
    feed: ChangeFeed,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>, feed: ChangeFeed) -> Self {
        Self { store, feed }
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub async fn recent(&self) -> Result<Vec<Item>> {
        Ok(self.store.recent(RECENT_LIMIT).await?)
    }

    pub async fn paginated(&self, request: PageRequest) -> Result<(Vec<Item>, Pagination)> {
        let total = self.store.count().await?;
        let items = self.store.page(request.offset(), request.limit()).await?;
        Ok((items, Pagination::new(request, total)))
    }

    pub async fn distinct_values(&self, field: LookupField) -> Result<Vec<String>> {
        let mut values = self.store.distinct_values(field).await?;
        values.retain(|v| !v.is_empty());
        Ok(values)
    }

    pub async fn create(&self, draft: ItemDraft) -> Result<Item> {
        let new_item = draft.validate()?;
        let item = self.store.insert(new_item).await?;

        info!(id = item.id, gsm = item.gsm, bill = %item.sale_bill_number, "Item added");
        self.feed.publish(ItemChange::Created { id: item.id });
        Ok(item)
    }

    pub async fn delete(&self, id: i32) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(AppError::NotFound { id });
        }

        info!(id, "Item deleted");
        self.feed.publish(ItemChange::Deleted { id });
        Ok(())
    }

    pub async fn status(&self) -> Result<StoreStatus> {
        Ok(self.store.status().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryItemStore;
    use bigdecimal::BigDecimal;
    use shared::ValidationError;

    fn draft(bill: &str, shade: &str) -> ItemDraft {
        ItemDraft {
            gsm: Some(140),
            sale_bill_number: Some(bill.into()),
            size: Some("40x50".into()),
            rate: Some(BigDecimal::from(55)),
            bf: Some(BigDecimal::from(20)),
            weight: Some(BigDecimal::from(310)),
            shade: Some(shade.into()),
            bought_from_mill: Some("ABC Mills".into()),
            sold_to: Some("Gupta & Sons".into()),
            ..Default::default()
        }
    }

    fn service() -> (ItemService, Arc<MemoryItemStore>) {
        let store = Arc::new(MemoryItemStore::new());
        (ItemService::new(store.clone(), ChangeFeed::new(16)), store)
    }

    #[tokio::test]
    async fn test_created_item_is_first_in_recent() {
        let (service, _) = service();
        service.create(draft("SB-1", "Golden")).await.unwrap();
        let created = service.create(draft("SB-2", "White")).await.unwrap();

        let recent = service.recent().await.unwrap();
        assert_eq!(recent[0], created);
        assert_eq!(recent[0].sale_bill_number, "SB-2");
        assert_eq!(recent[0].rate, BigDecimal::from(55));
    }

    #[tokio::test]
    async fn test_recent_is_capped_and_newest_first() {
        let (service, _) = service();
        for n in 0..15 {
            service.create(draft(&format!("SB-{n}"), "Golden")).await.unwrap();
        }

        let recent = service.recent().await.unwrap();
        assert_eq!(recent.len(), 10);
        assert!(recent.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(recent[0].sale_bill_number, "SB-14");
    }

    #[tokio::test]
    async fn test_zero_rate_is_accepted() {
        let (service, _) = service();
        let mut input = draft("SB-0", "Golden");
        input.rate = Some(BigDecimal::from(0));

        let item = service.create(input).await.unwrap();
        assert_eq!(item.rate, BigDecimal::from(0));
    }

    #[tokio::test]
    async fn test_invalid_create_does_not_touch_store_or_feed() {
        let (service, store) = service();
        let mut events = service.feed().subscribe();
        let mut input = draft("SB-3", "Golden");
        input.shade = None;

        let err = service.create(input).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ValidationError::MissingFields(ref f)) if f == &vec!["shade"]));
        assert_eq!(store.queries(), 0);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_mutations_publish_changes() {
        let (service, _) = service();
        let mut events = service.feed().subscribe();

        let item = service.create(draft("SB-4", "Golden")).await.unwrap();
        service.delete(item.id).await.unwrap();

        assert_eq!(events.recv().await.unwrap(), ItemChange::Created { id: item.id });
        assert_eq!(events.recv().await.unwrap(), ItemChange::Deleted { id: item.id });
    }

    #[tokio::test]
    async fn test_delete_twice_is_not_found() {
        let (service, _) = service();
        let item = service.create(draft("SB-5", "Golden")).await.unwrap();

        service.delete(item.id).await.unwrap();
        assert!(service.recent().await.unwrap().is_empty());

        let err = service.delete(item.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { id } if id == item.id));
    }

    #[tokio::test]
    async fn test_pages_partition_the_listing() {
        let (service, _) = service();
        for n in 0..23 {
            service.create(draft(&format!("SB-{n}"), "Golden")).await.unwrap();
        }

        let mut seen = Vec::new();
        for page in 1..=3 {
            let (items, meta) = service
                .paginated(PageRequest::new(page, 10).unwrap())
                .await
                .unwrap();
            assert!(items.len() <= 10);
            assert_eq!(meta.total, 23);
            assert_eq!(meta.total_pages, 3);
            seen.extend(items.into_iter().map(|i| i.id));
        }

        assert_eq!(seen.len(), 23);
        let mut sorted = seen.clone();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        assert_eq!(seen, sorted);
    }

    #[tokio::test]
    async fn test_distinct_values_drop_empty_strings() {
        let (service, store) = service();
        service.create(draft("SB-6", "White")).await.unwrap();
        service.create(draft("SB-7", "Golden")).await.unwrap();
        service.create(draft("SB-8", "White")).await.unwrap();
        store.seed_shade("");

        let shades = service.distinct_values(LookupField::Shade).await.unwrap();
        assert_eq!(shades, vec!["Golden", "White"]);

        let mills = service.distinct_values(LookupField::BoughtFromMill).await.unwrap();
        assert_eq!(mills, vec!["ABC Mills"]);
    }

    #[tokio::test]
    async fn test_store_failure_surfaces_as_store_error() {
        let (service, store) = service();
        store.fail();

        let err = service.recent().await.unwrap_err();
        assert!(matches!(err, AppError::Store(_)));
    }
}
