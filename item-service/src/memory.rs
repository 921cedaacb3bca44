//! In-process `ItemStore` used by the service and route tests.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use shared::{Item, LookupField, NewItem};

use crate::store::{ItemStore, StoreError, StoreStatus};

#[derive(Default)]
pub struct MemoryItemStore {
    items: Mutex<Vec<Item>>,
    failing: AtomicBool,
    queries: Mutex<usize>,
    delay: Mutex<Option<std::time::Duration>>,
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every later call fail as if the database were unreachable.
    pub fn fail(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    /// Makes every later call wait `delay` before answering.
    pub fn slow(&self, delay: std::time::Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Number of calls that reached the store.
    pub fn queries(&self) -> usize {
        *self.queries.lock().unwrap()
    }

    /// Stores a row with an explicit `shade`, bypassing validation, to mimic
    /// legacy data such as empty strings.
    pub fn seed_shade(&self, shade: &str) {
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        items.push(Item {
            id,
            gsm: 100,
            sale_bill_number: format!("SEED-{id}"),
            size: "30x40".into(),
            rate: 1.into(),
            bf: 1.into(),
            weight: 1.into(),
            shade: shade.into(),
            bought_from_mill: None,
            sold_to: "Seed".into(),
            purchase_bill_number: None,
            sale_bill_date: None,
            purchase_bill_date: None,
            created_at: Utc::now(),
        });
    }

    async fn enter(&self) -> Result<(), StoreError> {
        *self.queries.lock().unwrap() += 1;
        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Query(diesel::result::Error::QueryBuilderError(
                "connection refused".into(),
            )));
        }
        Ok(())
    }

    fn newest_first(&self) -> Vec<Item> {
        let mut items = self.items.lock().unwrap().clone();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        items
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn recent(&self, limit: i64) -> Result<Vec<Item>, StoreError> {
        self.enter().await?;
        Ok(self.newest_first().into_iter().take(limit as usize).collect())
    }

    async fn count(&self) -> Result<i64, StoreError> {
        self.enter().await?;
        Ok(self.items.lock().unwrap().len() as i64)
    }

    async fn page(&self, offset: i64, limit: i64) -> Result<Vec<Item>, StoreError> {
        self.enter().await?;
        Ok(self
            .newest_first()
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn distinct_values(&self, field: LookupField) -> Result<Vec<String>, StoreError> {
        self.enter().await?;
        let items = self.items.lock().unwrap();
        let values: BTreeSet<String> = items
            .iter()
            .filter_map(|item| match field {
                LookupField::Shade => Some(item.shade.clone()),
                LookupField::BoughtFromMill => item.bought_from_mill.clone(),
                LookupField::SoldTo => Some(item.sold_to.clone()),
            })
            .collect();
        Ok(values.into_iter().collect())
    }

    async fn insert(&self, item: NewItem) -> Result<Item, StoreError> {
        self.enter().await?;
        let mut items = self.items.lock().unwrap();
        let id = items.iter().map(|i| i.id).max().unwrap_or(0) + 1;
        // Keep creation times strictly increasing even within one clock tick.
        let now = Utc::now();
        let created_at = match items.iter().map(|i| i.created_at).max() {
            Some(last) if last >= now => last + chrono::Duration::microseconds(1),
            _ => now,
        };
        let stored = Item {
            id,
            gsm: item.gsm,
            sale_bill_number: item.sale_bill_number,
            size: item.size,
            rate: item.rate,
            bf: item.bf,
            weight: item.weight,
            shade: item.shade,
            bought_from_mill: item.bought_from_mill,
            sold_to: item.sold_to,
            purchase_bill_number: item.purchase_bill_number,
            sale_bill_date: item.sale_bill_date,
            purchase_bill_date: item.purchase_bill_date,
            created_at,
        };
        items.push(stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i32) -> Result<bool, StoreError> {
        self.enter().await?;
        let mut items = self.items.lock().unwrap();
        let before = items.len();
        items.retain(|item| item.id != id);
        Ok(items.len() < before)
    }

    async fn status(&self) -> Result<StoreStatus, StoreError> {
        self.enter().await?;
        Ok(StoreStatus {
            current_time: Utc::now(),
            pg_version: "memory".into(),
        })
    }
}
