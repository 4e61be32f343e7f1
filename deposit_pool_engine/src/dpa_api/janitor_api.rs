use std::fmt::Debug;

use chrono::{DateTime, Duration, Utc};
use log::*;

use crate::{
    dpa_api::{allocation_objects::SweepResult, errors::AllocationError},
    traits::{OrderStatusLookup, PlaceholderIndex},
};

/// Removes placeholders that have outlived their orders.
///
/// A placeholder normally goes away when the orchestration layer releases it after the order is paid or expires. If
/// that call never arrives, the placeholder would block its amount range on that address forever. The janitor looks
/// at every placeholder older than the maximum order lifetime and asks the order store what happened to it:
///
/// * still pending: the placeholder is kept.
/// * paid, failed, expired, or unknown to the order store: the placeholder is removed.
///
/// If the order store cannot be reached, the placeholder is kept and the next pass tries again.
pub struct PlaceholderJanitor<B, L> {
    db: B,
    orders: L,
}

impl<B, L> Debug for PlaceholderJanitor<B, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PlaceholderJanitor")
    }
}

impl<B, L> PlaceholderJanitor<B, L> {
    pub fn new(db: B, orders: L) -> Self {
        Self { db, orders }
    }
}

impl<B, L> PlaceholderJanitor<B, L>
where
    B: PlaceholderIndex,
    L: OrderStatusLookup,
{
    /// Sweeps placeholders that are at least `max_age` old.
    pub async fn sweep(&self, max_age: Duration) -> Result<SweepResult, AllocationError> {
        self.sweep_created_before(Utc::now() - max_age).await
    }

    /// Sweeps placeholders created at or before `cutoff`.
    pub async fn sweep_created_before(&self, cutoff: DateTime<Utc>) -> Result<SweepResult, AllocationError> {
        let candidates = self.db.created_before(cutoff).await?;
        let mut result = SweepResult::default();
        for record in candidates {
            let order_id = &record.order_id;
            let address = record.address.as_str();
            match self.orders.order_status(order_id).await {
                Ok(Some(status)) if !status.is_final() => {
                    debug!("🧹️ Order {order_id} on {address} is still {status}. Keeping its placeholder.");
                    result.retained += 1;
                },
                Ok(status) => {
                    self.db.remove(address, order_id).await?;
                    let status = status.map(|s| s.to_string()).unwrap_or_else(|| "unknown".into());
                    debug!("🧹️ Removed the stale placeholder for order {order_id} on {address} ({status})");
                    result.removed += 1;
                },
                Err(e) => {
                    warn!("🧹️ Could not look up order {order_id}. Keeping its placeholder for now. {e}");
                    result.retained += 1;
                },
            }
        }
        if result.removed > 0 {
            info!("🧹️ Placeholder sweep removed {} stale placeholders and kept {}", result.removed, result.retained);
        } else {
            trace!("🧹️ Placeholder sweep found nothing to remove ({} kept)", result.retained);
        }
        Ok(result)
    }
}
