//! One pass over every household: recompute freshness, persist changes,
//! raise alerts.
//!
//! Statuses are recomputed from each item's stored expiry date, so
//! out-of-band edits (a corrected shelf life, say) are picked up on the
//! next pass even when they move an item backwards to `fresh`.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, NaiveDate, Utc};

use larder_core::alerts::maybe_create_alert;
use larder_core::clock::Clock;
use larder_core::freshness;
use larder_core::model::{AlertKind, FreshnessStatus, Item};
use larder_core::store::{AlertStore, InventoryStore, StoreError};

/// Counters describing one sweep run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Households whose items were loaded.
    pub users_seen: usize,
    /// Households skipped because their item load failed.
    pub users_failed: usize,
    /// Items whose status was recomputed.
    pub items_checked: usize,
    /// Items whose recomputed status differed and was persisted.
    pub status_changes: usize,
    /// Alerts admitted by the dedup policy this run.
    pub alerts_created: usize,
    /// Items whose status change could not be persisted.
    pub items_failed: usize,
}

/// Sweep every household once, checking `cancel` between items.
///
/// A raised `cancel` abandons the remaining work; everything already
/// persisted stays committed and the next run covers the rest. Per-item
/// failures are logged, counted, and skipped. Only the household
/// enumeration itself fails the run.
///
/// # Errors
///
/// Returns [`StoreError`] if the household list cannot be loaded.
pub fn run_sweep<S>(
    store: &S,
    clock: &dyn Clock,
    expiring_window_days: u32,
    cancel: &AtomicBool,
) -> Result<SweepReport, StoreError>
where
    S: InventoryStore + AlertStore,
{
    let users = store.user_ids()?;
    let now = clock.now();
    let today = now.date_naive();

    let mut report = SweepReport::default();
    let mut cancelled = false;

    'households: for user in users {
        if cancel.load(Ordering::Relaxed) {
            cancelled = true;
            break;
        }

        report.users_seen += 1;
        let items = match store.items_for_user(user) {
            Ok(items) => items,
            Err(error) => {
                tracing::warn!(
                    user = %user,
                    error = %error,
                    "failed to load household items; skipping household"
                );
                report.users_failed += 1;
                continue;
            }
        };

        for item in items {
            if cancel.load(Ordering::Relaxed) {
                cancelled = true;
                break 'households;
            }
            process_item(store, now, today, expiring_window_days, &item, &mut report);
        }
    }

    tracing::info!(
        users_seen = report.users_seen,
        users_failed = report.users_failed,
        items_checked = report.items_checked,
        status_changes = report.status_changes,
        alerts_created = report.alerts_created,
        items_failed = report.items_failed,
        cancelled,
        "sweep finished"
    );
    Ok(report)
}

/// Sweep once without a cancellation hook. Used by on-demand triggers.
///
/// # Errors
///
/// Returns [`StoreError`] if the household list cannot be loaded.
pub fn run_once<S>(
    store: &S,
    clock: &dyn Clock,
    expiring_window_days: u32,
) -> Result<SweepReport, StoreError>
where
    S: InventoryStore + AlertStore,
{
    let cancel = AtomicBool::new(false);
    run_sweep(store, clock, expiring_window_days, &cancel)
}

fn process_item<S>(
    store: &S,
    now: DateTime<Utc>,
    today: NaiveDate,
    expiring_window_days: u32,
    item: &Item,
    report: &mut SweepReport,
) where
    S: InventoryStore + AlertStore,
{
    report.items_checked += 1;

    let status = freshness::status_on(item.expiry_date, today, expiring_window_days);

    if status != item.status {
        match store.set_item_status(item.id, status) {
            Ok(()) => report.status_changes += 1,
            Err(StoreError::NotFound) => {
                // Deleted out from under us. Nothing to update or alert on.
                tracing::debug!(item = %item.id, "item deleted mid-sweep; skipping");
                return;
            }
            Err(error) => {
                tracing::warn!(
                    item = %item.id,
                    error = %error,
                    "failed to persist status change; item deferred to the next run"
                );
                report.items_failed += 1;
                return;
            }
        }
    }

    // Alerts fire on the computed state, not the transition: the dedup
    // policy is what keeps a lingering problem item quiet between reads.
    let alert = match status {
        FreshnessStatus::Expired => maybe_create_alert(
            store,
            now,
            item.owner_id,
            Some(item.id),
            AlertKind::Expired,
            &format!("Item \"{}\" has expired! Please remove it.", item.name),
        ),
        FreshnessStatus::Expiring => maybe_create_alert(
            store,
            now,
            item.owner_id,
            Some(item.id),
            AlertKind::ExpiringSoon,
            &format!(
                "Item \"{}\" is expiring soon (<= {expiring_window_days} days).",
                item.name
            ),
        ),
        FreshnessStatus::Fresh => None,
    };

    if alert.is_some() {
        report.alerts_created += 1;
    }
}
