//! End-to-end expiry lifecycle over an on-disk store and a manual clock.
//!
//! Walks household items through fresh → expiring → expired and checks the
//! alert log after every hop:
//! - an item that expires today is `expiring` with one EXPIRING_SOON alert
//! - three days later it is `expired` with one EXPIRED alert (two total)
//! - immediate re-sweeps change nothing, however often they run
//! - marking an alert read reopens its slot for the next sweep

use chrono::{TimeZone, Utc};
use tracing_subscriber::EnvFilter;

use larder_core::clock::{Clock, ManualClock};
use larder_core::db::SqliteStore;
use larder_core::model::{AlertKind, AlertPriority, FreshnessStatus, ItemDraft, UserId};
use larder_core::store::{AlertStore, InventoryStore};
use larder_sweep::sweep::run_once;

const WINDOW: u32 = 2;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LARDER_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

fn on_disk_store(dir: &tempfile::TempDir) -> SqliteStore {
    SqliteStore::open(&dir.path().join("larder.sqlite3")).expect("open store")
}

fn register(store: &SqliteStore, email: &str, clock: &ManualClock) -> UserId {
    store.insert_user(email, clock.now()).expect("register household")
}

#[test]
fn item_walks_from_expiring_to_expired_with_one_alert_per_state() {
    init_tracing();
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = on_disk_store(&dir);
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().expect("valid instant"));
    let user = register(&store, "kitchen@example.com", &clock);

    // Bought five days ago with a five-day shelf life: expires today.
    let draft = ItemDraft::new("Milk", "1L", 5, 5, clock.today(), WINDOW).expect("valid draft");
    assert_eq!(draft.status, FreshnessStatus::Expiring);
    let item = store.insert_item(user, &draft, clock.now()).expect("insert item");

    let report = run_once(&store, &clock, WINDOW).expect("sweep");
    assert_eq!(report.users_seen, 1);
    assert_eq!(report.items_checked, 1);
    assert_eq!(report.status_changes, 0, "intake already computed expiring");
    assert_eq!(report.alerts_created, 1);

    let alerts = store.alerts_for_user(user).expect("alerts");
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].kind, AlertKind::ExpiringSoon);
    assert_eq!(alerts[0].priority, AlertPriority::Warning);
    assert_eq!(alerts[0].item_id, Some(item.id));
    assert_eq!(alerts[0].message, "Item \"Milk\" is expiring soon (<= 2 days).");
    assert!(!alerts[0].read);

    // Re-running any number of times without time passing is a no-op.
    for _ in 0..3 {
        let repeat = run_once(&store, &clock, WINDOW).expect("repeat sweep");
        assert_eq!(repeat.status_changes, 0);
        assert_eq!(repeat.alerts_created, 0);
    }
    assert_eq!(store.count_unread(user).expect("count"), 1);

    // Three days on, the item is past its expiry date.
    clock.advance_days(3);
    let report = run_once(&store, &clock, WINDOW).expect("sweep");
    assert_eq!(report.status_changes, 1);
    assert_eq!(report.alerts_created, 1);

    let stored = &store.items_for_user(user).expect("items")[0];
    assert_eq!(stored.status, FreshnessStatus::Expired);

    let alerts = store.alerts_for_user(user).expect("alerts");
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].kind, AlertKind::Expired, "newest first");
    assert_eq!(alerts[0].priority, AlertPriority::Danger);
    assert_eq!(alerts[0].message, "Item \"Milk\" has expired! Please remove it.");
    assert!(alerts.iter().all(|alert| !alert.read), "both slots unread");
    assert_eq!(store.count_unread(user).expect("count"), 2);
}

#[test]
fn reading_an_alert_lets_the_next_sweep_notify_again() {
    init_tracing();
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = on_disk_store(&dir);
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().expect("valid instant"));
    let user = register(&store, "kitchen@example.com", &clock);

    // Two days past expiry at intake.
    let draft = ItemDraft::new("Yogurt", "4 cups", 3, 5, clock.today(), WINDOW).expect("valid draft");
    assert_eq!(draft.status, FreshnessStatus::Expired);
    store.insert_item(user, &draft, clock.now()).expect("insert item");

    run_once(&store, &clock, WINDOW).expect("first sweep");
    let first = store.alerts_for_user(user).expect("alerts")[0].clone();
    assert_eq!(first.kind, AlertKind::Expired);

    store.mark_read(first.id).expect("mark read");
    assert_eq!(store.count_unread(user).expect("count"), 0);

    // The item is still expired the next day, so the freed slot refills.
    clock.advance_days(1);
    let report = run_once(&store, &clock, WINDOW).expect("second sweep");
    assert_eq!(report.status_changes, 0);
    assert_eq!(report.alerts_created, 1);

    let alerts = store.alerts_for_user(user).expect("alerts");
    assert_eq!(alerts.len(), 2);
    assert!(!alerts[0].read, "fresh alert in the reopened slot");
    assert_eq!(alerts[0].kind, AlertKind::Expired);
    assert!(alerts[1].read, "acknowledged alert stays in the log");
    assert_eq!(store.count_unread(user).expect("count"), 1);
}

#[test]
fn sweep_covers_every_household() {
    init_tracing();
    let dir = tempfile::tempdir().expect("create temp dir");
    let store = on_disk_store(&dir);
    let clock = ManualClock::new(Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).single().expect("valid instant"));

    let ina = register(&store, "ina@example.com", &clock);
    let ray = register(&store, "ray@example.com", &clock);
    for (user, name) in [(ina, "Bread"), (ray, "Cheese")] {
        let draft = ItemDraft::new(name, "1", 10, 0, clock.today(), WINDOW).expect("valid draft");
        store.insert_item(user, &draft, clock.now()).expect("insert item");
    }

    clock.advance_days(12);
    let report = run_once(&store, &clock, WINDOW).expect("sweep");

    assert_eq!(report.users_seen, 2);
    assert_eq!(report.items_checked, 2);
    assert_eq!(report.status_changes, 2);
    assert_eq!(report.alerts_created, 2);

    for user in [ina, ray] {
        assert_eq!(store.count_unread(user).expect("count"), 1);
        let stored = &store.items_for_user(user).expect("items")[0];
        assert_eq!(stored.status, FreshnessStatus::Expired);
    }
}
