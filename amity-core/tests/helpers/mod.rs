//! Reusable test helpers for Amity integration tests.
//!
//! Each test opens its own database in a unique directory, so tests can
//! run in parallel without sharing state.

#![allow(dead_code)]

use std::env;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use amity_core::identity::{NewUser, UserId};
use amity_core::notify::{NotificationEvent, NotificationRelay, NotifyError};
use amity_core::storage::{SocialStorage, DATABASE_FILE};
use amity_core::AmityCore;

/// Atomic counter for unique test directory names.
static HELPER_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Creates a unique temporary directory for test isolation.
pub fn unique_temp_dir(prefix: &str) -> PathBuf {
    let id = HELPER_COUNTER.fetch_add(1, Ordering::SeqCst);
    env::temp_dir().join(format!(
        "amity_test_{}_{}_{}",
        prefix,
        std::process::id(),
        id
    ))
}

/// Removes a temporary test directory. Ignores errors silently.
pub fn cleanup_dir(dir: &PathBuf) {
    let _ = std::fs::remove_dir_all(dir);
}

/// Relay that records every event it is handed.
#[derive(Default)]
pub struct RecordingRelay {
    events: Mutex<Vec<NotificationEvent>>,
}

impl RecordingRelay {
    pub fn events(&self) -> Vec<NotificationEvent> {
        self.events.lock().expect("relay lock").clone()
    }
}

impl NotificationRelay for RecordingRelay {
    fn deliver(&self, event: &NotificationEvent) -> amity_core::notify::Result<()> {
        self.events.lock().expect("relay lock").push(*event);
        Ok(())
    }
}

/// Relay that always fails.
pub struct FailingRelay;

impl NotificationRelay for FailingRelay {
    fn deliver(&self, _event: &NotificationEvent) -> amity_core::notify::Result<()> {
        Err(NotifyError::Delivery("relay offline".to_string()))
    }
}

/// A core backed by a file database in a temp directory.
pub struct TestCore {
    pub dir: PathBuf,
    pub core: AmityCore,
    pub relay: Arc<RecordingRelay>,
}

impl TestCore {
    /// Opens a fresh database with a recording relay.
    pub fn new(prefix: &str) -> Self {
        let dir = unique_temp_dir(prefix);
        std::fs::create_dir_all(&dir).expect("should create temp dir");
        let storage =
            Arc::new(SocialStorage::new(&dir.join(DATABASE_FILE)).expect("should open storage"));
        let relay = Arc::new(RecordingRelay::default());
        let core = AmityCore::from_storage(storage, relay.clone());
        Self { dir, core, relay }
    }

    /// Registers a user whose username is the lowercased name.
    pub fn register(&self, name: &str) -> UserId {
        self.core
            .identity()
            .register(&NewUser::new(name, name.to_lowercase(), "password123"))
            .expect("should register user")
            .id
    }
}

impl Drop for TestCore {
    fn drop(&mut self) {
        cleanup_dir(&self.dir);
    }
}
