//! In-process store doubles for service tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::SessionRecord;
use crate::error::DomainError;
use crate::repositories::SessionStore;

#[derive(Default)]
pub struct TestSessionStore {
    records: Mutex<HashMap<String, SessionRecord>>,
}

impl TestSessionStore {
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl SessionStore for TestSessionStore {
    async fn save(&self, session_id: &str, record: &SessionRecord) -> Result<(), DomainError> {
        self.records
            .lock()
            .unwrap()
            .insert(session_id.to_string(), record.clone());
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<SessionRecord>, DomainError> {
        Ok(self.records.lock().unwrap().get(session_id).cloned())
    }

    async fn destroy(&self, session_id: &str) -> Result<(), DomainError> {
        self.records.lock().unwrap().remove(session_id);
        Ok(())
    }
}
