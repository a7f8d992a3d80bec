//! In-memory remote backend. Used by the integration tests and by the CLI's
//! offline mode; applies the same create/update semantics a real backend
//! would, via `Entity::from_draft` and `Entity::apply_patch`.

use chrono::Utc;

use crate::model::entity::Entity;
use crate::remote::{OrderEntry, Remote, RemoteError};

pub struct MemoryRemote<E> {
    entities: Vec<E>,
    next_id: u32,
    fail_next: Option<String>,
}

impl<E: Entity> MemoryRemote<E> {
    pub fn new() -> Self {
        MemoryRemote {
            entities: Vec::new(),
            next_id: 1,
            fail_next: None,
        }
    }

    pub fn with_entities(entities: Vec<E>) -> Self {
        let next_id = entities.len() as u32 + 1;
        MemoryRemote {
            entities,
            next_id,
            fail_next: None,
        }
    }

    /// Make the next call fail with a transport error carrying `message`.
    pub fn fail_next(&mut self, message: impl Into<String>) {
        self.fail_next = Some(message.into());
    }

    /// Server-side view of the stored entities
    pub fn entities(&self) -> &[E] {
        &self.entities
    }

    fn take_failure(&mut self) -> Result<(), RemoteError> {
        match self.fail_next.take() {
            Some(message) => Err(RemoteError::Transport(message)),
            None => Ok(()),
        }
    }

    fn position(&self, id: &str) -> Result<usize, RemoteError> {
        self.entities
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))
    }
}

impl<E: Entity> Default for MemoryRemote<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entity> Remote<E> for MemoryRemote<E> {
    fn fetch_all(&mut self) -> Result<Vec<E>, RemoteError> {
        self.take_failure()?;
        Ok(self.entities.clone())
    }

    fn fetch_one(&mut self, id: &str) -> Result<E, RemoteError> {
        self.take_failure()?;
        let idx = self.position(id)?;
        Ok(self.entities[idx].clone())
    }

    fn create(&mut self, draft: &E::Draft) -> Result<E, RemoteError> {
        self.take_failure()?;
        let id = format!("{}-{}", E::RESOURCE, self.next_id);
        self.next_id += 1;
        let entity = E::from_draft(draft, id, Utc::now());
        self.entities.push(entity.clone());
        Ok(entity)
    }

    fn update(&mut self, id: &str, patch: &E::Patch) -> Result<E, RemoteError> {
        self.take_failure()?;
        let idx = self.position(id)?;
        self.entities[idx].apply_patch(patch, Utc::now());
        Ok(self.entities[idx].clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), RemoteError> {
        self.take_failure()?;
        let idx = self.position(id)?;
        self.entities.remove(idx);
        Ok(())
    }

    fn update_order(&mut self, entries: &[OrderEntry]) -> Result<(), RemoteError> {
        self.take_failure()?;
        for entry in entries {
            if let Some(entity) = self.entities.iter_mut().find(|e| e.id() == entry.id) {
                entity.set_order(entry.order);
            }
        }
        Ok(())
    }
}
