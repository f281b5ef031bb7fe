//! Job identifier sources

use std::collections::VecDeque;

use uuid::Uuid;

/// Supplies the identifier for the next job
pub trait JobIdSource {
    fn next_job_id(&mut self) -> Uuid;
}

/// Always generates a fresh random identifier
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomJobIds;

impl JobIdSource for RandomJobIds {
    fn next_job_id(&mut self) -> Uuid {
        Uuid::new_v4()
    }
}

/// Pre-seeded identifiers, handed out first-in first-out.
///
/// Falls back to random identifiers once drained.
#[derive(Debug, Clone, Default)]
pub struct PendingJobIds {
    queue: VecDeque<Uuid>,
}

impl PendingJobIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an identifier behind any already pending
    pub fn push(&mut self, id: Uuid) {
        self.queue.push_back(id);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

impl JobIdSource for PendingJobIds {
    fn next_job_id(&mut self) -> Uuid {
        self.queue.pop_front().unwrap_or_else(Uuid::new_v4)
    }
}

impl From<Vec<Uuid>> for PendingJobIds {
    fn from(ids: Vec<Uuid>) -> Self {
        Self { queue: ids.into() }
    }
}

impl FromIterator<Uuid> for PendingJobIds {
    fn from_iter<I: IntoIterator<Item = Uuid>>(iter: I) -> Self {
        Self {
            queue: iter.into_iter().collect(),
        }
    }
}
