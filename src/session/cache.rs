//! Short-lived read-through cache over the store's answer list.
//!
//! Several UI reads land within the same event dispatch (answered
//! markers, answered count, current selection); the cache spares the
//! store a deserialization per read. The TTL is a best-effort
//! consistency window, not a correctness boundary: every write goes
//! through synchronously.

use crate::models::QuizAnswer;

use super::clock::Clock;
use super::store::{SessionStore, StoreError};

/// Maximum age at which a cached read is served without reloading.
pub const ANSWER_CACHE_TTL_MILLIS: u64 = 100;

struct CachedAnswers {
    answers: Vec<QuizAnswer>,
    fetched_at_millis: u64,
}

/// Read-through answer cache with write-through upserts.
pub struct AnswerCache<S, C> {
    store: S,
    clock: C,
    cached: Option<CachedAnswers>,
}

impl<S: SessionStore, C: Clock> AnswerCache<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            cached: None,
        }
    }

    fn is_fresh(&self, now_millis: u64) -> bool {
        self.cached
            .as_ref()
            .is_some_and(|c| now_millis.saturating_sub(c.fetched_at_millis) < ANSWER_CACHE_TTL_MILLIS)
    }

    fn refresh(&mut self) -> Result<(), StoreError> {
        let now = self.clock.now_millis();
        if !self.is_fresh(now) {
            let answers = self.store.load_answers()?;
            self.cached = Some(CachedAnswers {
                answers,
                fetched_at_millis: now,
            });
        }
        Ok(())
    }

    /// The current answer list, reloaded from the store when stale.
    pub fn get(&mut self) -> Result<&[QuizAnswer], StoreError> {
        self.refresh()?;
        Ok(self
            .cached
            .as_ref()
            .map(|c| c.answers.as_slice())
            .unwrap_or_default())
    }

    /// The stored answer for one question, if any.
    pub fn answer_for(&mut self, question_id: uuid::Uuid) -> Result<Option<QuizAnswer>, StoreError> {
        Ok(self
            .get()?
            .iter()
            .find(|a| a.question_id == question_id)
            .cloned())
    }

    /// Insert-or-replace keyed by `question_id`, updating the cache and
    /// writing through to the store in the same call.
    pub fn upsert(&mut self, answer: QuizAnswer) -> Result<(), StoreError> {
        self.refresh()?;
        self.store.save_answer(&answer)?;

        let now = self.clock.now_millis();
        let cached = self.cached.get_or_insert_with(|| CachedAnswers {
            answers: Vec::new(),
            fetched_at_millis: now,
        });
        cached.answers.retain(|a| a.question_id != answer.question_id);
        cached.answers.push(answer);
        cached.fetched_at_millis = now;
        Ok(())
    }

    /// Drop the cached value and its timestamp, so a stale hit cannot
    /// leak into a fresh session.
    pub fn invalidate(&mut self) {
        self.cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::clock::ManualClock;
    use crate::session::store::MemoryStore;
    use uuid::Uuid;

    fn answer(question_id: Uuid) -> QuizAnswer {
        QuizAnswer {
            question_id,
            answer_id: Uuid::new_v4(),
        }
    }

    #[test]
    fn test_fresh_read_skips_the_store() {
        let store = MemoryStore::new();
        let clock = ManualClock::at(0);
        let mut cache = AnswerCache::new(store.clone(), clock.clone());

        assert!(cache.get().unwrap().is_empty());

        // Written behind the cache's back; a fresh read does not see it.
        store.save_answer(&answer(Uuid::new_v4())).unwrap();
        clock.advance(ANSWER_CACHE_TTL_MILLIS - 1);
        assert!(cache.get().unwrap().is_empty());

        // Past the TTL the next read reloads.
        clock.advance(2);
        assert_eq!(cache.get().unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_replaces_in_cache_and_store() {
        let store = MemoryStore::new();
        let mut cache = AnswerCache::new(store.clone(), ManualClock::at(0));
        let question = Uuid::new_v4();

        let first = answer(question);
        let second = answer(question);
        let winner = second.answer_id;

        cache.upsert(first).unwrap();
        cache.upsert(second).unwrap();

        let cached = cache.get().unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].answer_id, winner);

        let stored = store.load_answers().unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].answer_id, winner);
    }

    #[test]
    fn test_invalidate_forces_reload() {
        let store = MemoryStore::new();
        let clock = ManualClock::at(0);
        let mut cache = AnswerCache::new(store.clone(), clock.clone());

        cache.upsert(answer(Uuid::new_v4())).unwrap();
        store.clear_answers().unwrap();

        // Still within the TTL, so the cached copy would be served.
        cache.invalidate();
        assert!(cache.get().unwrap().is_empty());
    }

    #[test]
    fn test_answer_for_finds_the_right_question() {
        let mut cache = AnswerCache::new(MemoryStore::new(), ManualClock::at(0));
        let target = answer(Uuid::new_v4());
        let expected = target.answer_id;
        let question = target.question_id;

        cache.upsert(answer(Uuid::new_v4())).unwrap();
        cache.upsert(target).unwrap();

        assert_eq!(
            cache.answer_for(question).unwrap().map(|a| a.answer_id),
            Some(expected)
        );
        assert!(cache.answer_for(Uuid::new_v4()).unwrap().is_none());
    }
}
