// Scoped PRNG guard (spec.md §9's Design Note: "map save/restore to a
// scoped guard: constructor checkpoints, destructor restores"). Used where
// a caller already holds `&mut E` and wants to guarantee the engine's RNG
// is restored on every exit path, including an early return or panic.

use engine_contract::Engine;

/// RAII guard over an engine's PRNG: saves a checkpoint on construction and
/// restores it on `Drop`, so the guard covers normal return, early exit,
/// and unwind alike.
pub struct SpeculativeGuard<'a, E: Engine> {
    engine: &'a mut E,
    checkpoint: E::Checkpoint,
    calls_at_entry: u64,
    released: bool,
}

impl<'a, E: Engine> SpeculativeGuard<'a, E> {
    pub fn acquire(engine: &'a mut E) -> Self {
        let checkpoint = engine.rng_save();
        let calls_at_entry = engine.rng_call_count();
        Self { engine, checkpoint, calls_at_entry, released: false }
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.engine
    }

    pub fn calls_consumed_so_far(&self) -> u64 {
        self.engine.rng_call_count() - self.calls_at_entry
    }

    /// Restores early, before the guard goes out of scope. `Drop` becomes a
    /// no-op afterward.
    pub fn release(mut self) {
        self.engine.rng_restore(self.checkpoint.clone());
        self.released = true;
    }
}

impl<'a, E: Engine> Drop for SpeculativeGuard<'a, E> {
    fn drop(&mut self) {
        if !self.released {
            self.engine.rng_restore(self.checkpoint.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_contract::testkit::{TestEngine, WorldBuilder};
    use engine_contract::RoomId;

    fn engine() -> TestEngine {
        let (layout, state) = WorldBuilder::new().room(RoomId::new("room"), Default::default()).start_at(RoomId::new("room")).build();
        TestEngine::new(layout, state, 42)
    }

    #[test]
    fn guard_restores_rng_on_drop() {
        let mut eng = engine();
        let before = eng.rng_save();
        {
            let mut guard = SpeculativeGuard::acquire(&mut eng);
            guard.engine_mut().rng_advance(5);
        }
        assert_eq!(eng.rng_save(), before);
    }

    #[test]
    fn guard_restores_rng_on_early_release() {
        let mut eng = engine();
        let before = eng.rng_save();
        let mut guard = SpeculativeGuard::acquire(&mut eng);
        guard.engine_mut().rng_advance(3);
        guard.release();
        assert_eq!(eng.rng_save(), before);
    }
}
