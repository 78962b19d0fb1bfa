use rand::Rng;
use std::{
    fmt,
    sync::atomic::{AtomicU64, Ordering},
};

pub trait IdGenerator: Send + Sync + fmt::Debug {
    fn next_id(&self) -> u64;
}

impl<T: IdGenerator + ?Sized> IdGenerator for &T {
    fn next_id(&self) -> u64 {
        (**self).next_id()
    }
}

/// Hands out consecutive identifiers from an atomic counter.
///
/// `u64::MAX` is never handed out; a counter that reaches it is exhausted.
#[derive(Debug)]
pub struct SequentialIdGenerator {
    next: AtomicU64,
}

impl SequentialIdGenerator {
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    pub const fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }

    /// Moves the counter past `id`, e.g. after loading a scene with stored identifiers.
    ///
    /// `ensure_above(u64::MAX)` exhausts the generator.
    pub fn ensure_above(&self, id: u64) {
        self.next.fetch_max(id.saturating_add(1), Ordering::Relaxed);
    }

    pub fn peek(&self) -> u64 {
        self.next.load(Ordering::Relaxed)
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    /// # Panics
    ///
    /// Panics once the counter is exhausted instead of wrapping around to ids
    /// that were already issued.
    fn next_id(&self) -> u64 {
        let issued = self
            .next
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |next| {
                (next != u64::MAX).then(|| next + 1)
            });

        match issued {
            Ok(id) => id,
            Err(_) => {
                log::error!("sequential id generator exhausted");
                panic!("sequential id generator exhausted");
            }
        }
    }
}

#[derive(Debug, Default)]
pub struct RandomIdGenerator;

impl RandomIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> u64 {
        rand::thread_rng().gen()
    }
}

static PROCESS_GENERATOR: SequentialIdGenerator = SequentialIdGenerator::new();

/// Generator used by `IdentifiedEntity::new`.
pub fn process_generator() -> &'static SequentialIdGenerator {
    &PROCESS_GENERATOR
}
