use rand::Rng;
use std::sync::atomic::{AtomicI64, Ordering};

/// Issues transaction references of the form `<prefix>-<millis>-<suffix>`.
///
/// The millisecond part is strictly increasing for the lifetime of the generator:
/// if the clock has not moved (or moved backwards) since the last call, the previous
/// value plus one is used instead, so references never collide within a session.
#[derive(Debug)]
pub struct ReferenceGenerator {
    prefix: String,
    last_millis: AtomicI64,
}

impl ReferenceGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            last_millis: AtomicI64::new(i64::MIN),
        }
    }

    pub fn generate(&self) -> String {
        self.generate_at(chrono::Utc::now().timestamp_millis())
    }

    pub fn generate_at(&self, now_millis: i64) -> String {
        let millis = self.reserve(now_millis);
        let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
        format!("{}-{}-{:04}", self.prefix, millis, suffix)
    }

    fn reserve(&self, now_millis: i64) -> i64 {
        let mut issued = now_millis;
        // fetch_update 的閉包可能重跑，結果以最後一次為準
        let _ = self
            .last_millis
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
                issued = if now_millis > last { now_millis } else { last + 1 };
                Some(issued)
            });
        issued
    }
}
