use once_cell::sync::Lazy;
use std::sync::atomic::{AtomicU32, Ordering};

/// Process-wide message id counter, starting at 1.
static MESSAGE_ID_COUNTER: Lazy<AtomicU32> = Lazy::new(|| AtomicU32::new(1));

/// Returns the next message id. Wraps around on overflow, skipping 0 so that
/// 0 never names a real request.
#[inline]
pub fn next_message_id() -> u32 {
    loop {
        let id = MESSAGE_ID_COUNTER.fetch_add(1, Ordering::Relaxed);
        if id != 0 {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_skipped_on_wraparound() {
        MESSAGE_ID_COUNTER.store(u32::MAX, Ordering::Relaxed);
        assert_eq!(next_message_id(), u32::MAX);
        assert_eq!(next_message_id(), 1);
    }
}
