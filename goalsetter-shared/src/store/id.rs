/// Identifier generation for stored records
///
/// Record ids are opaque strings. The default generator builds them from
/// three fixed-width base-36 segments:
///
/// ```text
/// <millis: 9 chars><sequence: 6+ chars><random: 8 chars>
/// ```
///
/// The sequence number is an atomic counter owned by the generator, so two
/// ids from the same generator can never be equal. The timestamp and random suffix only
/// make ids hard to guess and roughly sortable by creation time.
///
/// # Example
///
/// ```
/// use goalsetter_shared::store::id::{IdGenerator, TimeRandomIdGenerator};
///
/// let ids = TimeRandomIdGenerator::new();
/// let a = ids.next_id();
/// let b = ids.next_id();
/// assert_ne!(a, b);
/// ```

use chrono::Utc;
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};

const MILLIS_WIDTH: usize = 9;
const SEQUENCE_WIDTH: usize = 6;
const RANDOM_WIDTH: usize = 8;

/// 36^8, the number of distinct random suffixes
const RANDOM_SPACE: u64 = 2_821_109_907_456;

/// Source of unique record identifiers
///
/// Implementations must be safe to call from many threads at once and must
/// never hand out the same id twice within one process.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh identifier
    fn next_id(&self) -> String;
}

/// Default generator: timestamp, atomic sequence and random suffix
#[derive(Debug, Default)]
pub struct TimeRandomIdGenerator {
    sequence: AtomicU64,
}

impl TimeRandomIdGenerator {
    /// Creates a generator whose sequence starts at zero
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimeRandomIdGenerator {
    fn next_id(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        let millis = u64::try_from(Utc::now().timestamp_millis()).unwrap_or_default();
        let suffix = rand::thread_rng().gen_range(0..RANDOM_SPACE);

        let mut id = String::with_capacity(MILLIS_WIDTH + SEQUENCE_WIDTH + RANDOM_WIDTH);
        id.push_str(&to_base36(millis, MILLIS_WIDTH));
        id.push_str(&to_base36(seq, SEQUENCE_WIDTH));
        id.push_str(&to_base36(suffix, RANDOM_WIDTH));
        id
    }
}

/// Encodes `value` in lowercase base 36, left-padded with zeros to `width`
///
/// Values that need more than `width` digits are written in full.
fn to_base36(mut value: u64, width: usize) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    let mut buf = Vec::with_capacity(width.max(13));
    while value > 0 {
        buf.push(DIGITS[(value % 36) as usize]);
        value /= 36;
    }
    while buf.len() < width {
        buf.push(b'0');
    }
    buf.reverse();

    // Only ASCII digits were pushed
    String::from_utf8(buf).unwrap_or_default()
}
