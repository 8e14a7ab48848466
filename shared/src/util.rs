//! Clock and id helpers

use rand::Rng;

/// 2024-01-01T00:00:00Z, the zero point of idea and board ids
const ID_EPOCH_MS: i64 = 1_704_067_200_000;
const TIMESTAMP_BITS_MASK: i64 = (1 << 41) - 1;
const RANDOM_BITS: u32 = 12;

/// Unix milliseconds, the unit of every `created_at` / `updated_at`
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Time-ordered random id: 41 bits of milliseconds since [`ID_EPOCH_MS`]
/// over 12 random bits. Stays below 2^53 so browsers read it exactly.
pub fn snowflake_id() -> i64 {
    let ts = (now_millis() - ID_EPOCH_MS) & TIMESTAMP_BITS_MASK;
    let noise: i64 = rand::thread_rng().gen_range(0..(1 << RANDOM_BITS));
    (ts << RANDOM_BITS) | noise
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snowflake_ids_fit_in_js_number() {
        let id = snowflake_id();
        assert!(id > 0);
        assert!(id < (1_i64 << 53));
    }

    #[test]
    fn later_ids_sort_after_earlier_ones() {
        let earlier = snowflake_id();
        std::thread::sleep(std::time::Duration::from_millis(2));
        assert!(snowflake_id() > earlier);
    }
}
