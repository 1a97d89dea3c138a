use rand::Rng;
use spark_domain::ports::ids::IdGenerator;
use spark_domain::util::now_ms;
use uuid::Uuid;

/// Strong random identity source; the default on every target where a
/// CSPRNG is available.
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn generate(&self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Timestamp-plus-random fallback, kept id-compatible with records
/// written by earlier app versions (`p_<epoch_ms>_<6 base36 chars>`).
pub struct TimestampIdGenerator;

impl IdGenerator for TimestampIdGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        let suffix: String = (0..6)
            .map(|_| {
                let digit = rng.random_range(0..36u32);
                char::from_digit(digit, 36).unwrap_or('0')
            })
            .collect();
        format!("p_{}_{suffix}", now_ms())
    }
}
