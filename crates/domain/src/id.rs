//! Idempotency key generation.

use chrono::Utc;
use rand::Rng;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Length of the random suffix of an idempotency key.
const KEY_SUFFIX_LEN: usize = 9;

/// Generates an idempotency key for a financial operation.
///
/// The format is `<unix millis>-<9 base36 chars>`, e.g.
/// `1718000000000-k3j9x0q2a`. A key is generated once per operation and
/// reused verbatim if the same operation is retried, so the backend can
/// discard the duplicate.
#[must_use]
pub fn generate_idempotency_key() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..KEY_SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{}-{suffix}", Utc::now().timestamp_millis())
}
