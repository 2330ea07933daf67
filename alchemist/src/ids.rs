//! Message identifier generation.
//!
//! Ids are `<prefix>-<unix millis>-<random hex>`. The time component keeps
//! them roughly sortable; the random component keeps two ids minted in the
//! same millisecond apart.

use chrono::Utc;
use rand::Rng;

/// Generate a new identifier with the given prefix.
pub fn generate_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let entropy: u64 = rand::rng().random();
    format!("{prefix}-{millis}-{entropy:x}")
}
