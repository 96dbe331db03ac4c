//! Pseudo-MAC identifiers handed to students at seeding time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Number of octets in a bluetooth id (`AA:BB:CC:DD`).
const OCTETS: usize = 4;

/// Derives the bluetooth id for the `ordinal`-th seeded student.
///
/// HMAC-SHA256 keyed by the decimal seed over `"{name}-{ordinal}"`; the first
/// four digest bytes become colon-separated uppercase hex octets. The same
/// inputs always produce the same id.
#[must_use]
pub fn derive_bluetooth_id(name: &str, ordinal: u32, seed: u64) -> String {
    let mut mac = HmacSha256::new_from_slice(seed.to_string().as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(format!("{name}-{ordinal}").as_bytes());
    let digest = mac.finalize().into_bytes();

    digest[..OCTETS]
        .iter()
        .map(|b| hex::encode_upper([*b]))
        .collect::<Vec<_>>()
        .join(":")
}
