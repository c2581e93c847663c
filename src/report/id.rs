// SPDX-License-Identifier: MPL-2.0
//! Report identifiers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::{Builder, Uuid};

static FALLBACK_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns a fresh lowercase, hyphenated version 4 UUID.
///
/// Bytes come from the operating system's secure random source. If that source
/// is unavailable, they are derived from the clock, the process id and a
/// counter instead; the textual layout stays the same.
#[must_use]
pub fn generate_report_id() -> String {
    let mut bytes = [0u8; 16];
    let uuid = match getrandom::fill(&mut bytes) {
        Ok(()) => Builder::from_random_bytes(bytes).into_uuid(),
        Err(err) => {
            tracing::debug!(%err, "secure random source unavailable, using fallback id");
            fallback_uuid()
        }
    };
    uuid.hyphenated().to_string()
}

fn fallback_uuid() -> Uuid {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_nanos());
    let count = FALLBACK_COUNTER.fetch_add(1, Ordering::Relaxed);

    let mut hasher = blake3::Hasher::new();
    hasher.update(&nanos.to_le_bytes());
    hasher.update(&count.to_le_bytes());
    hasher.update(&std::process::id().to_le_bytes());

    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&hasher.finalize().as_bytes()[..16]);
    Builder::from_random_bytes(bytes).into_uuid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::collections::HashSet;

    fn uuid_v4_shape() -> Regex {
        Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$").unwrap()
    }

    #[test]
    fn ids_have_uuid_v4_layout() {
        let shape = uuid_v4_shape();
        for _ in 0..32 {
            let id = generate_report_id();
            assert!(shape.is_match(&id), "unexpected id layout: {id}");
        }
    }

    #[test]
    fn fallback_ids_keep_the_layout() {
        let shape = uuid_v4_shape();
        let id = fallback_uuid().hyphenated().to_string();
        assert!(shape.is_match(&id), "unexpected fallback layout: {id}");
    }

    #[test]
    fn ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| generate_report_id()).collect();
        assert_eq!(ids.len(), 1000);

        let fallback: HashSet<_> = (0..1000).map(|_| fallback_uuid()).collect();
        assert_eq!(fallback.len(), 1000);
    }
}
