//! Benchmark profiles: acceleration x caching combinations.
//!
//! Profiles are external labels selecting a network-condition setup; the
//! engine itself only acts on the caching flag, which decides how attempt
//! request targets are shaped. With caching disabled, every attempt gets a
//! distinguishable target (per-attempt token) to defeat intermediary
//! caching; with caching enabled, all attempts request the identical target
//! so a caching layer can serve hits.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::transport::TransferTarget;

/// One named benchmark configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Profile {
    pub id: &'static str,
    pub title: &'static str,
    /// TCP acceleration toggle: a label for the external condition injector,
    /// never engine state.
    pub acceleration: bool,
    pub caching: bool,
}

/// The four builtin profiles (both toggles, all combinations).
pub const PROFILES: [Profile; 4] = [
    Profile {
        id: "baseline",
        title: "no acceleration, no caching",
        acceleration: false,
        caching: false,
    },
    Profile {
        id: "cached",
        title: "no acceleration, caching",
        acceleration: false,
        caching: true,
    },
    Profile {
        id: "accel",
        title: "acceleration, no caching",
        acceleration: true,
        caching: false,
    },
    Profile {
        id: "accel-cached",
        title: "acceleration, caching",
        acceleration: true,
        caching: true,
    },
];

/// Looks up a builtin profile by id.
pub fn find(id: &str) -> Option<Profile> {
    PROFILES.iter().copied().find(|p| p.id == id)
}

impl Profile {
    /// Builds the request target for one attempt under this profile's cache
    /// policy.
    pub fn request_target(&self, base_url: &str, sequence: u32) -> TransferTarget {
        if self.caching {
            return TransferTarget {
                url: base_url.to_string(),
            };
        }
        let sep = if base_url.contains('?') { '&' } else { '?' };
        let token = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        TransferTarget {
            url: format!("{}{}attempt={}&t={}", base_url, sep, sequence, token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_builtin_profiles_cover_all_combinations() {
        assert_eq!(PROFILES.len(), 4);
        for accel in [false, true] {
            for caching in [false, true] {
                assert!(PROFILES
                    .iter()
                    .any(|p| p.acceleration == accel && p.caching == caching));
            }
        }
    }

    #[test]
    fn find_by_id() {
        assert_eq!(find("accel").unwrap().acceleration, true);
        assert!(find("nope").is_none());
    }

    #[test]
    fn caching_profile_uses_identical_target_for_all_attempts() {
        let p = find("cached").unwrap();
        let a = p.request_target("http://host/file", 1);
        let b = p.request_target("http://host/file", 2);
        assert_eq!(a.url, "http://host/file");
        assert_eq!(a.url, b.url);
    }

    #[test]
    fn uncached_profile_distinguishes_attempts() {
        let p = find("baseline").unwrap();
        let a = p.request_target("http://host/file", 1);
        let b = p.request_target("http://host/file", 2);
        assert_ne!(a.url, b.url);
        assert!(a.url.contains("attempt=1"));
        assert!(b.url.contains("attempt=2"));
    }

    #[test]
    fn uncached_target_appends_to_existing_query() {
        let p = find("baseline").unwrap();
        let t = p.request_target("http://host/file?x=1", 7);
        assert!(t.url.starts_with("http://host/file?x=1&attempt=7&t="));
    }
}
