// src/crawl/frontier.rs
// =============================================================================
// The Frontier Manager: the deduplicated set of every URL the crawl has
// seen, plus the policy that decides what happens to a newly discovered
// link - become a follow task, become a check-only task, or be dropped.
//
// Single-writer discipline: only the driver thread ever calls admit().
// Workers hand discovered links back through the completed-task channel and
// never touch this set, so membership-check + insert is one plain,
// race-free step - that step is what guarantees at-most-once visitation.
//
// The seen-set is monotonic: URLs are only ever added, never removed, and
// a URL that was admitted once is rejected forever after.
// =============================================================================

use std::collections::HashSet;

use clap::ValueEnum;
use url::Url;

/// What to do with links on the seed's own network location
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InternalPolicy {
    /// Verify the status code only
    Check,
    /// Verify the status code and keep crawling through the page's links
    Follow,
}

/// What to do with links on other network locations
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalPolicy {
    /// Verify the status code only
    Check,
    /// Drop without checking
    Ignore,
    /// Verify the status code and keep crawling through the page's links
    Follow,
}

/// The frontier's verdict on one discovered link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Already seen, wrong scheme, unparseable, or excluded by policy
    Rejected,
    /// New link on the seed's network location; the flag says whether the
    /// resulting task should extract further links
    Internal { url: String, follow: bool },
    /// New link on a different network location
    External { url: String, follow: bool },
}

/// Deduplicated set of seen URLs plus the classification policy.
/// Created once per run; owned and mutated by the driver only.
pub struct Frontier {
    seen: HashSet<String>,
    root_host: String,
    root_port: Option<u16>,
    internal: InternalPolicy,
    external: ExternalPolicy,
}

impl Frontier {
    // Builds the frontier around the seed URL.
    //
    // The seed is inserted into the seen-set right here, before the crawl
    // loop starts, so pages linking back to the seed never re-admit it.
    pub fn new(seed: &Url, internal: InternalPolicy, external: ExternalPolicy) -> Self {
        let mut seen = HashSet::new();
        seen.insert(canonicalize(seed));

        Self {
            seen,
            root_host: seed.host_str().unwrap_or_default().to_string(),
            root_port: seed.port_or_known_default(),
            internal,
            external,
        }
    }

    // Decides what happens to one discovered link.
    //
    // Order matters and follows the at-most-once guarantee:
    // 1. Strip the fragment - #a and #b never distinguish crawl targets
    // 2. Dedup against the seen-set, inserting on first sight
    // 3. Reject non-http(s) schemes (mailto:, ftp:, ... - not errors)
    // 4. Classify internal/external by host + effective port vs. the seed
    // 5. Apply the external Ignore policy
    // 6. Report whether the policy says the new task should follow
    pub fn admit(&mut self, candidate: &str) -> Decision {
        let url = match Url::parse(candidate) {
            Ok(url) => url,
            Err(_) => return Decision::Rejected,
        };

        let canonical = canonicalize(&url);
        if !self.seen.insert(canonical.clone()) {
            return Decision::Rejected;
        }

        if url.scheme() != "http" && url.scheme() != "https" {
            return Decision::Rejected;
        }

        let internal = url.host_str().unwrap_or_default() == self.root_host
            && url.port_or_known_default() == self.root_port;

        if internal {
            Decision::Internal {
                url: canonical,
                follow: self.internal == InternalPolicy::Follow,
            }
        } else {
            if self.external == ExternalPolicy::Ignore {
                return Decision::Rejected;
            }
            Decision::External {
                url: canonical,
                follow: self.external == ExternalPolicy::Follow,
            }
        }
    }

    /// Number of distinct URLs seen so far (including the seed)
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

// The canonical form of a URL for frontier purposes: the URL with any
// fragment removed. https://x/y#a and https://x/y#b are the same target.
fn canonicalize(url: &Url) -> String {
    let mut url = url.clone();
    url.set_fragment(None);
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frontier(internal: InternalPolicy, external: ExternalPolicy) -> Frontier {
        let seed = Url::parse("http://a.test/").unwrap();
        Frontier::new(&seed, internal, external)
    }

    #[test]
    fn test_admits_each_url_at_most_once() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Check);
        assert!(matches!(
            f.admit("http://a.test/page"),
            Decision::Internal { .. }
        ));
        assert_eq!(f.admit("http://a.test/page"), Decision::Rejected);
    }

    #[test]
    fn test_fragments_do_not_distinguish_targets() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Check);
        assert!(matches!(
            f.admit("http://a.test/page#top"),
            Decision::Internal { .. }
        ));
        // same target, different fragment
        assert_eq!(f.admit("http://a.test/page#bottom"), Decision::Rejected);
        assert_eq!(f.admit("http://a.test/page"), Decision::Rejected);
    }

    #[test]
    fn test_seed_is_preseeded() {
        let mut f = frontier(InternalPolicy::Follow, ExternalPolicy::Check);
        assert_eq!(f.admit("http://a.test/"), Decision::Rejected);
        assert_eq!(f.admit("http://a.test/#anchor"), Decision::Rejected);
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Check);
        assert_eq!(f.admit("ftp://a.test/file"), Decision::Rejected);
        assert_eq!(f.admit("mailto:someone@a.test"), Decision::Rejected);
        assert_eq!(f.admit("not a url at all"), Decision::Rejected);
    }

    #[test]
    fn test_classifies_by_host_and_port() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Check);
        assert!(matches!(
            f.admit("http://a.test/page"),
            Decision::Internal { .. }
        ));
        assert!(matches!(
            f.admit("http://b.test/"),
            Decision::External { .. }
        ));
        // same host, different port = different network location
        assert!(matches!(
            f.admit("http://a.test:8080/"),
            Decision::External { .. }
        ));
    }

    #[test]
    fn test_default_port_is_equivalent_to_no_port() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Check);
        assert!(matches!(
            f.admit("http://a.test:80/page"),
            Decision::Internal { .. }
        ));
    }

    #[test]
    fn test_external_ignore_rejects_but_still_marks_seen() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Ignore);
        assert_eq!(f.admit("http://b.test/"), Decision::Rejected);
        // a second reference to the same external link also rejects
        assert_eq!(f.admit("http://b.test/"), Decision::Rejected);
    }

    #[test]
    fn test_follow_flags_track_policy() {
        let mut f = frontier(InternalPolicy::Follow, ExternalPolicy::Check);
        assert_eq!(
            f.admit("http://a.test/page"),
            Decision::Internal {
                url: "http://a.test/page".to_string(),
                follow: true
            }
        );
        assert_eq!(
            f.admit("http://b.test/"),
            Decision::External {
                url: "http://b.test/".to_string(),
                follow: false
            }
        );
    }

    #[test]
    fn test_seen_count_includes_seed() {
        let mut f = frontier(InternalPolicy::Check, ExternalPolicy::Check);
        assert_eq!(f.seen_count(), 1);
        f.admit("http://a.test/page");
        assert_eq!(f.seen_count(), 2);
    }
}
