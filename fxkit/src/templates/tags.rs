//! Template tag parsing and selection

use semver::{Prerelease, Version, VersionReq};

/// Prefix carried by every template tag, e.g. `templates@1.2.0`
pub const TAG_PREFIX: &str = "templates@";

/// Which tags are eligible for selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagChannel {
    /// Highest release (no pre-release part) satisfying the requirement
    Stable(VersionReq),
    /// Highest version whose first pre-release identifier equals this value
    Prerelease(String),
}

/// Split a raw tag-list body into tags
///
/// Carriage returns are dropped and blank lines skipped.
#[must_use]
pub fn parse_tag_list(body: &str) -> Vec<String> {
    body.replace('\r', "")
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Parse the version out of a `templates@<semver>` tag
#[must_use]
pub fn tag_version(tag: &str) -> Option<Version> {
    tag.strip_prefix(TAG_PREFIX)
        .and_then(|v| Version::parse(v).ok())
}

fn first_prerelease_identifier(pre: &Prerelease) -> &str {
    pre.as_str().split('.').next().unwrap_or_default()
}

/// Pick a tag from the list according to `channel`
///
/// The result depends only on the set of tags and the channel, never on the
/// order of the list. Unparsable tags are ignored. Returns `None` when no
/// tag is eligible.
#[must_use]
pub fn select_tag<S: AsRef<str>>(tags: &[S], channel: &TagChannel) -> Option<String> {
    tags.iter()
        .filter_map(|tag| {
            let tag = tag.as_ref();
            tag_version(tag).map(|version| (version, tag))
        })
        .filter(|(version, _)| match channel {
            TagChannel::Stable(req) => version.pre.is_empty() && req.matches(version),
            TagChannel::Prerelease(id) => {
                !version.pre.is_empty() && first_prerelease_identifier(&version.pre) == id
            }
        })
        // Build metadata does not take part in semver precedence; fall back to
        // the tag text so equal-precedence tags still resolve deterministically.
        .max_by(|(a, a_tag), (b, b_tag)| a.cmp_precedence(b).then_with(|| a_tag.cmp(b_tag)))
        .map(|(_, tag)| tag.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stable(req: &str) -> TagChannel {
        TagChannel::Stable(VersionReq::parse(req).unwrap())
    }

    const TAGS: &[&str] = &[
        "templates@1.0.0",
        "templates@1.2.3",
        "templates@1.10.0",
        "templates@2.0.0",
        "templates@1.11.0-alpha.1",
        "templates@0.0.0-alpha",
        "templates@1.3.0-alpha.2",
        "templates@1.3.0-rc.1",
        "sample-tags@9.9.9",
        "templates@garbage",
    ];

    #[test]
    fn test_parse_tag_list_strips_cr_and_blanks() {
        let tags = parse_tag_list("templates@1.0.0\r\n\r\ntemplates@1.1.0\r\n");
        assert_eq!(tags, vec!["templates@1.0.0", "templates@1.1.0"]);
    }

    #[test]
    fn test_stable_picks_highest_matching_release() {
        assert_eq!(select_tag(TAGS, &stable("^1.0")).as_deref(), Some("templates@1.10.0"));
        assert_eq!(select_tag(TAGS, &stable(">=1.0.0")).as_deref(), Some("templates@2.0.0"));
        assert_eq!(select_tag(TAGS, &stable("~1.2")).as_deref(), Some("templates@1.2.3"));
    }

    #[test]
    fn test_stable_ignores_prereleases() {
        let tags = ["templates@1.0.0", "templates@1.1.0-alpha.1"];
        assert_eq!(select_tag(tags.as_slice(), &stable(">=1.0.0-alpha")).as_deref(), Some("templates@1.0.0"));
    }

    #[test]
    fn test_prerelease_picks_highest_in_channel() {
        let alpha = TagChannel::Prerelease("alpha".into());
        let rc = TagChannel::Prerelease("rc".into());
        assert_eq!(select_tag(TAGS, &alpha).as_deref(), Some("templates@1.11.0-alpha.1"));
        assert_eq!(select_tag(TAGS, &rc).as_deref(), Some("templates@1.3.0-rc.1"));
    }

    #[test]
    fn test_no_match_returns_none() {
        assert_eq!(select_tag::<&str>(&[], &stable("^1.0")), None);
        assert_eq!(select_tag(TAGS, &stable("^3")), None);
        assert_eq!(select_tag(TAGS, &TagChannel::Prerelease("beta".into())), None);
    }

    proptest! {
        #[test]
        fn prop_selection_is_order_independent(
            versions in proptest::collection::vec((0u64..4, 0u64..6, 0u64..6, proptest::option::of(0u64..3)), 0..12),
            seed in any::<u64>(),
        ) {
            let tags: Vec<String> = versions
                .iter()
                .map(|(ma, mi, pa, pre)| match pre {
                    Some(n) => format!("{TAG_PREFIX}{ma}.{mi}.{pa}-alpha.{n}"),
                    None => format!("{TAG_PREFIX}{ma}.{mi}.{pa}"),
                })
                .collect();

            let mut shuffled = tags.clone();
            let len = shuffled.len();
            if len > 1 {
                let mut state = seed;
                for i in (1..len).rev() {
                    state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
                    #[allow(clippy::cast_possible_truncation)]
                    let j = (state >> 33) as usize % (i + 1);
                    shuffled.swap(i, j);
                }
            }

            for channel in [stable(">=0.0.0"), stable("^1"), TagChannel::Prerelease("alpha".into())] {
                prop_assert_eq!(select_tag(tags.as_slice(), &channel), select_tag(shuffled.as_slice(), &channel));
            }
        }
    }
}
