//! Page identity resolution.
//!
//! Records are stored one per file, named `Group.Page`. The logical page
//! name swaps the `.` separator for `/` (`Group/Page`). Both directions are
//! plain character substitutions; a page name containing a literal `.` does
//! not survive the round trip and is not supported by the store format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Group assigned to pages whose name has no `/`.
pub const ROOT_GROUP: &str = "Root";

/// Convert an on-disk filename to a page identity.
pub fn filename_to_identity(filename: &str) -> String {
    filename.replace('.', "/")
}

/// Convert a page identity to its on-disk filename.
pub fn identity_to_filename(identity: &str) -> String {
    identity.replace('/', ".")
}

/// The group of a page identity: everything before the first `/`, or
/// [`ROOT_GROUP`] when there is none.
pub fn group_of(identity: &str) -> &str {
    match identity.split_once('/') {
        Some((group, _)) => group,
        None => ROOT_GROUP,
    }
}

/// Returns true if `identity` lives in `group`.
///
/// Matching is on the whole first segment, so `Main` does not claim
/// `Mainline/Foo`.
pub fn in_group(identity: &str, group: &str) -> bool {
    identity
        .strip_prefix(group)
        .map_or(false, |rest| rest.starts_with('/'))
}

/// Lowercased form with all ASCII punctuation removed, used for loose
/// name comparison (`Main/Home-Page` and `main.homepage` both become
/// `mainhomepage`).
pub fn loose_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_ascii_punctuation())
        .flat_map(char::to_lowercase)
        .collect()
}

/// A logical page name (`Group/Page`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PageName(String);

impl PageName {
    /// Build a page name from an on-disk filename
    pub fn from_filename(filename: &str) -> Self {
        PageName(filename_to_identity(filename))
    }

    /// Wrap an already slash-separated identity
    pub fn new(identity: impl Into<String>) -> Self {
        PageName(identity.into())
    }

    /// The identity as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The page's group
    pub fn group(&self) -> &str {
        group_of(&self.0)
    }
}

impl fmt::Display for PageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_to_identity() {
        assert_eq!(filename_to_identity("Main.HomePage"), "Main/HomePage");
        assert_eq!(filename_to_identity("Standalone"), "Standalone");
        assert_eq!(filename_to_identity("A.B.C"), "A/B/C");
    }

    #[test]
    fn test_identity_to_filename() {
        assert_eq!(identity_to_filename("Main/HomePage"), "Main.HomePage");
        assert_eq!(identity_to_filename("Main.HomePage"), "Main.HomePage");
    }

    #[test]
    fn test_round_trip_is_stable() {
        for f in ["Main.HomePage", "Site.SideBar", "Root", "A.B.C", ""] {
            let identity = filename_to_identity(f);
            assert_eq!(
                filename_to_identity(&identity_to_filename(&identity)),
                identity
            );
        }
    }

    #[test]
    fn test_group_of() {
        assert_eq!(group_of("Main/HomePage"), "Main");
        assert_eq!(group_of("A/B/C"), "A");
        assert_eq!(group_of("Orphan"), ROOT_GROUP);
        assert_eq!(group_of("/Leading"), "");
    }

    #[test]
    fn test_in_group_is_segment_exact() {
        assert!(in_group("Main/HomePage", "Main"));
        assert!(!in_group("Mainline/Foo", "Main"));
        assert!(!in_group("Main", "Main"));
        assert!(!in_group("Docs/Intro", "Main"));
    }

    #[test]
    fn test_loose_key() {
        assert_eq!(loose_key("Main/HomePage"), "mainhomepage");
        assert_eq!(loose_key("Main.Home-Page"), "mainhomepage");
        assert_eq!(loose_key("Café.Menu"), "cafémenu");
    }

    #[test]
    fn test_page_name() {
        let page = PageName::from_filename("Docs.Intro");
        assert_eq!(page.as_str(), "Docs/Intro");
        assert_eq!(page.group(), "Docs");
        assert_eq!(page.to_string(), "Docs/Intro");
        assert_eq!(PageName::from_filename("Orphan").group(), ROOT_GROUP);
    }
}
