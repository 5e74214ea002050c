//! Legacy URL redirects.
//!
//! The site used to be WordPress, with date-based permalinks. Old links are
//! mapped to their new homes; anything else is not found and points at the
//! landing page.
//!
//! ```text
//! /2020/06/27/create-a-tube-status-home-screen-widget-for-ios-14/
//!     → 301 /posts/tube-status-widget
//! /anything/else
//!     → 404 /index.php
//! ```

use std::fmt;

const LEGACY_PATHS: &[(&str, &str)] = &[
    ("/2022/01/04/some-thoughts-on-xcode-cloud", "/posts/xcode-cloud-thoughts"),
    ("/2021/12/26/what-ive-learnt-from-advent-of-code-21", "/posts/advent-of-code-21"),
    ("/2021/12/18/attempting-sonarqube-analysis-on-xcode-cloud", "/posts/sonarqube-xcodecloud"),
    ("/2021/04/28/gitflow-with-automation-for-mobile-apps", "/posts/gitflow-automation"),
    ("/2021/03/26/creating-great-enterprise-apps", "/posts/enterprise-apps"),
    ("/2020/11/25/going-native-with-wordpress", "/posts/native-with-wordpress"),
    ("/2020/09/05/going-for-gold-taking-full-advantage-of-apple-platforms", "/posts/going-for-gold"),
    ("/2020/07/23/constructing-data-with-swift-function-builders", "/posts/function-builders"),
    ("/2020/07/03/building-almost-anything-on-bitrise-using-docker", "/posts/docker-bitrise"),
    ("/2020/06/27/create-a-tube-status-home-screen-widget-for-ios-14", "/posts/tube-status-widget"),
];

pub const NOT_FOUND_LOCATION: &str = "/index.php";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    Permanent(&'static str),
    NotFound { location: &'static str },
}

impl Redirect {
    pub fn status(&self) -> u16 {
        match self {
            Redirect::Permanent(_) => 301,
            Redirect::NotFound { .. } => 404,
        }
    }

    pub fn location(&self) -> &'static str {
        match self {
            Redirect::Permanent(location) => *location,
            Redirect::NotFound { location } => *location,
        }
    }
}

impl fmt::Display for Redirect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Redirect::Permanent(_) => write!(f, "301 Moved Permanently → {}", self.location()),
            Redirect::NotFound { .. } => write!(f, "404 Not Found → {}", self.location()),
        }
    }
}

/// Look up a request path. A single trailing slash is ignored.
pub fn resolve(path: &str) -> Redirect {
    let path = path.strip_suffix('/').unwrap_or(path);
    LEGACY_PATHS
        .iter()
        .find(|(legacy, _)| *legacy == path)
        .map(|&(_, target)| Redirect::Permanent(target))
        .unwrap_or(Redirect::NotFound {
            location: NOT_FOUND_LOCATION,
        })
}

/// Every legacy path and its target.
pub fn table() -> &'static [(&'static str, &'static str)] {
    LEGACY_PATHS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tube_status_widget_redirects_permanently() {
        let redirect = resolve("/2020/06/27/create-a-tube-status-home-screen-widget-for-ios-14");
        assert_eq!(redirect, Redirect::Permanent("/posts/tube-status-widget"));
        assert_eq!(redirect.status(), 301);
    }

    #[test]
    fn trailing_slash_is_equivalent() {
        assert_eq!(
            resolve("/2021/12/26/what-ive-learnt-from-advent-of-code-21/"),
            Redirect::Permanent("/posts/advent-of-code-21")
        );
    }

    #[test]
    fn unknown_path_is_not_found() {
        let redirect = resolve("/2019/01/01/never-written");
        assert_eq!(redirect.status(), 404);
        assert_eq!(redirect.location(), "/index.php");
        assert_eq!(resolve("/"), Redirect::NotFound { location: "/index.php" });
    }

    #[test]
    fn every_entry_resolves_to_posts() {
        assert_eq!(table().len(), 10);
        for (legacy, target) in table() {
            assert_eq!(resolve(legacy).location(), *target);
            assert!(target.starts_with("/posts/"));
        }
    }

    #[test]
    fn display_shows_status_and_location() {
        assert_eq!(resolve("/nope").to_string(), "404 Not Found → /index.php");
    }
}
