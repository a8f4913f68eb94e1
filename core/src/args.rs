//! Launcher command-line parsing.
//!
//! The external launcher owns the real argument grammar; this module lifts
//! the raw command line into a case-insensitive key/value map and filters
//! out the flags the launcher parses itself. Both `-key=value` and
//! `-key value` token forms are accepted.

use std::collections::HashMap;
use std::fmt;

/// Leading character marking a flag token.
const FLAG_DELIMITER: char = '-';

/// Launcher-owned flags, never surfaced as custom arguments.
const RESERVED_FLAGS: [&str; 7] = [
    "batchmode",
    "quit",
    "nographics",
    "projectPath",
    "executeMethod",
    "logFile",
    "silent-crashes",
];

// Custom flags recognized by the batch entry point. All of these must carry
// the flag delimiter as the first character on the command line to be read.
/// Target platform for the build.
pub const BUILD_TARGET: &str = "buildTarget";
/// Marketing version stamped on the artifact.
pub const BUILD_VERSION: &str = "buildVersion";
/// Differentiator appended to the artifact name.
pub const BUILD_SUFFIX: &str = "buildSuffix";
/// Source-control revision the build was created from.
pub const COMMIT_HASH: &str = "commitHash";
/// CI job identifier, fallback differentiator when no commit hash is given.
pub const BUILD_ID: &str = "buildId";
/// Base directory the versioned output layout is created under.
pub const BUILD_OUTPUT_PATH: &str = "buildOutputPath";
/// When true, content bundles are generated before the player build.
pub const GENERATE_BUNDLES: &str = "generateAddressables";
/// When true, the build is a development version.
pub const DEVELOPMENT_BUILD: &str = "developmentBuild";

/// Case-insensitive map of custom launcher arguments.
///
/// Parsing is a pure function of the input string: the same command line
/// always yields the same map, and later occurrences of a key overwrite
/// earlier ones.
#[derive(Debug, Clone, Default)]
pub struct LauncherArgs {
    values: HashMap<String, String>,
}

impl LauncherArgs {
    /// Parse the full raw command line.
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.split_whitespace().collect();
        let mut values = HashMap::new();

        let mut i = 0;
        while i < tokens.len() {
            let token = tokens[i];
            if !token.starts_with(FLAG_DELIMITER) {
                i += 1;
                continue;
            }
            let flag = token.trim_start_matches(FLAG_DELIMITER);

            if let Some((key, value)) = flag.split_once('=') {
                if !is_reserved(key) {
                    values.insert(key.to_ascii_lowercase(), value.to_string());
                }
            } else if i + 1 < tokens.len() && !tokens[i + 1].starts_with(FLAG_DELIMITER) {
                // Space-separated form. Reserved flags keep their value token
                // unconsumed; a lone non-flag token is skipped anyway.
                if !is_reserved(flag) {
                    values.insert(flag.to_ascii_lowercase(), tokens[i + 1].to_string());
                    i += 1;
                }
            }
            // A candidate flag with neither form has no recognized value and
            // is dropped.
            i += 1;
        }

        Self { values }
    }

    /// Parse this process's own arguments.
    pub fn from_env() -> Self {
        let raw: Vec<String> = std::env::args().collect();
        Self::parse(&raw.join(" "))
    }

    /// Value for `key`, or the empty string when absent.
    pub fn get(&self, key: &str) -> &str {
        self.values
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Boolean value for `key`. Empty or unparseable input is `false`.
    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).trim().eq_ignore_ascii_case("true")
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Display for LauncherArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut pairs: Vec<_> = self.values.iter().collect();
        pairs.sort_by(|a, b| a.0.cmp(b.0));
        let joined: Vec<String> = pairs.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", joined.join(", "))
    }
}

fn is_reserved(flag: &str) -> bool {
    RESERVED_FLAGS.iter().any(|r| r.eq_ignore_ascii_case(flag))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_and_space_forms_match() {
        let a = LauncherArgs::parse("-buildVersion=1.2.3");
        let b = LauncherArgs::parse("-buildVersion 1.2.3");
        assert_eq!(a.get("buildVersion"), "1.2.3");
        assert_eq!(b.get("buildVersion"), "1.2.3");
    }

    #[test]
    fn test_reparse_is_deterministic() {
        let raw = "-buildTarget Android -buildVersion=1.0.0 -commitHash abc123";
        let a = LauncherArgs::parse(raw);
        let b = LauncherArgs::parse(raw);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let args = LauncherArgs::parse("-BuildVersion=2.0.0");
        assert_eq!(args.get("buildversion"), "2.0.0");
        assert_eq!(args.get("BUILDVERSION"), "2.0.0");
    }

    #[test]
    fn test_last_write_wins() {
        let args = LauncherArgs::parse("-buildSuffix=alpha -buildSuffix=beta");
        assert_eq!(args.get("buildSuffix"), "beta");
    }

    #[test]
    fn test_value_may_contain_equals() {
        let args = LauncherArgs::parse("-buildSuffix=a=b=c");
        assert_eq!(args.get("buildSuffix"), "a=b=c");
    }

    #[test]
    fn test_reserved_flags_excluded_both_forms() {
        let args = LauncherArgs::parse(
            "-batchmode -projectPath /work/game -executeMethod=Builder.Run -buildVersion 1.0.0",
        );
        assert_eq!(args.get("batchmode"), "");
        assert_eq!(args.get("projectPath"), "");
        assert_eq!(args.get("executeMethod"), "");
        assert_eq!(args.get("buildVersion"), "1.0.0");
    }

    #[test]
    fn test_valueless_flag_is_dropped() {
        let args = LauncherArgs::parse("-developmentBuild -buildVersion=1.0.0");
        assert_eq!(args.get("developmentBuild"), "");
        assert!(!args.get_bool("developmentBuild"));
    }

    #[test]
    fn test_non_flag_noise_ignored() {
        let args = LauncherArgs::parse("editor.exe some/path -buildVersion 1.0.0 trailing");
        assert_eq!(args.get("buildVersion"), "1.0.0");
        assert_eq!(args.get("trailing"), "");
    }

    #[test]
    fn test_get_bool_parsing() {
        let args =
            LauncherArgs::parse("-generateAddressables=TRUE -developmentBuild=yes -other=false");
        assert!(args.get_bool("generateAddressables"));
        assert!(!args.get_bool("developmentBuild"));
        assert!(!args.get_bool("other"));
        assert!(!args.get_bool("absent"));
    }

    #[test]
    fn test_double_dash_is_tolerated() {
        let args = LauncherArgs::parse("--buildVersion=3.1.4");
        assert_eq!(args.get("buildVersion"), "3.1.4");
    }

    #[test]
    fn test_empty_input() {
        let args = LauncherArgs::parse("");
        assert!(args.is_empty());
        assert_eq!(args.get("anything"), "");
    }
}
