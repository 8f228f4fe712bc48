//! Launch-path validation, one rule per channel type.
//!
//! Pure functions: no I/O, nothing checks that a path actually exists.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::channel::ChannelType;

pub const MSG_URL_UNPARSEABLE: &str = "Please enter a valid URL (e.g., https://example.com)";
pub const MSG_URL_SCHEME: &str = "Please enter a valid HTTP or HTTPS URL";
pub const MSG_STEAM: &str = "Please enter a valid Steam URI (e.g., steam://rungameid/252950)";
pub const MSG_EPIC: &str = "Please enter a valid Epic Games URI (e.g., com.epicgames.launcher://apps/Fortnite?action=launch&silent=true)";
pub const MSG_MICROSOFT_STORE: &str =
    "Please enter a valid Microsoft Store AppID (e.g., Microsoft.WindowsCalculator_8wekyb3d8bbwe!App)";
pub const MSG_EXE: &str = "Please enter a path to an .exe file (arguments may follow) or a network path starting with \\\\";

const STEAM_PREFIX: &str = "steam://";
const EPIC_PREFIX: &str = "com.epicgames.launcher://apps/";
const UNC_PREFIX: &str = "\\\\";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Ok,
    Invalid { reason: &'static str },
}

impl Validation {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn reason(&self) -> Option<&'static str> {
        match self {
            Self::Ok => None,
            Self::Invalid { reason } => Some(reason),
        }
    }
}

/// A rule checks the trimmed, non-empty path.
type Rule = fn(&str) -> Validation;

fn rule_for(kind: ChannelType) -> Rule {
    match kind {
        ChannelType::Url => check_url,
        ChannelType::Steam => check_steam,
        ChannelType::Epic => check_epic,
        ChannelType::MicrosoftStore => check_microsoft_store,
        ChannelType::Exe => check_exe,
    }
}

/// Validate `raw` as a launch target for `kind`.  Empty (after trimming) is
/// always valid; emptiness is handled by the store, not the validator.
pub fn validate(kind: ChannelType, raw: &str) -> Validation {
    let path = raw.trim();
    if path.is_empty() {
        return Validation::Ok;
    }
    rule_for(kind)(path)
}

fn check(ok: bool, reason: &'static str) -> Validation {
    if ok {
        Validation::Ok
    } else {
        Validation::Invalid { reason }
    }
}

fn check_url(path: &str) -> Validation {
    match Url::parse(path) {
        Ok(url) => check(
            matches!(url.scheme(), "http" | "https"),
            MSG_URL_SCHEME,
        ),
        Err(_) => Validation::Invalid {
            reason: MSG_URL_UNPARSEABLE,
        },
    }
}

fn check_steam(path: &str) -> Validation {
    check(path.starts_with(STEAM_PREFIX), MSG_STEAM)
}

fn check_epic(path: &str) -> Validation {
    check(path.starts_with(EPIC_PREFIX), MSG_EPIC)
}

fn check_microsoft_store(path: &str) -> Validation {
    check(path.contains('!'), MSG_MICROSOFT_STORE)
}

fn check_exe(path: &str) -> Validation {
    check(path.starts_with(UNC_PREFIX) || is_exe_command(path), MSG_EXE)
}

/// Compiled once; validation runs on every keystroke in the editor.
fn exe_command_regex() -> Option<&'static Regex> {
    static EXE_COMMAND_RE: OnceLock<Option<Regex>> = OnceLock::new();
    EXE_COMMAND_RE
        .get_or_init(|| Regex::new(r"(?i)\.exe(\s.*)?$").ok())
        .as_ref()
}

/// `….exe`, optionally followed by whitespace-separated arguments.
fn is_exe_command(path: &str) -> bool {
    exe_command_regex().is_some_and(|re| re.is_match(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exe_pattern_is_built_once() {
        let first = exe_command_regex().unwrap();
        assert!(is_exe_command("C:\\Games\\App.EXE -windowed"));
        assert!(!is_exe_command("C:\\Games\\App.exe.bak"));
        assert!(std::ptr::eq(first, exe_command_regex().unwrap()));
    }

    fn reason(kind: ChannelType, raw: &str) -> Option<&'static str> {
        validate(kind, raw).reason()
    }

    #[test]
    fn test_empty_is_valid_for_every_type() {
        for kind in ChannelType::ALL {
            assert!(validate(kind, "").is_ok());
            assert!(validate(kind, "   \t").is_ok());
        }
    }

    #[test]
    fn test_url_rules() {
        assert!(validate(ChannelType::Url, "https://example.com").is_ok());
        assert!(validate(ChannelType::Url, "  http://example.com/path?q=1  ").is_ok());
        assert_eq!(reason(ChannelType::Url, "ftp://x"), Some(MSG_URL_SCHEME));
        assert_eq!(reason(ChannelType::Url, "example.com"), Some(MSG_URL_UNPARSEABLE));
        assert_eq!(
            MSG_URL_UNPARSEABLE,
            "Please enter a valid URL (e.g., https://example.com)"
        );
        assert_eq!(MSG_URL_SCHEME, "Please enter a valid HTTP or HTTPS URL");
    }

    #[test]
    fn test_steam_rules() {
        assert!(validate(ChannelType::Steam, "steam://rungameid/252950").is_ok());
        assert_eq!(
            reason(ChannelType::Steam, "252950"),
            Some("Please enter a valid Steam URI (e.g., steam://rungameid/252950)")
        );
    }

    #[test]
    fn test_epic_rules() {
        assert!(validate(
            ChannelType::Epic,
            "com.epicgames.launcher://apps/Fortnite?action=launch&silent=true"
        )
        .is_ok());
        assert_eq!(
            reason(ChannelType::Epic, "com.epicgames.launcher://store/x"),
            Some("Please enter a valid Epic Games URI (e.g., com.epicgames.launcher://apps/Fortnite?action=launch&silent=true)")
        );
    }

    #[test]
    fn test_microsoft_store_rules() {
        assert!(validate(
            ChannelType::MicrosoftStore,
            "Microsoft.WindowsCalculator_8wekyb3d8bbwe!App"
        )
        .is_ok());
        assert_eq!(
            reason(ChannelType::MicrosoftStore, "Microsoft.WindowsCalculator"),
            Some("Please enter a valid Microsoft Store AppID (e.g., Microsoft.WindowsCalculator_8wekyb3d8bbwe!App)")
        );
    }

    #[test]
    fn test_exe_rules() {
        assert!(validate(ChannelType::Exe, "C:\\Games\\App.exe --fullscreen").is_ok());
        assert!(validate(ChannelType::Exe, "C:\\Games\\APP.EXE").is_ok());
        assert!(validate(ChannelType::Exe, "\\\\server\\share\\tool").is_ok());
        assert_eq!(
            reason(ChannelType::Exe, "C:\\Games\\App"),
            Some("Please enter a path to an .exe file (arguments may follow) or a network path starting with \\\\")
        );
        assert!(!validate(ChannelType::Exe, "C:\\Games\\App.exe.bak").is_ok());
        assert!(!validate(ChannelType::Exe, "C:\\Games\\notanexe").is_ok());
    }
}
