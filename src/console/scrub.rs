// SPDX-License-Identifier: MPL-2.0
//! Removal of file system paths from captured console messages.

use std::sync::LazyLock;

use regex::Regex;

/// Directory prefixes that usually lead into user data.
const UNIX_ROOTS: [&str; 6] = ["/home/", "/Users/", "/tmp/", "/var/", "/private/", "/data/"];

static PATH_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    // A path runs until whitespace, a quote, or a bracket.
    let tail = r#"[^\s"'()\[\]{}]+"#;
    let mut alternatives: Vec<String> = UNIX_ROOTS
        .iter()
        .map(|root| format!("{}{tail}", regex::escape(root)))
        .collect();
    alternatives.push(format!("~/{tail}"));
    alternatives.push(format!(r"[A-Za-z]:\\{tail}"));
    alternatives.push(format!(r"\\\\{tail}"));
    alternatives.push(format!("file://{tail}"));
    Regex::new(&alternatives.join("|")).expect("path pattern should compile")
});

/// Replaces file system paths in `message` with `<path>`.
#[must_use]
pub fn scrub_paths(message: &str) -> String {
    PATH_PATTERN.replace_all(message, "<path>").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrubs_unix_home_paths() {
        assert_eq!(
            scrub_paths("cannot open /home/ana/notes.txt"),
            "cannot open <path>"
        );
        assert_eq!(scrub_paths("at /Users/bo/app/main.js:10"), "at <path>");
    }

    #[test]
    fn scrubs_windows_and_unc_paths() {
        assert_eq!(scrub_paths(r"read C:\Users\cy\a.txt"), "read <path>");
        assert_eq!(scrub_paths(r"mount \\server\share\x"), "mount <path>");
    }

    #[test]
    fn scrubs_home_shortcut_and_file_urls() {
        assert_eq!(scrub_paths("see ~/.config/app.toml"), "see <path>");
        assert_eq!(
            scrub_paths("load file:///var/mobile/app/bundle.js failed"),
            "load <path> failed"
        );
    }

    #[test]
    fn keeps_quotes_around_paths() {
        assert_eq!(
            scrub_paths("file \"/tmp/upload.png\" missing"),
            "file \"<path>\" missing"
        );
    }

    #[test]
    fn leaves_plain_messages_alone() {
        assert_eq!(scrub_paths("GET /api/users 200"), "GET /api/users 200");
        assert_eq!(scrub_paths(""), "");
    }
}
