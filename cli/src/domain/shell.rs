//! Building command lines for the remote POSIX shell.
//!
//! `ssh` hands its command string to the login shell on the host, so every
//! word that comes from configuration or user input is quoted here.

use std::borrow::Cow;

fn is_safe(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '/' | '=' | ':' | '@' | '%' | '+' | ',')
}

/// Quote `word` so the shell reads it back as a single literal argument.
#[must_use]
pub fn quote(word: &str) -> Cow<'_, str> {
    if !word.is_empty() && word.chars().all(is_safe) {
        return Cow::Borrowed(word);
    }
    Cow::Owned(format!("'{}'", word.replace('\'', r"'\''")))
}

/// Quote and join words into one command line.
#[must_use]
pub fn join(words: &[&str]) -> String {
    words
        .iter()
        .map(|w| quote(w))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prefix `command` with a `cd` into `dir`.
#[must_use]
pub fn in_dir(dir: Option<&str>, command: &str) -> String {
    match dir {
        Some(dir) => format!("cd {} && {command}", quote(dir)),
        None => command.to_string(),
    }
}

/// Wrap `command` so it runs as root under a login bash.
///
/// `-n` makes sudo fail instead of prompting; password prompts are not
/// supported over the batch-mode ssh connection.
#[must_use]
pub fn sudo(dir: Option<&str>, command: &str) -> String {
    format!("sudo -n bash -l -c {}", quote(&in_dir(dir, command)))
}
