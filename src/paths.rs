//! Environment variable expansion in input paths.

use std::env;
use std::path::{Path, PathBuf};

/// Expands `$VAR` and `${VAR}` references in `path` from the process
/// environment. Unknown variables are left as written.
pub fn expand_env(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) if s.contains('$') => PathBuf::from(expand_with(s, |name| env::var(name).ok())),
        _ => path.to_path_buf(),
    }
}

/// Expands variable references in `input` using `lookup`.
pub fn expand_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let (name, raw_len) = if let Some(braced) = after.strip_prefix('{') {
            match braced.find('}') {
                Some(end) => (&braced[..end], end + 2),
                None => ("", 0),
            }
        } else {
            let end = after
                .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                .unwrap_or(after.len());
            (&after[..end], end)
        };
        let raw = &rest[pos..pos + 1 + raw_len];
        match lookup(name) {
            Some(value) if !name.is_empty() => out.push_str(&value),
            _ => out.push_str(raw),
        }
        rest = &rest[pos + 1 + raw_len..];
    }
    out.push_str(rest);
    out
}
