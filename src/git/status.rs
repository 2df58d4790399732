// repo-publish: publish a local project directory to GitHub
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Working tree state derived from `git status --porcelain`.

use serde::Serialize;

/// Snapshot of the repository taken before the commit gate.
///
/// Stale after any mutating step; take a new one rather than reusing it
/// across a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepositoryState {
    pub is_version_controlled: bool,
    pub has_uncommitted_changes: bool,
    pub changed_paths: Vec<String>,
    pub has_any_commit: bool,
}

impl RepositoryState {
    /// Build the state from porcelain status output.
    #[must_use]
    pub fn from_porcelain(is_version_controlled: bool, has_any_commit: bool, porcelain: &str) -> Self {
        let changed_paths = parse_porcelain(porcelain);
        Self {
            is_version_controlled,
            has_uncommitted_changes: !changed_paths.is_empty(),
            changed_paths,
            has_any_commit,
        }
    }
}

/// Extract the paths from porcelain v1 status lines, in order.
///
/// ```text
/// " M src/lib.rs"          --> "src/lib.rs"
/// "?? notes.txt"           --> "notes.txt"
/// "R  old.rs -> new.rs"    --> "new.rs"
/// "?? \"with space.txt\""  --> "with space.txt"
/// "?? \"tab\\there\""      --> "tab<TAB>here"
/// ```
#[must_use]
pub fn parse_porcelain(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.get(3..))
        .map(|path| path.rsplit_once(" -> ").map_or(path, |(_, to)| to))
        .map(|path| unquote(path.trim_end()))
        .filter(|path| !path.is_empty())
        .collect()
}

/// Undo git's C-style quoting of a path.
///
/// Octal escapes are raw bytes, so a multi-byte character arrives as
/// several of them and is only decoded once the whole path is collected.
fn unquote(path: &str) -> String {
    let Some(inner) = path.strip_prefix('"').and_then(|p| p.strip_suffix('"')) else {
        return path.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let Some((&escape, tail)) = rest.split_first() else {
            bytes.push(b'\\');
            break;
        };
        rest = tail;
        match escape {
            b'a' => bytes.push(0x07),
            b'b' => bytes.push(0x08),
            b't' => bytes.push(b'\t'),
            b'n' => bytes.push(b'\n'),
            b'v' => bytes.push(0x0b),
            b'f' => bytes.push(0x0c),
            b'r' => bytes.push(b'\r'),
            b'0'..=b'3' => {
                let digits = rest.iter().take(2).take_while(|d| matches!(d, b'0'..=b'7')).count();
                let value = std::iter::once(&escape)
                    .chain(&rest[..digits])
                    .fold(0u8, |acc, d| (acc << 3) | (d - b'0'));
                rest = &rest[digits..];
                bytes.push(value);
            }
            other => bytes.push(other),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
