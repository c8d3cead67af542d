//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Qie.
//! The Qie project belongs to the Dunimd Team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

//! Filesystem-safe tokens for file and folder names.

/// Characters replaced by an underscore, in addition to the space.
pub const QI_INVALID_CHARS: [char; 9] = ['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Maximum token length in characters.
pub const QI_MAX_TOKEN_LEN: usize = 100;

/// Token returned when nothing survives sanitization.
pub const QI_EMPTY_TOKEN: &str = "empty";

/// Converts an arbitrary string into a filesystem-safe token.
///
/// Invalid characters and spaces become `_`, leading/trailing dots are
/// stripped, every run of underscores collapses to one (leading runs
/// included), and the result is capped at 100 characters. The mapping is
/// total and idempotent.
#[allow(non_snake_case)]
pub fn QiFSanitize(input: &str) -> String {
    let replaced: String = input
        .chars()
        .map(|c| if c == ' ' || QI_INVALID_CHARS.contains(&c) { '_' } else { c })
        .collect();

    let stripped = strip_edges(&replaced);

    let mut collapsed = String::with_capacity(stripped.len());
    let mut prev_underscore = false;
    for c in stripped.chars() {
        if c == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        collapsed.push(c);
    }

    let truncated: String = collapsed.chars().take(QI_MAX_TOKEN_LEN).collect();
    // Truncation can expose a trailing dot.
    let result = strip_edges(&truncated);

    if result.is_empty() {
        QI_EMPTY_TOKEN.to_string()
    } else {
        result.to_string()
    }
}

fn strip_edges(s: &str) -> &str {
    s.trim_matches(|c| c == '.' || c == ' ')
}
