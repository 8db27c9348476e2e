// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Helpers for the two path dialects of a project: native filesystem paths
//! and backslash-separated depot paths.

use std::path::{Path, PathBuf};

/// Separator of depot paths inside archives.
pub const DEPOT_SEPARATOR: char = '\\';

/// Splits a relative path written with `\` or `/` into its components.
pub fn components(relative: &str) -> impl Iterator<Item = &str> {
    relative
        .split(['\\', '/'])
        .filter(|part| !part.is_empty() && *part != ".")
}

/// Appends a relative path of either dialect to a native base path.
pub fn join_native(base: &Path, relative: &str) -> PathBuf {
    let mut path = base.to_path_buf();
    path.extend(components(relative));
    path
}

/// Joins depot path fragments with backslashes, normalizing any forward slashes.
pub fn join_depot<'a, I>(parts: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let mut out = String::new();
    for part in parts.into_iter().flat_map(components) {
        if !out.is_empty() {
            out.push(DEPOT_SEPARATOR);
        }
        out.push_str(part);
    }
    out
}

/// `relative` without the extension of its last component.
pub fn strip_extension(relative: &str) -> &str {
    let name_start = relative.rfind(['\\', '/']).map_or(0, |i| i + 1);
    match relative[name_start..].rfind('.') {
        Some(dot) if dot > 0 => &relative[..name_start + dot],
        _ => relative,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_separators_are_accepted() {
        let parts: Vec<_> = components("textures/a\\b.xbm").collect();
        assert_eq!(parts, ["textures", "a", "b.xbm"]);
        assert_eq!(
            join_native(Path::new("root"), "textures\\b.xbm"),
            Path::new("root").join("textures").join("b.xbm")
        );
    }

    #[test]
    fn depot_paths_use_backslashes() {
        assert_eq!(
            join_depot(["base\\axefrog\\xf", "textures/t1.xbm"]),
            "base\\axefrog\\xf\\textures\\t1.xbm"
        );
        assert_eq!(join_depot(["", "x.mesh"]), "x.mesh");
    }

    #[test]
    fn extension_is_removed_from_last_component_only() {
        assert_eq!(strip_extension("textures\\t1.xbm"), "textures\\t1");
        assert_eq!(strip_extension("a.b\\noext"), "a.b\\noext");
        assert_eq!(strip_extension("x.morphtarget"), "x");
    }
}
