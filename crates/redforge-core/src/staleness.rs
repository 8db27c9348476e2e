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

//! Decides whether a derived artifact must be regenerated from its inputs.
//!
//! Timestamps are supplied by the caller; this module never touches the
//! filesystem. A `None` timestamp means the file does not exist.

use crate::error::MissingInputError;
use std::path::Path;
use std::time::SystemTime;

/// A file and its modification time, if it exists.
#[derive(Debug, Clone, Copy)]
pub struct Artifact<'a> {
    /// Location of the file.
    pub path: &'a Path,
    /// Modification time, `None` when the file is absent.
    pub modified: Option<SystemTime>,
}

impl<'a> Artifact<'a> {
    /// Describes `path` with the given modification time.
    pub fn new(path: &'a Path, modified: Option<SystemTime>) -> Self {
        Self { path, modified }
    }
}

/// Why an artifact was judged stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
    /// The caller forced regeneration.
    Forced,
    /// The derived artifact does not exist.
    DerivedMissing,
    /// A companion artifact that must exist alongside the derived one is absent.
    SiblingMissing,
    /// The source was modified after the derived artifact.
    SourceNewer,
}

/// Outcome of a staleness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// The derived artifact can be reused.
    UpToDate,
    /// The derived artifact must be regenerated.
    Stale(StaleReason),
}

impl Freshness {
    /// Returns `true` if regeneration is required.
    pub fn is_stale(self) -> bool {
        matches!(self, Freshness::Stale(_))
    }
}

/// Checks `derived` against `source`.
///
/// A missing source is an error even when `force` is set. Equal timestamps
/// count as up to date.
pub fn assess(
    source: Artifact<'_>,
    derived: Artifact<'_>,
    force: bool,
) -> Result<Freshness, MissingInputError> {
    assess_with_siblings(source, derived, &[], force)
}

/// Like [`assess`], but also requires every artifact in `siblings` to exist.
pub fn assess_with_siblings(
    source: Artifact<'_>,
    derived: Artifact<'_>,
    siblings: &[Artifact<'_>],
    force: bool,
) -> Result<Freshness, MissingInputError> {
    let source_time = source
        .modified
        .ok_or_else(|| MissingInputError::new(source.path))?;
    if force {
        return Ok(Freshness::Stale(StaleReason::Forced));
    }
    let Some(derived_time) = derived.modified else {
        return Ok(Freshness::Stale(StaleReason::DerivedMissing));
    };
    if siblings.iter().any(|s| s.modified.is_none()) {
        return Ok(Freshness::Stale(StaleReason::SiblingMissing));
    }
    if source_time > derived_time {
        return Ok(Freshness::Stale(StaleReason::SourceNewer));
    }
    Ok(Freshness::UpToDate)
}

/// Checks `derived` against the newest of several sources.
pub fn assess_many<'a, I>(
    sources: I,
    derived: Artifact<'_>,
    force: bool,
) -> Result<Freshness, MissingInputError>
where
    I: IntoIterator<Item = Artifact<'a>>,
{
    let mut newest: Option<(Artifact<'a>, SystemTime)> = None;
    for source in sources {
        let time = source
            .modified
            .ok_or_else(|| MissingInputError::new(source.path))?;
        if newest.map_or(true, |(_, n)| time > n) {
            newest = Some((source, time));
        }
    }
    match newest {
        Some((source, _)) => assess(source, derived, force),
        None if force => Ok(Freshness::Stale(StaleReason::Forced)),
        None => Ok(Freshness::UpToDate),
    }
}

/// What to do with a payload about to be persisted and compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadDecision {
    /// Content is unchanged and the compiled file is newer: nothing to do.
    Skip,
    /// Write the payload and run the converter.
    WriteAndImport,
}

/// Content-addressed check for a JSON payload.
///
/// Textual equality is compared first. Only when the content is unchanged are
/// timestamps consulted, and then the compiled file must be strictly newer
/// than the persisted JSON for the import to be skipped.
pub fn assess_payload(
    persisted: Option<&str>,
    payload: &str,
    persisted_modified: Option<SystemTime>,
    compiled_modified: Option<SystemTime>,
    force: bool,
) -> PayloadDecision {
    if force || persisted != Some(payload) {
        return PayloadDecision::WriteAndImport;
    }
    match (compiled_modified, persisted_modified) {
        (Some(compiled), Some(json)) if compiled > json => PayloadDecision::Skip,
        _ => PayloadDecision::WriteAndImport,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn at(secs: u64) -> Option<SystemTime> {
        Some(SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    fn src(modified: Option<SystemTime>) -> Artifact<'static> {
        Artifact::new(Path::new("in.png"), modified)
    }

    fn out(modified: Option<SystemTime>) -> Artifact<'static> {
        Artifact::new(Path::new("out.xbm"), modified)
    }

    #[test]
    fn missing_derived_is_always_stale() {
        for t in [0, 10, 1_000_000] {
            let result = assess(src(at(t)), out(None), false).unwrap();
            assert_eq!(result, Freshness::Stale(StaleReason::DerivedMissing));
        }
    }

    #[test]
    fn equal_timestamps_are_up_to_date() {
        assert_eq!(assess(src(at(5)), out(at(5)), false).unwrap(), Freshness::UpToDate);
        assert!(assess(src(at(6)), out(at(5)), false).unwrap().is_stale());
        assert!(!assess(src(at(4)), out(at(5)), false).unwrap().is_stale());
    }

    #[test]
    fn force_overrides_comparison_but_not_missing_source() {
        assert_eq!(
            assess(src(at(1)), out(at(9)), true).unwrap(),
            Freshness::Stale(StaleReason::Forced)
        );
        let err = assess(src(None), out(at(9)), true).unwrap_err();
        assert_eq!(err.path, Path::new("in.png"));
    }

    #[test]
    fn missing_sibling_is_stale() {
        let sibling = Artifact::new(Path::new("out.json"), None);
        assert_eq!(
            assess_with_siblings(src(at(1)), out(at(9)), &[sibling], false).unwrap(),
            Freshness::Stale(StaleReason::SiblingMissing)
        );
    }

    #[test]
    fn newest_of_many_sources_wins() {
        let sources = [src(at(3)), src(at(8)), src(at(5))];
        assert!(assess_many(sources, out(at(7)), false).unwrap().is_stale());
        assert!(!assess_many(sources, out(at(8)), false).unwrap().is_stale());
    }

    #[test]
    fn unchanged_payload_skips_only_when_compiled_is_newer() {
        let text = "{}";
        assert_eq!(
            assess_payload(Some(text), text, at(5), at(6), false),
            PayloadDecision::Skip
        );
        assert_eq!(
            assess_payload(Some(text), text, at(5), at(5), false),
            PayloadDecision::WriteAndImport
        );
        assert_eq!(
            assess_payload(Some("{ }"), text, at(5), at(6), false),
            PayloadDecision::WriteAndImport
        );
        assert_eq!(
            assess_payload(None, text, None, None, false),
            PayloadDecision::WriteAndImport
        );
        assert_eq!(
            assess_payload(Some(text), text, at(5), at(6), true),
            PayloadDecision::WriteAndImport
        );
    }
}
