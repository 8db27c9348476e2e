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

//! An in-process [`Converter`] for tests.
//!
//! It records every call and writes the files the real tool would produce,
//! so staleness checks behave as they do against WolvenKit.

use super::{ConvertRequest, Converter, Verbosity};
use crate::error::{ConverterError, FileError};
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

/// A recorded converter invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Call {
    Import(PathBuf),
    Export(PathBuf),
    Pack(Vec<PathBuf>),
    ToJson(PathBuf),
    FromJson(PathBuf),
}

/// A call starting or finishing, in the order the converter observed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The call was entered.
    Started(Call),
    /// The call returned.
    Finished(Call),
}

/// Records calls and fabricates converter output.
#[derive(Debug, Default)]
pub struct RecordingConverter {
    calls: Mutex<Vec<Call>>,
    timeline: Mutex<Vec<Event>>,
    active: AtomicUsize,
    peak: AtomicUsize,
    delay: Option<Duration>,
}

struct ActiveGuard<'a> {
    converter: &'a RecordingConverter,
    call: Call,
}

impl Drop for ActiveGuard<'_> {
    fn drop(&mut self) {
        self.converter.active.fetch_sub(1, Ordering::SeqCst);
        self.converter.record(Event::Finished(self.call.clone()));
    }
}

impl RecordingConverter {
    /// A converter that completes immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// A converter whose every call takes `delay`.
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay: Some(delay),
            ..Self::default()
        }
    }

    /// Every call so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Every start and finish so far, in order.
    pub fn timeline(&self) -> Vec<Event> {
        self.timeline.lock().map(|t| t.clone()).unwrap_or_default()
    }

    /// Forgets recorded calls.
    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
        if let Ok(mut timeline) = self.timeline.lock() {
            timeline.clear();
        }
    }

    fn record(&self, event: Event) {
        if let Ok(mut timeline) = self.timeline.lock() {
            timeline.push(event);
        }
    }

    /// Number of `import`, `convert_to_json` and `convert_from_json` calls.
    pub fn import_and_convert_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Import(_) | Call::ToJson(_) | Call::FromJson(_)))
            .count()
    }

    /// Largest number of calls that were running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    async fn enter(&self, call: Call) -> ActiveGuard<'_> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call.clone());
        }
        let now = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.record(Event::Started(call.clone()));
        let guard = ActiveGuard {
            converter: self,
            call,
        };
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        guard
    }
}

fn write(path: &Path, bytes: &[u8]) -> Result<(), ConverterError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| FileError::io(parent, e))?;
    }
    fs::write(path, bytes).map_err(|e| FileError::io(path, e))?;
    Ok(())
}

fn read(path: &Path) -> Result<Vec<u8>, ConverterError> {
    Ok(fs::read(path).map_err(|e| FileError::io(path, e))?)
}

fn stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[async_trait]
impl Converter for RecordingConverter {
    async fn import(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        let _active = self.enter(Call::Import(request.input.clone())).await;
        let bytes = read(&request.input)?;
        let output = request
            .output_dir
            .join(format!("{}.xbm", stem(&request.input)));
        write(&output, &bytes)
    }

    async fn export(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        let _active = self.enter(Call::Export(request.input.clone())).await;
        let bytes = read(&request.input)?;
        let output = request
            .output_dir
            .join(format!("{}.png", stem(&request.input)));
        write(&output, &bytes)
    }

    async fn pack(
        &self,
        inputs: &[PathBuf],
        output_dir: &Path,
        _verbosity: Option<Verbosity>,
    ) -> Result<(), ConverterError> {
        let _active = self.enter(Call::Pack(inputs.to_vec())).await;
        for input in inputs {
            let output = output_dir.join(format!("{}.archive", file_name(input)));
            write(&output, input.to_string_lossy().as_bytes())?;
        }
        Ok(())
    }

    async fn convert_to_json(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        let _active = self.enter(Call::ToJson(request.input.clone())).await;
        let document = serde_json::json!({
            "Header": { "DataType": "CR2W" },
            "Data": {
                "RootChunk": {
                    "$type": "CBitmapTexture",
                    "setup": { "$type": "STextureGroupSetup", "group": "TEXG_Generic_Color" }
                }
            }
        });
        let text = serde_json::to_string_pretty(&document).map_err(|source| FileError::Json {
            path: request.input.clone(),
            source,
        })?;
        let output = request
            .output_dir
            .join(format!("{}.json", file_name(&request.input)));
        write(&output, text.as_bytes())
    }

    async fn convert_from_json(&self, request: ConvertRequest) -> Result<(), ConverterError> {
        let _active = self.enter(Call::FromJson(request.input.clone())).await;
        let bytes = read(&request.input)?;
        let name = file_name(&request.input);
        let name = name.strip_suffix(".json").unwrap_or(&name);
        let output = request.output_dir.join(name);
        write(&output, &bytes)?;

        // The binary is always strictly newer than the JSON it came from.
        let json_time = fs::metadata(&request.input)
            .and_then(|m| m.modified())
            .map_err(|e| FileError::io(&request.input, e))?;
        fs::File::options()
            .write(true)
            .open(&output)
            .and_then(|f| f.set_modified(json_time + Duration::from_secs(1)))
            .map_err(|e| FileError::io(&output, e))?;
        Ok(())
    }
}
