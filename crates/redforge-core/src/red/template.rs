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

//! JSON-pointer editing of template documents.
//!
//! Meshes, morph targets and base materials are too large to model field by
//! field, so they are loaded as plain JSON and patched in place.

use crate::error::RecordError;
use serde::Serialize;
use serde_json::Value;

/// Pointer to the root record of a resource file.
pub const ROOT_CHUNK: &str = "/Data/RootChunk";

/// Resolves `pointer` inside `doc`.
pub fn pointer_mut<'a>(doc: &'a mut Value, pointer: &str) -> Result<&'a mut Value, RecordError> {
    doc.pointer_mut(pointer)
        .ok_or_else(|| RecordError::MissingField(pointer.to_owned()))
}

/// Resolves `pointer` to an array.
pub fn array_mut<'a>(doc: &'a mut Value, pointer: &str) -> Result<&'a mut Vec<Value>, RecordError> {
    pointer_mut(doc, pointer)?
        .as_array_mut()
        .ok_or_else(|| RecordError::WrongKind {
            pointer: pointer.to_owned(),
            expected: "an array",
        })
}

/// Overwrites the existing string at `pointer`.
pub fn set_string(doc: &mut Value, pointer: &str, value: &str) -> Result<(), RecordError> {
    let slot = pointer_mut(doc, pointer)?;
    if !slot.is_string() {
        return Err(RecordError::WrongKind {
            pointer: pointer.to_owned(),
            expected: "a string",
        });
    }
    *slot = Value::String(value.to_owned());
    Ok(())
}

/// Appends `record` to the array at `pointer` and returns the array's new length.
pub fn push_record<T: Serialize>(
    doc: &mut Value,
    pointer: &str,
    record: &T,
) -> Result<usize, RecordError> {
    let value = serde_json::to_value(record).map_err(|e| RecordError::Shape {
        type_name: std::any::type_name::<T>().to_owned(),
        details: e.to_string(),
    })?;
    let array = array_mut(doc, pointer)?;
    array.push(value);
    Ok(array.len())
}

/// Returns the largest numeric `HandleId` anywhere in `doc`, or 0.
pub fn max_handle_id(doc: &Value) -> u64 {
    match doc {
        Value::Object(map) => map
            .iter()
            .map(|(key, value)| {
                let own = if key == "HandleId" {
                    value.as_str().and_then(|s| s.parse().ok()).unwrap_or(0)
                } else {
                    0
                };
                own.max(max_handle_id(value))
            })
            .max()
            .unwrap_or(0),
        Value::Array(items) => items.iter().map(max_handle_id).max().unwrap_or(0),
        _ => 0,
    }
}
