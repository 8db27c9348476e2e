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

//! The JSON envelope WolvenKit wraps around every serialized resource.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// WolvenKit build that produced the envelope layout.
pub const WOLVENKIT_VERSION: &str = "8.16.2-nightly.2025-04-27";
/// Version of WolvenKit's JSON projection.
pub const WKIT_JSON_VERSION: &str = "0.0.9";
/// Game build the resources target.
pub const GAME_VERSION: u32 = 2200;
/// CR2W format version.
pub const DATA_VERSION: u32 = 195;

/// Provenance fields of a serialized resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct FileHeader {
    pub wolven_kit_version: String,
    #[serde(rename = "WKitJsonVersion")]
    pub wkit_json_version: String,
    pub game_version: u32,
    pub exported_date_time: String,
    pub data_type: String,
    pub archive_file_name: String,
}

impl Default for FileHeader {
    fn default() -> Self {
        Self {
            wolven_kit_version: WOLVENKIT_VERSION.to_owned(),
            wkit_json_version: WKIT_JSON_VERSION.to_owned(),
            game_version: GAME_VERSION,
            // Left empty so regenerated files stay byte-identical.
            exported_date_time: String::new(),
            data_type: "CR2W".to_owned(),
            archive_file_name: String::new(),
        }
    }
}

/// Body of a serialized resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
#[allow(missing_docs)]
pub struct FileData<T> {
    pub version: u32,
    pub build_version: u32,
    pub root_chunk: T,
    pub embedded_files: Vec<Value>,
}

/// A complete `.json` resource file with root record `T`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedEngineFile<T> {
    /// Provenance.
    #[serde(rename = "Header")]
    pub header: FileHeader,
    /// Payload.
    #[serde(rename = "Data")]
    pub data: FileData<T>,
}

impl<T> RedEngineFile<T> {
    /// Wraps `root` in a default envelope.
    pub fn new(root: T) -> Self {
        Self {
            header: FileHeader::default(),
            data: FileData {
                version: DATA_VERSION,
                build_version: 0,
                root_chunk: root,
                embedded_files: Vec::new(),
            },
        }
    }

    /// The root record.
    pub fn root(&self) -> &T {
        &self.data.root_chunk
    }

    /// Mutable access to the root record.
    pub fn root_mut(&mut self) -> &mut T {
        &mut self.data.root_chunk
    }
}

impl<T: Serialize> RedEngineFile<T> {
    /// Serializes with two-space indentation, the layout WolvenKit writes.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn envelope_layout() {
        let file = RedEngineFile::new(json!({ "$type": "Dummy" }));
        let value = serde_json::to_value(&file).unwrap();
        assert_eq!(value["Header"]["WolvenKitVersion"], json!(WOLVENKIT_VERSION));
        assert_eq!(value["Header"]["WKitJsonVersion"], json!("0.0.9"));
        assert_eq!(value["Header"]["DataType"], json!("CR2W"));
        assert_eq!(value["Data"]["Version"], json!(195));
        assert_eq!(value["Data"]["RootChunk"]["$type"], json!("Dummy"));
        assert_eq!(value["Data"]["EmbeddedFiles"], json!([]));
    }

    #[test]
    fn pretty_output_uses_two_spaces() {
        let text = RedEngineFile::new(1).to_json_pretty().unwrap();
        assert!(text.starts_with("{\n  \"Header\": {\n    \"WolvenKitVersion\""));
    }
}
