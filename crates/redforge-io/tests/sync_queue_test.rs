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

use anyhow::Result;
use redforge_core::config::{UserConfig, UserConfigData};
use redforge_io::converter::fake::{Call, RecordingConverter};
use redforge_io::{Project, QueueError, SyncQueue};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

fn open_project(root: &Path, converter: Arc<RecordingConverter>) -> Result<Project> {
    let yaml = format!(
        "projectsDir: {}\nmodderName: xf\nprojects:\n  demo:\n    label: Demo\n",
        root.display()
    );
    let data: UserConfigData = serde_yaml::from_str(&yaml)?;
    Ok(Project::new(UserConfig::new(data), "demo", converter)?)
}

#[tokio::test]
async fn test_queue_never_exceeds_its_limit() -> Result<()> {
    // --- 1. Setup ---
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::with_delay(Duration::from_millis(20)));
    let project = open_project(dir.path(), converter.clone())?;
    let queue = SyncQueue::new(3);

    // --- 2. Burst of synchronous appends ---
    for i in 0..12 {
        let file = project.file(&format!("materials\\m{i}.mi"));
        queue.enqueue(file, Some(format!("{{\"n\": {i}}}")), false)?;
        assert!(queue.in_flight() <= 3);
    }
    queue.done();
    queue.all_saved().await?;

    // --- 3. Assertions ---
    assert_eq!(queue.completed(), 12);
    assert_eq!(queue.in_flight(), 0);
    assert!(converter.peak_concurrency() <= 3);
    assert!(converter.peak_concurrency() >= 2);
    assert_eq!(converter.import_and_convert_count(), 12);
    for i in 0..12 {
        assert!(project.file(&format!("materials\\m{i}.mi")).cr2w_path().exists());
    }
    Ok(())
}

#[tokio::test]
async fn test_enqueue_after_done_fails() -> Result<()> {
    let dir = tempdir()?;
    let project = open_project(dir.path(), Arc::new(RecordingConverter::new()))?;
    let queue = SyncQueue::default();

    queue.done();
    let err = queue
        .enqueue(project.file("a.app"), Some("{}".to_owned()), false)
        .unwrap_err();
    assert!(matches!(err, QueueError::Closed));

    // Repeated waits observe the same resolution.
    queue.all_saved().await?;
    queue.all_saved().await?;
    Ok(())
}

#[tokio::test]
async fn test_all_saved_reports_a_failed_job() -> Result<()> {
    // --- 1. Setup: a payload-less entry whose JSON does not exist ---
    let dir = tempdir()?;
    let project = open_project(dir.path(), Arc::new(RecordingConverter::new()))?;
    let queue = SyncQueue::default();

    // --- 2. Act ---
    queue.enqueue(project.file("missing.mi"), None, false)?;
    queue.enqueue(project.file("present.mi"), Some("{}".to_owned()), false)?;
    queue.done();
    let result = queue.all_saved().await;

    // --- 3. Assertions ---
    match result {
        Err(QueueError::Job { path, .. }) => assert!(path.ends_with("missing.mi")),
        other => panic!("expected a job failure, got {other:?}"),
    }
    assert_eq!(queue.completed(), 2);
    assert!(project.file("present.mi").cr2w_path().exists());
    Ok(())
}

#[tokio::test]
async fn test_payload_entries_are_skipped_when_unchanged() -> Result<()> {
    // --- 1. First pass writes and imports ---
    let dir = tempdir()?;
    let converter = Arc::new(RecordingConverter::new());
    let project = open_project(dir.path(), converter.clone())?;
    let file = project.file("variants\\v.app");

    let first = SyncQueue::default();
    first.enqueue(file.clone(), Some("{\"a\": 1}".to_owned()), false)?;
    first.done();
    first.all_saved().await?;
    converter.clear();

    // --- 2. Second pass with identical content ---
    let second = SyncQueue::default();
    second.enqueue(file.clone(), Some("{\"a\": 1}".to_owned()), false)?;
    second.done();
    second.all_saved().await?;
    assert!(converter.calls().is_empty());

    // --- 3. Forcing imports again ---
    let forced = SyncQueue::default();
    forced.enqueue(file.clone(), Some("{\"a\": 1}".to_owned()), true)?;
    forced.done();
    forced.all_saved().await?;
    assert_eq!(
        converter.calls(),
        vec![Call::FromJson(file.json_path().to_path_buf())]
    );
    Ok(())
}
