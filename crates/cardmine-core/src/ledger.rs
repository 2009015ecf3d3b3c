// Copyright 2025 Fernando Borretti
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

use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use log::warn;
use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::record::QaRecord;
use crate::types::timestamp::Timestamp;

/// Resume metadata stored alongside the records.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct LedgerMetadata {
    /// The last page that completed processing. The next run resumes at the
    /// page after this one. Monotonically non-decreasing.
    pub last_processed_page: i64,
    /// Number of pages that yielded at least one Q&A pair.
    pub total_pages_processed: u64,
    /// Always equal to the number of records.
    pub total_questions: u64,
    /// Stamped on every persist.
    pub last_update: Timestamp,
    /// Index of the last record materialized as a flashcard, or -1 if none.
    /// Monotonically non-decreasing.
    pub last_card_watermark: i64,
}

/// The durable record of all extracted Q&A pairs plus resume metadata.
///
/// The ledger is created once per target file and loaded on every subsequent
/// run. Records are append-only; their identity is their index.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct Ledger {
    pub metadata: LedgerMetadata,
    pub records: Vec<QaRecord>,
}

impl Ledger {
    /// A fresh ledger with no records. `start_page_offset` seeds
    /// `last_processed_page`, so that processing starts at the page after it.
    pub fn fresh(start_page_offset: i64) -> Self {
        Ledger {
            metadata: LedgerMetadata {
                last_processed_page: start_page_offset,
                total_pages_processed: 0,
                total_questions: 0,
                last_update: Timestamp::epoch(),
                last_card_watermark: -1,
            },
            records: Vec::new(),
        }
    }

    /// Load the ledger at `path`, or initialize a fresh one.
    ///
    /// A file that exists but fails to parse is treated as a load failure:
    /// a warning is logged and a fresh ledger replaces it. Accepting that
    /// data loss beats crashing on a half-written file from an older,
    /// non-atomic writer.
    pub fn open_or_init(path: &Path, start_page_offset: i64) -> Fallible<Ledger> {
        match fs::read_to_string(path) {
            Ok(text) => match serde_json::from_str::<Ledger>(&text) {
                Ok(ledger) => return Ok(ledger),
                Err(e) => {
                    warn!(
                        "Ledger at {} is unreadable ({e}), starting fresh.",
                        path.display()
                    );
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        let mut ledger = Ledger::fresh(start_page_offset);
        ledger.persist(path)?;
        Ok(ledger)
    }

    /// Append records in order and update the question count. The card
    /// watermark is untouched: materialization is a separate step.
    pub fn append(&mut self, records: impl IntoIterator<Item = QaRecord>) {
        self.records.extend(records);
        self.metadata.total_questions = self.records.len() as u64;
    }

    /// Serialize the ledger to `path`, stamping `last_update`.
    ///
    /// The write is atomic: the JSON goes to a temporary file which is then
    /// renamed over the target, so a process killed mid-write never leaves a
    /// truncated ledger behind.
    pub fn persist(&mut self, path: &Path) -> Fallible<()> {
        debug_assert_eq!(self.metadata.total_questions as usize, self.records.len());
        debug_assert!(self.metadata.last_card_watermark < self.records.len() as i64);
        self.metadata.last_update = Timestamp::now();
        let json = serde_json::to_string_pretty(self)?;
        let tmp_path = tmp_path(path);
        fs::write(&tmp_path, json)?;
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut os_string = path.as_os_str().to_owned();
    os_string.push(".tmp");
    PathBuf::from(os_string)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn record(n: u32) -> QaRecord {
        QaRecord {
            question: format!("question {n}"),
            answer: format!("answer {n}"),
            page_number: n,
            part_number: 1,
        }
    }

    #[test]
    fn test_init_writes_seeded_ledger() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.json");
        let ledger = Ledger::open_or_init(&path, 9)?;
        assert_eq!(ledger.metadata.last_processed_page, 9);
        assert_eq!(ledger.metadata.total_questions, 0);
        assert_eq!(ledger.metadata.last_card_watermark, -1);
        assert!(ledger.records.is_empty());
        assert!(path.exists());
        Ok(())
    }

    #[test]
    fn test_round_trip() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.json");
        let mut ledger = Ledger::fresh(-1);
        ledger.append([record(0), record(1)]);
        ledger.metadata.last_processed_page = 1;
        ledger.persist(&path)?;
        let reloaded = Ledger::open_or_init(&path, -1)?;
        assert_eq!(reloaded, ledger);
        Ok(())
    }

    #[test]
    fn test_corrupt_file_is_replaced() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.json");
        fs::write(&path, "{ not json")?;
        let ledger = Ledger::open_or_init(&path, 4)?;
        assert_eq!(ledger.metadata.last_processed_page, 4);
        assert!(ledger.records.is_empty());
        // The corrupt file was overwritten with the fresh ledger.
        let reloaded = Ledger::open_or_init(&path, 0)?;
        assert_eq!(reloaded.metadata.last_processed_page, 4);
        Ok(())
    }

    #[test]
    fn test_append_updates_count_but_not_watermark() {
        let mut ledger = Ledger::fresh(-1);
        ledger.append([record(0)]);
        ledger.append([record(1), record(2)]);
        assert_eq!(ledger.metadata.total_questions, 3);
        assert_eq!(ledger.records.len(), 3);
        assert_eq!(ledger.metadata.last_card_watermark, -1);
    }

    #[test]
    fn test_persist_leaves_no_temporary_file() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.json");
        let mut ledger = Ledger::fresh(-1);
        ledger.persist(&path)?;
        assert!(path.exists());
        assert!(!tmp_path(&path).exists());
        Ok(())
    }

    #[test]
    fn test_failed_persist_leaves_prior_file_intact() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.json");
        let mut ledger = Ledger::fresh(-1);
        ledger.append([record(0)]);
        ledger.persist(&path)?;
        let persisted = ledger.clone();
        // Occupy the temporary path with a directory so the next write fails
        // partway, as a crash mid-persist would.
        fs::create_dir(tmp_path(&path))?;
        ledger.append([record(1)]);
        assert!(ledger.persist(&path).is_err());
        let reloaded = Ledger::open_or_init(&path, -1)?;
        assert_eq!(reloaded, persisted);
        Ok(())
    }

    #[test]
    fn test_persist_stamps_last_update() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("ledger.json");
        let mut ledger = Ledger::fresh(-1);
        assert_eq!(ledger.metadata.last_update, Timestamp::epoch());
        ledger.persist(&path)?;
        assert_ne!(ledger.metadata.last_update, Timestamp::epoch());
        Ok(())
    }
}
