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

use std::path::Path;
use std::path::PathBuf;

use cardmine_core::CardSink;
use cardmine_core::Fallible;

use crate::anki::AnkiSink;
use crate::cmd::load_ledger;

/// Rebuild a complete deck package from every record in the ledger.
///
/// Unlike the incremental sync during mining, this ignores the card
/// watermark, so the resulting package always contains the full collection.
/// The ledger itself is not touched.
pub fn export_deck(ledger_path: &Path, output: PathBuf, deck_name: &str) -> Fallible<()> {
    let ledger = load_ledger(ledger_path)?;
    let mut sink = AnkiSink::new(deck_name, output);
    for record in &ledger.records {
        sink.add_card(
            &record.question,
            &record.answer,
            &record.page_number.to_string(),
        )?;
    }
    sink.flush()?;
    println!("Exported {} cards.", ledger.records.len());
    Ok(())
}
