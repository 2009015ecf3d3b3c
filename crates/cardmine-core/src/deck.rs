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

use crate::error::Fallible;
use crate::ledger::Ledger;

/// The interface the pipeline needs from a flashcard deck backend.
///
/// The production implementation packages an Anki deck; tests substitute an
/// in-memory fake.
pub trait CardSink {
    /// Add one card rendering a single ledger record. `page` is the page
    /// number as display text.
    fn add_card(&mut self, question: &str, answer: &str, page: &str) -> Fallible<()>;

    /// Write the deck package out to its destination file. The caller only
    /// invokes this when new cards were added, to avoid redundant writes.
    fn flush(&mut self) -> Fallible<()>;
}

/// Create cards for every ledger record past the card watermark, advancing
/// the watermark as each card is added. Returns the number of cards added.
///
/// Calling this again without new records is a no-op, which is what makes
/// deck synchronization idempotent across runs: the deck is rebuilt fresh
/// each run, and the watermark tracks how far the rebuild has caught up.
pub fn materialize(sink: &mut dyn CardSink, ledger: &mut Ledger) -> Fallible<usize> {
    // A hand-edited ledger could carry a watermark below -1. Clamp so the
    // cast cannot wrap to a start index past every record.
    let start = (ledger.metadata.last_card_watermark.max(-1) + 1) as usize;
    let mut added = 0;
    for index in start..ledger.records.len() {
        let record = &ledger.records[index];
        sink.add_card(
            &record.question,
            &record.answer,
            &record.page_number.to_string(),
        )?;
        ledger.metadata.last_card_watermark = index as i64;
        added += 1;
    }
    Ok(added)
}
