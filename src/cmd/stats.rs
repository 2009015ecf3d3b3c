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

use cardmine_core::Fallible;

use crate::cmd::load_ledger;

/// Print the ledger's cumulative counters without mutating anything.
pub fn print_stats(ledger_path: &Path) -> Fallible<()> {
    let ledger = load_ledger(ledger_path)?;
    let metadata = &ledger.metadata;
    println!("Last processed page:     {}", metadata.last_processed_page);
    println!("Total pages processed:   {}", metadata.total_pages_processed);
    println!("Total Q&A pairs:         {}", metadata.total_questions);
    println!("Cards materialized:      {}", metadata.last_card_watermark + 1);
    println!("Last update:             {}", metadata.last_update);
    Ok(())
}
