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

pub mod export;
pub mod mine;
pub mod stats;

use std::fs;
use std::path::Path;

use cardmine_core::ErrorReport;
use cardmine_core::Fallible;
use cardmine_core::Ledger;

/// Load a ledger without creating or mutating anything, for the read-only
/// commands.
pub(crate) fn load_ledger(path: &Path) -> Fallible<Ledger> {
    let text = fs::read_to_string(path).map_err(|e| {
        ErrorReport::new(format!("Failed to read ledger {}: {e}", path.display()))
    })?;
    serde_json::from_str(&text).map_err(|e| {
        ErrorReport::new(format!("Failed to parse ledger {}: {e}", path.display()))
    })
}
