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

use serde::Deserialize;
use serde::Serialize;

/// A question/answer pair as parsed from model output, before it has been
/// attributed to a position in the document.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct QaPair {
    pub question: String,
    pub answer: String,
}

impl QaPair {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        QaPair {
            question: question.into(),
            answer: answer.into(),
        }
    }

    /// Stamp this pair with its position in the document, turning it into a
    /// ledger record.
    pub fn into_record(self, page_number: u32, part_number: u32) -> QaRecord {
        QaRecord {
            question: self.question,
            answer: self.answer,
            page_number,
            part_number,
        }
    }
}

/// A question/answer pair extracted from one part of one document page.
///
/// Records are immutable once appended to the ledger. Identity is positional:
/// two records with identical content are distinct entries.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct QaRecord {
    pub question: String,
    pub answer: String,
    pub page_number: u32,
    pub part_number: u32,
}
