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

//! cardmine-core: Core library for mining Q&A flashcards from documents.
//!
//! This library provides:
//! - Chunking page text into bounded-size parts on sentence boundaries
//! - Parsing model transcripts and lenient Q&A text
//! - A resumable, crash-safe JSON ledger of extracted pairs
//! - Incremental synchronization of ledger records into a flashcard deck
//! - The single-threaded pipeline orchestrating all of the above
//!
//! The document source, the generative model, and the deck backend are
//! trait seams; production implementations live in the `cardmine` binary.

pub mod chunker;
pub mod deck;
pub mod error;
pub mod ledger;
pub mod parser;
pub mod pipeline;
pub mod transcript;
pub mod types;

// Re-exports for convenience
pub use chunker::{DEFAULT_PART_SIZE, chunk};
pub use deck::{CardSink, materialize};
pub use error::{ErrorReport, Fallible, fail};
pub use ledger::{Ledger, LedgerMetadata};
pub use parser::parse_qa;
pub use pipeline::{PageSource, Pipeline, PipelineConfig, RunSummary, TextGenerator};
pub use transcript::extract_assistant_turn;
pub use types::record::{QaPair, QaRecord};
pub use types::timestamp::Timestamp;
