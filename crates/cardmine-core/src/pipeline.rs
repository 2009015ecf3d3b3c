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

//! The extraction pipeline: each page is chunked into parts, each part goes
//! through the model and the parsers, and the results land in the ledger
//! and the deck.
//!
//! Everything runs strictly sequentially on one thread. The ledger is
//! persisted after every successfully mined part, so a crash loses at most
//! the one part that was in flight. Model and parse failures are contained
//! to the part they occur in; only document access failures are fatal.

use std::path::PathBuf;

use log::error;
use log::info;
use log::warn;

use crate::chunker::chunk;
use crate::deck::CardSink;
use crate::deck::materialize;
use crate::error::Fallible;
use crate::ledger::Ledger;
use crate::parser::parse_qa;
use crate::transcript::extract_assistant_turn;
use crate::types::record::QaPair;

/// The system turn sent with every model call.
pub const SYSTEM_PROMPT: &str =
    "You are an AI bot used to extract question and answers from documents";

/// The user turn wrapping one part of a page.
pub fn user_prompt(part: &str) -> String {
    format!(
        "Extract the question and answers from this text as it is in given format. \
         STRICTLY adhere to the format.\n\
         The format is : Question 1\nAnswer 1\n\
         The text is : {part}\n\
         Respond directly with the question and answers ONLY."
    )
}

/// The interface the pipeline needs from a paginated document.
pub trait PageSource {
    /// Total number of pages in the document.
    fn page_count(&self) -> usize;

    /// Raw text of the given zero-based page, or `None` when the page has no
    /// extractable text. Errors here are fatal to the run.
    fn page_text(&mut self, page: usize) -> Fallible<Option<String>>;
}

/// The interface the pipeline needs from a generative text model.
pub trait TextGenerator {
    /// Send a system and a user turn to the model with the given generation
    /// budget. Returns the full role-tagged transcript, including the
    /// model's own reply turn.
    fn generate(&mut self, system: &str, user: &str, max_tokens: usize) -> Fallible<String>;
}

pub struct PipelineConfig {
    /// Where the ledger lives.
    pub ledger_path: PathBuf,
    /// Seed for `last_processed_page` when initializing a fresh ledger.
    pub start_page_offset: i64,
    /// Maximum part size in bytes, see [`crate::chunker::chunk`].
    pub part_size: usize,
    /// Generation budget per model call, in tokens.
    pub max_tokens: usize,
}

/// Cumulative counters reported at the end of every run, including fatal
/// exits.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RunSummary {
    pub last_processed_page: i64,
    pub total_pages_processed: u64,
    pub total_questions: u64,
    pub total_cards: u64,
}

impl RunSummary {
    fn from_ledger(ledger: &Ledger) -> Self {
        RunSummary {
            last_processed_page: ledger.metadata.last_processed_page,
            total_pages_processed: ledger.metadata.total_pages_processed,
            total_questions: ledger.metadata.total_questions,
            total_cards: (ledger.metadata.last_card_watermark + 1) as u64,
        }
    }

    fn log(&self) {
        info!("Last processed page: {}", self.last_processed_page);
        info!("Total pages processed: {}", self.total_pages_processed);
        info!("Total Q&A pairs extracted: {}", self.total_questions);
        info!("Total cards created: {}", self.total_cards);
    }
}

pub struct Pipeline<'a> {
    config: PipelineConfig,
    source: &'a mut dyn PageSource,
    generator: &'a mut dyn TextGenerator,
    sink: &'a mut dyn CardSink,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: PipelineConfig,
        source: &'a mut dyn PageSource,
        generator: &'a mut dyn TextGenerator,
        sink: &'a mut dyn CardSink,
    ) -> Self {
        Pipeline {
            config,
            source,
            generator,
            sink,
        }
    }

    /// Run the pipeline to completion, resuming from the ledger's state.
    ///
    /// On a fatal error the ledger is persisted and the summary logged
    /// before the error is surfaced.
    pub fn run(mut self) -> Fallible<RunSummary> {
        let mut ledger =
            Ledger::open_or_init(&self.config.ledger_path, self.config.start_page_offset)?;
        let result = self.process(&mut ledger);
        if result.is_err() {
            if let Err(e) = ledger.persist(&self.config.ledger_path) {
                error!("Failed to persist ledger after fatal error: {e}");
            }
        }
        let summary = RunSummary::from_ledger(&ledger);
        summary.log();
        result.map(|()| summary)
    }

    fn process(&mut self, ledger: &mut Ledger) -> Fallible<()> {
        // Materialize cards that a previous run appended to the ledger but
        // never flushed into the deck.
        let backlog = materialize(self.sink, ledger)?;
        if backlog > 0 {
            info!("Added {backlog} existing cards to the deck");
            self.sink.flush()?;
            ledger.persist(&self.config.ledger_path)?;
        }

        let total_pages = self.source.page_count();
        let next_page = ledger.metadata.last_processed_page + 1;
        if next_page >= total_pages as i64 {
            info!("All pages have been processed");
            return Ok(());
        }
        let start_page = next_page.max(0) as usize;
        info!("Resuming from page {start_page}");

        for page in start_page..total_pages {
            info!("Processing page {page} of {}", total_pages - 1);
            self.process_page(ledger, page)?;
        }
        Ok(())
    }

    fn process_page(&mut self, ledger: &mut Ledger, page: usize) -> Fallible<()> {
        let text = match self.source.page_text(page)? {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                info!("No text found on page {page}, skipping");
                return Ok(());
            }
        };

        let parts = chunk(&text, self.config.part_size);
        let mut page_yielded = false;
        for (i, part) in parts.iter().enumerate() {
            let part_number = (i + 1) as u32;
            info!("Processing part {part_number} of {}", parts.len());
            let pairs = match self.mine_part(part) {
                Ok(pairs) => pairs,
                Err(e) => {
                    warn!("Error processing part {part_number} of page {page}: {e}");
                    continue;
                }
            };
            if pairs.is_empty() {
                info!("No Q&A pairs extracted from part {part_number}");
                continue;
            }
            let count = pairs.len();
            ledger.append(
                pairs
                    .into_iter()
                    .map(|pair| pair.into_record(page as u32, part_number)),
            );
            ledger.metadata.last_processed_page = page as i64;
            let added = materialize(self.sink, ledger)?;
            if added > 0 {
                self.sink.flush()?;
            }
            ledger.persist(&self.config.ledger_path)?;
            page_yielded = true;
            info!(
                "Added {count} new Q&A pairs ({} total)",
                ledger.metadata.total_questions
            );
        }

        if page_yielded {
            ledger.metadata.total_pages_processed += 1;
            ledger.persist(&self.config.ledger_path)?;
        }
        // A page with zero yield still advances the resume point, so it is
        // never retried.
        ledger.metadata.last_processed_page = page as i64;
        ledger.persist(&self.config.ledger_path)
    }

    /// The failure-isolated unit of work: one model call on one part.
    fn mine_part(&mut self, part: &str) -> Fallible<Vec<QaPair>> {
        let transcript =
            self.generator
                .generate(SYSTEM_PROMPT, &user_prompt(part), self.config.max_tokens)?;
        match extract_assistant_turn(&transcript) {
            Some(turn) => Ok(parse_qa(&turn)),
            None => {
                info!("No assistant turn in model response");
                Ok(Vec::new())
            }
        }
    }
}
