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

use std::path::PathBuf;

use clap::Args;
use clap::Parser;

use cardmine_core::Fallible;

use crate::cmd::export::export_deck;
use crate::cmd::mine::mine_document;
use crate::cmd::stats::print_stats;

#[derive(Parser)]
#[command(version, about, long_about = None)]
enum Command {
    /// Mine Q&A flashcards from a PDF document.
    Mine(MineArgs),
    /// Print ledger statistics.
    Stats {
        /// Path to the ledger file.
        #[arg(long, default_value = "qa_ledger.json")]
        ledger: PathBuf,
    },
    /// Rebuild the complete deck package from a ledger, ignoring the card
    /// watermark.
    Export {
        /// Path to the ledger file.
        #[arg(long, default_value = "qa_ledger.json")]
        ledger: PathBuf,
        /// Path to the output deck package.
        #[arg(long, default_value = "deck.apkg")]
        output: PathBuf,
        /// Name of the Anki deck.
        #[arg(long, default_value = "cardmine")]
        deck_name: String,
    },
}

#[derive(Args)]
pub struct MineArgs {
    /// Path to the PDF document.
    pub pdf: PathBuf,
    /// Path to an optional TOML config file. Flags override file values.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Path to the ledger file. Default is qa_ledger.json.
    #[arg(long)]
    pub ledger: Option<PathBuf>,
    /// Path to the output deck package. Default is deck.apkg.
    #[arg(long)]
    pub output: Option<PathBuf>,
    /// Name of the Anki deck. Default is the PDF file stem.
    #[arg(long)]
    pub deck_name: Option<String>,
    /// Seed for the resume point on a fresh ledger: processing starts at the
    /// page after this one. Default is -1 (start at page 0).
    #[arg(long)]
    pub start_page_offset: Option<i64>,
    /// Maximum part size in bytes. Default is 500.
    #[arg(long)]
    pub part_size: Option<usize>,
    /// Generation budget per model call, in tokens. Default is 512.
    #[arg(long)]
    pub max_tokens: Option<usize>,
    /// Base URL of an OpenAI-compatible completion endpoint.
    #[arg(long)]
    pub model_url: Option<String>,
    /// Model name sent with each completion request.
    #[arg(long)]
    pub model_name: Option<String>,
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Command = Command::parse();
    match cli {
        Command::Mine(args) => mine_document(args),
        Command::Stats { ledger } => print_stats(&ledger),
        Command::Export {
            ledger,
            output,
            deck_name,
        } => export_deck(&ledger, output, &deck_name),
    }
}
