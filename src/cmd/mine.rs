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

use log::info;

use cardmine_core::Fallible;
use cardmine_core::Pipeline;
use cardmine_core::PipelineConfig;

use crate::anki::AnkiSink;
use crate::cli::MineArgs;
use crate::config::MineSettings;
use crate::model::HttpGenerator;
use crate::source::PdfSource;

/// Run the extraction pipeline over a PDF, resuming from the ledger.
pub fn mine_document(args: MineArgs) -> Fallible<()> {
    let settings = MineSettings::resolve(&args)?;
    let mut source = PdfSource::open(&args.pdf)?;
    let mut generator = HttpGenerator::new(settings.model_url, settings.model_name)?;
    let mut sink = AnkiSink::new(&settings.deck_name, settings.output.clone());
    let config = PipelineConfig {
        ledger_path: settings.ledger,
        start_page_offset: settings.start_page_offset,
        part_size: settings.part_size,
        max_tokens: settings.max_tokens,
    };
    let summary = Pipeline::new(config, &mut source, &mut generator, &mut sink).run()?;
    info!(
        "Run complete: {} questions across {} pages",
        summary.total_questions, summary.total_pages_processed
    );
    Ok(())
}
