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

use log::warn;
use lopdf::Document;

use cardmine_core::ErrorReport;
use cardmine_core::Fallible;
use cardmine_core::PageSource;

/// A paginated document backed by a PDF file.
pub struct PdfSource {
    document: Document,
    /// PDF page numbers (1-based) in document order, indexed by the
    /// pipeline's zero-based page index.
    page_numbers: Vec<u32>,
}

impl PdfSource {
    pub fn open(path: &Path) -> Fallible<PdfSource> {
        let document = Document::load(path).map_err(|e| {
            ErrorReport::new(format!("Failed to load PDF {}: {e}", path.display()))
        })?;
        let page_numbers = document.get_pages().keys().copied().collect();
        Ok(PdfSource {
            document,
            page_numbers,
        })
    }
}

impl PageSource for PdfSource {
    fn page_count(&self) -> usize {
        self.page_numbers.len()
    }

    fn page_text(&mut self, page: usize) -> Fallible<Option<String>> {
        let Some(&page_number) = self.page_numbers.get(page) else {
            return Ok(None);
        };
        match self.document.extract_text(&[page_number]) {
            Ok(text) => Ok(Some(text)),
            // A page that cannot be extracted (scanned image, broken content
            // stream) is skipped, not fatal.
            Err(e) => {
                warn!("Failed to extract text from page {page}: {e}");
                Ok(None)
            }
        }
    }
}
