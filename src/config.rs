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

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use cardmine_core::DEFAULT_PART_SIZE;
use cardmine_core::ErrorReport;
use cardmine_core::Fallible;

use crate::cli::MineArgs;

pub const DEFAULT_LEDGER: &str = "qa_ledger.json";
pub const DEFAULT_OUTPUT: &str = "deck.apkg";
pub const DEFAULT_MAX_TOKENS: usize = 512;
pub const DEFAULT_MODEL_URL: &str = "http://127.0.0.1:8080/v1/completions";
pub const DEFAULT_MODEL_NAME: &str = "tinyllama";

/// Optional TOML config file for the `mine` command. Every field has a
/// built-in default, and command-line flags override file values.
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    pub ledger: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub deck_name: Option<String>,
    pub start_page_offset: Option<i64>,
    pub part_size: Option<usize>,
    pub max_tokens: Option<usize>,
    pub model_url: Option<String>,
    pub model_name: Option<String>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Fallible<ConfigFile> {
        let text = fs::read_to_string(path).map_err(|e| {
            ErrorReport::new(format!("Failed to read config {}: {e}", path.display()))
        })?;
        toml::from_str(&text).map_err(|e| {
            ErrorReport::new(format!("Failed to parse config {}: {e}", path.display()))
        })
    }
}

/// Fully resolved settings for one mining run.
#[derive(Debug, PartialEq)]
pub struct MineSettings {
    pub ledger: PathBuf,
    pub output: PathBuf,
    pub deck_name: String,
    pub start_page_offset: i64,
    pub part_size: usize,
    pub max_tokens: usize,
    pub model_url: String,
    pub model_name: String,
}

impl MineSettings {
    /// Merge defaults, the config file (if any), and flags, in that order.
    pub fn resolve(args: &MineArgs) -> Fallible<MineSettings> {
        let file = match &args.config {
            Some(path) => ConfigFile::load(path)?,
            None => ConfigFile::default(),
        };
        let deck_name = args
            .deck_name
            .clone()
            .or(file.deck_name)
            .unwrap_or_else(|| default_deck_name(&args.pdf));
        Ok(MineSettings {
            ledger: args
                .ledger
                .clone()
                .or(file.ledger)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LEDGER)),
            output: args
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            deck_name,
            start_page_offset: args.start_page_offset.or(file.start_page_offset).unwrap_or(-1),
            part_size: args
                .part_size
                .or(file.part_size)
                .unwrap_or(DEFAULT_PART_SIZE),
            max_tokens: args
                .max_tokens
                .or(file.max_tokens)
                .unwrap_or(DEFAULT_MAX_TOKENS),
            model_url: args
                .model_url
                .clone()
                .or(file.model_url)
                .unwrap_or_else(|| DEFAULT_MODEL_URL.to_string()),
            model_name: args
                .model_name
                .clone()
                .or(file.model_name)
                .unwrap_or_else(|| DEFAULT_MODEL_NAME.to_string()),
        })
    }
}

fn default_deck_name(pdf: &Path) -> String {
    pdf.file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_else(|| "cardmine".to_string())
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    fn args(pdf: &str) -> MineArgs {
        MineArgs {
            pdf: PathBuf::from(pdf),
            config: None,
            ledger: None,
            output: None,
            deck_name: None,
            start_page_offset: None,
            part_size: None,
            max_tokens: None,
            model_url: None,
            model_name: None,
        }
    }

    #[test]
    fn test_defaults() -> Fallible<()> {
        let settings = MineSettings::resolve(&args("chemistry.pdf"))?;
        assert_eq!(settings.ledger, PathBuf::from(DEFAULT_LEDGER));
        assert_eq!(settings.output, PathBuf::from(DEFAULT_OUTPUT));
        assert_eq!(settings.deck_name, "chemistry");
        assert_eq!(settings.start_page_offset, -1);
        assert_eq!(settings.part_size, DEFAULT_PART_SIZE);
        assert_eq!(settings.max_tokens, DEFAULT_MAX_TOKENS);
        Ok(())
    }

    #[test]
    fn test_flags_override_config_file() -> Fallible<()> {
        let dir = tempdir()?;
        let config_path = dir.path().join("cardmine.toml");
        fs::write(
            &config_path,
            "deck_name = \"from-file\"\npart_size = 200\nmax_tokens = 128\n",
        )?;
        let mut args = args("chemistry.pdf");
        args.config = Some(config_path);
        args.part_size = Some(300);
        let settings = MineSettings::resolve(&args)?;
        assert_eq!(settings.deck_name, "from-file");
        assert_eq!(settings.part_size, 300);
        assert_eq!(settings.max_tokens, 128);
        Ok(())
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let mut args = args("chemistry.pdf");
        args.config = Some(PathBuf::from("./does-not-exist.toml"));
        assert!(MineSettings::resolve(&args).is_err());
    }
}
