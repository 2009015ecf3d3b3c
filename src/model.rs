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

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::Serialize;

use cardmine_core::ErrorReport;
use cardmine_core::Fallible;
use cardmine_core::TextGenerator;
use cardmine_core::fail;

/// Per-request timeout. Generation on CPU-bound local models is slow.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);

/// Render system and user turns in the Zephyr chat template used by
/// TinyLlama-style chat models. The transcript parser expects these role
/// markers back.
pub fn chat_prompt(system: &str, user: &str) -> String {
    format!("<|system|>\n{system}</s>\n<|user|>\n{user}</s>\n<|assistant|>\n")
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    max_tokens: usize,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    text: String,
}

/// A text generator backed by an OpenAI-compatible completion endpoint,
/// such as a local llama.cpp server.
pub struct HttpGenerator {
    client: Client,
    url: String,
    model: String,
}

impl HttpGenerator {
    pub fn new(url: String, model: String) -> Fallible<HttpGenerator> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ErrorReport::new(format!("Failed to build HTTP client: {e}")))?;
        Ok(HttpGenerator { client, url, model })
    }
}

impl TextGenerator for HttpGenerator {
    fn generate(&mut self, system: &str, user: &str, max_tokens: usize) -> Fallible<String> {
        let prompt = chat_prompt(system, user);
        let request = CompletionRequest {
            model: &self.model,
            prompt: &prompt,
            max_tokens,
        };
        let response = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .map_err(|e| ErrorReport::new(format!("Model request failed: {e}")))?;
        if !response.status().is_success() {
            return fail(format!("Model endpoint returned {}", response.status()));
        }
        let body: CompletionResponse = response
            .json()
            .map_err(|e| ErrorReport::new(format!("Malformed model response: {e}")))?;
        let completion = body
            .choices
            .first()
            .map(|choice| choice.text.as_str())
            .unwrap_or_default();
        // The pipeline's parser wants the full transcript, with the prompt's
        // role turns in front of the completion.
        Ok(format!("{prompt}{completion}"))
    }
}
