//! Tips module - coaching tips for the selected block
//!
//! A tip is requested when a block is chosen for a new day. The request runs
//! in the background; the setup screen shows a placeholder until the text
//! arrives and simply keeps going if the user moves on first.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use rand::seq::SliceRandom;
use serde::Deserialize;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::{debug, error};

use crate::blocks::WorkoutBlock;
use crate::i18n::Language;

/// Shown when the service answers with no text
pub const EMPTY_TIP_FALLBACK: &str = "Stay focused on your form and keep the intensity high.";
/// Shown when the service fails
pub const ERROR_TIP_FALLBACK: &str = "Push yourself and maintain perfect control throughout each rep.";

pub const DEFAULT_TIP_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_TIP_ENDPOINT: &str = "https://generativelanguage.googleapis.com";

/// What the tip is about
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipRequest {
    /// Localized block name
    pub block_name: String,
    /// Localized exercise names, in block order
    pub exercises: Vec<String>,
    /// Language code the tip should be written in
    pub language: String,
}

impl TipRequest {
    /// Request for `block`, with names translated into `language`
    pub fn for_block(block: &WorkoutBlock, language: Language) -> Self {
        Self {
            block_name: language.translate(block.name).to_string(),
            exercises: block
                .exercises
                .iter()
                .map(|e| language.translate(e).to_string())
                .collect(),
            language: language.code().to_string(),
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Provide a single short, professional tip (under 20 words) in {} for performing a workout involving: {}. Focus on form or intensity.",
            self.language,
            self.exercises.join(", ")
        )
    }
}

/// Remote or local source of tips
pub trait TipService: Send + Sync + 'static {
    fn fetch_tip(&self, request: &TipRequest) -> impl Future<Output = Result<String>> + Send;
}

/// Ask `service` for a tip; never fails, falls back to a fixed text
pub async fn request_tip<S: TipService>(service: &S, request: &TipRequest) -> String {
    match service.fetch_tip(request).await {
        Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
        Ok(_) => EMPTY_TIP_FALLBACK.to_string(),
        Err(e) => {
            error!("Tip service error: {:#}", e);
            ERROR_TIP_FALLBACK.to_string()
        }
    }
}

/// Gemini `generateContent` client
pub struct GeminiTipService {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiTipService {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            endpoint: DEFAULT_TIP_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

impl TipService for GeminiTipService {
    async fn fetch_tip(&self, request: &TipRequest) -> Result<String> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": request.prompt() }] }],
            "generationConfig": { "temperature": 0.7 },
        });

        let response = self.client
            .post(self.url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .context("Tip request failed")?;

        let status = response.status();
        if !status.is_success() {
            bail!("Tip service returned {}", status);
        }

        let parsed: GenerateResponse = response.json().await.context("Malformed tip response")?;
        let text = parsed
            .candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .filter_map(|p| p.text)
            .collect::<Vec<_>>()
            .join("");
        Ok(text)
    }
}

/// Built-in tips used without an API key
pub const TIPS: &[&str] = &[
    "Keep your elbows pinned to your sides; if they drift, the weight is too heavy.",
    "Lower the weight for a slow count of three and pause at the bottom of each rep.",
    "Brace your core and keep your wrists neutral before every press.",
    "Full range of motion first, heavier weight second.",
    "Beat last session by one rep or a small plate on at least one set.",
    "Leave one or two reps in the tank on the first set, go close to failure on the last.",
    "Squeeze the target muscle hard for a second at the top of every rep.",
    "Rest 90 to 120 seconds between sets to keep your strength up.",
    "Tomorrow is a rest day; sleep and protein do the building.",
];

/// Random tip from [`TIPS`]
pub struct OfflineTipService;

impl TipService for OfflineTipService {
    async fn fetch_tip(&self, _request: &TipRequest) -> Result<String> {
        let tip = TIPS.choose(&mut rand::thread_rng()).unwrap_or(&TIPS[0]);
        Ok(tip.to_string())
    }
}

/// Service picked at startup: Gemini with an API key, built-in tips otherwise
pub enum TipClient {
    Gemini(GeminiTipService),
    Offline(OfflineTipService),
}

impl TipClient {
    pub fn from_config(api_key: Option<String>, model: &str) -> Self {
        match api_key.filter(|k| !k.trim().is_empty()) {
            Some(key) => TipClient::Gemini(GeminiTipService::new(key, model)),
            None => TipClient::Offline(OfflineTipService),
        }
    }
}

impl TipService for TipClient {
    async fn fetch_tip(&self, request: &TipRequest) -> Result<String> {
        match self {
            TipClient::Gemini(service) => service.fetch_tip(request).await,
            TipClient::Offline(service) => service.fetch_tip(request).await,
        }
    }
}

/// Tip shown on the setup screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TipState {
    Idle,
    Loading,
    Ready(String),
}

/// Runs tip requests in the background and hands back only the latest result.
///
/// Every request gets a generation number; results of older generations, or
/// of requests made before [`TipFetcher::invalidate`], are dropped.
pub struct TipFetcher<S: TipService> {
    service: Arc<S>,
    runtime: Handle,
    generation: u64,
    tx: UnboundedSender<(u64, String)>,
    rx: UnboundedReceiver<(u64, String)>,
    state: TipState,
}

impl<S: TipService> TipFetcher<S> {
    pub fn new(service: S, runtime: Handle) -> Self {
        let (tx, rx) = unbounded_channel();
        Self {
            service: Arc::new(service),
            runtime,
            generation: 0,
            tx,
            rx,
            state: TipState::Idle,
        }
    }

    pub fn state(&self) -> &TipState {
        &self.state
    }

    /// Start a request, superseding any pending one
    pub fn request(&mut self, request: TipRequest) {
        self.generation += 1;
        self.state = TipState::Loading;

        let generation = self.generation;
        let service = Arc::clone(&self.service);
        let tx = self.tx.clone();
        debug!("Requesting tip #{} for {}", generation, request.block_name);
        self.runtime.spawn(async move {
            let text = request_tip(service.as_ref(), &request).await;
            // Receiver gone means the app is shutting down
            let _ = tx.send((generation, text));
        });
    }

    /// Forget the pending request; its result will be ignored
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.state = TipState::Idle;
    }

    /// Apply finished requests. Returns true when the state changed.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok((generation, text)) = self.rx.try_recv() {
            if generation == self.generation && self.state == TipState::Loading {
                self.state = TipState::Ready(text);
                changed = true;
            } else {
                debug!("Dropping stale tip #{}", generation);
            }
        }
        changed
    }
}
