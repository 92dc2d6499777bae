//! JSON log lines: one JSON object per line (ndjson).

use crate::predictor::{Prediction, PredictionLabel};
use chrono::Utc;
use serde::Serialize;
use std::io::Write;
use tracing::Subscriber;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// One prediction, as printed by the CLI.
#[derive(Debug, Serialize)]
pub struct PredictionRecord<'a> {
    pub ts: String,
    pub source: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<&'a str>,
    pub prediction: PredictionLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub probability: Option<f32>,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    pub defaulted_columns: &'a [String],
}

impl<'a> PredictionRecord<'a> {
    pub fn new(source: &'a str, username: Option<&'a str>, p: &'a Prediction) -> Self {
        Self {
            ts: Utc::now().to_rfc3339(),
            source,
            username,
            prediction: p.prediction,
            probability: p.probability,
            defaulted_columns: &p.defaulted_columns,
        }
    }
}

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the global subscriber: JSON lines or plain text to `writer`,
    /// level from RUST_LOG or `default_level`.
    pub fn init<W>(json: bool, default_level: &str, writer: W)
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        Self::subscriber(json, default_level, writer).init();
    }

    /// The subscriber `init` installs, for scoped use.
    pub fn subscriber<W>(json: bool, default_level: &str, writer: W) -> Box<dyn Subscriber + Send + Sync>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        if json {
            let fmt = tracing_subscriber::fmt::layer()
                .json()
                .with_span_events(FmtSpan::NONE)
                .with_writer(writer);
            Box::new(tracing_subscriber::registry().with(filter).with(fmt))
        } else {
            Box::new(
                tracing_subscriber::registry()
                    .with(filter)
                    .with(tracing_subscriber::fmt::layer().with_writer(writer)),
            )
        }
    }

    /// Write a single JSON line without going through tracing.
    pub fn emit_json(event: &impl Serialize, w: &mut impl Write) -> std::io::Result<()> {
        let line = serde_json::to_string(event).map_err(std::io::Error::other)?;
        writeln!(w, "{}", line)
    }
}
