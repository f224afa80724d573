//! Static site generator for a list-of-lists website.
//!
//! One invocation reads `index.template` and `<SITE>.json` from a storage
//! backend, renders the page, optionally minifies it, and writes
//! `index.html` back out. Backends cover the local filesystem (for working
//! on the site) and S3 (for deployed rebuilds): inputs come from the
//! `<SITE_URL>-generator` bucket and the output lands in the `<SITE_URL>`
//! bucket, which also hosts the optional social-preview card image.

pub mod application;
pub mod config;
pub mod infra;

use serde_json::Value;

use crate::{
    application::{error::AppError, generator::SiteGenerator},
    config::{LoggingSettings, Settings},
};

/// Run the full rebuild pipeline once.
///
/// `remote` selects S3 over the local filesystem; `minify` controls output
/// minification.
pub async fn regenerate(settings: &Settings, remote: bool, minify: bool) -> Result<(), AppError> {
    let generator = if remote {
        SiteGenerator::connect_s3(settings).await?
    } else {
        SiteGenerator::local(settings)
    };

    generator.generate(minify).await
}

/// Entry point for serverless platforms.
///
/// Accepts the platform's event and context payloads and ignores both:
/// every invocation performs the same full rebuild against S3 at INFO
/// verbosity.
pub async fn handle_event(_event: Value, _context: Value) -> Result<(), AppError> {
    // The subscriber survives warm invocations; an already-installed
    // subscriber is not a reason to skip the rebuild.
    let _ = infra::telemetry::init(&LoggingSettings::default());

    let settings = config::from_env()?;
    regenerate(&settings, true, true).await
}
