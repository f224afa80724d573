//! The end-to-end rebuild pipeline: load inputs, render, persist.

use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::{
    application::{
        error::AppError,
        minify,
        render::{ListData, RenderContext, Template},
    },
    config::Settings,
    infra::storage::{FsStorage, S3Storage, Storage, s3},
};

/// Key of the optional social-preview image in the site bucket.
pub const CARD_IMAGE_KEY: &str = "images/card.png";

const TEMPLATE_KEY: &str = "index.template";
const OUTPUT_KEY: &str = "index.html";
const OUTPUT_CONTENT_TYPE: &str = "text/html";

/// One-shot site generator wiring a source store (inputs), a site store
/// (output), and an optional card-image probe together.
pub struct SiteGenerator {
    sources: Arc<dyn Storage>,
    site: Arc<dyn Storage>,
    card_probe: Option<Arc<dyn Storage>>,
    site_name: String,
    site_url: Option<String>,
}

impl SiteGenerator {
    /// Generator over explicit stores. Used by embedders and tests that
    /// manage their own backends.
    pub fn with_stores(
        sources: Arc<dyn Storage>,
        site: Arc<dyn Storage>,
        card_probe: Option<Arc<dyn Storage>>,
        site_name: impl Into<String>,
        site_url: Option<String>,
    ) -> Self {
        Self {
            sources,
            site,
            card_probe,
            site_name: site_name.into(),
            site_url,
        }
    }

    /// Generator over the current working directory. The card-image probe
    /// has no local equivalent and always reports absence.
    pub fn local(settings: &Settings) -> Self {
        let store: Arc<dyn Storage> = Arc::new(FsStorage::current_dir());
        Self::with_stores(
            store.clone(),
            store,
            None,
            settings.site.clone(),
            settings.site_url.clone(),
        )
    }

    /// Generator over S3: inputs from the `<SITE_URL>-generator` bucket,
    /// output and card image in the `<SITE_URL>` bucket.
    pub async fn connect_s3(settings: &Settings) -> Result<Self, AppError> {
        let site_url = settings.require_site_url()?.to_string();
        let client = s3::connect().await;

        let sources: Arc<dyn Storage> = Arc::new(S3Storage::new(
            client.clone(),
            format!("{site_url}-generator"),
        ));
        let site: Arc<dyn Storage> = Arc::new(S3Storage::new(client, site_url.clone()));

        Ok(Self::with_stores(
            sources,
            site.clone(),
            Some(site),
            settings.site.clone(),
            Some(site_url),
        ))
    }

    /// Run the full pipeline once: load the template and list data, render,
    /// optionally minify, and persist `index.html`.
    pub async fn generate(&self, minify_output: bool) -> Result<(), AppError> {
        let template = self.read_template().await?;
        let list_data = self.read_list().await?;
        let context = RenderContext::new(list_data, self.card_url().await);

        let mut rendered = template.render(&context)?;
        if minify_output {
            rendered = minify::minify(&rendered)?;
            debug!(key = OUTPUT_KEY, "minified output");
        }

        self.site
            .write(OUTPUT_KEY, Bytes::from(rendered), OUTPUT_CONTENT_TYPE)
            .await?;
        info!(key = OUTPUT_KEY, "site regenerated");
        Ok(())
    }

    async fn read_template(&self) -> Result<Template, AppError> {
        debug!(key = TEMPLATE_KEY, "reading template");
        let raw = self.sources.read(TEMPLATE_KEY).await?;
        let source = String::from_utf8(raw.to_vec())?;
        Ok(Template::compile(source)?)
    }

    async fn read_list(&self) -> Result<ListData, AppError> {
        let key = format!("{}.json", self.site_name);
        debug!(key = %key, "reading list data");
        let raw = self.sources.read(&key).await?;
        Ok(serde_json::from_slice(&raw)?)
    }

    /// Public URL for the card image, when one is present in the site
    /// bucket. The probe is best-effort: failures downgrade to absence
    /// with a warning and never abort the rebuild.
    async fn card_url(&self) -> Option<String> {
        let probe = self.card_probe.as_ref()?;
        let found = match probe.exists(CARD_IMAGE_KEY).await {
            Ok(found) => found,
            Err(err) => {
                warn!(key = CARD_IMAGE_KEY, error = %err, "failed to check card image existence");
                false
            }
        };

        if !found {
            return None;
        }

        self.site_url
            .as_ref()
            .map(|site_url| format!("https://{site_url}/{CARD_IMAGE_KEY}"))
    }
}
