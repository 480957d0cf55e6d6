//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::services::{FlashMessage, flash};

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct HomeTemplate {
    pub flashes: Vec<FlashMessage>,
}

/// Display home page.
#[instrument(skip(session))]
pub async fn home(session: Session) -> Result<HomeTemplate> {
    Ok(HomeTemplate {
        flashes: flash::take(&session).await?,
    })
}
