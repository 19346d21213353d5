//! The LogIQ product-enquiry agent.

mod prompts;

use std::sync::Arc;

use chrono::Local;
use tracing::debug;

use crate::agent::{Agent, BeforeAgentCallback, CallbackContext};
use crate::catalog::tools::{enquiry_tools, CategoriesTool};
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::error::Result;
use crate::types::Content;

pub use prompts::{PRODUCT_ENQUIRY_DESCRIPTION, PRODUCT_ENQUIRY_INSTRUCTION};

pub const PRODUCT_ENQUIRY_AGENT_NAME: &str = "product_enquiry_agent";

pub const CATEGORIES_KEY: &str = "available_appliance_categories";
pub const START_TIME_KEY: &str = "start_time";
pub const CURRENT_DATE_KEY: &str = "current_date";

/// Build the product-enquiry agent over `catalog`.
pub fn product_enquiry_agent(config: &AppConfig, catalog: Arc<Catalog>) -> Agent {
    Agent::new(PRODUCT_ENQUIRY_AGENT_NAME, config.model.clone())
        .with_description(PRODUCT_ENQUIRY_DESCRIPTION)
        .with_instruction(PRODUCT_ENQUIRY_INSTRUCTION)
        .with_settings(config.generation_settings())
        .with_tools(enquiry_tools(&catalog))
        .with_before_agent_callback(seed_session_state(CategoriesTool::new(catalog)))
}

/// Callback that fills the categories and timestamps the instruction needs.
/// Keys already present are left untouched, so repeated turns are no-ops.
pub fn seed_session_state(categories: CategoriesTool) -> BeforeAgentCallback {
    Arc::new(move |ctx: &mut CallbackContext| -> Result<Option<Content>> {
        if !ctx.contains(CATEGORIES_KEY) {
            ctx.set(CATEGORIES_KEY, categories.list());
        }
        let now = Local::now();
        if !ctx.contains(START_TIME_KEY) {
            ctx.set(START_TIME_KEY, now.format("%Y-%m-%d %H:%M:%S").to_string());
        }
        if !ctx.contains(CURRENT_DATE_KEY) {
            ctx.set(CURRENT_DATE_KEY, now.format("%Y-%m-%d").to_string());
        }
        debug!(invocation_id = ctx.invocation_id(), "session state seeded");
        Ok(None)
    })
}
