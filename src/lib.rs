//! LogIQ customer-support agent orchestration.
//!
//! Wires a product-enquiry agent (instruction, generation settings, catalog
//! tools and a pre-turn callback) to a Gemini model, an in-memory session
//! store and a blocking bridge that turns one user message into one reply.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use logiq::prelude::*;
//!
//! # fn example() -> logiq::error::Result<()> {
//! let config = AppConfig::from_env()?;
//! let catalog = Arc::new(Catalog::sample()?);
//! let agent = Arc::new(logiq::customer::product_enquiry_agent(&config, catalog));
//! let provider: Arc<dyn ModelProvider> =
//!     Arc::from(logiq::provider::create_provider(agent.model(), &config)?);
//! let sessions: Arc<dyn SessionService> = Arc::new(InMemorySessionService::new());
//!
//! let bootstrap = SessionBootstrap::new(&config.app_name, agent, provider, sessions);
//! let mut scope = ChatScope::new("Ada Lovelace");
//! let (runner, session_id) = bootstrap.initialize_blocking(&mut scope, "C-1001")?;
//! let reply = run_turn_blocking("C-1001", runner.as_ref(), &session_id, "Do you sell ovens?");
//! println!("{reply}");
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod bootstrap;
pub mod bridge;
pub mod catalog;
pub mod config;
pub mod customer;
pub mod error;
pub mod events;
pub mod models;
pub mod prelude;
pub mod provider;
pub mod runner;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
