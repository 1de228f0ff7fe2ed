//! services/console/src/state.rs
//!
//! Defines the console's shared application state: the configuration, the
//! session context and the gateway trait objects, created once at startup
//! and handed to every screen.

use crate::config::Config;
use school_console_core::ports::{AuthPort, Gateway};
use school_console_core::session::SessionContext;
use std::sync::Arc;

/// The shared application state, created once at startup.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Arc<SessionContext>,
    pub gateway: Arc<dyn Gateway>,
    pub auth: Arc<dyn AuthPort>,
}
