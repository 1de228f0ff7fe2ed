//! crates/school_console_core/src/store.rs
//!
//! The Entity Store: the authoritative-as-of-last-fetch collection for one
//! entity type, plus a loading flag. Consistency is achieved by always
//! trusting the server's current state — after any successful mutation the
//! whole collection is re-fetched, never patch-merged.
//!
//! Overlapping fetches are guarded by a request-generation counter: a
//! response is applied only if its generation matches the latest issued
//! request, so a slow stale response can never overwrite fresher data.

use crate::ports::{EntityRoute, Gateway, GatewayError, GatewayResult};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// Proof that a load was begun; carries the generation the response must
/// still match to be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// Holds the last-fetched collection for one entity type.
pub struct EntityStore<T> {
    route: EntityRoute,
    items: Vec<T>,
    loading: bool,
    generation: u64,
}

impl<T: DeserializeOwned> EntityStore<T> {
    pub fn new(route: EntityRoute) -> Self {
        Self {
            route,
            items: Vec::new(),
            loading: false,
            generation: 0,
        }
    }

    pub fn route(&self) -> &EntityRoute {
        &self.route
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Start a fetch: bumps the request generation and raises the loading
    /// flag. The returned ticket must be handed back to `finish_load`.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.loading = true;
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Apply a fetch outcome. A stale ticket (a newer load has begun since)
    /// is discarded outright — neither the collection nor the loading flag
    /// moves. A failed current-generation load clears the loading flag but
    /// leaves the prior collection intact: stale-but-present beats empty.
    ///
    /// Returns `Ok(true)` when the collection was replaced, `Ok(false)` when
    /// the response was stale.
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        outcome: GatewayResult<Vec<Value>>,
    ) -> GatewayResult<bool> {
        if ticket.generation != self.generation {
            debug!(
                route = self.route.segment(),
                stale = ticket.generation,
                current = self.generation,
                "discarding stale list response"
            );
            return Ok(false);
        }
        self.loading = false;
        let raw = outcome?;
        let mut items = Vec::with_capacity(raw.len());
        for value in raw {
            items.push(
                serde_json::from_value(value)
                    .map_err(|e| GatewayError::Decode(e.to_string()))?,
            );
        }
        self.items = items;
        Ok(true)
    }

    /// Begin + fetch + finish in one await. Because this holds `&mut self`
    /// across the call it cannot itself race; the ticket split exists for
    /// callers whose fetches interleave (screens).
    pub async fn load(&mut self, gateway: &dyn Gateway) -> GatewayResult<bool> {
        let ticket = self.begin_load();
        let route = self.route;
        let outcome = gateway.list(&route, &[]).await;
        self.finish_load(ticket, outcome)
    }

    /// Full re-fetch after a successful mutation.
    pub async fn invalidate(&mut self, gateway: &dyn Gateway) -> GatewayResult<bool> {
        self.load(gateway).await
    }
}

//=========================================================================================
// Cascading-Select Options
//=========================================================================================

/// Option list for a cascading select (e.g. sections of the currently chosen
/// class). Works like a keyed mini-store: a response is applied only when no
/// newer parent selection has been made since the fetch was issued.
pub struct DependentOptions<T> {
    parent_key: Option<String>,
    options: Vec<T>,
    generation: u64,
}

impl<T: DeserializeOwned> DependentOptions<T> {
    pub fn new() -> Self {
        Self {
            parent_key: None,
            options: Vec::new(),
            generation: 0,
        }
    }

    /// The parent value the current options belong to.
    pub fn parent_key(&self) -> Option<&str> {
        self.parent_key.as_deref()
    }

    pub fn options(&self) -> &[T] {
        &self.options
    }

    /// A new parent was selected: clear the old options immediately (the old
    /// children are invalid for the new parent) and issue a ticket for the
    /// scoped fetch.
    pub fn begin_fetch(&mut self, parent_key: String) -> LoadTicket {
        self.generation += 1;
        self.parent_key = Some(parent_key);
        self.options.clear();
        LoadTicket {
            generation: self.generation,
        }
    }

    /// Parent deselected: drop options, invalidate any in-flight fetch.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.parent_key = None;
        self.options.clear();
    }

    /// Apply a scoped fetch outcome; stale generations are ignored so the
    /// first response of two overlapping selections can never clobber the
    /// second.
    pub fn finish_fetch(
        &mut self,
        ticket: LoadTicket,
        outcome: GatewayResult<Vec<Value>>,
    ) -> GatewayResult<bool> {
        if ticket.generation != self.generation {
            debug!(
                stale = ticket.generation,
                current = self.generation,
                "discarding stale dependent-options response"
            );
            return Ok(false);
        }
        let raw = outcome?;
        let mut options = Vec::with_capacity(raw.len());
        for value in raw {
            options.push(
                serde_json::from_value(value)
                    .map_err(|e| GatewayError::Decode(e.to_string()))?,
            );
        }
        self.options = options;
        Ok(true)
    }
}

impl<T: DeserializeOwned> Default for DependentOptions<T> {
    fn default() -> Self {
        Self::new()
    }
}
