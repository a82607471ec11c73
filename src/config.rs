//! # Route Table Configuration
//!
//! Loads a static route table from TOML and turns it into a [`Router`]. Each
//! entry registers a [`StaticResponse`] under its pattern.
//!
//! ## Format
//!
//! ```toml
//! # Optional: replaces the built-in `404 page not found` responder
//! [not_found]
//! status = 404
//! body = "nothing here"
//!
//! [[routes]]
//! pattern = "/"
//! body = "home"
//!
//! [[routes]]
//! pattern = "/static/"
//! status = 200
//! body = "static root"
//! content_type = "text/plain; charset=utf-8"
//! ```
//!
//! `status` defaults to `200`, `body` to empty and `content_type` to
//! `text/plain; charset=utf-8`. Patterns must be non-empty and unique.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use http::{HeaderValue, StatusCode};
use serde::Deserialize;
use tracing::info;

use crate::dispatcher::StaticResponse;
use crate::middleware::BoxedMiddleware;
use crate::router::Router;

const DEFAULT_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

fn default_status() -> u16 {
    200
}

fn default_not_found_status() -> u16 {
    404
}

fn default_content_type() -> String {
    DEFAULT_CONTENT_TYPE.to_string()
}

/// One fixed response registered under a pattern
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub pattern: String,
    #[serde(default = "default_status")]
    pub status: u16,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

/// Replacement for the default not-found responder
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotFoundEntry {
    #[serde(default = "default_not_found_status")]
    pub status: u16,
    #[serde(default)]
    pub body: String,
    #[serde(default = "default_content_type")]
    pub content_type: String,
}

/// Parsed route table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteTable {
    #[serde(default)]
    pub not_found: Option<NotFoundEntry>,
    #[serde(default)]
    pub routes: Vec<RouteEntry>,
}

fn static_response(
    status: u16,
    content_type: &str,
    body: &str,
    what: &str,
) -> Result<StaticResponse> {
    let status = StatusCode::from_u16(status)
        .with_context(|| format!("{what}: invalid status code {status}"))?;
    let content_type = HeaderValue::from_str(content_type)
        .with_context(|| format!("{what}: invalid content_type {content_type:?}"))?;
    Ok(StaticResponse::new(status, content_type, body))
}

impl RouteTable {
    /// Parse and validate a TOML route table
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let table: RouteTable = toml::from_str(source).context("Failed to parse route table")?;
        table.validate()?;
        Ok(table)
    }

    /// Read, parse and validate a route table file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read route table {}", path.display()))?;
        Self::from_toml_str(&source).with_context(|| format!("In {}", path.display()))
    }

    /// Check patterns, statuses and content types without building anything
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for (i, route) in self.routes.iter().enumerate() {
            if route.pattern.is_empty() {
                bail!("routes[{i}]: pattern must not be empty");
            }
            if !seen.insert(route.pattern.as_str()) {
                bail!("routes[{i}]: duplicate pattern {:?}", route.pattern);
            }
            static_response(
                route.status,
                &route.content_type,
                &route.body,
                &format!("routes[{i}] ({})", route.pattern),
            )?;
        }
        if let Some(nf) = &self.not_found {
            static_response(nf.status, &nf.content_type, &nf.body, "not_found")?;
        }
        Ok(())
    }

    /// Build a router with every entry registered and `middleware` installed
    pub fn build_router<I>(&self, middleware: I) -> Result<Router>
    where
        I: IntoIterator<Item = BoxedMiddleware>,
    {
        let router = match &self.not_found {
            Some(nf) => Router::with_not_found(Arc::new(static_response(
                nf.status,
                &nf.content_type,
                &nf.body,
                "not_found",
            )?)),
            None => Router::new(),
        };
        router.use_middleware(middleware);

        for route in &self.routes {
            let handler = static_response(
                route.status,
                &route.content_type,
                &route.body,
                &route.pattern,
            )?;
            router.handle(&route.pattern, handler);
        }

        info!(routes_count = router.len(), "Routing table loaded");
        Ok(router)
    }
}
