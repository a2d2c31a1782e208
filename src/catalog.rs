//! Color catalog: where the named-color variants come from.
//!
//! The pipeline only sees the [`ColorCatalog`] trait and asks it for entries
//! once, after the source has been decoded and resized. Two implementations:
//!
//! - [`StaticCatalog`]: a fixed list, built from `--color` arguments or in tests.
//! - [`RemoteCatalog`] (feature `remote-catalog`): scrapes a color table page.
//!   Every `<td>` inside a `<tr>` whose `style` declares
//!   `background-color: #xxxxxx` contributes the token after `#`.
//!
//! A catalog never fails the run. A network or parse problem is logged and
//! yields an empty list, so the fixed filter set is still produced.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum CatalogError {
    #[cfg(feature = "remote-catalog")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("HTML parse error: {0}")]
    Parse(#[from] std::io::Error),
}

/// One named color: `name` picks the artifact file, `code` the color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColorEntry {
    pub name: String,
    pub code: String,
}

impl ColorEntry {
    /// An entry named after its own code, as scraped entries are.
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            name: code.clone(),
            code,
        }
    }

    /// Parse a command-line color: `NAME=CODE` or a bare `CODE`.
    ///
    /// The code itself is not validated here; bad codes surface when the
    /// blend filter is built, under the configured malformed-code policy.
    pub fn parse_arg(arg: &str) -> Result<Self, String> {
        match arg.split_once('=') {
            Some((name, code)) if !name.trim().is_empty() && !code.trim().is_empty() => Ok(Self {
                name: name.trim().to_string(),
                code: code.trim().to_string(),
            }),
            Some(_) => Err(format!("expected NAME=CODE, got {arg:?}")),
            None if arg.trim().is_empty() => Err("empty color".to_string()),
            None => Ok(Self::from_code(arg.trim())),
        }
    }
}

/// Source of named colors for the blend fan-out.
pub trait ColorCatalog {
    /// All entries, in catalog order. Never fails; may be empty.
    fn entries(&self) -> Vec<ColorEntry>;
}

/// A fixed list of entries.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog(pub Vec<ColorEntry>);

impl ColorCatalog for StaticCatalog {
    fn entries(&self) -> Vec<ColorEntry> {
        self.0.clone()
    }
}

/// Scrapes color codes from a remote HTML color table.
#[cfg(feature = "remote-catalog")]
#[derive(Debug, Clone)]
pub struct RemoteCatalog {
    pub url: String,
    pub timeout: std::time::Duration,
}

#[cfg(feature = "remote-catalog")]
impl RemoteCatalog {
    pub fn new(url: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn from_config(config: &crate::config::CatalogConfig) -> Self {
        Self::new(
            config.url.clone(),
            std::time::Duration::from_secs(config.timeout_secs),
        )
    }

    /// Fetch the catalog page body.
    pub fn fetch(&self) -> Result<String, CatalogError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("tintlab/", env!("CARGO_PKG_VERSION")))
            .timeout(self.timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;

        let response = client
            .get(&self.url)
            .header("Accept", "text/html,application/xhtml+xml")
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }
        Ok(response.text()?)
    }
}

#[cfg(feature = "remote-catalog")]
impl ColorCatalog for RemoteCatalog {
    fn entries(&self) -> Vec<ColorEntry> {
        let html = match self.fetch() {
            Ok(html) => html,
            Err(err) => {
                warn!(url = %self.url, error = %err, "Color catalog fetch failed; no named-color variants");
                return Vec::new();
            }
        };
        match extract_codes(&html) {
            Ok(codes) => {
                debug!(url = %self.url, count = codes.len(), "Color catalog fetched");
                codes.into_iter().map(ColorEntry::from_code).collect()
            }
            Err(err) => {
                warn!(url = %self.url, error = %err, "Color catalog parse failed; no named-color variants");
                Vec::new()
            }
        }
    }
}

/// Pull every table-cell background color token out of an HTML page.
pub fn extract_codes(html: &str) -> Result<Vec<String>, CatalogError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut codes = Vec::new();
    walk_node(&dom.document, false, &mut codes);
    Ok(codes)
}

/// Depth-first walk collecting `td` styles that sit inside a `tr`.
fn walk_node(handle: &Handle, in_row: bool, codes: &mut Vec<String>) {
    let mut in_row = in_row;
    if let NodeData::Element { name, attrs, .. } = &handle.data {
        match name.local.as_ref() {
            "tr" => in_row = true,
            "td" if in_row => {
                let style = attrs
                    .borrow()
                    .iter()
                    .find(|a| a.name.local.as_ref() == "style")
                    .map(|a| a.value.to_string());
                if let Some(code) = style.as_deref().and_then(background_hex) {
                    codes.push(code);
                }
            }
            _ => {}
        }
    }
    for child in handle.children.borrow().iter() {
        walk_node(child, in_row, codes);
    }
}

/// The token after `#` in a `background-color` declaration, if any.
///
/// `"background-color:#ffb6c1;"` → `Some("ffb6c1")`. The token is returned
/// as written; whether it is valid hex is decided later.
pub fn background_hex(style: &str) -> Option<String> {
    style.split(';').find_map(|decl| {
        let (prop, value) = decl.split_once(':')?;
        if !prop.trim().eq_ignore_ascii_case("background-color") {
            return None;
        }
        let token = value.trim().strip_prefix('#')?.trim();
        (!token.is_empty()).then(|| token.to_string())
    })
}
