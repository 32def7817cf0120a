//! Workshop page rendering.
//!
//! [`MarkdownService`] turns workshop markdown into the document body and
//! the scroll-spy sidebar, applying the settings loaded by [`ws_config`]:
//! emoji images, bare-URL autolinks, smart punctuation, and syntax
//! highlighting via [`ws_highlight`].
//!
//! ```no_run
//! use ws_config::Config;
//! use ws_markdown::MarkdownService;
//!
//! let config = Config::load(None)?;
//! let service = MarkdownService::new(&config);
//!
//! let source = std::fs::read_to_string("workshops/personal_website/README.md")?;
//! let page = service.render_page(&source);
//! println!("{}\n{}", page.sidebar, page.body);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod service;

pub use service::{MarkdownService, RenderedPage};
pub use ws_config::{Config, ConfigError};
pub use ws_renderer::{Heading, Outline};
