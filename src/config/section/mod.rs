//! Configuration section definitions.
//!
//! Each module corresponds to a section in `folio.toml`:
//!
//! | Module    | TOML Section | Purpose                                  |
//! |-----------|--------------|------------------------------------------|
//! | `site`    | `[site]`     | Page index, metadata document, base URL  |
//! | `content` | `[content]`  | Slot attribute, Markdown options, limits |
//! | `profile` | `[profile]`  | Profile container and image splice       |
//! | `nav`     | `[nav]`      | Sidebar classes, focus margin, offset    |
//! | `render`  | `[render]`   | Output file of `folio render`            |
//! | `serve`   | `[serve]`    | Preview server and live reload           |

mod content;
mod nav;
mod profile;
mod render;
mod serve;
mod site;

pub use content::ContentConfig;
pub use nav::NavConfig;
pub use profile::ProfileConfig;
pub use render::RenderConfig;
pub use serve::ServeConfig;
pub use site::SiteSectionConfig;
