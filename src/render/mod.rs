//! Page rendering.
//!
//! | Module      | Purpose                                               |
//! |-------------|-------------------------------------------------------|
//! | `component` | Component trait, page props, Handlebars templates      |
//! | `boundary`  | Suspends on code and data, renders the committed route |
//! | `head`      | Head tags, JSON-LD, client head manager                |
//! | `server`    | `ServerRender`: path to complete page                  |

pub mod boundary;
pub mod component;
pub mod head;
pub mod server;

pub use boundary::{Frame, NOT_FOUND_MARKUP, RenderBoundary};
pub use component::{Component, PageProps, TemplateComponent, TemplateRegistry, component_fn};
pub use head::{DocumentHead, HeadManager, HeadTag};
pub use server::{Rendered, ServerRender, SiteRenderer};
