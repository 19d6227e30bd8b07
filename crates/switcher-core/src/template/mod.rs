//! Annotation value templates.
//!
//! Annotation values are Tera templates rendered against the whole function
//! request. Plain values without template directives come back unchanged, so
//! `switcher.fn.kndp.io/disabled: "bucket"` keeps working as a literal list.

mod engine;
mod filters;

pub use engine::{RenderContext, TemplateRenderer};
