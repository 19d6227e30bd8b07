//! Switch resolution and desired resource filtering for composition functions.
//!
//! A composite resource carries switch annotations whose values list the
//! composed resources to keep or to drop:
//!
//! ```yaml
//! metadata:
//!   annotations:
//!     switcher.fn.kndp.io/disabled: "bucket,{{ observed.composite.resource.spec.optional | csv }}"
//! ```
//!
//! This crate turns those annotations into a [`Switches`] value and prunes a
//! map of named resources with it. It knows nothing about the function
//! request envelope; callers hand it an annotation map, a render context and
//! the desired resource map.
//!
//! # Modules
//!
//! - [`annotations`]: Switch annotation families and their wire names
//! - [`template`]: Tera rendering of annotation values against the request
//! - [`metadata`]: Typed decoding of composite resource metadata
//! - [`collector`]: Annotation scanning into enable/disable lists
//! - [`filter`]: The enable/disable policy over a resource map
//! - [`error`]: Error types shared by all stages

pub mod annotations;
pub mod collector;
pub mod error;
pub mod filter;
pub mod metadata;
pub mod template;

pub use annotations::{SwitchFamily, DISABLED_ANNOTATION, ENABLED_ANNOTATION};
pub use collector::{collect_switches, Switches};
pub use error::{SwitchError, SwitchResult, SwitchStage};
pub use filter::{filter_desired, is_switched_on};
pub use metadata::{decode_composite_metadata, ObjectMeta};
pub use template::{RenderContext, TemplateRenderer};
