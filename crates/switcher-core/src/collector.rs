//! Collection of switch annotations into enable and disable lists.

use std::collections::BTreeMap;

use tracing::debug;

use crate::annotations::SwitchFamily;
use crate::error::SwitchResult;
use crate::filter::filter_desired;
use crate::template::{RenderContext, TemplateRenderer};

/// Resource names collected from the switch annotations of one composite.
///
/// A list is `None` when no annotation of its family exists. That disables
/// the family's policy entirely; it is not the same as an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Switches {
    enabled: Option<Vec<String>>,
    disabled: Option<Vec<String>>,
}

impl Switches {
    pub fn new(enabled: Option<Vec<String>>, disabled: Option<Vec<String>>) -> Self {
        Self { enabled, disabled }
    }

    pub fn enabled(&self) -> Option<&[String]> {
        self.enabled.as_deref()
    }

    pub fn disabled(&self) -> Option<&[String]> {
        self.disabled.as_deref()
    }

    /// True when neither family is present and filtering keeps everything.
    pub fn is_pass_through(&self) -> bool {
        self.enabled.is_none() && self.disabled.is_none()
    }

    /// Append a rendered annotation value to its family's list.
    ///
    /// The value is split on `,` without trimming, so `""` adds a single
    /// empty name and `"a, b"` adds `" b"`.
    pub fn push_rendered(&mut self, family: SwitchFamily, rendered: &str) {
        let list = match family {
            SwitchFamily::Enabled => &mut self.enabled,
            SwitchFamily::Disabled => &mut self.disabled,
        };
        list.get_or_insert_with(Vec::new)
            .extend(rendered.split(',').map(str::to_owned));
    }

    /// Prune `desired` in place and return the names that were removed.
    pub fn apply<R>(&self, desired: &mut BTreeMap<String, R>) -> Vec<String> {
        let before: Vec<String> = desired.keys().cloned().collect();
        filter_desired(desired, self.disabled(), self.enabled());
        before
            .into_iter()
            .filter(|name| !desired.contains_key(name))
            .collect()
    }
}

/// Scan annotations and render every switch annotation value.
///
/// A key matching both families feeds both lists. The first render failure
/// aborts the collection; no partial result is returned.
pub fn collect_switches(
    annotations: &BTreeMap<String, String>,
    context: &RenderContext,
) -> SwitchResult<Switches> {
    let renderer = TemplateRenderer::new();
    let mut switches = Switches::default();

    for (key, value) in annotations {
        for family in SwitchFamily::of_key(key) {
            let rendered = renderer.render(value, family.annotation(), context)?;
            debug!(
                annotation = %key,
                %family,
                rendered = %rendered,
                "Collected switch annotation"
            );
            switches.push_rendered(family, &rendered);
        }
    }

    Ok(switches)
}
