//! Switch annotation families.
//!
//! Keys are matched by substring so that indexed or suffixed keys such as
//! `switcher.fn.kndp.io/disabled-network` still belong to their family.

use std::fmt;

/// Annotation naming resources to keep.
pub const ENABLED_ANNOTATION: &str = "switcher.fn.kndp.io/enabled";

/// Annotation naming resources to drop.
pub const DISABLED_ANNOTATION: &str = "switcher.fn.kndp.io/disabled";

/// The two annotation families that drive the switch policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwitchFamily {
    Enabled,
    Disabled,
}

impl SwitchFamily {
    pub const ALL: [SwitchFamily; 2] = [SwitchFamily::Enabled, SwitchFamily::Disabled];

    /// Canonical annotation name, also used as the template name when rendering.
    pub fn annotation(self) -> &'static str {
        match self {
            SwitchFamily::Enabled => ENABLED_ANNOTATION,
            SwitchFamily::Disabled => DISABLED_ANNOTATION,
        }
    }

    /// Whether an annotation key belongs to this family.
    pub fn matches(self, key: &str) -> bool {
        key.contains(self.annotation())
    }

    /// Families an annotation key belongs to. A key may match both.
    pub fn of_key(key: &str) -> impl Iterator<Item = SwitchFamily> + '_ {
        Self::ALL.into_iter().filter(move |family| family.matches(key))
    }
}

impl fmt::Display for SwitchFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SwitchFamily::Enabled => f.write_str("enabled"),
            SwitchFamily::Disabled => f.write_str("disabled"),
        }
    }
}
