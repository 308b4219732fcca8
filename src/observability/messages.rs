// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for pipeline warnings.
//!
//! Each warning the pipeline can emit is a small struct with a `Display`
//! implementation; the wording lives here, not in the stage code.

use std::fmt::{Display, Formatter};

/// A participant declared a dimensionality outside {2, 3}.
///
/// # Log Level
/// `warn!` - the value is replaced by the default, generation continues
pub struct DimensionalityClamped<'a> {
    pub participant: &'a str,
    pub declared: i64,
    pub fallback: u8,
}

impl Display for DimensionalityClamped<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Dimensionality of participant {} is defined as {}. Setting it to {}.",
            self.participant, self.declared, self.fallback
        )
    }
}

/// A data name matched neither the extensive nor the intensive vocabulary.
pub struct DataDefaultedIntensive<'a> {
    pub data: &'a str,
}

impl Display for DataDefaultedIntensive<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Data \"{}\" is neither extensive nor intensive. Choosing default intensive with corresponding read-mapping.",
            self.data
        )
    }
}

/// A patch carried both extensive and intensive data and was split in two.
pub struct PatchSplit<'a> {
    pub participant: &'a str,
    pub patch: &'a str,
    pub extensive_patch: &'a str,
    pub intensive_patch: &'a str,
}

impl Display for PatchSplit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Split patch \"{}\" of participant {} into extensive patch \"{}\" and intensive patch \"{}\".",
            self.patch, self.participant, self.extensive_patch, self.intensive_patch
        )
    }
}

/// A data name was exchanged in both directions and one direction was renamed.
pub struct DataUniquified<'a> {
    pub data: &'a str,
    pub from_participant: &'a str,
    pub to_participant: &'a str,
    pub new_name: &'a str,
}

impl Display for DataUniquified<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Data name \"{}\" is exchanged by participants {} and {} in both directions. Using \"{}\" for one direction.",
            self.data, self.from_participant, self.to_participant, self.new_name
        )
    }
}

/// One data name was declared both scalar and vector; vector wins.
pub struct DataTypeEscalated<'a> {
    pub data: &'a str,
}

impl Display for DataTypeEscalated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Data {} is used by multiple exchanges with different data types. Using data-type=\"vector\" for all exchanges.",
            self.data
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_split_message_names_both_halves() {
        let msg = PatchSplit {
            participant: "Solid",
            patch: "interface",
            extensive_patch: "interface-extensive",
            intensive_patch: "interface-intensive",
        };
        let text = msg.to_string();
        assert!(text.contains("interface-extensive"));
        assert!(text.contains("interface-intensive"));
    }

    #[test]
    fn uniquified_message_names_both_directions() {
        let msg = DataUniquified {
            data: "heat",
            from_participant: "B",
            to_participant: "A",
            new_name: "Magnificent-Heat",
        };
        assert!(msg.to_string().contains("Magnificent-Heat"));
    }
}
