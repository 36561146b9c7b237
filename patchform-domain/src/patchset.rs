//! Inline named patch sets into template patch lists.

use crate::error::PatchSetError;
use patchform_types::input::{PatchSet, Resources};
use patchform_types::patch::{Patch, PatchType};
use std::collections::BTreeMap;

/// Replace each `PatchSet` patch with the patches of the named set, keeping
/// order. Set members are not expanded again.
pub fn expand_patches(patches: &[Patch], sets: &[PatchSet]) -> Result<Vec<Patch>, PatchSetError> {
    let by_name: BTreeMap<&str, &PatchSet> = sets.iter().map(|s| (s.name.as_str(), s)).collect();

    let mut out = Vec::with_capacity(patches.len());
    for patch in patches {
        if patch.kind != PatchType::PatchSet {
            out.push(patch.clone());
            continue;
        }
        let name = patch
            .patch_set_name
            .as_deref()
            .ok_or(PatchSetError::MissingName)?;
        let set = by_name.get(name).ok_or_else(|| PatchSetError::Undefined {
            name: name.to_string(),
        })?;
        if set.patches.iter().any(|p| p.kind == PatchType::PatchSet) {
            return Err(PatchSetError::Nested {
                name: name.to_string(),
            });
        }
        out.extend(set.patches.iter().cloned());
    }
    Ok(out)
}

/// Expand patch sets in every template of `input`, in place.
pub fn expand_resources(input: &mut Resources) -> Result<(), PatchSetError> {
    for template in input.resources.iter_mut() {
        template.patches = expand_patches(&template.patches, &input.patch_sets)?;
    }
    Ok(())
}
