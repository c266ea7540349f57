use crate::error::{Result, ShaderGenError};
use crate::model::ResourceBinding;
use shadergen_ir::source::ResourceDecl;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Assigns a `(set, slot)` to every resource of the program.
///
/// Explicit slots are honored as declared. The rest take the next free slot of
/// their set in declaration order; the set defaults to 0. Explicit collisions
/// are left for [`check_collisions`], which only looks at one model's resources.
pub(crate) fn assign_bindings(resources: &[ResourceDecl]) -> Vec<(u32, u32)> {
    let mut taken: HashSet<(u32, u32)> = resources
        .iter()
        .filter_map(|r| r.slot.map(|slot| (r.set.unwrap_or(0), slot)))
        .collect();

    let mut next_free: BTreeMap<u32, u32> = BTreeMap::new();
    let mut assigned = Vec::with_capacity(resources.len());
    for resource in resources {
        let set = resource.set.unwrap_or(0);
        let slot = match resource.slot {
            Some(slot) => slot,
            None => {
                let next = next_free.entry(set).or_insert(0);
                while taken.contains(&(set, *next)) {
                    *next += 1;
                }
                let slot = *next;
                taken.insert((set, slot));
                slot
            }
        };
        assigned.push((set, slot));
    }

    assigned
}

/// Fails on the first two resources sharing a `(set, slot)`, in declaration order.
pub(crate) fn check_collisions(resources: &[ResourceBinding]) -> Result<()> {
    let mut taken: HashMap<(u32, u32), &str> = HashMap::new();
    for resource in resources {
        if let Some(first) = taken.insert((resource.set, resource.slot), &resource.name) {
            return Err(ShaderGenError::DuplicateBinding {
                first: first.to_string(),
                second: resource.name.clone(),
                set: resource.set,
                slot: resource.slot,
            });
        }
    }
    Ok(())
}
