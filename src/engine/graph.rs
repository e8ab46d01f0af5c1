use std::collections::BTreeMap;

use super::Resource;

/// Resolve parent-id references into parent/children links.
///
/// Resources whose parent is null or not present in `resources` stay roots.
/// Not idempotent: a second pass would duplicate children, so callers run it once
/// on a freshly built collection. Returns the number of links made.
pub fn link_hierarchy(resources: &mut BTreeMap<String, Resource>) -> usize {
    let links: Vec<(String, String)> = resources
        .values()
        .filter_map(|r| {
            let pid = r.parent_id.as_ref()?;
            (pid != &r.id && resources.contains_key(pid)).then(|| (r.id.clone(), pid.clone()))
        })
        .collect();

    for (child_id, parent_id) in &links {
        if let Some(child) = resources.get_mut(child_id) {
            child.parent = Some(parent_id.clone());
        }
        if let Some(parent) = resources.get_mut(parent_id) {
            parent.children.push(child_id.clone());
        }
    }

    links.len()
}
