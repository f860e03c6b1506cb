use crate::domain::model::{ActivityCatalog, Slot};

/// Expands every activity into `capacity` unit slots, in catalog order.
pub fn expand_slots(catalog: &ActivityCatalog) -> Vec<Slot> {
    catalog
        .activities()
        .iter()
        .enumerate()
        .flat_map(|(activity, a)| (1..=a.capacity).map(move |index| Slot { activity, index }))
        .collect()
}
