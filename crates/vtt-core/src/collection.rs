//! The session holds several ordered collections keyed by a string id
//! (tokens, players, characters, NPCs). Every insert/replace/remove the
//! reducer performs on them goes through the functions here.

/// An item that carries a string id unique within its collection.
pub trait Identified {
    /// The item's id.
    fn id(&self) -> &str;
}

/// What an [`upsert`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upserted {
    /// No item had the id; the item was appended.
    Inserted,
    /// An item with the id was replaced in place.
    Replaced,
}

/// Position of the item with `id`, if any.
pub fn position<T: Identified>(items: &[T], id: &str) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// Find an item by id.
pub fn find<'a, T: Identified>(items: &'a [T], id: &str) -> Option<&'a T> {
    items.iter().find(|item| item.id() == id)
}

/// Find an item by id, mutably.
pub fn find_mut<'a, T: Identified>(items: &'a mut [T], id: &str) -> Option<&'a mut T> {
    items.iter_mut().find(|item| item.id() == id)
}

/// Replace the item with the same id in place, or append it.
pub fn upsert<T: Identified>(items: &mut Vec<T>, item: T) -> Upserted {
    match position(items, item.id()) {
        Some(idx) => {
            items[idx] = item;
            Upserted::Replaced
        }
        None => {
            items.push(item);
            Upserted::Inserted
        }
    }
}

/// Append the item unless one with the same id exists. Returns true if appended.
pub fn insert_if_absent<T: Identified>(items: &mut Vec<T>, item: T) -> bool {
    if position(items, item.id()).is_some() {
        return false;
    }
    items.push(item);
    true
}

/// Replace the item with the same id. Returns false (and drops the item) if absent.
pub fn replace_existing<T: Identified>(items: &mut [T], item: T) -> bool {
    match position(items, item.id()) {
        Some(idx) => {
            items[idx] = item;
            true
        }
        None => false,
    }
}

/// Remove the item with `id`, preserving the order of the rest.
pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: &str) -> Option<T> {
    position(items, id).map(|idx| items.remove(idx))
}

/// The first id that occurs more than once, if any.
pub fn first_duplicate_id<T: Identified>(items: &[T]) -> Option<&str> {
    let mut seen = std::collections::HashSet::new();
    items
        .iter()
        .map(Identified::id)
        .find(|id| !seen.insert(*id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: String,
        value: u32,
    }

    impl Identified for Item {
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn item(id: &str, value: u32) -> Item {
        Item {
            id: id.to_string(),
            value,
        }
    }

    #[test]
    fn upsert_inserts_then_replaces() {
        let mut items = vec![item("a", 1)];
        assert_eq!(upsert(&mut items, item("b", 2)), Upserted::Inserted);
        assert_eq!(upsert(&mut items, item("a", 9)), Upserted::Replaced);
        assert_eq!(items, vec![item("a", 9), item("b", 2)]);
    }

    #[test]
    fn insert_if_absent_is_idempotent() {
        let mut items = vec![item("a", 1)];
        assert!(!insert_if_absent(&mut items, item("a", 5)));
        assert_eq!(items[0].value, 1);
        assert!(insert_if_absent(&mut items, item("b", 2)));
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn replace_existing_ignores_unknown() {
        let mut items = vec![item("a", 1)];
        assert!(!replace_existing(&mut items, item("z", 3)));
        assert_eq!(items, vec![item("a", 1)]);
        assert!(replace_existing(&mut items, item("a", 3)));
        assert_eq!(items[0].value, 3);
    }

    #[test]
    fn remove_keeps_order() {
        let mut items = vec![item("a", 1), item("b", 2), item("c", 3)];
        assert_eq!(remove_by_id(&mut items, "b"), Some(item("b", 2)));
        assert_eq!(items, vec![item("a", 1), item("c", 3)]);
        assert_eq!(remove_by_id(&mut items, "b"), None);
    }

    #[test]
    fn finds_duplicates() {
        let items = vec![item("a", 1), item("b", 2), item("a", 3)];
        assert_eq!(first_duplicate_id(&items), Some("a"));
        assert_eq!(first_duplicate_id(&items[..2]), None);
    }

    #[test]
    fn find_and_find_mut() {
        let mut items = vec![item("a", 1)];
        assert_eq!(find(&items, "a").map(|i| i.value), Some(1));
        if let Some(i) = find_mut(&mut items, "a") {
            i.value = 7;
        }
        assert_eq!(items[0].value, 7);
        assert!(find(&items, "x").is_none());
    }
}
