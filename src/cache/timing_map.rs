use std::{collections::HashMap, hash::Hash};

/// A map whose entries carry an expiry time. Entries without a time never expire.
#[derive(Debug, Clone)]
pub struct TimingMap<K: Hash + Eq, V, T> {
    items: HashMap<K, V>,
    timetable: HashMap<K, T>,
}

impl<K, V, T> TimingMap<K, V, T>
where
    K: Hash + Eq,
    T: Ord,
{
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.items.get(key)
    }

    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> &mut V {
        self.items.entry(key).or_insert_with(default)
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.timetable.remove(key);
        self.items.remove(key)
    }

    /// Sets the expiry of `key`, returning the previous one.
    pub fn refresh(&mut self, key: K, time: T) -> Option<T> {
        self.timetable.insert(key, time)
    }

    pub fn expires_at(&self, key: &K) -> Option<&T> {
        self.timetable.get(key)
    }

    /// Removes and returns every entry that expires at or before `time`.
    pub fn drain_expired(&mut self, time: &T) -> Vec<(K, V)> {
        let (drained, remaining): (HashMap<K, T>, HashMap<K, T>) = self
            .timetable
            .drain()
            .partition(|(_, expiry)| expiry <= time);
        self.timetable = remaining;

        drained
            .into_keys()
            .filter_map(|key| self.items.remove_entry(&key))
            .collect()
    }
}

impl<K, V, T> Default for TimingMap<K, V, T>
where
    K: Hash + Eq,
{
    fn default() -> Self {
        Self {
            items: HashMap::default(),
            timetable: HashMap::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(mut items: Vec<(char, &'static str)>) -> Vec<(char, &'static str)> {
        items.sort_by_key(|(key, _)| *key);
        items
    }

    #[test]
    fn insert_and_expiration() {
        let mut map: TimingMap<char, &'static str, i32> = TimingMap::default();
        map.get_or_insert_with('A', || "Ina Norman");
        map.get_or_insert_with('B', || "Mabelle Byrd");
        map.get_or_insert_with('C', || "Michael Stokes");

        map.refresh('A', 1);
        map.refresh('B', 1);
        map.refresh('C', 3);

        let expired_items = sorted(map.drain_expired(&1));
        assert_eq!(
            expired_items,
            vec![('A', "Ina Norman"), ('B', "Mabelle Byrd")]
        );

        let expired_items = map.drain_expired(&2);
        assert_eq!(expired_items, vec![], "no items should be expired yet");

        let expired_items = map.drain_expired(&3);
        assert_eq!(
            expired_items,
            vec![('C', "Michael Stokes")],
            "final remaining item should be expired"
        );
        assert!(map.is_empty());
    }

    #[test]
    fn refresh_pushes_expiry_back() {
        let mut map: TimingMap<char, &'static str, i32> = TimingMap::default();
        map.get_or_insert_with('A', || "Ina Norman");
        map.refresh('A', 1);
        assert_eq!(map.refresh('A', 5), Some(1));

        assert_eq!(map.drain_expired(&4), vec![]);
        assert_eq!(map.get(&'A'), Some(&"Ina Norman"));
        assert_eq!(map.expires_at(&'A'), Some(&5));
    }

    #[test]
    fn drained_item_should_not_show_up_again() {
        let mut map: TimingMap<char, &'static str, i32> = TimingMap::default();
        map.get_or_insert_with('A', || "Ina Norman");
        map.refresh('A', 1);

        assert_eq!(map.drain_expired(&1), vec![('A', "Ina Norman")]);
        map.refresh('A', 2);

        assert_eq!(map.drain_expired(&2), vec![]);
        assert_eq!(map.len(), 0);
    }

    #[test]
    fn removed_item_loses_its_expiry() {
        let mut map: TimingMap<char, &'static str, i32> = TimingMap::default();
        map.get_or_insert_with('A', || "Ina Norman");
        map.refresh('A', 1);

        assert_eq!(map.remove(&'A'), Some("Ina Norman"));
        assert_eq!(map.expires_at(&'A'), None);
        assert_eq!(map.drain_expired(&1), vec![]);
    }

    #[test]
    fn existing_value_is_kept() {
        let mut map: TimingMap<char, Vec<u8>, i32> = TimingMap::default();
        map.get_or_insert_with('A', Vec::new).push(1);
        map.get_or_insert_with('A', Vec::new).push(2);

        assert_eq!(map.get(&'A'), Some(&vec![1, 2]));
    }
}
