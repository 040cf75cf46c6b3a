//! List persistence: named film lists over a [`KvStore`].
//!
//! The whole collection lives as one JSON object under [`STORAGE_KEY`].
//! Every mutation reads the full collection, changes it in memory and writes
//! it back wholesale; there is no partial update and no locking across
//! processes, so the last writer wins.
//!
//! Reads and writes treat an absent list differently: [`ListStore::get_list`]
//! returns an empty list, while every mutation on an absent name fails with
//! [`AppError::ListNotFound`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::film::{Film, FilmId};
use crate::store::KvStore;

/// Storage key holding the serialized [`ListCollection`].
pub const STORAGE_KEY: &str = "filmLists";

/// Reserved list used as a favourites flag-set.
pub const WATCHLIST: &str = "watchlist";

/// Ordered, id-deduplicated films under one name.
pub type FilmList = Vec<Film>;

/// Every list name mapped to its films.
pub type ListCollection = BTreeMap<String, FilmList>;

pub struct ListStore {
    store: Arc<dyn KvStore>,
}

impl ListStore {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Write an empty collection if nothing is stored yet.
    pub fn ensure_initialized(&self) -> Result<(), AppError> {
        if self.store.get(STORAGE_KEY)?.is_none() {
            info!(store = self.store.store_type(), "initialising empty list collection");
            self.save_lists(&ListCollection::new())?;
        }
        Ok(())
    }

    /// Read the full collection. An absent key reads as empty; a stored value
    /// that is not a JSON object of lists is [`AppError::StorageParse`].
    pub fn get_all_lists(&self) -> Result<ListCollection, AppError> {
        match self.store.get(STORAGE_KEY)? {
            None => Ok(ListCollection::new()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| AppError::StorageParse {
                key: STORAGE_KEY.to_string(),
                source,
            }),
        }
    }

    /// Overwrite the stored collection.
    pub fn save_lists(&self, lists: &ListCollection) -> Result<(), AppError> {
        let raw = serde_json::to_string(lists)
            .map_err(|e| AppError::Storage(format!("serialise lists: {e}")))?;
        self.store.set(STORAGE_KEY, &raw)
    }

    pub fn create_list(&self, name: &str) -> Result<FilmList, AppError> {
        let mut lists = self.get_all_lists()?;
        if lists.contains_key(name) {
            return Err(AppError::ListAlreadyExists(name.to_string()));
        }
        lists.insert(name.to_string(), FilmList::new());
        self.save_lists(&lists)?;
        debug!(list = name, "list created");
        Ok(FilmList::new())
    }

    /// Create `name` already holding `film`, in a single write. Fails with
    /// [`AppError::ListAlreadyExists`] like [`ListStore::create_list`].
    pub fn create_list_with(&self, name: &str, film: Film) -> Result<FilmList, AppError> {
        let mut lists = self.get_all_lists()?;
        if lists.contains_key(name) {
            return Err(AppError::ListAlreadyExists(name.to_string()));
        }
        debug!(list = name, film_id = %film.id, "list created with film");
        let list = vec![film];
        lists.insert(name.to_string(), list.clone());
        self.save_lists(&lists)?;
        Ok(list)
    }

    /// Films in `name`, or an empty list if no such list exists.
    pub fn get_list(&self, name: &str) -> Result<FilmList, AppError> {
        Ok(self.get_all_lists()?.remove(name).unwrap_or_default())
    }

    /// Names of every stored list, watchlist included.
    pub fn list_names(&self) -> Result<Vec<String>, AppError> {
        Ok(self.get_all_lists()?.into_keys().collect())
    }

    /// Append `film` unless a film with the same id is already there.
    /// Returns `true` if the list changed. A duplicate is not an error and
    /// does not write.
    pub fn add_film_to_list(&self, name: &str, film: Film) -> Result<bool, AppError> {
        let mut lists = self.get_all_lists()?;
        let list = lists
            .get_mut(name)
            .ok_or_else(|| AppError::ListNotFound(name.to_string()))?;

        if list.iter().any(|f| f.id == film.id) {
            debug!(list = name, film_id = %film.id, "film already in list");
            return Ok(false);
        }
        debug!(list = name, film_id = %film.id, "adding film");
        list.push(film);
        self.save_lists(&lists)?;
        Ok(true)
    }

    /// Drop every entry with `film_id`. Persists even when nothing matched.
    pub fn remove_film_from_list(&self, name: &str, film_id: &FilmId) -> Result<(), AppError> {
        let mut lists = self.get_all_lists()?;
        let list = lists
            .get_mut(name)
            .ok_or_else(|| AppError::ListNotFound(name.to_string()))?;
        list.retain(|f| &f.id != film_id);
        debug!(list = name, %film_id, "film removed");
        self.save_lists(&lists)
    }

    pub fn delete_list(&self, name: &str) -> Result<(), AppError> {
        let mut lists = self.get_all_lists()?;
        if lists.remove(name).is_none() {
            return Err(AppError::ListNotFound(name.to_string()));
        }
        debug!(list = name, "list deleted");
        self.save_lists(&lists)
    }

    /// Flip watchlist membership for `film`, creating the watchlist on first
    /// use. Returns `true` if the film was added, `false` if it was removed.
    pub fn toggle_watchlist(&self, film: Film) -> Result<bool, AppError> {
        let mut lists = self.get_all_lists()?;
        let watchlist = lists.entry(WATCHLIST.to_string()).or_default();

        let added = match watchlist.iter().position(|f| f.id == film.id) {
            Some(index) => {
                watchlist.remove(index);
                false
            }
            None => {
                watchlist.push(film);
                true
            }
        };

        self.save_lists(&lists)?;
        Ok(added)
    }

    pub fn is_in_watchlist(&self, film_id: &FilmId) -> Result<bool, AppError> {
        Ok(self
            .get_all_lists()?
            .get(WATCHLIST)
            .is_some_and(|list| list.iter().any(|f| &f.id == film_id)))
    }

    /// Discard whatever is stored and start over with an empty collection.
    ///
    /// This is the only way a corrupt value gets replaced; nothing calls it
    /// implicitly. A failed read only loses the byte count in the log.
    pub fn reset(&self) -> Result<(), AppError> {
        let discarded = match self.store.get(STORAGE_KEY) {
            Ok(raw) => raw.map(|raw| raw.len()).unwrap_or(0),
            Err(e) => {
                warn!(key = STORAGE_KEY, error = %e, "stored lists unreadable");
                0
            }
        };
        warn!(key = STORAGE_KEY, discarded_bytes = discarded, "resetting list collection");
        self.save_lists(&ListCollection::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn setup() -> (Arc<MemoryStore>, ListStore) {
        let raw = Arc::new(MemoryStore::new());
        let lists = ListStore::new(raw.clone());
        lists.ensure_initialized().unwrap();
        (raw, lists)
    }

    fn film(id: i64) -> Film {
        Film::new(id).with_field("title", format!("Film {id}"))
    }

    #[test]
    fn ensure_initialized_writes_empty_object() {
        let raw = Arc::new(MemoryStore::new());
        let lists = ListStore::new(raw.clone());
        assert_eq!(raw.get(STORAGE_KEY).unwrap(), None);

        lists.ensure_initialized().unwrap();
        assert_eq!(raw.get(STORAGE_KEY).unwrap(), Some("{}".into()));
    }

    #[test]
    fn ensure_initialized_keeps_existing_data() {
        let (raw, lists) = setup();
        lists.create_list("Favs").unwrap();
        lists.ensure_initialized().unwrap();
        assert_eq!(raw.get(STORAGE_KEY).unwrap(), Some(r#"{"Favs":[]}"#.into()));
    }

    #[test]
    fn create_then_get_is_empty() {
        let (_raw, lists) = setup();
        assert!(lists.create_list("Favs").unwrap().is_empty());
        assert!(lists.get_list("Favs").unwrap().is_empty());
        assert!(lists.get_all_lists().unwrap().contains_key("Favs"));
    }

    #[test]
    fn duplicate_create_fails_and_leaves_collection() {
        let (_raw, lists) = setup();
        lists.create_list("Favs").unwrap();
        lists.add_film_to_list("Favs", film(1)).unwrap();
        let before = lists.get_all_lists().unwrap();

        let err = lists.create_list("Favs").unwrap_err();
        assert!(matches!(err, AppError::ListAlreadyExists(name) if name == "Favs"));
        assert_eq!(lists.get_all_lists().unwrap(), before);
    }

    #[test]
    fn mutations_on_absent_list_fail_without_writing() {
        let (raw, lists) = setup();
        lists.create_list("Other").unwrap();
        let before = raw.get(STORAGE_KEY).unwrap();

        assert!(matches!(
            lists.add_film_to_list("Nope", film(1)),
            Err(AppError::ListNotFound(_))
        ));
        assert!(matches!(
            lists.remove_film_from_list("Nope", &FilmId::from(1)),
            Err(AppError::ListNotFound(_))
        ));
        assert!(matches!(lists.delete_list("Nope"), Err(AppError::ListNotFound(_))));
        assert_eq!(raw.get(STORAGE_KEY).unwrap(), before);
    }

    #[test]
    fn create_list_with_writes_once() {
        let (raw, lists) = setup();
        let created = lists.create_list_with("Favs", film(3)).unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(
            raw.get(STORAGE_KEY).unwrap(),
            Some(r#"{"Favs":[{"id":3,"title":"Film 3"}]}"#.into())
        );

        let err = lists.create_list_with("Favs", film(4)).unwrap_err();
        assert!(matches!(err, AppError::ListAlreadyExists(_)));
        assert_eq!(lists.get_list("Favs").unwrap(), created);
    }

    #[test]
    fn get_list_on_absent_name_is_empty() {
        let (_raw, lists) = setup();
        assert!(lists.get_list("never-created").unwrap().is_empty());
    }

    #[test]
    fn adding_same_id_twice_keeps_one_entry() {
        let (_raw, lists) = setup();
        lists.create_list("Favs").unwrap();
        assert!(lists.add_film_to_list("Favs", film(7)).unwrap());
        assert!(!lists.add_film_to_list("Favs", Film::new(7)).unwrap());

        let favs = lists.get_list("Favs").unwrap();
        assert_eq!(favs.len(), 1);
        assert_eq!(favs[0].label(), "Film 7");
    }

    #[test]
    fn stored_float_id_counts_as_duplicate() {
        let (raw, lists) = setup();
        raw.set(STORAGE_KEY, r#"{"Favs":[{"id":1.0,"title":"A"}]}"#).unwrap();

        assert!(!lists.add_film_to_list("Favs", Film::new(1)).unwrap());
        assert_eq!(lists.get_list("Favs").unwrap().len(), 1);
    }

    #[test]
    fn add_keeps_insertion_order() {
        let (_raw, lists) = setup();
        lists.create_list("Queue").unwrap();
        for id in [3, 1, 2] {
            lists.add_film_to_list("Queue", film(id)).unwrap();
        }
        let ids: Vec<_> = lists.get_list("Queue").unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FilmId::from(3), FilmId::from(1), FilmId::from(2)]);
    }

    #[test]
    fn remove_drops_every_duplicate() {
        let (_raw, lists) = setup();
        let mut collection = ListCollection::new();
        collection.insert("Dupes".into(), vec![film(1), film(2), film(1)]);
        lists.save_lists(&collection).unwrap();

        lists.remove_film_from_list("Dupes", &FilmId::from(1)).unwrap();
        let ids: Vec<_> = lists.get_list("Dupes").unwrap().into_iter().map(|f| f.id).collect();
        assert_eq!(ids, vec![FilmId::from(2)]);
    }

    #[test]
    fn remove_without_match_still_persists() {
        let raw = Arc::new(MemoryStore::new());
        let lists = ListStore::new(raw.clone());
        // Pretty-printed on purpose: a rewrite produces the compact form.
        raw.set(STORAGE_KEY, "{ \"Favs\": [] }").unwrap();

        lists.remove_film_from_list("Favs", &FilmId::from(99)).unwrap();
        assert_eq!(raw.get(STORAGE_KEY).unwrap(), Some(r#"{"Favs":[]}"#.into()));
    }

    #[test]
    fn delete_removes_key() {
        let (_raw, lists) = setup();
        lists.create_list("Favs").unwrap();
        lists.delete_list("Favs").unwrap();
        assert!(!lists.get_all_lists().unwrap().contains_key("Favs"));
    }

    #[test]
    fn toggle_watchlist_is_an_involution() {
        let (_raw, lists) = setup();
        let id = FilmId::from(11);
        assert!(!lists.is_in_watchlist(&id).unwrap());

        assert!(lists.toggle_watchlist(film(11)).unwrap());
        assert!(lists.is_in_watchlist(&id).unwrap());

        assert!(!lists.toggle_watchlist(film(11)).unwrap());
        assert!(!lists.is_in_watchlist(&id).unwrap());
        // The watchlist itself stays, now empty.
        assert_eq!(lists.get_all_lists().unwrap().get(WATCHLIST), Some(&FilmList::new()));
    }

    #[test]
    fn toggle_removes_only_first_match() {
        let (_raw, lists) = setup();
        let mut collection = ListCollection::new();
        collection.insert(WATCHLIST.into(), vec![film(5), film(5)]);
        lists.save_lists(&collection).unwrap();

        assert!(!lists.toggle_watchlist(film(5)).unwrap());
        assert_eq!(lists.get_list(WATCHLIST).unwrap().len(), 1);
    }

    #[test]
    fn is_in_watchlist_without_watchlist() {
        let (_raw, lists) = setup();
        lists.create_list("Favs").unwrap();
        assert!(!lists.is_in_watchlist(&FilmId::from(1)).unwrap());
    }

    #[test]
    fn save_then_read_roundtrips() {
        let (_raw, lists) = setup();
        let mut collection = ListCollection::new();
        collection.insert("A".into(), vec![film(1), Film::new("tt0111161")]);
        collection.insert("B".into(), Vec::new());
        lists.save_lists(&collection).unwrap();
        assert_eq!(lists.get_all_lists().unwrap(), collection);
    }

    #[test]
    fn absent_key_reads_empty() {
        let lists = ListStore::new(Arc::new(MemoryStore::new()));
        assert!(lists.get_all_lists().unwrap().is_empty());
    }

    #[test]
    fn corrupt_blob_is_reported_not_replaced() {
        let (raw, lists) = setup();
        raw.set(STORAGE_KEY, "{broken").unwrap();

        assert!(matches!(lists.get_all_lists(), Err(AppError::StorageParse { .. })));
        assert!(matches!(lists.create_list("Favs"), Err(AppError::StorageParse { .. })));
        assert_eq!(raw.get(STORAGE_KEY).unwrap(), Some("{broken".into()));
    }

    #[test]
    fn non_object_json_is_a_parse_error() {
        let (raw, lists) = setup();
        for bad in ["[]", "null", "42", r#"{"Favs":{}}"#] {
            raw.set(STORAGE_KEY, bad).unwrap();
            assert!(
                matches!(lists.get_all_lists(), Err(AppError::StorageParse { .. })),
                "expected parse error for {bad}"
            );
        }
    }

    #[test]
    fn reset_recovers_from_corruption() {
        let (raw, lists) = setup();
        raw.set(STORAGE_KEY, "garbage").unwrap();
        lists.reset().unwrap();
        assert!(lists.get_all_lists().unwrap().is_empty());
        lists.create_list("Fresh").unwrap();
    }

    #[test]
    fn list_names_include_watchlist() {
        let (_raw, lists) = setup();
        lists.create_list("Favs").unwrap();
        lists.toggle_watchlist(film(1)).unwrap();
        assert_eq!(lists.list_names().unwrap(), vec!["Favs".to_string(), WATCHLIST.to_string()]);
    }
}
