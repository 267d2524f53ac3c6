//! Registered users and their packing lists.
//!
//! Every registered user owns exactly one packing list; adding a user
//! creates it, removing a user drops it.

use trip_planner_database::{DomainKey, PersistenceStore};
use trip_planner_trip_models::{PackingDocument, PackingItem, UsersDocument, next_id};

use crate::{TripError, read_or_default};

/// Loads registered users. Store failures read as no users.
pub async fn list_users(store: &PersistenceStore) -> UsersDocument {
    read_or_default(store, DomainKey::Users).await
}

/// Registers a user and creates their empty packing list.
///
/// # Errors
///
/// Returns [`TripError::EmptyUserName`] for a blank name,
/// [`TripError::DuplicateUser`] if the name is taken, and
/// [`TripError::Store`] on store failure.
pub async fn add_user(store: &PersistenceStore, name: &str) -> Result<UsersDocument, TripError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TripError::EmptyUserName);
    }

    let mut users: UsersDocument = store.load_typed(DomainKey::Users).await?;
    if users.users.iter().any(|u| u == name) {
        return Err(TripError::DuplicateUser {
            name: name.to_string(),
        });
    }
    users.users.push(name.to_string());
    store.save_typed(DomainKey::Users, &users).await?;

    let mut packing: PackingDocument = store.load_typed(DomainKey::Packing).await?;
    packing.0.entry(name.to_string()).or_default();
    store.save_typed(DomainKey::Packing, &packing).await?;

    log::info!("Added user {name}");
    Ok(users)
}

/// Unregisters a user and deletes their packing list. Unknown names are
/// ignored.
///
/// # Errors
///
/// Returns [`TripError::Store`] on store failure.
pub async fn remove_user(store: &PersistenceStore, name: &str) -> Result<UsersDocument, TripError> {
    let mut users: UsersDocument = store.load_typed(DomainKey::Users).await?;
    let before = users.users.len();
    users.users.retain(|u| u != name);
    if users.users.len() == before {
        return Ok(users);
    }
    store.save_typed(DomainKey::Users, &users).await?;

    let mut packing: PackingDocument = store.load_typed(DomainKey::Packing).await?;
    if packing.0.remove(name).is_some() {
        store.save_typed(DomainKey::Packing, &packing).await?;
    }

    log::info!("Removed user {name}");
    Ok(users)
}

/// Loads packing lists, creating an empty list for any registered user
/// that lacks one and saving the result back.
///
/// # Errors
///
/// Returns [`TripError::Store`] on store failure.
pub async fn load_packing(store: &PersistenceStore) -> Result<PackingDocument, TripError> {
    let users: UsersDocument = store.load_typed(DomainKey::Users).await?;
    let mut packing: PackingDocument = store.load_typed(DomainKey::Packing).await?;
    if packing.ensure_users(&users.users) {
        store.save_typed(DomainKey::Packing, &packing).await?;
    }
    Ok(packing)
}

/// Adds an item to a registered user's packing list and returns its id.
///
/// # Errors
///
/// Returns [`TripError::Store`] on store failure.
pub async fn add_packing_item(
    store: &PersistenceStore,
    user: &str,
    text: &str,
) -> Result<u64, TripError> {
    let mut packing = load_packing(store).await?;
    let list = packing.0.entry(user.to_string()).or_default();
    let id = next_id(list.iter().map(|item| item.id));
    list.push(PackingItem {
        id,
        text: text.trim().to_string(),
        packed: false,
    });
    store.save_typed(DomainKey::Packing, &packing).await?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::temp_store;

    #[tokio::test]
    async fn add_trims_and_creates_packing_list() {
        let (store, tmp) = temp_store("people_add");

        let users = add_user(&store, "  Ana ").await.unwrap();
        assert_eq!(users.users, vec!["Ana".to_string()]);

        let packing = load_packing(&store).await.unwrap();
        assert_eq!(packing.0.get("Ana"), Some(&Vec::new()));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn rejects_empty_and_duplicate_names() {
        let (store, tmp) = temp_store("people_reject");
        add_user(&store, "Ana").await.unwrap();

        assert!(matches!(add_user(&store, "   ").await, Err(TripError::EmptyUserName)));
        assert!(matches!(
            add_user(&store, " Ana").await,
            Err(TripError::DuplicateUser { .. })
        ));
        assert_eq!(list_users(&store).await.users.len(), 1);
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn remove_drops_packing_list() {
        let (store, tmp) = temp_store("people_remove");
        add_user(&store, "Ana").await.unwrap();
        add_user(&store, "Ben").await.unwrap();
        add_packing_item(&store, "Ana", "Sunscreen").await.unwrap();

        let users = remove_user(&store, "Ana").await.unwrap();
        assert_eq!(users.users, vec!["Ben".to_string()]);

        let packing = load_packing(&store).await.unwrap();
        assert!(!packing.0.contains_key("Ana"));
        assert!(packing.0.contains_key("Ben"));
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn packing_fills_in_missing_users() {
        let (store, tmp) = temp_store("people_sync");
        store
            .save(DomainKey::Users, &serde_json::json!({"users": ["Ana", "Ben"]}))
            .await
            .unwrap();
        store
            .save(
                DomainKey::Packing,
                &serde_json::json!({"Ana": [{"id": 1, "text": "Hat", "packed": true}]}),
            )
            .await
            .unwrap();

        let packing = load_packing(&store).await.unwrap();
        assert_eq!(packing.0["Ana"].len(), 1);
        assert!(packing.0["Ben"].is_empty());

        let stored = store.try_load(DomainKey::Packing).await.unwrap();
        assert!(stored.get("Ben").is_some());
        let _ = std::fs::remove_dir_all(&tmp);
    }

    #[tokio::test]
    async fn packing_item_ids_are_per_person() {
        let (store, tmp) = temp_store("people_items");
        add_user(&store, "Ana").await.unwrap();
        add_user(&store, "Ben").await.unwrap();

        assert_eq!(add_packing_item(&store, "Ana", "Hat").await.unwrap(), 1);
        assert_eq!(add_packing_item(&store, "Ana", "Map").await.unwrap(), 2);
        assert_eq!(add_packing_item(&store, "Ben", "Tent").await.unwrap(), 1);
        let _ = std::fs::remove_dir_all(&tmp);
    }
}
