use petstore_db_migrator::PETSTORE_DB_MIGRATIONS;
use sqlx::{Pool, Sqlite};

use super::*;

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_find_pet(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    let luna = tx.find_pet(PetId(2)).await?.expect("pet 2 is in the fixture");
    assert_eq!(luna.name, "Luna");
    assert_eq!(luna.allergic, Flag::Yes);
    assert_eq!(luna.special_attention, Flag::Unknown);
    assert_eq!(luna.observations, "scared of dryers");
    assert_eq!(luna.owner_id, OwnerId(2));

    assert!(tx.find_pet(PetId(99)).await?.is_none());

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_list_pets_joins_owners(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    let pets = tx.list_pets().await?;

    let summary: Vec<(i64, &str, &str)> = pets
        .iter()
        .map(|p| (p.pet.id.0, p.pet.name.as_str(), p.owner.name.as_str()))
        .collect();
    assert_eq!(
        summary,
        vec![(1, "Milo", "Ana"), (2, "Luna", "Luis"), (3, "Toby", "Luis")]
    );
    assert!(pets.iter().all(|p| p.pet.owner_id == p.owner.id));

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_insert_assigns_new_ids(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    let owner = tx
        .insert_owner(OwnerFields {
            name: "Marta".to_string(),
            phone: "555-0300".to_string(),
        })
        .await?;
    assert_eq!(owner.id, OwnerId(3));

    let pet = tx
        .insert_pet(
            PetFields {
                name: "Rocky".to_string(),
                breed: "Boxer".to_string(),
                color: "Fawn".to_string(),
                allergic: Flag::Unknown,
                special_attention: Flag::Yes,
                observations: String::new(),
            },
            owner.id,
        )
        .await?;
    assert_eq!(pet.id, PetId(4));
    assert_eq!(pet.owner_id, owner.id);
    assert_eq!(pet.special_attention, Flag::Yes);

    tx.commit().await?;

    let mut tx = store.begin().await?;
    assert_eq!(tx.find_pet(PetId(4)).await?, Some(pet));

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_dropped_transaction_rolls_back(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);

    {
        let mut tx = store.begin().await?;
        tx.insert_owner(OwnerFields {
            name: "Marta".to_string(),
            phone: "555-0300".to_string(),
        })
        .await?;
        assert!(tx.delete_pet(PetId(1)).await?);
    }

    let mut tx = store.begin().await?;
    assert_eq!(tx.list_owners().await?.len(), 2);
    assert!(tx.find_pet(PetId(1)).await?.is_some());

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_update_pet_keeps_owner_reference(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    let mut milo = tx.find_pet(PetId(1)).await?.expect("pet 1 is in the fixture");
    milo.name = "Milo Jr.".to_string();
    milo.allergic = Flag::Yes;
    // only the caller provided fields are written
    milo.owner_id = OwnerId(2);
    tx.update_pet(milo).await?;

    let stored = tx.find_pet(PetId(1)).await?.expect("pet 1 is in the fixture");
    assert_eq!(stored.name, "Milo Jr.");
    assert_eq!(stored.allergic, Flag::Yes);
    assert_eq!(stored.owner_id, OwnerId(1));

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_update_owner(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    tx.update_owner(Owner {
        id: OwnerId(1),
        name: "Ana Garcia".to_string(),
        phone: "555-0101".to_string(),
    })
    .await?;

    let ana = tx.find_owner(OwnerId(1)).await?.expect("owner 1 is in the fixture");
    assert_eq!(ana.name, "Ana Garcia");
    assert_eq!(ana.phone, "555-0101");

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_count_and_delete(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    assert_eq!(tx.count_pets_by_owner(OwnerId(2)).await?, 2);
    assert!(tx.delete_pet(PetId(2)).await?);
    assert!(!tx.delete_pet(PetId(2)).await?);
    assert_eq!(tx.count_pets_by_owner(OwnerId(2)).await?, 1);
    assert_eq!(tx.count_pets_by_owner(OwnerId(99)).await?, 0);

    assert!(!tx.delete_owner(OwnerId(99)).await?);

    Ok(())
}

#[sqlx::test(
    migrator = "PETSTORE_DB_MIGRATIONS",
    fixtures(path = "../../../fixtures", scripts("records"))
)]
async fn test_references_are_enforced(pool: Pool<Sqlite>) -> anyhow::Result<()> {
    let store = SqliteRecordStore::new(pool);
    let mut tx = store.begin().await?;

    let orphan = tx
        .insert_pet(
            PetFields {
                name: "Ghost".to_string(),
                breed: "Unknown".to_string(),
                color: "Black".to_string(),
                ..Default::default()
            },
            OwnerId(99),
        )
        .await;
    assert!(orphan.is_err());

    // Ana still has Milo
    assert!(tx.delete_owner(OwnerId(1)).await.is_err());

    Ok(())
}
