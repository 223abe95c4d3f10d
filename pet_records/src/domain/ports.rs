//! Contains the ports for owner and pet records

use crate::domain::model::{
    Owner, OwnerFields, OwnerId, Pet, PetFields, PetId, PetWithOwner, RecordError,
};

/// One unit of work against the record store.
/// Dropping the value without calling [RecordTx::commit] rolls every write back.
#[cfg_attr(test, mockall::automock)]
pub trait RecordTx: Send {
    /// Stores a new owner and returns it with its assigned id
    fn insert_owner(
        &mut self,
        fields: OwnerFields,
    ) -> impl Future<Output = anyhow::Result<Owner>> + Send;

    /// Looks up an owner by id
    fn find_owner(
        &mut self,
        id: OwnerId,
    ) -> impl Future<Output = anyhow::Result<Option<Owner>>> + Send;

    /// Overwrites the stored fields of an existing owner
    fn update_owner(&mut self, owner: Owner) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Removes an owner. Returns false when there was nothing to remove.
    fn delete_owner(&mut self, id: OwnerId) -> impl Future<Output = anyhow::Result<bool>> + Send;

    /// Every owner ordered by id
    fn list_owners(&mut self) -> impl Future<Output = anyhow::Result<Vec<Owner>>> + Send;

    /// Stores a new pet referencing `owner_id` and returns it with its assigned id
    fn insert_pet(
        &mut self,
        fields: PetFields,
        owner_id: OwnerId,
    ) -> impl Future<Output = anyhow::Result<Pet>> + Send;

    /// Looks up a pet by id
    fn find_pet(&mut self, id: PetId) -> impl Future<Output = anyhow::Result<Option<Pet>>> + Send;

    /// Overwrites the stored fields of an existing pet. The owner reference is not written.
    fn update_pet(&mut self, pet: Pet) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Removes a pet. Returns false when there was nothing to remove.
    fn delete_pet(&mut self, id: PetId) -> impl Future<Output = anyhow::Result<bool>> + Send;

    /// Every pet joined with its owner, in insertion order
    fn list_pets(&mut self) -> impl Future<Output = anyhow::Result<Vec<PetWithOwner>>> + Send;

    /// How many pets currently reference the owner
    fn count_pets_by_owner(
        &mut self,
        owner_id: OwnerId,
    ) -> impl Future<Output = anyhow::Result<u64>> + Send;

    /// Makes every write of this unit of work visible
    fn commit(self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Transactional storage for owners and pets
#[cfg_attr(test, mockall::automock(type Tx = MockRecordTx;))]
pub trait RecordStore: Send + Sync + 'static {
    /// The unit of work type handed out by [RecordStore::begin]
    type Tx: RecordTx;

    /// Opens a new unit of work
    fn begin(&self) -> impl Future<Output = anyhow::Result<Self::Tx>> + Send;
}

/// Pet operations. Every write keeps the pet and its owner consistent.
pub trait PetService: Send + Sync + 'static {
    /// Stores a new owner and a new pet that references it
    fn create_pet(
        &self,
        pet: PetFields,
        owner: OwnerFields,
    ) -> impl Future<Output = Result<PetWithOwner, RecordError>> + Send;

    /// Every pet with its owner
    fn list_pets(&self) -> impl Future<Output = Result<Vec<PetWithOwner>, RecordError>> + Send;

    /// A single pet with its owner
    fn get_pet(&self, id: PetId)
    -> impl Future<Output = Result<PetWithOwner, RecordError>> + Send;

    /// Overwrites the pet and the owner it references. The reference itself never changes.
    fn update_pet(
        &self,
        id: PetId,
        pet: PetFields,
        owner: OwnerFields,
    ) -> impl Future<Output = Result<PetWithOwner, RecordError>> + Send;

    /// Removes the pet, and its owner when no other pet references it
    fn delete_pet(&self, id: PetId) -> impl Future<Output = Result<(), RecordError>> + Send;
}

/// Direct owner operations, independent of the paired pet flow
pub trait OwnerService: Send + Sync + 'static {
    /// Every owner ordered by id
    fn list_owners(&self) -> impl Future<Output = Result<Vec<Owner>, RecordError>> + Send;

    /// A single owner
    fn get_owner(&self, id: OwnerId) -> impl Future<Output = Result<Owner, RecordError>> + Send;

    /// Stores a new owner without any pet
    fn create_owner(
        &self,
        owner: OwnerFields,
    ) -> impl Future<Output = Result<Owner, RecordError>> + Send;

    /// Overwrites name and phone of an owner
    fn update_owner(
        &self,
        id: OwnerId,
        owner: OwnerFields,
    ) -> impl Future<Output = Result<Owner, RecordError>> + Send;

    /// Removes an owner that no pet references anymore
    fn delete_owner(&self, id: OwnerId) -> impl Future<Output = Result<(), RecordError>> + Send;
}
