//! Contains the lifecycle rules that keep owners and pets consistent

use petstore_error_response::FieldErrors;

use crate::domain::{
    model::{Owner, OwnerFields, OwnerId, PetFields, PetId, PetWithOwner, RecordError},
    ports::{OwnerService, PetService, RecordStore, RecordTx},
};


/// Implementation of [PetService] and [OwnerService] on top of a [RecordStore].
/// Holds no state between calls; every operation runs in exactly one unit of work.
#[derive(Debug, Clone)]
pub struct LifecycleManager<S> {
    store: S,
}

impl<S: RecordStore> LifecycleManager<S> {
    /// Creates a new LifecycleManager
    pub fn new(store: S) -> Self {
        Self { store }
    }
}

fn validate_pet_payload(pet: &PetFields, owner: &OwnerFields) -> Result<(), RecordError> {
    let mut errors = FieldErrors::new();
    pet.collect_errors(&mut errors);
    owner.collect_errors(&mut errors, "ownerName", "ownerPhone");
    errors.into_result().map_err(RecordError::ValidationFailed)
}

fn validate_owner_payload(owner: &OwnerFields) -> Result<(), RecordError> {
    let mut errors = FieldErrors::new();
    owner.collect_errors(&mut errors, "name", "phone");
    errors.into_result().map_err(RecordError::ValidationFailed)
}

impl<S: RecordStore> PetService for LifecycleManager<S> {
    #[tracing::instrument(skip(self), err)]
    async fn create_pet(
        &self,
        pet: PetFields,
        owner: OwnerFields,
    ) -> Result<PetWithOwner, RecordError> {
        validate_pet_payload(&pet, &owner)?;

        let mut tx = self.store.begin().await?;
        // the owner id has to exist before the pet can reference it
        let owner = tx.insert_owner(owner).await?;
        let pet = tx.insert_pet(pet, owner.id).await?;
        tx.commit().await?;

        tracing::info!(pet_id=%pet.id, owner_id=%owner.id, "pet created");
        Ok(PetWithOwner { pet, owner })
    }

    #[tracing::instrument(skip(self), err)]
    async fn list_pets(&self) -> Result<Vec<PetWithOwner>, RecordError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_pets().await?)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_pet(&self, id: PetId) -> Result<PetWithOwner, RecordError> {
        let mut tx = self.store.begin().await?;
        let pet = tx
            .find_pet(id)
            .await?
            .ok_or(RecordError::PetDoesNotExist(id))?;
        let owner = tx
            .find_owner(pet.owner_id)
            .await?
            .ok_or(RecordError::OwnerDoesNotExist(pet.owner_id))?;

        Ok(PetWithOwner { pet, owner })
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_pet(
        &self,
        id: PetId,
        pet_fields: PetFields,
        owner_fields: OwnerFields,
    ) -> Result<PetWithOwner, RecordError> {
        validate_pet_payload(&pet_fields, &owner_fields)?;

        let mut tx = self.store.begin().await?;
        let mut pet = tx
            .find_pet(id)
            .await?
            .ok_or(RecordError::PetDoesNotExist(id))?;
        pet.apply(pet_fields);
        tx.update_pet(pet.clone()).await?;

        let mut owner = tx
            .find_owner(pet.owner_id)
            .await?
            .ok_or(RecordError::OwnerDoesNotExist(pet.owner_id))?;
        owner.apply(owner_fields);
        tx.update_owner(owner.clone()).await?;

        tx.commit().await?;

        Ok(PetWithOwner { pet, owner })
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_pet(&self, id: PetId) -> Result<(), RecordError> {
        let mut tx = self.store.begin().await?;
        let pet = tx
            .find_pet(id)
            .await?
            .ok_or(RecordError::PetDoesNotExist(id))?;

        if !tx.delete_pet(id).await? {
            return Err(RecordError::PetDoesNotExist(id));
        }

        // counted after the delete so the pet being removed is not included
        let remaining = tx.count_pets_by_owner(pet.owner_id).await?;
        if remaining == 0 {
            tx.delete_owner(pet.owner_id).await?;
            tracing::info!(owner_id=%pet.owner_id, "owner removed with its last pet");
        }

        tx.commit().await?;
        Ok(())
    }
}

impl<S: RecordStore> OwnerService for LifecycleManager<S> {
    #[tracing::instrument(skip(self), err)]
    async fn list_owners(&self) -> Result<Vec<Owner>, RecordError> {
        let mut tx = self.store.begin().await?;
        Ok(tx.list_owners().await?)
    }

    #[tracing::instrument(skip(self), err)]
    async fn get_owner(&self, id: OwnerId) -> Result<Owner, RecordError> {
        let mut tx = self.store.begin().await?;
        tx.find_owner(id)
            .await?
            .ok_or(RecordError::OwnerDoesNotExist(id))
    }

    #[tracing::instrument(skip(self), err)]
    async fn create_owner(&self, fields: OwnerFields) -> Result<Owner, RecordError> {
        validate_owner_payload(&fields)?;

        let mut tx = self.store.begin().await?;
        let owner = tx.insert_owner(fields).await?;
        tx.commit().await?;

        Ok(owner)
    }

    #[tracing::instrument(skip(self), err)]
    async fn update_owner(&self, id: OwnerId, fields: OwnerFields) -> Result<Owner, RecordError> {
        validate_owner_payload(&fields)?;

        let mut tx = self.store.begin().await?;
        let mut owner = tx
            .find_owner(id)
            .await?
            .ok_or(RecordError::OwnerDoesNotExist(id))?;
        owner.apply(fields);
        tx.update_owner(owner.clone()).await?;
        tx.commit().await?;

        Ok(owner)
    }

    #[tracing::instrument(skip(self), err)]
    async fn delete_owner(&self, id: OwnerId) -> Result<(), RecordError> {
        let mut tx = self.store.begin().await?;
        if tx.find_owner(id).await?.is_none() {
            return Err(RecordError::OwnerDoesNotExist(id));
        }

        let pets = tx.count_pets_by_owner(id).await?;
        if pets > 0 {
            return Err(RecordError::OwnerHasPets { owner_id: id, pets });
        }

        tx.delete_owner(id).await?;
        tx.commit().await?;
        Ok(())
    }
}
