//! Contains the models for owners and pets

use petstore_error_response::FieldErrors;

/// Identifier of an [Owner], assigned by the record store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OwnerId(pub i64);

/// Identifier of a [Pet], assigned by the record store on creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PetId(pub i64);

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::fmt::Display for PetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Yes / no answer that may not have been asked yet.
/// The text forms `-`, `SI` and `NO` are shared by the api and the database.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, strum::EnumString, strum::Display, strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Flag {
    /// Not answered
    #[default]
    #[strum(to_string = "-")]
    Unknown,
    /// Yes
    #[strum(to_string = "SI", serialize = "YES")]
    Yes,
    /// No
    #[strum(to_string = "NO")]
    No,
}

/// The fields of an owner that callers provide
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OwnerFields {
    /// Display name
    pub name: String,
    /// Contact phone number
    pub phone: String,
}

impl OwnerFields {
    /// Records blank required fields under the given field names
    pub fn collect_errors(&self, errors: &mut FieldErrors, name_field: &str, phone_field: &str) {
        errors.require_non_blank(name_field, &self.name);
        errors.require_non_blank(phone_field, &self.phone);
    }
}

/// The fields of a pet that callers provide
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PetFields {
    /// Name of the pet
    pub name: String,
    /// Breed
    pub breed: String,
    /// Coat color
    pub color: String,
    /// Whether the pet has known allergies
    pub allergic: Flag,
    /// Whether the pet needs special attention during grooming
    pub special_attention: Flag,
    /// Free text notes, may be empty
    pub observations: String,
}

impl PetFields {
    /// Records blank required fields
    pub fn collect_errors(&self, errors: &mut FieldErrors) {
        errors.require_non_blank("name", &self.name);
        errors.require_non_blank("breed", &self.breed);
        errors.require_non_blank("color", &self.color);
    }
}

/// A stored owner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    /// The id of the owner
    pub id: OwnerId,
    /// Display name
    pub name: String,
    /// Contact phone number
    pub phone: String,
}

impl Owner {
    /// Overwrites every caller provided field, the id is kept
    pub fn apply(&mut self, fields: OwnerFields) {
        let OwnerFields { name, phone } = fields;
        self.name = name;
        self.phone = phone;
    }
}

/// A stored pet. The owner is referenced by id only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pet {
    /// The id of the pet
    pub id: PetId,
    /// Name of the pet
    pub name: String,
    /// Breed
    pub breed: String,
    /// Coat color
    pub color: String,
    /// Whether the pet has known allergies
    pub allergic: Flag,
    /// Whether the pet needs special attention during grooming
    pub special_attention: Flag,
    /// Free text notes
    pub observations: String,
    /// The owner this pet belongs to
    pub owner_id: OwnerId,
}

impl Pet {
    /// Overwrites every caller provided field. The id and the owner reference are kept.
    pub fn apply(&mut self, fields: PetFields) {
        let PetFields {
            name,
            breed,
            color,
            allergic,
            special_attention,
            observations,
        } = fields;
        self.name = name;
        self.breed = breed;
        self.color = color;
        self.allergic = allergic;
        self.special_attention = special_attention;
        self.observations = observations;
    }
}

/// A pet together with the owner it references
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetWithOwner {
    /// The pet
    pub pet: Pet,
    /// The owner referenced by `pet.owner_id`
    pub owner: Owner,
}

/// Errors for owner and pet records
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The pet does not exist
    #[error("Pet {0} does not exist")]
    PetDoesNotExist(PetId),
    /// The owner does not exist
    #[error("Owner {0} does not exist")]
    OwnerDoesNotExist(OwnerId),
    /// The owner is still referenced by pets and cannot be removed
    #[error("Owner {owner_id} still has {pets} pet(s)")]
    OwnerHasPets {
        /// The owner that was asked to be deleted
        owner_id: OwnerId,
        /// How many pets reference the owner
        pets: u64,
    },
    /// Required fields are missing
    #[error("Validation failed: {0}")]
    ValidationFailed(FieldErrors),
    /// Storage layer error
    #[error("Storage layer error {0}")]
    StorageLayerError(#[from] anyhow::Error),
}

impl RecordError {
    /// true for the variants that mean the requested record is absent
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RecordError::PetDoesNotExist(_) | RecordError::OwnerDoesNotExist(_)
        )
    }
}
