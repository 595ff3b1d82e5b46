use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    /// Aggregate free capacity in the requested window is below the party size.
    #[error("Unfortunately, this time slot is no longer available.")]
    CapacityConflict,

    /// Aggregate capacity suffices but no single table can seat the party.
    #[error(
        "Sorry, while there is enough total space, no single table is available to accommodate your party at this time."
    )]
    FragmentationConflict,

    #[error("Cannot change reservation {id} from {from} to {to}")]
    InvalidTransition {
        id: i32,
        from: &'static str,
        to: &'static str,
    },

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether the caller may reasonably re-query availability and resubmit.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            DomainError::CapacityConflict | DomainError::FragmentationConflict
        )
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl From<InfraError> for DomainError {
    fn from(e: InfraError) -> Self {
        DomainError::Storage(e.to_string())
    }
}
