//! Storage location and compartment service (reference data)

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{StorageCompartment, StorageLocation};
use shared::validation::validate_compartment_code;

/// Location service for managing storage locations and compartments
#[derive(Clone)]
pub struct LocationService {
    db: PgPool,
}

#[derive(Debug, FromRow)]
struct LocationRow {
    id: Uuid,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl LocationRow {
    fn into_model(self) -> StorageLocation {
        StorageLocation {
            id: self.id,
            name: self.name,
            description: self.description,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct CompartmentRow {
    id: Uuid,
    location_id: Uuid,
    code: String,
    name: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CompartmentRow {
    fn into_model(self) -> StorageCompartment {
        StorageCompartment {
            id: self.id,
            location_id: self.location_id,
            code: self.code,
            name: self.name,
            is_active: self.is_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Input for creating a storage location
#[derive(Debug, Deserialize)]
pub struct CreateLocationInput {
    pub name: String,
    pub description: Option<String>,
}

/// Input for updating a storage location
#[derive(Debug, Deserialize)]
pub struct UpdateLocationInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
}

/// Input for creating a compartment within a location
#[derive(Debug, Deserialize)]
pub struct CreateCompartmentInput {
    pub code: String,
    pub name: Option<String>,
}

/// Input for updating a compartment
#[derive(Debug, Deserialize)]
pub struct UpdateCompartmentInput {
    pub name: Option<String>,
    pub is_active: Option<bool>,
}

impl LocationService {
    /// Create a new LocationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a storage location
    pub async fn create_location(&self, input: CreateLocationInput) -> AppResult<StorageLocation> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Location name must not be empty".to_string(),
                message_de: "Name des Lagerorts darf nicht leer sein".to_string(),
            });
        }

        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            INSERT INTO storage_locations (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(input.name.trim())
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_model())
    }

    /// List all storage locations
    pub async fn list_locations(&self) -> AppResult<Vec<StorageLocation>> {
        let rows = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM storage_locations
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(LocationRow::into_model).collect())
    }

    /// Get a storage location by id
    pub async fn get_location(&self, location_id: Uuid) -> AppResult<StorageLocation> {
        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            SELECT id, name, description, is_active, created_at, updated_at
            FROM storage_locations
            WHERE id = $1
            "#,
        )
        .bind(location_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Storage location".to_string()))?;

        Ok(row.into_model())
    }

    /// Update a storage location
    pub async fn update_location(
        &self,
        location_id: Uuid,
        input: UpdateLocationInput,
    ) -> AppResult<StorageLocation> {
        let existing = self.get_location(location_id).await?;

        let row = sqlx::query_as::<_, LocationRow>(
            r#"
            UPDATE storage_locations
            SET name = $1, description = $2, is_active = $3, updated_at = NOW()
            WHERE id = $4
            RETURNING id, name, description, is_active, created_at, updated_at
            "#,
        )
        .bind(input.name.unwrap_or(existing.name))
        .bind(input.description.or(existing.description))
        .bind(input.is_active.unwrap_or(existing.is_active))
        .bind(location_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_model())
    }

    /// Create a compartment within a location
    pub async fn create_compartment(
        &self,
        location_id: Uuid,
        input: CreateCompartmentInput,
    ) -> AppResult<StorageCompartment> {
        validate_compartment_code(&input.code).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
            message_de: "Fachcode muss aus 2-16 Großbuchstaben oder Ziffern bestehen".to_string(),
        })?;

        // Location must exist and be active
        let location = self.get_location(location_id).await?;
        if !location.is_active {
            return Err(AppError::Validation {
                field: "location_id".to_string(),
                message: "Location is inactive".to_string(),
                message_de: "Lagerort ist deaktiviert".to_string(),
            });
        }

        // Code must be unique within the location
        let code_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM storage_compartments WHERE location_id = $1 AND code = $2)",
        )
        .bind(location_id)
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if code_taken {
            return Err(AppError::DuplicateEntry("compartment code".to_string()));
        }

        let row = sqlx::query_as::<_, CompartmentRow>(
            r#"
            INSERT INTO storage_compartments (location_id, code, name)
            VALUES ($1, $2, $3)
            RETURNING id, location_id, code, name, is_active, created_at, updated_at
            "#,
        )
        .bind(location_id)
        .bind(&input.code)
        .bind(&input.name)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_model())
    }

    /// List compartments of a location
    pub async fn list_compartments(&self, location_id: Uuid) -> AppResult<Vec<StorageCompartment>> {
        self.get_location(location_id).await?;

        let rows = sqlx::query_as::<_, CompartmentRow>(
            r#"
            SELECT id, location_id, code, name, is_active, created_at, updated_at
            FROM storage_compartments
            WHERE location_id = $1
            ORDER BY code ASC
            "#,
        )
        .bind(location_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(CompartmentRow::into_model).collect())
    }

    /// Get a compartment by id
    pub async fn get_compartment(&self, compartment_id: Uuid) -> AppResult<StorageCompartment> {
        let row = sqlx::query_as::<_, CompartmentRow>(
            r#"
            SELECT id, location_id, code, name, is_active, created_at, updated_at
            FROM storage_compartments
            WHERE id = $1
            "#,
        )
        .bind(compartment_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Compartment".to_string()))?;

        Ok(row.into_model())
    }

    /// Update a compartment's name or active flag
    pub async fn update_compartment(
        &self,
        compartment_id: Uuid,
        input: UpdateCompartmentInput,
    ) -> AppResult<StorageCompartment> {
        let existing = self.get_compartment(compartment_id).await?;

        let row = sqlx::query_as::<_, CompartmentRow>(
            r#"
            UPDATE storage_compartments
            SET name = $1, is_active = $2, updated_at = NOW()
            WHERE id = $3
            RETURNING id, location_id, code, name, is_active, created_at, updated_at
            "#,
        )
        .bind(input.name.or(existing.name))
        .bind(input.is_active.unwrap_or(existing.is_active))
        .bind(compartment_id)
        .fetch_one(&self.db)
        .await?;

        Ok(row.into_model())
    }
}
