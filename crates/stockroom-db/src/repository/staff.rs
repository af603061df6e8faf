//! # Staff Repository
//!
//! The staff directory: who sales are attributed to, and the display names
//! reports and sale listings show.

use chrono::Utc;
use sqlx::{Executor, QueryBuilder, Sqlite, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use stockroom_core::input::NewStaff;
use stockroom_core::validation::validate_uuid;
use stockroom_core::{CoreError, Staff};

#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    pub async fn find_by_id<'e, E>(executor: E, id: &str) -> DbResult<Option<Staff>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        let staff = sqlx::query_as::<_, Staff>("SELECT * FROM staff WHERE id = ?1")
            .bind(id)
            .fetch_optional(executor)
            .await?;

        Ok(staff)
    }

    /// Loads every staff member whose id is in `ids`. Missing ids are skipped.
    pub async fn find_by_ids<'e, E>(executor: E, ids: &[String]) -> DbResult<Vec<Staff>>
    where
        E: Executor<'e, Database = Sqlite>,
    {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut qb = QueryBuilder::<Sqlite>::new("SELECT * FROM staff WHERE id IN (");
        let mut list = qb.separated(", ");
        for id in ids {
            list.push_bind(id.clone());
        }
        list.push_unseparated(")");

        let staff = qb.build_query_as::<Staff>().fetch_all(executor).await?;
        Ok(staff)
    }

    /// Validates and registers a staff member.
    ///
    /// ## Errors
    /// * `DbError::Domain(Validation)` - missing or malformed field
    /// * `DbError::UniqueViolation` - employee ID already registered
    pub async fn create(&self, input: NewStaff) -> DbResult<Staff> {
        let staff = input.build(Uuid::new_v4().to_string(), Utc::now())?;

        debug!(employee_id = %staff.employee_id, "Inserting staff member");

        sqlx::query(
            r#"
            INSERT INTO staff (
                id, employee_id, first_name, last_name, email,
                department, position, is_active, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&staff.id)
        .bind(&staff.employee_id)
        .bind(&staff.first_name)
        .bind(&staff.last_name)
        .bind(&staff.email)
        .bind(&staff.department)
        .bind(&staff.position)
        .bind(staff.is_active)
        .bind(staff.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&staff.employee_id))?;

        info!(id = %staff.id, employee_id = %staff.employee_id, "Staff member created");
        Ok(staff)
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Staff>> {
        Self::find_by_id(&self.pool, id).await
    }

    /// Looks up one staff member by a caller-supplied id.
    ///
    /// ## Errors
    /// * `DbError::Domain(Validation)` - `id` is not a UUID
    /// * `DbError::Domain(StaffNotFound)` - no such staff member
    pub async fn get(&self, id: &str) -> DbResult<Staff> {
        validate_uuid("id", id)?;

        let staff = self
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::StaffNotFound(id.to_string()))?;
        Ok(staff)
    }

    /// All staff, alphabetically by name.
    pub async fn list(&self) -> DbResult<Vec<Staff>> {
        let staff = sqlx::query_as::<_, Staff>(
            "SELECT * FROM staff ORDER BY first_name ASC, last_name ASC, employee_id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(staff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn new_staff(employee_id: &str, first: &str) -> NewStaff {
        NewStaff {
            employee_id: employee_id.to_string(),
            first_name: first.to_string(),
            last_name: "Okafor".to_string(),
            email: None,
            department: "Sales".to_string(),
            position: "Clerk".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_get_list() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.staff();

        let zara = repo.create(new_staff("EMP-2", "Zara")).await.unwrap();
        let ada = repo.create(new_staff("EMP-1", "Ada")).await.unwrap();

        let found = repo.get_by_id(&ada.id).await.unwrap().unwrap();
        assert_eq!(found.display_name(), "Ada Okafor");
        assert!(found.is_active);

        let names: Vec<String> = repo.list().await.unwrap().iter().map(Staff::display_name).collect();
        assert_eq!(names, ["Ada Okafor", "Zara Okafor"]);

        let ids = vec![zara.id.clone(), "missing".to_string()];
        let found = StaffRepository::find_by_ids(db.pool(), &ids).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].employee_id, "EMP-2");
    }

    #[tokio::test]
    async fn test_duplicate_employee_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.staff().create(new_staff("EMP-1", "Ada")).await.unwrap();

        let err = db.staff().create(new_staff("EMP-1", "Bola")).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "EMP-1"));
    }

    #[tokio::test]
    async fn test_get_unknown_staff() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let ada = db.staff().create(new_staff("EMP-1", "Ada")).await.unwrap();
        assert_eq!(db.staff().get(&ada.id).await.unwrap().employee_id, "EMP-1");

        let missing = "6f1c2a4e-8b7d-4c3f-9a2e-1d5b6c7e8f90";
        let err = db.staff().get(missing).await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::StaffNotFound(ref id)) if id == missing));

        let err = db.staff().get("42").await.unwrap_err();
        assert!(matches!(err, DbError::Domain(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_names() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let err = db.staff().create(new_staff("EMP-1", "  ")).await.unwrap_err();
        assert!(err.is_domain());
    }
}
