//! # User Repository
//!
//! Database operations for accounts, store onboarding, and verification.
//!
//! ## Store Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Store Lifecycle                                    │
//! │                                                                         │
//! │  1. FIRST LOGIN                                                        │
//! │     └── ensure_user() → User { role: Unassigned }                      │
//! │                                                                         │
//! │  2. ONBOARD                                                            │
//! │     └── onboard_store(profile) → role: MedicineStore,                  │
//! │         verification: PENDING                                          │
//! │         (guarded: only an UNASSIGNED user can take a role)             │
//! │                                                                         │
//! │  3. REVIEW (admin)                                                     │
//! │     └── set_verification() → VERIFIED or REJECTED                      │
//! │                                                                         │
//! │  4. (IF REJECTED) RESUBMIT                                             │
//! │     └── resubmit_verification() → PENDING again                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Role and status guards run as conditional UPDATEs; a zero-row result is
//! diagnosed with a follow-up read so the caller gets the precise conflict.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use medimart_core::{CoreError, StoreSummary, User, UserRole, VerificationStatus};

/// Required profile fields for store onboarding.
#[derive(Debug, Clone)]
pub struct StoreProfile {
    pub store_name: String,
    pub store_address: String,
    pub store_phone: String,
    pub store_license: String,
    pub store_description: Option<String>,
}

/// Mutable store profile fields. The license is immutable after
/// onboarding and deliberately absent here.
#[derive(Debug, Clone)]
pub struct StoreContact {
    pub store_name: String,
    pub store_address: String,
    pub store_phone: String,
    pub store_description: Option<String>,
}

/// Repository for user database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = UserRepository::new(pool);
///
/// let user = repo.ensure_user("auth-sub", "Jo Doe", "jo@example.com").await?;
/// let store = repo.onboard_store(&user.id, &profile).await?;
/// ```
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

const USER_COLUMNS: &str = r#"
    id, auth_id, name, email, role,
    store_name, store_address, store_phone, store_license, store_description,
    store_verification_status, created_at, updated_at
"#;

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Gets a user by the identity-provider subject.
    pub async fn get_by_auth_id(&self, auth_id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE auth_id = ?"
        ))
        .bind(auth_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by row id.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Gets a user by row id, or fails with NotFound.
    async fn get_required(&self, id: &str) -> DbResult<User> {
        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }

    /// Fetches the account for an identity-provider subject, creating an
    /// `UNASSIGNED` row on first sight.
    ///
    /// ## Arguments
    /// * `auth_id` - Subject claim from the bearer token
    /// * `name` / `email` - Profile claims, stored on first creation
    ///
    /// ## Concurrency
    /// Two racing first logins both try the INSERT; the loser hits the
    /// UNIQUE(auth_id) index and falls back to reading the winner's row.
    pub async fn ensure_user(&self, auth_id: &str, name: &str, email: &str) -> DbResult<User> {
        if let Some(user) = self.get_by_auth_id(auth_id).await? {
            return Ok(user);
        }

        let id = Uuid::new_v4().to_string();
        let now = Utc::now();

        debug!(auth_id = %auth_id, id = %id, "Creating user");

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (
                id, auth_id, name, email, role,
                store_verification_status, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(auth_id)
        .bind(name)
        .bind(email)
        .bind(UserRole::Unassigned)
        .bind(VerificationStatus::Unset)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await;

        match inserted.map_err(DbError::from) {
            Ok(_) => self.get_required(&id).await,
            Err(DbError::UniqueViolation { .. }) => {
                // Lost the race; the row exists now.
                self.get_by_auth_id(auth_id)
                    .await?
                    .ok_or_else(|| DbError::not_found("User", auth_id))
            }
            Err(e) => Err(e),
        }
    }

    /// Assigns the `PATIENT` role to an `UNASSIGNED` user.
    ///
    /// ## Returns
    /// * `Ok(User)` - Role assigned
    /// * `Err(Domain(RoleAlreadyAssigned))` - User already holds a role
    pub async fn onboard_patient(&self, user_id: &str) -> DbResult<User> {
        debug!(user_id = %user_id, "Onboarding patient");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = ?, updated_at = ?
            WHERE id = ? AND role = ?
            "#,
        )
        .bind(UserRole::Patient)
        .bind(now)
        .bind(user_id)
        .bind(UserRole::Unassigned)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let user = self.get_required(user_id).await?;
            return Err(CoreError::RoleAlreadyAssigned { role: user.role }.into());
        }

        self.get_required(user_id).await
    }

    /// Converts an `UNASSIGNED` user into a `MEDICINE_STORE` with the
    /// given profile. Verification starts `PENDING`.
    ///
    /// ## Returns
    /// * `Ok(User)` - Store onboarded
    /// * `Err(Domain(RoleAlreadyAssigned))` - User already holds a role
    pub async fn onboard_store(&self, user_id: &str, profile: &StoreProfile) -> DbResult<User> {
        debug!(user_id = %user_id, store_name = %profile.store_name, "Onboarding store");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = ?,
                store_name = ?,
                store_address = ?,
                store_phone = ?,
                store_license = ?,
                store_description = ?,
                store_verification_status = ?,
                updated_at = ?
            WHERE id = ? AND role = ?
            "#,
        )
        .bind(UserRole::MedicineStore)
        .bind(&profile.store_name)
        .bind(&profile.store_address)
        .bind(&profile.store_phone)
        .bind(&profile.store_license)
        .bind(profile.store_description.as_deref())
        .bind(VerificationStatus::Pending)
        .bind(now)
        .bind(user_id)
        .bind(UserRole::Unassigned)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let user = self.get_required(user_id).await?;
            return Err(CoreError::RoleAlreadyAssigned { role: user.role }.into());
        }

        self.get_required(user_id).await
    }

    /// Updates the mutable store profile fields.
    ///
    /// The license column is not touched here; it is fixed at onboarding.
    pub async fn update_store_profile(
        &self,
        store_id: &str,
        contact: &StoreContact,
    ) -> DbResult<User> {
        debug!(store_id = %store_id, "Updating store profile");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET store_name = ?,
                store_address = ?,
                store_phone = ?,
                store_description = ?,
                updated_at = ?
            WHERE id = ? AND role = ?
            "#,
        )
        .bind(&contact.store_name)
        .bind(&contact.store_address)
        .bind(&contact.store_phone)
        .bind(contact.store_description.as_deref())
        .bind(now)
        .bind(store_id)
        .bind(UserRole::MedicineStore)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", store_id));
        }

        self.get_required(store_id).await
    }

    /// Re-submits a store for verification review.
    ///
    /// ## Guards
    /// Allowed only from `UNSET` or `REJECTED`:
    /// * already `VERIFIED` → `Domain(StoreAlreadyVerified)`
    /// * already `PENDING` → `Domain(VerificationAlreadyPending)`
    pub async fn resubmit_verification(&self, store_id: &str) -> DbResult<User> {
        debug!(store_id = %store_id, "Resubmitting verification");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET store_verification_status = ?, updated_at = ?
            WHERE id = ? AND role = ? AND store_verification_status IN (?, ?)
            "#,
        )
        .bind(VerificationStatus::Pending)
        .bind(now)
        .bind(store_id)
        .bind(UserRole::MedicineStore)
        .bind(VerificationStatus::Unset)
        .bind(VerificationStatus::Rejected)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            let user = self.get_required(store_id).await?;
            if user.role != UserRole::MedicineStore {
                return Err(DbError::not_found("Store", store_id));
            }
            return match user.store_verification_status {
                VerificationStatus::Verified => Err(CoreError::StoreAlreadyVerified.into()),
                _ => Err(CoreError::VerificationAlreadyPending.into()),
            };
        }

        self.get_required(store_id).await
    }

    /// Records an admin verification decision for a store.
    pub async fn set_verification(
        &self,
        store_id: &str,
        status: VerificationStatus,
    ) -> DbResult<User> {
        debug!(store_id = %store_id, status = ?status, "Setting verification status");

        let now = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE users
            SET store_verification_status = ?, updated_at = ?
            WHERE id = ? AND role = ?
            "#,
        )
        .bind(status)
        .bind(now)
        .bind(store_id)
        .bind(UserRole::MedicineStore)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Store", store_id));
        }

        self.get_required(store_id).await
    }

    /// Lists every `VERIFIED` store as a public summary.
    pub async fn list_verified_stores(&self) -> DbResult<Vec<StoreSummary>> {
        let stores = sqlx::query_as::<_, StoreSummary>(
            r#"
            SELECT id, name, store_name, store_address, store_phone,
                   store_description, created_at
            FROM users
            WHERE role = ? AND store_verification_status = ?
            ORDER BY store_name, name
            "#,
        )
        .bind(UserRole::MedicineStore)
        .bind(VerificationStatus::Verified)
        .fetch_all(&self.pool)
        .await?;

        Ok(stores)
    }

    /// Lists stores for admin review, optionally filtered by
    /// verification status. Newest first.
    pub async fn list_stores(&self, status: Option<VerificationStatus>) -> DbResult<Vec<User>> {
        let stores = match status {
            Some(status) => {
                sqlx::query_as::<_, User>(&format!(
                    r#"
                    SELECT {USER_COLUMNS} FROM users
                    WHERE role = ? AND store_verification_status = ?
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(UserRole::MedicineStore)
                .bind(status)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, User>(&format!(
                    r#"
                    SELECT {USER_COLUMNS} FROM users
                    WHERE role = ?
                    ORDER BY created_at DESC
                    "#
                ))
                .bind(UserRole::MedicineStore)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(stores)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    fn profile() -> StoreProfile {
        StoreProfile {
            store_name: "City Pharmacy".into(),
            store_address: "12 Harbour Road, Dockside".into(),
            store_phone: "+1 555 010 9900".into(),
            store_license: "PH-2291".into(),
            store_description: Some("Open late, full prescription counter.".into()),
        }
    }

    #[tokio::test]
    async fn test_ensure_user_is_idempotent() {
        let db = test_db().await;
        let repo = db.users();

        let first = repo.ensure_user("auth-1", "Jo", "jo@example.com").await.unwrap();
        assert_eq!(first.role, UserRole::Unassigned);

        let second = repo.ensure_user("auth-1", "Jo", "jo@example.com").await.unwrap();
        assert_eq!(first.id, second.id);
    }

    #[tokio::test]
    async fn test_onboard_store_sets_role_and_pending() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo.ensure_user("auth-1", "Jo", "jo@example.com").await.unwrap();
        let store = repo.onboard_store(&user.id, &profile()).await.unwrap();

        assert_eq!(store.role, UserRole::MedicineStore);
        assert_eq!(
            store.store_verification_status,
            VerificationStatus::Pending
        );
        assert_eq!(store.store_name.as_deref(), Some("City Pharmacy"));
    }

    #[tokio::test]
    async fn test_onboarding_twice_conflicts() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo.ensure_user("auth-1", "Jo", "jo@example.com").await.unwrap();
        repo.onboard_store(&user.id, &profile()).await.unwrap();

        let err = repo.onboard_patient(&user.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::RoleAlreadyAssigned {
                role: UserRole::MedicineStore
            })
        ));
    }

    #[tokio::test]
    async fn test_resubmit_verification_guards() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo.ensure_user("auth-1", "Jo", "jo@example.com").await.unwrap();
        let store = repo.onboard_store(&user.id, &profile()).await.unwrap();

        // Already pending from onboarding
        let err = repo.resubmit_verification(&store.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::VerificationAlreadyPending)
        ));

        // Rejected stores may resubmit
        repo.set_verification(&store.id, VerificationStatus::Rejected)
            .await
            .unwrap();
        let resubmitted = repo.resubmit_verification(&store.id).await.unwrap();
        assert_eq!(
            resubmitted.store_verification_status,
            VerificationStatus::Pending
        );

        // Verified stores may not
        repo.set_verification(&store.id, VerificationStatus::Verified)
            .await
            .unwrap();
        let err = repo.resubmit_verification(&store.id).await.unwrap_err();
        assert!(matches!(
            err,
            DbError::Domain(CoreError::StoreAlreadyVerified)
        ));
    }

    #[tokio::test]
    async fn test_only_verified_stores_are_listed() {
        let db = test_db().await;
        let repo = db.users();

        let a = repo.ensure_user("auth-a", "A", "a@example.com").await.unwrap();
        let b = repo.ensure_user("auth-b", "B", "b@example.com").await.unwrap();
        repo.onboard_store(&a.id, &profile()).await.unwrap();
        repo.onboard_store(&b.id, &profile()).await.unwrap();
        repo.set_verification(&a.id, VerificationStatus::Verified)
            .await
            .unwrap();

        let listed = repo.list_verified_stores().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, a.id);

        let under_review = repo
            .list_stores(Some(VerificationStatus::Pending))
            .await
            .unwrap();
        assert_eq!(under_review.len(), 1);
        assert_eq!(under_review[0].id, b.id);
    }

    #[tokio::test]
    async fn test_profile_update_requires_store() {
        let db = test_db().await;
        let repo = db.users();

        let user = repo.ensure_user("auth-1", "Jo", "jo@example.com").await.unwrap();
        let contact = StoreContact {
            store_name: "Renamed Pharmacy".into(),
            store_address: "99 New Street, Uptown".into(),
            store_phone: "+1 555 788 1200".into(),
            store_description: None,
        };

        // Not a store yet
        let err = repo.update_store_profile(&user.id, &contact).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        repo.onboard_store(&user.id, &profile()).await.unwrap();
        let updated = repo.update_store_profile(&user.id, &contact).await.unwrap();
        assert_eq!(updated.store_name.as_deref(), Some("Renamed Pharmacy"));
        // License survives profile updates
        assert_eq!(updated.store_license.as_deref(), Some("PH-2291"));
    }
}
