//! PostgreSQL Repository Implementations
//!
//! One store type implementing every repository trait over a shared
//! pool. The refresh-token conditional updates lean on Postgres
//! row-level atomicity: `UPDATE ... WHERE revoked = FALSE` flips each
//! row exactly once no matter how many callers race.

use chrono::{DateTime, Utc};
use kernel::id::{IdentityId, RoleId};
use platform::client::DeviceId;
use platform::password::HashedPassword;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{AuditEvent, Identity, RefreshToken};
use crate::domain::repository::{
    AuditRepository, IdentityRepository, RefreshTokenRepository, RoleRepository,
};
use crate::domain::value_object::{Email, IdentityStatus, RefreshSecret, Role, RoleName};
use crate::error::{AuthError, AuthResult};

/// PostgreSQL-backed auth store
#[derive(Clone)]
pub struct PgAuthStore {
    pool: PgPool,
}

impl PgAuthStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_role_names(&self, identity_id: &IdentityId) -> AuthResult<Vec<RoleName>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT r.role_name
            FROM auth_identity_role ir
            JOIN auth_role r ON r.role_id = ir.role_id
            WHERE ir.identity_id = $1
            ORDER BY r.role_name
            "#,
        )
        .bind(identity_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(names.into_iter().map(RoleName::from_db).collect())
    }

    async fn load_identity(&self, row: Option<IdentityRow>) -> AuthResult<Option<Identity>> {
        match row {
            Some(r) => {
                let identity_id = IdentityId::from_uuid(r.identity_id);
                let roles = self.load_role_names(&identity_id).await?;
                Ok(Some(r.into_identity(roles)?))
            }
            None => Ok(None),
        }
    }
}

// ============================================================================
// Identity Repository Implementation
// ============================================================================

impl IdentityRepository for PgAuthStore {
    async fn create(&self, identity: &Identity) -> AuthResult<()> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO auth_identity (
                identity_id,
                email,
                password_hash,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(identity.email.as_str())
        .bind(identity.password_hash.as_phc_string())
        .bind(identity.status.id())
        .bind(identity.created_at)
        .bind(identity.updated_at)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            // Unique violation on email becomes the domain conflict,
            // everything else stays a store error.
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return Err(AuthError::DuplicateIdentity);
                }
            }
            return Err(e.into());
        }

        let role_names: Vec<String> = identity.role_names();
        sqlx::query(
            r#"
            INSERT INTO auth_identity_role (identity_id, role_id)
            SELECT $1, role_id FROM auth_role WHERE role_name = ANY($2)
            "#,
        )
        .bind(identity.identity_id.as_uuid())
        .bind(&role_names)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(())
    }

    async fn find_by_id(&self, identity_id: &IdentityId) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                identity_id,
                email,
                password_hash,
                status,
                created_at,
                updated_at
            FROM auth_identity
            WHERE identity_id = $1
            "#,
        )
        .bind(identity_id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        self.load_identity(row).await
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            r#"
            SELECT
                identity_id,
                email,
                password_hash,
                status,
                created_at,
                updated_at
            FROM auth_identity
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        self.load_identity(row).await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM auth_identity WHERE email = $1)",
        )
        .bind(email.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }
}

// ============================================================================
// Role Repository Implementation
// ============================================================================

impl RoleRepository for PgAuthStore {
    async fn find_by_name(&self, name: &RoleName) -> AuthResult<Option<Role>> {
        let row = sqlx::query_as::<_, RoleRow>(
            "SELECT role_id, role_name FROM auth_role WHERE role_name = $1",
        )
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_role()))
    }
}

// ============================================================================
// Refresh Token Repository Implementation
// ============================================================================

impl RefreshTokenRepository for PgAuthStore {
    async fn insert(&self, token: &RefreshToken) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO refresh_token (
                token_id,
                identity_id,
                secret,
                device_id,
                origin_ip,
                expires_at,
                revoked,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(token.token_id.as_uuid())
        .bind(token.owner_id.as_uuid())
        .bind(token.secret.as_str())
        .bind(token.device_id.as_str())
        .bind(&token.origin_ip)
        .bind(token.expires_at)
        .bind(token.revoked)
        .bind(token.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_secret(&self, secret: &RefreshSecret) -> AuthResult<Option<RefreshToken>> {
        let row = sqlx::query_as::<_, RefreshTokenRow>(
            r#"
            SELECT
                token_id,
                identity_id,
                secret,
                device_id,
                origin_ip,
                expires_at,
                revoked,
                created_at
            FROM refresh_token
            WHERE secret = $1
            "#,
        )
        .bind(secret.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| r.into_token()))
    }

    async fn revoke_if_live(&self, secret: &RefreshSecret) -> AuthResult<bool> {
        let flipped = sqlx::query(
            "UPDATE refresh_token SET revoked = TRUE WHERE secret = $1 AND revoked = FALSE",
        )
        .bind(secret.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(flipped == 1)
    }

    async fn revoke_live_for_device(
        &self,
        owner_id: &IdentityId,
        device_id: &DeviceId,
    ) -> AuthResult<u64> {
        let flipped = sqlx::query(
            r#"
            UPDATE refresh_token SET revoked = TRUE
            WHERE identity_id = $1 AND device_id = $2 AND revoked = FALSE
            "#,
        )
        .bind(owner_id.as_uuid())
        .bind(device_id.as_str())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(flipped)
    }

    async fn revoke_all_for_identity(&self, owner_id: &IdentityId) -> AuthResult<u64> {
        let flipped = sqlx::query(
            "UPDATE refresh_token SET revoked = TRUE WHERE identity_id = $1 AND revoked = FALSE",
        )
        .bind(owner_id.as_uuid())
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(flipped)
    }

    async fn purge_for_identity(&self, owner_id: &IdentityId) -> AuthResult<u64> {
        let deleted = sqlx::query("DELETE FROM refresh_token WHERE identity_id = $1")
            .bind(owner_id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        tracing::info!(
            identity_id = %owner_id,
            deleted,
            "Purged refresh token history"
        );

        Ok(deleted)
    }
}

// ============================================================================
// Audit Repository Implementation
// ============================================================================

impl AuditRepository for PgAuthStore {
    async fn append(&self, event: &AuditEvent) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_audit_log (
                event_id,
                identity_id,
                event_type,
                ip_address,
                created_at
            ) VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(event.event_id.as_uuid())
        .bind(event.identity_id.as_uuid())
        .bind(event.event_type.code())
        .bind(&event.ip_address)
        .bind(event.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct IdentityRow {
    identity_id: Uuid,
    email: String,
    password_hash: String,
    status: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl IdentityRow {
    fn into_identity(self, roles: Vec<RoleName>) -> AuthResult<Identity> {
        let password_hash = HashedPassword::from_phc_string(self.password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash in store: {}", e)))?;

        Ok(Identity {
            identity_id: IdentityId::from_uuid(self.identity_id),
            email: Email::from_db(self.email),
            password_hash,
            status: IdentityStatus::from_id(self.status).unwrap_or_default(),
            roles,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RoleRow {
    role_id: Uuid,
    role_name: String,
}

impl RoleRow {
    fn into_role(self) -> Role {
        Role {
            role_id: RoleId::from_uuid(self.role_id),
            name: RoleName::from_db(self.role_name),
        }
    }
}

#[derive(sqlx::FromRow)]
struct RefreshTokenRow {
    token_id: Uuid,
    identity_id: Uuid,
    secret: String,
    device_id: String,
    origin_ip: Option<String>,
    expires_at: DateTime<Utc>,
    revoked: bool,
    created_at: DateTime<Utc>,
}

impl RefreshTokenRow {
    fn into_token(self) -> RefreshToken {
        RefreshToken {
            token_id: kernel::id::RefreshTokenId::from_uuid(self.token_id),
            owner_id: IdentityId::from_uuid(self.identity_id),
            secret: RefreshSecret::from_db(self.secret),
            device_id: DeviceId::from_db(self.device_id),
            origin_ip: self.origin_ip,
            expires_at: self.expires_at,
            revoked: self.revoked,
            created_at: self.created_at,
        }
    }
}
