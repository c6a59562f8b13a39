use diesel::prelude::*;
use diesel::sql_types::{Nullable, Text};
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::session::{CredentialVerifier, SessionContext, UserRole};

/// Verifies credentials through the `verify_user_password` SQL function,
/// so password hashes never leave the database.
#[derive(Clone)]
pub struct DieselCredentialVerifier {
    pool: DbPool,
}

impl DieselCredentialVerifier {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, QueryableByName)]
struct VerifiedRow {
    #[diesel(sql_type = diesel::sql_types::Uuid)]
    user_id: Uuid,
    #[diesel(sql_type = Text)]
    email: String,
    #[diesel(sql_type = Text)]
    role: String,
    #[diesel(sql_type = Nullable<Text>)]
    full_name: Option<String>,
}

impl CredentialVerifier for DieselCredentialVerifier {
    fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<SessionContext>, DomainError> {
        let mut conn = self.pool.get()?;
        let row: Option<VerifiedRow> = diesel::sql_query(
            "SELECT user_id, email, role, full_name FROM verify_user_password($1, $2)",
        )
        .bind::<Text, _>(email)
        .bind::<Text, _>(password)
        .get_result(&mut conn)
        .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };
        let role = UserRole::parse(&row.role)
            .ok_or_else(|| DomainError::Store(format!("unknown role '{}'", row.role)))?;
        Ok(Some(SessionContext {
            user_id: row.user_id,
            email: Some(row.email),
            role,
            full_name: row.full_name,
        }))
    }
}
