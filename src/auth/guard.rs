// Store-scoped ownership authorization. Every mutating handler funnels
// through authorize() before touching the target store's resources.

use uuid::Uuid;

use crate::database::manager::DatabaseManager;
use crate::database::models::store::Store;
use crate::error::ApiError;
use crate::middleware::identity::Identity;

/// Check that the caller owns the store targeted by the request.
///
/// Denied with 401 when no caller identity is present, 403 when the store
/// does not exist or belongs to someone else. Allowed returns the owned
/// store row. No side effects; the result must short-circuit the handler.
pub async fn authorize(identity: &Identity, store_id: Uuid) -> Result<Store, ApiError> {
    let user = identity.require()?;

    let pool = DatabaseManager::pool().await?;
    let store = Store::find_for_owner(&pool, store_id, &user.user_id)
        .await
        .map_err(|e| ApiError::internal("OWNERSHIP_GUARD", e))?;

    match store {
        Some(store) => Ok(store),
        None => {
            tracing::warn!(
                "Ownership check failed: user '{}' does not own store '{}'",
                user.user_id,
                store_id
            );
            Err(ApiError::Unauthorized)
        }
    }
}
