use serde::Deserialize;

use super::entities::UserRole;

/// 根据身份提供方下发的 claims 建立/更新本地用户映射
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertUserFromClaims {
    pub external_uid: String,
    pub email: String,
    pub display_name: Option<String>,
    pub role: UserRole,
}
