use actix_web::HttpResponse;

use crate::dto::CurrentUserResponse;
use crate::middleware::auth::AuthContext;

/// Handler for GET /api/v1/users/me
///
/// Reports who the presented access token belongs to.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(CurrentUserResponse {
        user_id: auth.user_id,
    })
}
