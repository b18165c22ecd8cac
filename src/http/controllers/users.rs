use actix_web::{web, HttpResponse};

use crate::error::Error;
use crate::http::Actor;
use crate::services::follows::{FollowUser, UnfollowUser};
use crate::services::likes::GetUserLikeStats;
use crate::types::UserId;
use crate::App;

#[tracing::instrument(skip(app))]
pub async fn like_stats(
    app: web::Data<App>,
    path: web::Path<UserId>,
) -> Result<HttpResponse, Error> {
    let request = GetUserLikeStats {
        user_id: path.into_inner(),
    };

    let stats = request.perform(&app).await?;
    Ok(HttpResponse::Ok().json(stats))
}

#[tracing::instrument(skip(app))]
pub async fn follow(
    app: web::Data<App>,
    path: web::Path<UserId>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = FollowUser {
        target: path.into_inner(),
    };

    request.perform(&app, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(app))]
pub async fn unfollow(
    app: web::Data<App>,
    path: web::Path<UserId>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = UnfollowUser {
        target: path.into_inner(),
    };

    request.perform(&app, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
