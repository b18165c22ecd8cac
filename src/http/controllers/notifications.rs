use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;

use super::parse_id;
use crate::error::Error;
use crate::http::Actor;
use crate::schema::NotificationType;
use crate::services::notifications::{
    CreateNotification, DeleteNotification, GetNotifications, GetUnreadCount, MarkAllAsRead,
    MarkAsRead,
};
use crate::types::{PostId, UserId};
use crate::App;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[tracing::instrument(skip(app))]
pub async fn list(
    app: web::Data<App>,
    query: web::Query<ListQuery>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let query = query.into_inner();
    let request = GetNotifications {
        limit: query.limit,
        offset: query.offset,
    };

    let notifications = request.perform(&app, &user_id).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

#[tracing::instrument(skip(app))]
pub async fn unread_count(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let count = GetUnreadCount.perform(&app, &user_id).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
    /// The recipient
    pub user_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    #[serde(default)]
    pub post_id: Option<PostId>,
}

#[tracing::instrument(skip(app))]
pub async fn create(
    app: web::Data<App>,
    body: web::Json<CreateBody>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let body = body.into_inner();
    let request = CreateNotification {
        recipient: body.user_id,
        kind: body.kind,
        post_id: body.post_id,
    };

    match request.perform(&app, &user_id).await? {
        Some(notification) => Ok(HttpResponse::Created().json(notification)),
        None => Ok(HttpResponse::NoContent().finish()),
    }
}

#[tracing::instrument(skip(app))]
pub async fn read(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = MarkAsRead {
        id: parse_id(&path)?,
    };

    request.perform(&app, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[tracing::instrument(skip(app))]
pub async fn read_all(app: web::Data<App>, actor: Actor) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let result = MarkAllAsRead.perform(&app, &user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[tracing::instrument(skip(app))]
pub async fn delete(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = DeleteNotification {
        id: parse_id(&path)?,
    };

    request.perform(&app, &user_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
