use actix_web::{web, HttpResponse};
use serde_json::json;

use super::parse_id;
use crate::error::Error;
use crate::http::Actor;
use crate::services::likes::{
    AddLike, CheckUserLike, GetLikeCount, GetLikeCountsByPeriod, RemoveLike,
};
use crate::App;

#[tracing::instrument(skip(app))]
pub async fn add(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = AddLike {
        post_id: parse_id(&path)?,
    };

    let result = request.perform(&app, &user_id).await?;
    Ok(HttpResponse::Created().json(result))
}

#[tracing::instrument(skip(app))]
pub async fn remove(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = RemoveLike {
        post_id: parse_id(&path)?,
    };

    let result = request.perform(&app, &user_id).await?;
    Ok(HttpResponse::Ok().json(result))
}

#[tracing::instrument(skip(app))]
pub async fn me(
    app: web::Data<App>,
    path: web::Path<String>,
    actor: Actor,
) -> Result<HttpResponse, Error> {
    let user_id = actor.require_user()?;
    let request = CheckUserLike {
        post_id: parse_id(&path)?,
    };

    let status = request.perform(&app, &user_id).await?;
    Ok(HttpResponse::Ok().json(status))
}

#[tracing::instrument(skip(app))]
pub async fn counts(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let request = GetLikeCountsByPeriod {
        post_id: parse_id(&path)?,
    };

    let counts = request.perform(&app).await?;
    Ok(HttpResponse::Ok().json(counts))
}

#[tracing::instrument(skip(app))]
pub async fn total(app: web::Data<App>, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let request = GetLikeCount {
        post_id: parse_id(&path)?,
    };

    let count = request.perform(&app).await?;
    Ok(HttpResponse::Ok().json(json!({ "count": count })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::http::testing::bearer;
    use crate::test_utils;

    #[actix_web::test]
    async fn should_toggle_like() {
        let (app, store) = test_utils::build_test_app();
        let author = test_utils::register(&store, "author-789").await;
        let liker = test_utils::register(&store, "liker-456").await;
        test_utils::publish(&store, 789, &author).await;
        let service = test_service!(app).await;

        let req = test::TestRequest::post()
            .uri("/posts/789/likes")
            .insert_header(bearer(&app, &liker))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "post_id": "789", "current_count": 1 }));

        let req = test::TestRequest::post()
            .uri("/posts/789/likes")
            .insert_header(bearer(&app, &liker))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], json!("already_liked"));

        let req = test::TestRequest::get()
            .uri("/posts/789/likes/me")
            .insert_header(bearer(&app, &liker))
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({ "is_liked": true, "count": 1 }));

        let req = test::TestRequest::get().uri("/posts/789/likes").to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({ "daily": 1, "weekly": 1, "monthly": 1, "total": 1 }));

        let req = test::TestRequest::delete()
            .uri("/posts/789/likes")
            .insert_header(bearer(&app, &liker))
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({ "post_id": "789", "current_count": 0 }));

        let req = test::TestRequest::get().uri("/posts/789/likes/total").to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({ "count": 0 }));
    }

    #[actix_web::test]
    async fn should_require_valid_token() {
        let (app, _) = test_utils::build_test_app();
        let service = test_service!(app).await;

        let req = test::TestRequest::post().uri("/posts/789/likes").to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::post()
            .uri("/posts/789/likes")
            .insert_header(("Authorization", "Bearer not-a-token"))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], json!("unauthorized"));
    }

    #[actix_web::test]
    async fn should_reject_invalid_post_id() {
        let (app, _) = test_utils::build_test_app();
        let service = test_service!(app).await;

        let req = test::TestRequest::get().uri("/posts/0/likes").to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], json!("invalid_request"));
    }

    #[actix_web::test]
    async fn should_reject_post_id_beyond_bigint() {
        let (app, store) = test_utils::build_test_app();
        let liker = test_utils::register(&store, "liker-456").await;
        let service = test_service!(app).await;

        let req = test::TestRequest::post()
            .uri("/posts/9223372036854775808/likes")
            .insert_header(bearer(&app, &liker))
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], json!("invalid_request"));
        assert_eq!(store.calls(), 0);
    }
}
