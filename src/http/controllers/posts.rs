use actix_web::{web, HttpResponse};
use serde::Deserialize;

use super::parse_id;
use crate::error::{Error, Result};
use crate::schema::LikePeriod;
use crate::services::aggregates::{GetLikeCountsForPosts, GetViewCountsForPosts, RecordView};
use crate::types::PostId;
use crate::App;

#[derive(Debug, Deserialize)]
pub struct BatchQuery {
    /// Comma separated post ids
    #[serde(default)]
    pub ids: String,
    #[serde(default)]
    pub period: LikePeriod,
}

impl BatchQuery {
    fn post_ids(&self) -> Result<Vec<PostId>> {
        self.ids
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(parse_id)
            .collect()
    }
}

#[tracing::instrument(skip(app))]
pub async fn like_counts(
    app: web::Data<App>,
    query: web::Query<BatchQuery>,
) -> Result<HttpResponse, Error> {
    let request = GetLikeCountsForPosts {
        post_ids: query.post_ids()?,
        period: query.period,
    };

    let counts = request.perform(&app).await?;
    Ok(HttpResponse::Ok().json(counts))
}

#[tracing::instrument(skip(app))]
pub async fn view_counts(
    app: web::Data<App>,
    query: web::Query<BatchQuery>,
) -> Result<HttpResponse, Error> {
    let request = GetViewCountsForPosts {
        post_ids: query.post_ids()?,
    };

    let counts = request.perform(&app).await?;
    Ok(HttpResponse::Ok().json(counts))
}

#[tracing::instrument(skip(app))]
pub async fn record_view(
    app: web::Data<App>,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let request = RecordView {
        post_id: parse_id(&path)?,
    };

    let recorded = request.perform(&app).await?;
    Ok(HttpResponse::Ok().json(recorded))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::test_utils;
    use crate::types::PostId;

    #[actix_web::test]
    async fn should_batch_like_counts() {
        let (app, store) = test_utils::build_test_app();
        store.seed_likes(PostId::new(1), 100).await;
        store.seed_likes(PostId::new(2), 50).await;
        store.seed_likes(PostId::new(3), 75).await;
        let service = test_service!(app).await;

        let req = test::TestRequest::get()
            .uri("/posts/likes?ids=1,2,3,4,5&period=total")
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(
            body,
            json!({ "1": 100, "2": 50, "3": 75, "4": 0, "5": 0 })
        );

        let req = test::TestRequest::get()
            .uri("/posts/likes?ids=1&period=daily")
            .to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({ "1": 100 }));
    }

    #[actix_web::test]
    async fn should_answer_empty_batch_without_store() {
        let (app, store) = test_utils::build_test_app();
        let service = test_service!(app).await;

        let req = test::TestRequest::get().uri("/posts/views?ids=").to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({}));
        assert_eq!(store.calls(), 0);
    }

    #[actix_web::test]
    async fn should_record_views() {
        let (app, _) = test_utils::build_test_app();
        let service = test_service!(app).await;

        for _ in 0..3 {
            let req = test::TestRequest::post().uri("/posts/5/views").to_request();
            let resp = test::call_service(&service, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
        }

        let req = test::TestRequest::get().uri("/posts/views?ids=5,6").to_request();
        let body: Value = test::call_and_read_body_json(&service, req).await;
        assert_eq!(body, json!({ "5": 3, "6": 0 }));
    }

    #[actix_web::test]
    async fn should_reject_bad_ids() {
        let (app, _) = test_utils::build_test_app();
        let service = test_service!(app).await;

        let req = test::TestRequest::get().uri("/posts/likes?ids=1,abc").to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::get()
            .uri("/posts/likes?ids=1&period=yearly")
            .to_request();
        let resp = test::call_service(&service, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], json!("invalid_request"));
    }
}
