#[cfg(test)]
macro_rules! test_service {
    ($app:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($app.clone()))
                .configure($crate::http::controllers::configure),
        )
    };
}

pub mod actor;
pub mod controllers;
pub mod error;
pub mod jwt;

pub use actor::Actor;

#[cfg(test)]
pub(crate) mod testing {
    use actix_web::http::header;

    use super::jwt::Claims;
    use crate::types::UserId;
    use crate::App;

    /// `Authorization` header carrying a valid token for `user_id`.
    pub fn bearer(app: &App, user_id: &UserId) -> (header::HeaderName, String) {
        let auth = &app.config.auth;
        let token = Claims::new(user_id, chrono::Duration::hours(1), auth)
            .encode(auth)
            .unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }
}
