use std::fmt::Debug;
use std::sync::Arc;

use crate::database::MemoryStore;
use crate::error::Error;
use crate::schema::{Post, Profile};
use crate::types::{PostId, UserId};
use crate::App;

pub fn build_test_app() -> (App, Arc<MemoryStore>) {
    App::new_for_tests()
}

/// Creates a profile with null like budget columns.
pub async fn register(store: &MemoryStore, id: &str) -> UserId {
    let user_id = UserId::new(id);
    store.insert_profile(Profile::new(user_id.clone(), id)).await;
    user_id
}

pub async fn publish(store: &MemoryStore, id: u64, author: &UserId) -> PostId {
    let post_id = PostId::new(id);
    store
        .insert_post(Post::new(post_id, author.clone(), format!("Artwork #{id}")))
        .await;
    post_id
}

pub trait TestResultExt {
    /// Serializes the error of this result into [`serde_json::Value`]
    /// the same way clients receive it.
    ///
    /// ## Panics
    /// It will panic if the result is [`Ok`].
    fn expect_error_json(self) -> serde_json::Value;
}

impl<T: Debug> TestResultExt for Result<T, Error> {
    #[track_caller]
    fn expect_error_json(self) -> serde_json::Value {
        let error = self.expect_err("expected an error");
        serde_json::to_value(error.kind()).expect("error kinds are serializable")
    }
}
