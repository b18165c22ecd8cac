//! Rows of every table this crate reads or writes, together with
//! the SQL that accesses them.
mod follow;
mod like;
mod like_aggregate;
mod notification;
mod post;
mod profile;
mod view_count;

pub use follow::*;
pub use like::*;
pub use like_aggregate::*;
pub use notification::*;
pub use post::*;
pub use profile::*;
pub use view_count::*;
