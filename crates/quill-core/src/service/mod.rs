//! Authorization & mutation services.
//!
//! One stateless service per entity, each owning every (action, invariant)
//! pair for that entity: the ownership checks, the publish rule, the
//! cascading deletes and the media bookkeeping all live here, so the HTTP
//! layer stays a thin translation of inputs and errors.
//!
//! Every mutation takes `Option<&Identity>` and fails `Unauthenticated` when
//! the caller is anonymous; the check is made here rather than trusting each
//! route to remember it.

mod comments;
mod posts;
mod users;

#[cfg(test)]
pub(crate) mod testutil;

pub use comments::CommentService;
pub use posts::{PostInput, PostService, PostView};
pub use users::{ProfileInput, SignupInput, UserProfile, UserService};

/// An image accompanying a create or update, as received from the surface.
#[derive(Debug, Clone)]
pub struct PhotoUpload {
    pub bytes: Vec<u8>,
    pub original_filename: String,
    pub content_type: String,
}

/// Media store folder for post cover photos.
pub(crate) const POSTS_FOLDER: &str = "posts";

/// Media store folder for user avatars.
pub(crate) const AVATARS_FOLDER: &str = "avatars";
