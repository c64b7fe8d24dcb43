//! In-process fakes for the service tests: hash-map repositories, a
//! recording media store and a transparent password service.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::domain::{Comment, DefaultImages, Post, StoredImage, User};
use crate::error::{MediaError, RepoError};
use crate::ports::{
    AuthError, BaseRepository, CommentRepository, Identity, MediaStore, PasswordService,
    PostRepository, UserRepository,
};

use super::{CommentService, PhotoUpload, PostInput, PostService, SignupInput, UserService};

pub(crate) struct TestBed {
    pub users_svc: UserService,
    pub posts_svc: PostService,
    pub comments_svc: CommentService,
    pub media: Arc<MemMedia>,
}

pub(crate) fn testbed() -> TestBed {
    let users: Arc<MemUsers> = Arc::new(MemUsers::default());
    let posts: Arc<MemPosts> = Arc::new(MemPosts::default());
    let comments: Arc<MemComments> = Arc::new(MemComments::default());
    let media = Arc::new(MemMedia::default());
    let defaults = DefaultImages::with_picker("https://cdn.test", || 0);

    let users_dyn: Arc<dyn UserRepository> = users.clone();
    let posts_dyn: Arc<dyn PostRepository> = posts.clone();
    let comments_dyn: Arc<dyn CommentRepository> = comments.clone();
    let media_dyn: Arc<dyn MediaStore> = media.clone();
    let passwords: Arc<dyn PasswordService> = Arc::new(PlainPasswords);

    TestBed {
        users_svc: UserService::new(
            users_dyn.clone(),
            posts_dyn.clone(),
            comments_dyn.clone(),
            media_dyn.clone(),
            passwords,
            defaults.clone(),
        ),
        posts_svc: PostService::new(
            posts_dyn.clone(),
            comments_dyn.clone(),
            media_dyn.clone(),
            defaults,
        ),
        comments_svc: CommentService::new(comments_dyn, posts_dyn),
        media,
    }
}

pub(crate) fn signup_input(email: &str) -> SignupInput {
    SignupInput {
        first_name: "Anne".into(),
        last_name: "Jarvi".into(),
        email: email.into(),
        date_of_birth: NaiveDate::from_ymd_opt(1990, 5, 1).unwrap(),
        password: "salis123".into(),
        password_confirm: "salis123".into(),
    }
}

pub(crate) async fn signup(bed: &TestBed, email: &str) -> (User, Identity) {
    let user = bed
        .users_svc
        .signup(signup_input(email), None)
        .await
        .expect("signup fixture");
    let identity = Identity {
        user_id: user.id,
        email: user.email.clone(),
    };
    (user, identity)
}

pub(crate) fn post_input(published: bool) -> PostInput {
    PostInput {
        title: "A day at the lake".into(),
        content: "The water was perfectly still when we arrived at dawn.".into(),
        description: "Notes from a quiet morning.".into(),
        published,
    }
}

pub(crate) fn photo(name: &str) -> PhotoUpload {
    PhotoUpload {
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
        original_filename: name.into(),
        content_type: "image/png".into(),
    }
}

// ---------------------------------------------------------------------------
// Repositories
// ---------------------------------------------------------------------------

#[derive(Default)]
pub(crate) struct MemUsers {
    rows: Mutex<HashMap<Uuid, User>>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for MemUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if rows.values().any(|u| u.email == entity.email) {
            return Err(RepoError::Constraint("duplicate email".into()));
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl UserRepository for MemUsers {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }
}

#[derive(Default)]
pub(crate) struct MemPosts {
    rows: Mutex<HashMap<Uuid, Post>>,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for MemPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        self.rows
            .lock()
            .unwrap()
            .insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl PostRepository for MemPosts {
    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn find_published(&self) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.published)
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|p| p.author_id == author_id)
            .count() as u64)
    }
}

#[derive(Default)]
pub(crate) struct MemComments {
    rows: Mutex<HashMap<Uuid, Comment>>,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for MemComments {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.rows.lock().unwrap().get(&id).cloned())
    }

    async fn insert(&self, entity: Comment) -> Result<Comment, RepoError> {
        self.rows
            .lock()
            .unwrap()
            .insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        if !rows.contains_key(&entity.id) {
            return Err(RepoError::NotFound);
        }
        rows.insert(entity.id, entity.clone());
        Ok(entity)
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        self.rows
            .lock()
            .unwrap()
            .remove(&id)
            .map(|_| ())
            .ok_or(RepoError::NotFound)
    }
}

#[async_trait]
impl CommentRepository for MemComments {
    async fn find_by_post(&self, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let mut comments: Vec<Comment> = self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(comments)
    }

    async fn find_by_author(&self, author_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.author_id == author_id)
            .cloned()
            .collect())
    }

    async fn count_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.post_id == post_id)
            .count() as u64)
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<u64, RepoError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .values()
            .filter(|c| c.author_id == author_id)
            .count() as u64)
    }

    async fn delete_by_post(&self, post_id: Uuid) -> Result<u64, RepoError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|_, c| c.post_id != post_id);
        Ok((before - rows.len()) as u64)
    }
}

// ---------------------------------------------------------------------------
// Media store
// ---------------------------------------------------------------------------

/// Records every successful upload and delete, in order, and can be told to
/// fail either operation.
#[derive(Default)]
pub(crate) struct MemMedia {
    seq: AtomicU64,
    events: Mutex<Vec<String>>,
    fail_uploads: AtomicBool,
    fail_deletes: AtomicBool,
}

impl MemMedia {
    pub(crate) fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }

    pub(crate) fn uploads(&self) -> Vec<String> {
        self.select("upload:")
    }

    pub(crate) fn deletes(&self) -> Vec<String> {
        self.select("delete:")
    }

    fn select(&self, prefix: &str) -> Vec<String> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter_map(|e| e.strip_prefix(prefix).map(str::to_owned))
            .collect()
    }
}

#[async_trait]
impl MediaStore for MemMedia {
    async fn upload(
        &self,
        _bytes: Vec<u8>,
        folder: &str,
        _content_type: &str,
    ) -> Result<StoredImage, MediaError> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(MediaError::Upload("store offline".into()));
        }
        let n = self.seq.fetch_add(1, Ordering::SeqCst);
        let reference = format!("{folder}/obj-{n}");
        self.events
            .lock()
            .unwrap()
            .push(format!("upload:{reference}"));
        Ok(StoredImage {
            url: format!("https://cdn.test/{reference}"),
            reference,
        })
    }

    async fn delete(&self, reference: &str) -> Result<(), MediaError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(MediaError::Delete("store offline".into()));
        }
        self.events
            .lock()
            .unwrap()
            .push(format!("delete:{reference}"));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Passwords
// ---------------------------------------------------------------------------

/// Reversible stand-in for Argon2 so tests can assert hashing happened
/// without paying for it.
pub(crate) struct PlainPasswords;

impl PasswordService for PlainPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(format!("hash:{password}"))
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        Ok(hash == format!("hash:{password}"))
    }
}
