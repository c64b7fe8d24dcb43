//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::domain::DefaultImages;
use quill_core::ports::{
    CommentRepository, MediaStore, PasswordService, PostRepository, UserRepository,
};
use quill_core::service::{CommentService, PostService, UserService};
use quill_infra::auth::Argon2PasswordService;
use quill_infra::database::{
    InMemoryCommentRepository, InMemoryPostRepository, InMemoryUserRepository,
};
use quill_infra::media::InMemoryMediaStore;

use crate::config::AppConfig;

/// Shared application state: one service per entity, all stateless.
#[derive(Clone)]
pub struct AppState {
    pub users: UserService,
    pub posts: PostService,
    pub comments: CommentService,
}

impl AppState {
    /// Build the application state with the configured backends, falling
    /// back to in-memory implementations when a backend is not configured.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = Repositories::init(config).await;
        let media = init_media(config).await;
        let defaults = DefaultImages::new(config.cloud_url.clone());
        Self::assemble(repos, media, defaults)
    }

    /// Fully in-memory state - used in tests and when nothing is configured.
    pub fn in_memory(cloud_url: &str) -> Self {
        Self::assemble(
            Repositories::in_memory(),
            Arc::new(InMemoryMediaStore::new(cloud_url)),
            DefaultImages::new(cloud_url),
        )
    }

    fn assemble(repos: Repositories, media: Arc<dyn MediaStore>, defaults: DefaultImages) -> Self {
        let passwords: Arc<dyn PasswordService> = Arc::new(Argon2PasswordService::new());

        let users = UserService::new(
            repos.users.clone(),
            repos.posts.clone(),
            repos.comments.clone(),
            media.clone(),
            passwords,
            defaults.clone(),
        );
        let posts = PostService::new(
            repos.posts.clone(),
            repos.comments.clone(),
            media,
            defaults,
        );
        let comments = CommentService::new(repos.comments, repos.posts);

        tracing::info!("Application state initialized");

        Self {
            users,
            posts,
            comments,
        }
    }
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
            comments: Arc::new(InMemoryCommentRepository::new()),
        }
    }

    #[cfg(feature = "postgres")]
    async fn init(config: &AppConfig) -> Self {
        use quill_infra::database::{
            DatabaseConnections, PostgresCommentRepository, PostgresPostRepository,
            PostgresUserRepository,
        };

        let Some(db_config) = config.database.as_ref() else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            return Self::in_memory();
        };

        match DatabaseConnections::init(db_config).await {
            Ok(connections) => Self {
                users: Arc::new(PostgresUserRepository::new(connections.main.clone())),
                posts: Arc::new(PostgresPostRepository::new(connections.main.clone())),
                comments: Arc::new(PostgresCommentRepository::new(connections.main)),
            },
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                Self::in_memory()
            }
        }
    }

    #[cfg(not(feature = "postgres"))]
    async fn init(_config: &AppConfig) -> Self {
        tracing::info!("Running without postgres feature - using in-memory repositories");
        Self::in_memory()
    }
}

#[cfg(feature = "s3")]
async fn init_media(config: &AppConfig) -> Arc<dyn MediaStore> {
    use quill_infra::media::{S3Config, S3MediaStore};

    match config.media.as_ref() {
        Some(media) => Arc::new(
            S3MediaStore::from_env(S3Config {
                bucket: media.bucket.clone(),
                public_base_url: media.public_base_url.clone(),
            })
            .await,
        ),
        None => {
            tracing::warn!("S3_BUCKET not set. Using in-memory media store.");
            Arc::new(InMemoryMediaStore::new(config.cloud_url.clone()))
        }
    }
}

#[cfg(not(feature = "s3"))]
async fn init_media(config: &AppConfig) -> Arc<dyn MediaStore> {
    tracing::info!("Running without s3 feature - using in-memory media store");
    Arc::new(InMemoryMediaStore::new(config.cloud_url.clone()))
}
