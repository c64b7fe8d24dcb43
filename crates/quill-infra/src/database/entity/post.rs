//! Post entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::ImageRef;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub content: String,
    pub description: String,
    /// Media store key; NULL means a default cover photo.
    pub photo_reference: Option<String>,
    pub photo_filename: Option<String>,
    pub photo_url: String,
    pub published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub edited_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain Post.
impl From<Model> for quill_core::domain::Post {
    fn from(model: Model) -> Self {
        let photo = match model.photo_reference {
            Some(reference) => ImageRef::Stored {
                reference,
                original_filename: model.photo_filename.unwrap_or_default(),
                url: model.photo_url,
            },
            None => ImageRef::Default {
                url: model.photo_url,
            },
        };

        Self {
            id: model.id,
            author_id: model.author_id,
            title: model.title,
            content: model.content,
            description: model.description,
            photo,
            published: model.published,
            created_at: model.created_at.into(),
            edited_at: model.edited_at.map(Into::into),
        }
    }
}

/// Conversion from Domain Post to SeaORM ActiveModel.
impl From<quill_core::domain::Post> for ActiveModel {
    fn from(post: quill_core::domain::Post) -> Self {
        let (photo_reference, photo_filename, photo_url) = match post.photo {
            ImageRef::Default { url } => (None, None, url),
            ImageRef::Stored {
                reference,
                original_filename,
                url,
            } => (Some(reference), Some(original_filename), url),
        };

        Self {
            id: Set(post.id),
            author_id: Set(post.author_id),
            title: Set(post.title),
            content: Set(post.content),
            description: Set(post.description),
            photo_reference: Set(photo_reference),
            photo_filename: Set(photo_filename),
            photo_url: Set(photo_url),
            published: Set(post.published),
            created_at: Set(post.created_at.into()),
            edited_at: Set(post.edited_at.map(Into::into)),
        }
    }
}
