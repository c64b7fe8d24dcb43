//! User entity for SeaORM.

use sea_orm::Set;
use sea_orm::entity::prelude::*;

use quill_core::domain::ImageRef;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub date_of_birth: Date,
    pub password_hash: String,
    /// Media store key; NULL means the shared default avatar.
    pub avatar_reference: Option<String>,
    pub avatar_filename: Option<String>,
    pub avatar_url: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::post::Entity")]
    Post,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
}

impl Related<super::post::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from SeaORM Model to Domain User.
impl From<Model> for quill_core::domain::User {
    fn from(model: Model) -> Self {
        let avatar = match model.avatar_reference {
            Some(reference) => ImageRef::Stored {
                reference,
                original_filename: model.avatar_filename.unwrap_or_default(),
                url: model.avatar_url,
            },
            None => ImageRef::Default {
                url: model.avatar_url,
            },
        };

        Self {
            id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
            date_of_birth: model.date_of_birth,
            password_hash: model.password_hash,
            avatar,
            created_at: model.created_at.into(),
        }
    }
}

/// Conversion from Domain User to SeaORM ActiveModel.
impl From<quill_core::domain::User> for ActiveModel {
    fn from(user: quill_core::domain::User) -> Self {
        let (avatar_reference, avatar_filename, avatar_url) = match user.avatar {
            ImageRef::Default { url } => (None, None, url),
            ImageRef::Stored {
                reference,
                original_filename,
                url,
            } => (Some(reference), Some(original_filename), url),
        };

        Self {
            id: Set(user.id),
            first_name: Set(user.first_name),
            last_name: Set(user.last_name),
            email: Set(user.email),
            date_of_birth: Set(user.date_of_birth),
            password_hash: Set(user.password_hash),
            avatar_reference: Set(avatar_reference),
            avatar_filename: Set(avatar_filename),
            avatar_url: Set(avatar_url),
            created_at: Set(user.created_at.into()),
        }
    }
}
