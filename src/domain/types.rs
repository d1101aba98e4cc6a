use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Represents a unique identifier for domain entities.
pub type EntityId = Uuid;

/// Identity and bookkeeping columns shared by every persisted entity.
///
/// A nil `id` marks a record that has not been persisted yet. Once the
/// storage layer assigns an id it never changes. A record whose
/// `deleted_at` is set is soft-deleted and invisible to normal reads.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Model {
    pub id: EntityId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Model {
    /// Model referencing an existing row by id.
    #[must_use]
    pub fn with_id(id: EntityId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// True until the storage layer has assigned an identifier.
    #[must_use]
    pub fn is_new(&self) -> bool {
        self.id.is_nil()
    }

    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// A persisted domain record embedding [`Model`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Singular name used in logs, metrics labels and error messages.
    const NAME: &'static str;

    fn model(&self) -> &Model;

    fn model_mut(&mut self) -> &mut Model;

    fn id(&self) -> EntityId {
        self.model().id
    }
}

macro_rules! impl_entity {
    ($ty:ty, $name:literal) => {
        impl Entity for $ty {
            const NAME: &'static str = $name;

            fn model(&self) -> &Model {
                &self.model
            }

            fn model_mut(&mut self) -> &mut Model {
                &mut self.model
            }
        }
    };
}

/// Rejects the nil UUID in foreign key fields.
fn validate_not_nil(id: &Uuid) -> Result<(), validator::ValidationError> {
    if id.is_nil() {
        return Err(validator::ValidationError::new("nil_reference")
            .with_message("must reference an existing record".into()));
    }
    Ok(())
}

/// A book category. Referenced by [`Book`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, FromRow, Validate)]
pub struct Category {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub model: Model,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

impl Category {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            model: Model::default(),
            name: name.into(),
        }
    }
}

impl_entity!(Category, "category");

/// A catalogued book belonging to a live [`Category`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, FromRow, Validate)]
pub struct Book {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub model: Model,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = "validate_not_nil"))]
    pub category_id: EntityId,
    #[validate(length(min = 1, max = 255))]
    pub author: String,
    #[validate(length(max = 2000))]
    pub description: String,
}

impl Book {
    pub fn new(name: impl Into<String>, category_id: EntityId, author: impl Into<String>) -> Self {
        Self {
            model: Model::default(),
            name: name.into(),
            category_id,
            author: author.into(),
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl_entity!(Book, "book");

/// A library member who can borrow books.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, FromRow, Validate)]
pub struct User {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub model: Model,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
}

impl User {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            model: Model::default(),
            name: name.into(),
            email: email.into(),
        }
    }
}

impl_entity!(User, "user");

/// A book lent to a user until `due_at`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq, FromRow, Validate)]
pub struct Loan {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub model: Model,
    #[validate(custom(function = "validate_not_nil"))]
    pub book_id: EntityId,
    #[validate(custom(function = "validate_not_nil"))]
    pub user_id: EntityId,
    pub due_at: Option<DateTime<Utc>>,
}

impl Loan {
    pub fn new(book_id: EntityId, user_id: EntityId) -> Self {
        Self {
            model: Model::default(),
            book_id,
            user_id,
            due_at: None,
        }
    }

    pub fn due(mut self, due_at: DateTime<Utc>) -> Self {
        self.due_at = Some(due_at);
        self
    }
}

impl_entity!(Loan, "loan");
