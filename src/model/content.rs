use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentStatus {
    Draft,
    Review,
    Scheduled,
    Published,
    Archived,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 5] = [
        ContentStatus::Draft,
        ContentStatus::Review,
        ContentStatus::Scheduled,
        ContentStatus::Published,
        ContentStatus::Archived,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Editor,
    Author,
    Contributor,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Editor, Role::Author, Role::Contributor];
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct FeaturedImage {
    pub url: String,
    #[serde(default)]
    pub alt_text: Option<String>,
}

/// A content item as the analytics and SEO components see it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
#[serde(rename_all = "camelCase")]
pub struct Content {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: ContentStatus,
    pub author_id: String,
    pub body: String,

    #[new(default)]
    #[serde(default)]
    pub excerpt: Option<String>,
    #[new(default)]
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    #[new(default)]
    #[serde(default)]
    pub meta_title: Option<String>,
    #[new(default)]
    #[serde(default)]
    pub meta_description: Option<String>,
    #[new(default)]
    #[serde(default)]
    pub featured_image: Option<FeaturedImage>,
}

/// The author fields shown next to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorSummary {
    pub id: String,
    pub name: String,
}

impl From<&Author> for AuthorSummary {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id.clone(),
            name: author.name.clone(),
        }
    }
}

/// Display metadata of a content item, joined into the top-content listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSummary {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub status: ContentStatus,
    pub published_at: Option<Timestamp>,
    pub author: Option<AuthorSummary>,
}

impl ContentSummary {
    pub fn from_content(content: &Content, author: Option<&Author>) -> Self {
        Self {
            id: content.id.clone(),
            title: content.title.clone(),
            slug: content.slug.clone(),
            status: content.status,
            published_at: content.published_at,
            author: author.map(AuthorSummary::from),
        }
    }
}
