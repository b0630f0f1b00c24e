//! CMS content records: blog posts and projects.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::id::{PostId, ProjectId};

/// A taxonomy term (category or tag).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Term {
    pub name: String,
    pub slug: String,
}

/// A featured image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default)]
    pub alt: Option<String>,
}

/// A blog post as listed on the blog index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub slug: String,
    pub title: String,
    /// Excerpt HTML as rendered by WordPress.
    pub excerpt: String,
    /// Publication date (site-local time, as WordPress reports it).
    pub date: NaiveDateTime,
    pub image: Option<Image>,
    pub categories: Vec<Term>,
    pub tags: Vec<Term>,
}

impl Post {
    /// Whether the post carries a tag with this slug.
    #[must_use]
    pub fn has_tag(&self, slug: &str) -> bool {
        self.tags.iter().any(|t| t.slug == slug)
    }
}

/// A completed installation shown in the project portfolio.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    /// Site of the installation (e.g., "Thủ Đức, TP.HCM").
    pub location: Option<String>,
    pub image: Option<Image>,
    pub categories: Vec<Term>,
}
