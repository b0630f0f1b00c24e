//! Conversions from WPGraphQL responses to core records.

use chrono::NaiveDateTime;
use dainam_core::{
    Image, ListPage, OrderConfirmation, PageInfo, Post, PostId, Project, ProjectId, Term,
    format_vnd,
};
use rust_decimal::Decimal;
use tracing::warn;

use super::queries::{
    Connection, FeaturedImage, PagedConnection, RawOrder, RawPageInfo, RawPost, RawProject,
    RawTerm,
};

/// WordPress reports dates in site-local time without an offset.
const WP_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

// =============================================================================
// Shared
// =============================================================================

/// A next page without a cursor cannot be requested, so it counts as exhausted.
fn convert_page_info(info: RawPageInfo) -> PageInfo {
    let end_cursor = info.end_cursor.unwrap_or_default();
    if info.has_next_page && end_cursor.is_empty() {
        warn!("CMS reported a next page without an end cursor");
    }
    PageInfo {
        has_next_page: info.has_next_page && !end_cursor.is_empty(),
        end_cursor,
    }
}

fn convert_terms(terms: Option<Connection<RawTerm>>) -> Vec<Term> {
    terms
        .map(|c| c.nodes)
        .unwrap_or_default()
        .into_iter()
        .map(|t| Term {
            name: t.name,
            slug: t.slug,
        })
        .collect()
}

fn convert_image(image: Option<FeaturedImage>) -> Option<Image> {
    let node = image?.node;
    Some(Image {
        url: node.source_url?,
        alt: node.alt_text.filter(|a| !a.is_empty()),
    })
}

// =============================================================================
// Posts
// =============================================================================

pub fn convert_post_connection(connection: PagedConnection<RawPost>) -> ListPage<Post> {
    ListPage::new(
        connection
            .nodes
            .into_iter()
            .filter_map(convert_post)
            .collect(),
        convert_page_info(connection.page_info),
    )
}

/// Posts without a parseable date are dropped; the index sorts and renders by it.
fn convert_post(post: RawPost) -> Option<Post> {
    let date = post
        .date
        .as_deref()
        .and_then(|d| NaiveDateTime::parse_from_str(d, WP_DATE_FORMAT).ok());
    let Some(date) = date else {
        warn!(post_id = post.database_id, date = ?post.date, "Skipping post with invalid date");
        return None;
    };

    Some(Post {
        id: PostId::new(post.database_id),
        slug: post.slug.unwrap_or_default(),
        title: post.title.unwrap_or_default(),
        excerpt: post.excerpt.unwrap_or_default(),
        date,
        image: convert_image(post.featured_image),
        categories: convert_terms(post.categories),
        tags: convert_terms(post.tags),
    })
}

// =============================================================================
// Projects
// =============================================================================

pub fn convert_project_connection(connection: PagedConnection<RawProject>) -> ListPage<Project> {
    ListPage::new(
        connection.nodes.into_iter().map(convert_project).collect(),
        convert_page_info(connection.page_info),
    )
}

fn convert_project(project: RawProject) -> Project {
    Project {
        id: ProjectId::new(project.database_id),
        slug: project.slug.unwrap_or_default(),
        title: project.title.unwrap_or_default(),
        excerpt: project.excerpt.unwrap_or_default(),
        location: project
            .project_fields
            .and_then(|f| f.location)
            .filter(|l| !l.trim().is_empty()),
        image: convert_image(project.featured_image),
        categories: convert_terms(project.project_categories),
    }
}

// =============================================================================
// Orders
// =============================================================================

/// Build the confirmation shown to the shopper.
///
/// WooCommerce returns the raw total as a decimal string; it is reformatted
/// as VND. A missing order number falls back to the database id.
pub fn convert_order(order: RawOrder) -> OrderConfirmation {
    let order_number = order
        .order_number
        .filter(|n| !n.is_empty())
        .or_else(|| order.database_id.map(|id| id.to_string()))
        .unwrap_or_default();

    let total = order.total.unwrap_or_default();
    let total = total
        .trim()
        .parse::<Decimal>()
        .map_or(total, format_vnd);

    OrderConfirmation {
        order_number,
        total,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn posts_json() -> serde_json::Value {
        serde_json::json!({
            "pageInfo": { "hasNextPage": true, "endCursor": "YXJyYXljb25uZWN0aW9uOjQy" },
            "nodes": [
                {
                    "databaseId": 42,
                    "slug": "chon-lam-song",
                    "title": "Chọn lam sóng cho mặt tiền",
                    "excerpt": "<p>Mẹo chọn vật liệu</p>",
                    "date": "2024-05-01T10:30:00",
                    "featuredImage": { "node": { "sourceUrl": "https://cms.dainam.vn/a.jpg", "altText": "" } },
                    "categories": { "nodes": [{ "name": "Lam Sóng", "slug": "lam-song" }] },
                    "tags": { "nodes": [{ "name": "PVC", "slug": "pvc" }] }
                },
                {
                    "databaseId": 43,
                    "slug": "nhap",
                    "title": "Bản nháp",
                    "excerpt": null,
                    "date": null,
                    "featuredImage": null,
                    "categories": null,
                    "tags": null
                }
            ]
        })
    }

    #[test]
    fn test_convert_posts() {
        let raw: PagedConnection<RawPost> = serde_json::from_value(posts_json()).unwrap();
        let page = convert_post_connection(raw);

        assert!(page.page_info.has_next_page);
        assert_eq!(page.page_info.end_cursor, "YXJyYXljb25uZWN0aW9uOjQy");
        // Undated post is skipped
        assert_eq!(page.items.len(), 1);

        let post = &page.items[0];
        assert_eq!(post.id, PostId::new(42));
        assert_eq!(post.date.to_string(), "2024-05-01 10:30:00");
        assert!(post.has_tag("pvc"));
        assert_eq!(post.categories[0].name, "Lam Sóng");

        let image = post.image.as_ref().unwrap();
        assert_eq!(image.url, "https://cms.dainam.vn/a.jpg");
        assert_eq!(image.alt, None);
    }

    #[test]
    fn test_convert_projects() {
        let raw: PagedConnection<RawProject> = serde_json::from_value(serde_json::json!({
            "pageInfo": { "hasNextPage": false, "endCursor": null },
            "nodes": [{
                "databaseId": 7,
                "slug": "nha-pho-thu-duc",
                "title": "Nhà phố Thủ Đức",
                "excerpt": "",
                "projectFields": { "location": "Thủ Đức, TP.HCM" },
                "featuredImage": { "node": { "sourceUrl": null, "altText": null } },
                "projectCategories": { "nodes": [{ "name": "Ốp tường", "slug": "op-tuong" }] }
            }]
        }))
        .unwrap();

        let page = convert_project_connection(raw);
        assert_eq!(page.page_info, PageInfo::exhausted());

        let project = &page.items[0];
        assert_eq!(project.id, ProjectId::new(7));
        assert_eq!(project.location.as_deref(), Some("Thủ Đức, TP.HCM"));
        assert_eq!(project.image, None);
        assert_eq!(project.categories.len(), 1);
    }

    #[test]
    fn test_next_page_without_cursor_is_exhausted() {
        for cursor in [None, Some(String::new())] {
            let info = convert_page_info(RawPageInfo {
                has_next_page: true,
                end_cursor: cursor,
            });
            assert!(!info.has_next_page);
            assert!(info.end_cursor.is_empty());
        }
    }

    #[test]
    fn test_convert_order_formats_total() {
        let order = convert_order(RawOrder {
            database_id: Some(1201),
            order_number: Some("1201".to_string()),
            total: Some("1250000.00".to_string()),
        });
        assert_eq!(order.order_number, "1201");
        assert_eq!(order.total, "1.250.000 ₫");
    }

    #[test]
    fn test_convert_order_fallbacks() {
        let order = convert_order(RawOrder {
            database_id: Some(88),
            order_number: None,
            total: Some("n/a".to_string()),
        });
        assert_eq!(order.order_number, "88");
        assert_eq!(order.total, "n/a");
    }
}
