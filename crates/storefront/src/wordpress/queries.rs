//! GraphQL documents and their wire shapes.
//!
//! Documents are plain strings posted as-is. Variables are serialized with
//! `serde`; filter arguments are built as whole `where` objects so absent
//! filters are omitted rather than sent as `null`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Envelope
// =============================================================================

/// Request body of a GraphQL POST.
#[derive(Debug, Serialize)]
pub struct GraphQLRequest<'a, V> {
    pub query: &'a str,
    pub variables: V,
}

/// Response body of a GraphQL POST.
#[derive(Debug, Deserialize)]
pub struct GraphQLResponse<D> {
    pub data: Option<D>,
    #[serde(default)]
    pub errors: Option<Vec<RawGraphQLError>>,
}

#[derive(Debug, Deserialize)]
pub struct RawGraphQLError {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub path: Vec<serde_json::Value>,
}

// =============================================================================
// Shared fragments
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPageInfo {
    pub has_next_page: bool,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Connection<T> {
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedConnection<T> {
    pub page_info: RawPageInfo,
    pub nodes: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct RawTerm {
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Deserialize)]
pub struct FeaturedImage {
    pub node: RawImage,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawImage {
    pub source_url: Option<String>,
    pub alt_text: Option<String>,
}

/// Variables shared by the list queries.
#[derive(Debug, Serialize)]
pub struct ListVariables<W> {
    pub first: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<String>,
    #[serde(rename = "where")]
    pub filter: W,
}

// =============================================================================
// Posts
// =============================================================================

pub const GET_POSTS: &str = r"
query GetPosts($first: Int!, $after: String, $where: RootQueryToPostConnectionWhereArgs) {
  posts(first: $first, after: $after, where: $where) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      slug
      title
      excerpt
      date
      featuredImage { node { sourceUrl altText } }
      categories { nodes { name slug } }
      tags { nodes { name slug } }
    }
  }
}
";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostWhere {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PostsData {
    pub posts: PagedConnection<RawPost>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    pub database_id: i64,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub date: Option<String>,
    pub featured_image: Option<FeaturedImage>,
    pub categories: Option<Connection<RawTerm>>,
    pub tags: Option<Connection<RawTerm>>,
}

// =============================================================================
// Projects
// =============================================================================

pub const GET_PROJECTS: &str = r"
query GetProjects($first: Int!, $after: String, $where: RootQueryToProjectConnectionWhereArgs) {
  projects(first: $first, after: $after, where: $where) {
    pageInfo { hasNextPage endCursor }
    nodes {
      databaseId
      slug
      title
      excerpt
      projectFields { location }
      featuredImage { node { sourceUrl altText } }
      projectCategories { nodes { name slug } }
    }
  }
}
";

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectWhere {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_query: Option<TaxQuery>,
}

/// Taxonomy filter for custom post types.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxQuery {
    pub tax_array: Vec<TaxTerm>,
}

#[derive(Debug, Serialize)]
pub struct TaxTerm {
    pub taxonomy: &'static str,
    pub field: &'static str,
    pub terms: Vec<String>,
}

impl TaxQuery {
    /// Match projects in the named category.
    pub fn project_category(name: &str) -> Self {
        Self {
            tax_array: vec![TaxTerm {
                taxonomy: "PROJECTCATEGORY",
                field: "NAME",
                terms: vec![name.to_string()],
            }],
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProjectsData {
    pub projects: PagedConnection<RawProject>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProject {
    pub database_id: i64,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub project_fields: Option<ProjectFields>,
    pub featured_image: Option<FeaturedImage>,
    pub project_categories: Option<Connection<RawTerm>>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectFields {
    pub location: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

pub const CREATE_ORDER: &str = r"
mutation CreateOrder($input: CreateOrderInput!) {
  createOrder(input: $input) {
    order {
      databaseId
      orderNumber
      total(format: RAW)
    }
  }
}
";

#[derive(Debug, Serialize)]
pub struct CreateOrderVariables {
    pub input: CreateOrderInput,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderInput {
    pub billing: CustomerAddress,
    pub shipping: CustomerAddress,
    pub line_items: Vec<LineItemInput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_note: Option<String>,
    pub payment_method: &'static str,
    pub payment_method_title: &'static str,
    pub is_paid: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerAddress {
    pub first_name: String,
    pub address1: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub country: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemInput {
    pub product_id: i64,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderData {
    pub create_order: Option<CreateOrderPayload>,
}

#[derive(Debug, Deserialize)]
pub struct CreateOrderPayload {
    pub order: Option<RawOrder>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    pub database_id: Option<i64>,
    pub order_number: Option<String>,
    pub total: Option<String>,
}
