//! Typed bar API operations
//!
//! Wire types and the four operations the app issues against the bar
//! GraphQL schema: `ListBars`, `GetBarMember`, `CreateBarMember` and
//! `UpdateBar`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::graphql::{BarApiConfig, GraphqlClient, GraphqlRequest};
use crate::{Error, Result};

/// Page size used when walking the full bar list
const PAGE_SIZE: u32 = 100;

const BAR_FIELDS: &str =
    "id name phone location lat lng url website addedBy createdAt favoriteCount";

const MEMBER_FIELDS: &str = "id userId barId createdAt";

/// Bar as delivered by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarNode {
    /// Bar identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Phone number
    #[serde(default)]
    pub phone: Option<String>,
    /// Free-text address
    #[serde(default)]
    pub location: Option<String>,
    /// Latitude; the schema stores it as a string but numbers are accepted
    #[serde(deserialize_with = "string_or_number")]
    pub lat: String,
    /// Longitude; same encoding as `lat`
    #[serde(deserialize_with = "string_or_number")]
    pub lng: String,
    /// External map URL
    #[serde(default)]
    pub url: Option<String>,
    /// Website URL
    #[serde(default)]
    pub website: Option<String>,
    /// User who added the bar
    #[serde(default)]
    pub added_by: Option<String>,
    /// Creation timestamp (RFC 3339)
    pub created_at: String,
    /// Denormalized favorite count
    #[serde(default)]
    pub favorite_count: Option<u32>,
}

/// One page of bars
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarConnection {
    /// Bars on this page
    #[serde(default)]
    pub items: Vec<BarNode>,
    /// Token for the next page
    #[serde(default)]
    pub next_token: Option<String>,
}

/// Favorite membership as delivered by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BarMemberNode {
    /// Server-side identifier
    #[serde(default)]
    pub id: Option<String>,
    /// Member user
    pub user_id: String,
    /// Favorited bar
    pub bar_id: String,
    /// Creation timestamp
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Variables for `CreateBarMember`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBarMemberInput {
    /// Member user
    pub user_id: String,
    /// Favorited bar
    pub bar_id: String,
}

/// Input for `UpdateBar`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBarInput {
    /// Bar identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Free-text address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Latitude
    pub lat: String,
    /// Longitude
    pub lng: String,
    /// External map URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Website URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// User who added the bar
    #[serde(skip_serializing_if = "Option::is_none")]
    pub added_by: Option<String>,
    /// New favorite count
    pub favorite_count: u32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListBarsData {
    list_bars: Option<BarConnection>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GetBarMemberData {
    get_bar_member: Option<BarMemberNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateBarMemberData {
    create_bar_member: Option<BarMemberNode>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateBarData {
    update_bar: Option<BarNode>,
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Number(number) => number.to_string(),
    })
}

/// Client for the bar GraphQL operations
///
/// # Example
///
/// ```rust,no_run
/// use bar_api::{BarApiClient, BarApiConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = BarApiConfig::new("https://example.appsync-api.eu-west-1.amazonaws.com/graphql")
///         .with_api_key("da2-example");
///     let client = BarApiClient::new(config)?;
///
///     for bar in client.list_all_bars().await? {
///         println!("{} ({})", bar.name, bar.created_at);
///     }
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BarApiClient {
    graphql: GraphqlClient,
}

impl BarApiClient {
    /// Create a new bar API client
    pub fn new(config: BarApiConfig) -> Result<Self> {
        Ok(Self {
            graphql: GraphqlClient::new(config)?,
        })
    }

    /// Wrap an existing GraphQL client
    pub fn from_graphql(graphql: GraphqlClient) -> Self {
        Self { graphql }
    }

    /// Fetch one page of bars
    ///
    /// # Errors
    ///
    /// - `Error::EmptyData` - the server returned `listBars: null`
    pub async fn list_bars(
        &self,
        limit: Option<u32>,
        next_token: Option<String>,
    ) -> Result<BarConnection> {
        let query = format!(
            "query ListBars($limit: Int, $nextToken: String) {{ \
             listBars(limit: $limit, nextToken: $nextToken) {{ items {{ {BAR_FIELDS} }} nextToken }} }}"
        );
        let request = GraphqlRequest::new(query)
            .operation_name("ListBars")
            .variable("limit", &limit.unwrap_or(PAGE_SIZE))?
            .variable("nextToken", &next_token)?;

        let response = self.graphql.query::<ListBarsData>(&request).await?;
        response
            .data
            .list_bars
            .ok_or_else(|| Error::EmptyData("ListBars".to_string()))
    }

    /// Fetch every bar, following `nextToken` until exhausted
    pub async fn list_all_bars(&self) -> Result<Vec<BarNode>> {
        let mut bars = Vec::new();
        let mut next_token = None;

        loop {
            let page = self.list_bars(Some(PAGE_SIZE), next_token).await?;
            bars.extend(page.items);

            match page.next_token {
                Some(token) if !token.is_empty() => next_token = Some(token),
                _ => break,
            }
        }

        tracing::debug!(count = bars.len(), "listed bars");
        Ok(bars)
    }

    /// Look up the membership for a (user, bar) pair
    ///
    /// Returns `None` when the user has not favorited the bar.
    pub async fn get_bar_member(&self, user_id: &str, bar_id: &str) -> Result<Option<BarMemberNode>> {
        let query = format!(
            "query GetBarMember($userId: ID!, $barId: ID!) {{ \
             getBarMember(userId: $userId, barId: $barId) {{ {MEMBER_FIELDS} }} }}"
        );
        let request = GraphqlRequest::new(query)
            .operation_name("GetBarMember")
            .variable("userId", &user_id)?
            .variable("barId", &bar_id)?;

        let response = self.graphql.query::<GetBarMemberData>(&request).await?;
        Ok(response.data.get_bar_member)
    }

    /// Create a membership
    ///
    /// # Errors
    ///
    /// - `Error::InvalidInput` - empty user or bar id
    pub async fn create_bar_member(&self, input: &CreateBarMemberInput) -> Result<BarMemberNode> {
        if input.user_id.is_empty() || input.bar_id.is_empty() {
            return Err(Error::InvalidInput(
                "Bar member requires a user id and a bar id".to_string(),
            ));
        }

        let query = format!(
            "mutation CreateBarMember($userId: ID!, $barId: ID!) {{ \
             createBarMember(input: {{ userId: $userId, barId: $barId }}) {{ {MEMBER_FIELDS} }} }}"
        );
        let request = GraphqlRequest::new(query)
            .operation_name("CreateBarMember")
            .variables(input)?;

        let response = self.graphql.mutate::<CreateBarMemberData>(&request).await?;
        response
            .data
            .create_bar_member
            .ok_or_else(|| Error::EmptyData("CreateBarMember".to_string()))
    }

    /// Update a bar record
    pub async fn update_bar(&self, input: &UpdateBarInput) -> Result<BarNode> {
        if input.id.is_empty() {
            return Err(Error::InvalidInput("Bar id cannot be empty".to_string()));
        }

        let query = format!(
            "mutation UpdateBar($input: UpdateBarInput!) {{ updateBar(input: $input) {{ {BAR_FIELDS} }} }}"
        );
        let request = GraphqlRequest::new(query)
            .operation_name("UpdateBar")
            .variable("input", input)?;

        let response = self.graphql.mutate::<UpdateBarData>(&request).await?;
        response
            .data
            .update_bar
            .ok_or_else(|| Error::EmptyData("UpdateBar".to_string()))
    }
}
