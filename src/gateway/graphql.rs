use super::{CreatedId, MutationAck, OrderItemCreate, OrderItemUpdate, RemoteMutationGateway};
use crate::catalog::OptionCatalog;
use crate::core::{EditorError, LineItem, LineItemId, ProductId, ProductOption, Result};
use async_trait::async_trait;
use log::{debug, error};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

const ORDER_ITEM_CREATE: &str = "\
mutation OrderItemCreate($data: OrderItemCreateInput!) {
  orderItemCreate(data: $data) { id }
}";

const ORDER_ITEM_UPDATE: &str = "\
mutation OrderItemUpdate($data: OrderItemUpdateInput!) {
  orderItemUpdate(data: $data) { id }
}";

const ORDER_ITEM_DELETE: &str = "\
mutation OrderItemDelete($id: ID!) {
  orderItemDelete(data: { id: $id }) { success }
}";

const PRODUCTS_LIST: &str = "\
query ProductsListList {
  productsList { items { id name price } }
}";

const ORDER_ITEMS_LIST: &str = "\
query OrderItemsListList {
  orderItemsList { items { id quantity product { id name } } }
}";

/// Configuration for a hosted GraphQL endpoint
#[derive(Debug, Clone)]
pub struct GraphQlConfig {
    /// Endpoint URL the documents are POSTed to
    pub endpoint: String,

    /// Bearer token attached to every request, if any
    pub api_token: Option<String>,

    /// Per-request timeout
    pub request_timeout: Duration,
}

impl GraphQlConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_token: None,
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Set the bearer token
    pub fn api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Set the per-request timeout
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// Gateway and catalog over a hosted GraphQL schema.
///
/// Transport failures surface as [`EditorError::Transport`]; entries in the
/// response `errors` array (and `success: false` acks) surface as
/// [`EditorError::Rejected`].
pub struct GraphQlGateway {
    client: reqwest::Client,
    config: GraphQlConfig,
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

impl GraphQlGateway {
    pub fn new(config: GraphQlConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self { client, config })
    }

    async fn post<T, V>(&self, operation: &'static str, query: &str, variables: V) -> Result<T>
    where
        T: DeserializeOwned,
        V: Serialize,
    {
        debug!("Dispatching {} to {}", operation, self.config.endpoint);

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .json(&GraphQlRequest { query, variables });
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?.error_for_status()?;
        let body: GraphQlResponse<T> = response.json().await?;
        unwrap_response(operation, body)
    }
}

fn unwrap_response<T>(operation: &'static str, body: GraphQlResponse<T>) -> Result<T> {
    if let Some(err) = body.errors.first() {
        error!("{} rejected by remote: {}", operation, err.message);
        return Err(EditorError::Rejected(format!(
            "{}: {}",
            operation, err.message
        )));
    }
    body.data
        .ok_or_else(|| EditorError::Rejected(format!("{}: response carried no data", operation)))
}

#[derive(Debug, Deserialize)]
struct CreateData {
    #[serde(rename = "orderItemCreate")]
    order_item_create: CreatedId,
}

#[derive(Deserialize)]
struct UpdateData {
    #[serde(rename = "orderItemUpdate")]
    #[allow(dead_code)]
    order_item_update: CreatedId,
}

#[derive(Debug, Deserialize)]
struct DeleteData {
    #[serde(rename = "orderItemDelete")]
    order_item_delete: MutationAck,
}

#[async_trait]
impl RemoteMutationGateway for GraphQlGateway {
    async fn create_line_item(&self, input: OrderItemCreate) -> Result<LineItemId> {
        let data: CreateData = self
            .post("OrderItemCreate", ORDER_ITEM_CREATE, json!({ "data": input }))
            .await?;
        Ok(data.order_item_create.id)
    }

    async fn update_line_item(&self, input: OrderItemUpdate) -> Result<()> {
        let _: UpdateData = self
            .post("OrderItemUpdate", ORDER_ITEM_UPDATE, json!({ "data": input }))
            .await?;
        Ok(())
    }

    async fn delete_line_item(&self, id: &LineItemId) -> Result<()> {
        let data: DeleteData = self
            .post("OrderItemDelete", ORDER_ITEM_DELETE, json!({ "id": id }))
            .await?;
        if !data.order_item_delete.success {
            return Err(EditorError::Rejected(
                "OrderItemDelete: remote reported success = false".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct ListOf<T> {
    items: Vec<T>,
}

#[derive(Deserialize)]
struct ProductsData {
    #[serde(rename = "productsList")]
    products_list: ListOf<ProductRecord>,
}

#[derive(Deserialize)]
struct ProductRecord {
    id: ProductId,
    name: String,
    price: f64,
}

#[derive(Deserialize)]
struct OrderItemsData {
    #[serde(rename = "orderItemsList")]
    order_items_list: ListOf<OrderItemRecord>,
}

#[derive(Deserialize)]
struct OrderItemRecord {
    id: LineItemId,
    quantity: u32,
    product: Option<ProductRef>,
}

#[derive(Deserialize)]
struct ProductRef {
    id: ProductId,
    name: String,
}

#[async_trait]
impl OptionCatalog for GraphQlGateway {
    async fn product_options(&self) -> Result<Vec<ProductOption>> {
        let data: ProductsData = self
            .post("ProductsListList", PRODUCTS_LIST, json!({}))
            .await?;
        Ok(data
            .products_list
            .items
            .into_iter()
            .map(|p| ProductOption {
                id: p.id,
                label: p.name,
                price: p.price,
            })
            .collect())
    }

    async fn line_items(&self) -> Result<Vec<LineItem>> {
        let data: OrderItemsData = self
            .post("OrderItemsListList", ORDER_ITEMS_LIST, json!({}))
            .await?;
        Ok(data
            .order_items_list
            .items
            .into_iter()
            .map(|item| {
                // Items can exist with no product connected; keep them
                // displayable with an empty label.
                let (product_id, label) = match item.product {
                    Some(p) => (Some(p.id), p.name),
                    None => (None, String::new()),
                };
                LineItem {
                    id: item.id,
                    product_id,
                    quantity: item.quantity,
                    label,
                }
            })
            .collect())
    }
}
