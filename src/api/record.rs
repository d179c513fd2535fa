//! Records, record sets, and the requests that read and write them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    Config,
    Error,
    api::{Accepted, ApiRequest, ApiResponse, DataResponse},
    config,
};

/// The user data of a record. Keys keep the order they were inserted or
/// received in.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// A single row of a table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// The record ID. Unset for records that have not been created yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// The cell values, keyed by field name.
    #[serde(default)]
    pub fields: Fields,
    /// When the record was created, as reported by the API.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
}

impl Record {
    /// A record to be created.
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            ..Default::default()
        }
    }

    /// A change to an existing record. Only the given fields are updated.
    pub fn with_id(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: Some(id.into()),
            fields,
            created_time: None,
        }
    }

    /// Look up a single cell value.
    pub fn field(&self, name: &str) -> Option<&serde_json::Value> {
        self.fields.get(name)
    }
}

// A fetched record always has an ID; without one the body is something else,
// such as a list page.
impl ApiResponse for Record {
    fn from_body(status: http::StatusCode, body: &[u8]) -> Result<Self, Error> {
        let record: Record = serde_json::from_slice(body).map_err(|e| {
            tracing::error!("Failed to parse API response: {e:#?}");
            Error::Decode { status, source: e }
        })?;

        if record.id.is_none() {
            return Err(Error::Decode {
                status,
                source: serde::de::Error::missing_field("id"),
            });
        }

        Ok(record)
    }
}

/// One page of records.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct RecordSet {
    /// The records, in the order the API returned them.
    pub records: Vec<Record>,
    /// The continuation token for the next page. Will be unset if there are
    /// no more results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
}

impl RecordSet {
    /// Wrap records for a create or update call.
    pub fn new(records: Vec<Record>) -> Self {
        Self {
            records,
            offset: None,
        }
    }
}

impl From<Vec<Record>> for RecordSet {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}

impl IntoIterator for RecordSet {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl DataResponse for RecordSet {}

/// The direction of a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Smallest first.
    Asc,
    /// Largest first.
    Desc,
}

/// One sort criterion of a list request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sort {
    /// The field to sort by.
    pub field: String,
    /// The sort direction.
    pub direction: Direction,
}

/// Filtering and paging options for [`ListRecords`].
///
/// Unset options are left out of the query string. Parameters this type
/// doesn't model can be passed through with [`ListQuery::param`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    /// Only return records for which this formula is truthy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter_by_formula: Option<String>,
    /// The maximum number of records returned across all pages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_records: Option<u32>,
    /// The number of records per page (the API caps this at 100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    /// The continuation token from a previous [`RecordSet`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<String>,
    /// Only return records visible in this view, in its order.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    /// Sort criteria, most significant first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Sort>,
    /// `json` or `string`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cell_format: Option<String>,
    /// The time zone used to format dates when `cell_format` is `string`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    /// The locale used to format dates when `cell_format` is `string`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_locale: Option<String>,
    /// Additional flat parameters, passed through verbatim.
    #[serde(flatten)]
    pub params: BTreeMap<String, String>,
}

impl ListQuery {
    /// An empty query, returning the first page of the whole table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter records by formula.
    pub fn filter_by_formula(mut self, formula: impl Into<String>) -> Self {
        self.params.remove("filterByFormula");
        self.filter_by_formula = Some(formula.into());
        self
    }

    /// Limit the total number of records.
    pub fn max_records(mut self, max: u32) -> Self {
        self.params.remove("maxRecords");
        self.max_records = Some(max);
        self
    }

    /// Set the page size.
    pub fn page_size(mut self, size: u32) -> Self {
        self.params.remove("pageSize");
        self.page_size = Some(size);
        self
    }

    /// Continue from a previous page.
    pub fn offset(mut self, offset: impl Into<String>) -> Self {
        self.params.remove("offset");
        self.offset = Some(offset.into());
        self
    }

    /// Restrict to a view.
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.params.remove("view");
        self.view = Some(view.into());
        self
    }

    /// Add a sort criterion.
    pub fn sort(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.sort.push(Sort {
            field: field.into(),
            direction,
        });
        self
    }

    /// Add a parameter by its wire name. Parameters this type models are
    /// stored in their typed field, so each key is sent at most once.
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let (key, value) = (key.into(), value.into());
        match key.as_str() {
            "filterByFormula" => self.filter_by_formula(value),
            "offset" => self.offset(value),
            "view" => self.view(value),
            "cellFormat" => {
                self.cell_format = Some(value);
                self
            }
            "timeZone" => {
                self.time_zone = Some(value);
                self
            }
            "userLocale" => {
                self.user_locale = Some(value);
                self
            }
            "maxRecords" if value.parse::<u32>().is_ok() => {
                self.max_records(value.parse().unwrap_or_default())
            }
            "pageSize" if value.parse::<u32>().is_ok() => {
                self.page_size(value.parse().unwrap_or_default())
            }
            // Unparseable numbers are passed through for the API to reject.
            _ => {
                match key.as_str() {
                    "maxRecords" => self.max_records = None,
                    "pageSize" => self.page_size = None,
                    _ => (),
                }
                self.params.insert(key, value);
                self
            }
        }
    }
}

impl<K, V> FromIterator<(K, V)> for ListQuery
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::default(), |q, (k, v)| q.param(k, v))
    }
}

/// List one page of records in a table.
#[derive(Debug, Clone)]
pub struct ListRecords<'a> {
    /// The table to list.
    pub table: &'a str,
    /// Filtering and paging options.
    pub query: &'a ListQuery,
}

impl ApiRequest for ListRecords<'_> {
    type Response = RecordSet;

    fn table(&self) -> &str {
        self.table
    }

    fn query(&self) -> Option<impl Serialize> {
        Some(self.query)
    }
}

/// Load a single record.
#[derive(Debug, Clone)]
pub struct GetRecord<'a> {
    /// The table the record is in.
    pub table: &'a str,
    /// The record ID.
    pub id: &'a str,
}

impl ApiRequest for GetRecord<'_> {
    type Response = Record;

    fn table(&self) -> &str {
        self.table
    }

    fn record_id(&self) -> Option<&str> {
        Some(self.id)
    }
}

/// Create records. The created records are not read back.
#[derive(Debug, Clone)]
pub struct CreateRecords<'a> {
    /// The table to create records in.
    pub table: &'a str,
    /// The records to create.
    pub records: &'a RecordSet,
}

impl ApiRequest for CreateRecords<'_> {
    type Response = Accepted;

    fn method(&self) -> http::Method {
        http::Method::POST
    }

    fn table(&self) -> &str {
        self.table
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.records)
    }
}

/// Update existing records. Fields that are not present on a record are
/// left untouched.
#[derive(Debug, Clone)]
pub struct UpdateRecords<'a> {
    /// The table the records are in.
    pub table: &'a str,
    /// The changes, one record per ID.
    pub records: &'a RecordSet,
}

impl ApiRequest for UpdateRecords<'_> {
    type Response = Accepted;

    fn method(&self) -> http::Method {
        http::Method::PATCH
    }

    fn table(&self) -> &str {
        self.table
    }

    fn body(&self) -> Option<impl Serialize> {
        Some(self.records)
    }
}

/// Delete a single batch of records. The API accepts at most 10 IDs per
/// request; [`Client::delete_records`](crate::Client::delete_records) takes
/// care of batching.
#[derive(Debug, Clone)]
pub struct DeleteRecords<'a, S> {
    /// The table the records are in.
    pub table: &'a str,
    /// The IDs to delete.
    pub ids: &'a [S],
}

impl<S: AsRef<str>> ApiRequest for DeleteRecords<'_, S> {
    type Response = Accepted;

    fn method(&self) -> http::Method {
        http::Method::DELETE
    }

    fn table(&self) -> &str {
        self.table
    }

    // The IDs go in a repeated `records[]` parameter, which the indexed
    // serde_qs array format doesn't produce.
    fn url(&self, config: &Config) -> Result<Url, config::Error> {
        let mut url = config.table_url(self.table, None)?;
        url.query_pairs_mut()
            .extend_pairs(self.ids.iter().map(|id| ("records[]", id.as_ref())));

        Ok(url)
    }
}
