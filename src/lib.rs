//! A rate-limited client for the [Airtable](https://airtable.com) records API.
//!
//! A [`Client`] is bound to one base. It lists, reads, creates, updates and
//! deletes records in the tables of that base, pacing every outbound request
//! through a [`RateGate`] (5 requests per second by default) and splitting
//! bulk deletes into batches the API accepts.
//!
//! ```no_run
//! use airtable::{Client, record::{ListQuery, Record, RecordSet}};
//! use serde_json::json;
//!
//! # fn main() -> anyhow::Result<()> {
//! let client = Client::new("patXXXXXXXX", "appXXXXXXXX");
//!
//! let mut query = ListQuery::new().filter_by_formula("{Status} = 'Todo'");
//! loop {
//!     let page = client.list_records("Tasks", &query)?;
//!     for record in &page.records {
//!         println!("{:?}: {:?}", record.id, record.field("Name"));
//!     }
//!
//!     match page.offset {
//!         Some(offset) => query = query.offset(offset),
//!         None => break,
//!     }
//! }
//!
//! let serde_json::Value::Object(fields) = json!({ "Name": "Write docs", "Status": "Todo" })
//! else {
//!     unreachable!()
//! };
//! client.create_records("Tasks", &RecordSet::new(vec![Record::new(fields)]))?;
//! # Ok(())
//! # }
//! ```
//!
//! # HTTP Requests and Responses
//!
//! The request types in [`record`] work with any HTTP client that uses the
//! [`http`] crate. Use [`ApiRequest::into_request`] to create a request, and
//! [`ApiResponse::from_response`] to parse the response. The [`Client`] does
//! exactly that through a [`Transport`], which is implemented for
//! [`ureq::Agent`].

#![warn(
    anonymous_parameters,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    nonstandard_style,
    rust_2018_idioms,
    single_use_lifetimes,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_qualifications,
    variant_size_differences
)]

mod api;
mod batch;
mod client;
pub mod config;
mod error;
mod ratelimit;
mod transport;

pub use api::*;
pub use batch::split_batches;
pub use client::Client;
pub use config::Config;
pub use error::Error;
pub use ratelimit::RateGate;
pub use transport::Transport;
