use tracing::{debug, warn};

use crate::{
    Accepted, ApiRequest, ApiResponse, Config, Error, RateGate, Transport,
    batch::split_batches,
    config,
    record::{
        CreateRecords, DeleteRecords, GetRecord, ListQuery, ListRecords, Record, RecordSet,
        UpdateRecords,
    },
    transport::default_agent,
};

/// A rate-limited client for the records of a single base.
///
/// Every request, including each batch of a bulk delete, waits for a slot
/// from the client's [`RateGate`] before it is sent. The client can be shared
/// between threads; the gate serializes them.
#[derive(Debug)]
pub struct Client<T = ureq::Agent> {
    config: Config,
    gate: RateGate,
    transport: T,
}

impl Client {
    /// Create a client for the given base with the default configuration.
    pub fn new(api_key: impl Into<String>, base_id: impl Into<String>) -> Self {
        Self::with_config(Config::new(api_key, base_id))
    }

    /// Create a client from a full configuration.
    pub fn with_config(config: Config) -> Self {
        Self::with_transport(config, default_agent())
    }
}

impl<T: Transport> Client<T> {
    /// Create a client that sends requests through the given transport.
    ///
    /// A [`ureq::Agent`] passed here should be built with
    /// `http_status_as_error(false)`; otherwise error bodies are lost.
    pub fn with_transport(config: Config, transport: T) -> Self {
        Self {
            gate: RateGate::new(config.rate_limit),
            config,
            transport,
        }
    }

    /// The configuration the client was created with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send any request through the rate gate and parse the response.
    pub fn roundtrip<R: ApiRequest>(&self, req: R) -> Result<R::Response, Error> {
        let req = req.into_request(&self.config)?;
        self.send(req)
    }

    fn send<R: ApiResponse>(&self, req: http::Request<String>) -> Result<R, Error> {
        self.gate.take();
        debug!(method = %req.method(), uri = %req.uri(), "sending request");

        let resp = self.transport.send(req)?;
        R::from_response(resp)
    }

    /// List one page of records. Pass [`RecordSet::offset`] back through
    /// [`ListQuery::offset`] to fetch the next one.
    pub fn list_records(&self, table: &str, query: &ListQuery) -> Result<RecordSet, Error> {
        self.roundtrip(ListRecords { table, query })
    }

    /// Load a single record. A missing record is an [`Error::Api`] with a 404
    /// status, like any other failure.
    pub fn get_record(&self, table: &str, id: &str) -> Result<Record, Error> {
        self.roundtrip(GetRecord { table, id })
    }

    /// Create records. The created records are not returned.
    pub fn create_records(&self, table: &str, records: &RecordSet) -> Result<(), Error> {
        let req = CreateRecords { table, records }.into_request(&self.config)?;
        debug!(table, body = %req.body(), "creating records");

        self.send_write(req)
    }

    /// Update the given fields of existing records, leaving other fields
    /// untouched. On failure the returned error carries the request body.
    pub fn update_records(&self, table: &str, records: &RecordSet) -> Result<(), Error> {
        let req = UpdateRecords { table, records }.into_request(&self.config)?;
        self.send_write(req).inspect_err(|e| {
            if let Error::Api(e) = e {
                warn!(table, status = %e.status(), body = ?e.request_body(), "update rejected");
            }
        })
    }

    fn send_write(&self, req: http::Request<String>) -> Result<(), Error> {
        let body = req.body().clone();
        match self.send::<Accepted>(req) {
            Ok(Accepted) => Ok(()),
            Err(Error::Api(e)) => Err(e.with_request_body(body).into()),
            Err(e) => Err(e),
        }
    }

    /// Delete records, in batches of
    /// [`delete_batch_size`](Config::delete_batch_size) IDs per request.
    ///
    /// Batches are sent one after the other, in order. The first failing
    /// batch aborts the operation and its error is returned; later batches
    /// are not attempted. The error does not say which IDs were already
    /// deleted by earlier batches.
    pub fn delete_records<S: AsRef<str>>(&self, table: &str, ids: &[S]) -> Result<(), Error> {
        if table.is_empty() {
            return Err(config::Error::EmptyTable.into());
        }

        let size = self.config.delete_batch_size.get();
        let mut deleted = 0;
        for (n, batch) in split_batches(ids, size).into_iter().enumerate() {
            if let Err(e) = self.roundtrip(DeleteRecords { table, ids: batch }) {
                warn!(
                    table,
                    batch = n,
                    deleted,
                    remaining = ids.len() - deleted,
                    "aborting delete: {e}"
                );
                return Err(e);
            }

            deleted += batch.len();
        }

        Ok(())
    }
}
