use crate::client::SolrApi;
use crate::config::{SolrConfig, UnknownExistence};
use crate::error::{Result, SolrError};
use diagnostics::*;
use serde::Deserialize;

pub const AUTO_CREATE_FIELDS: &str = "update.autoCreateFields";

/// Answer of the collection listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Existence {
    Present,
    Absent,
    /// The listing failed or could not be parsed.
    Unknown,
}

/// Which branch [`Provisioner::ensure`] took.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provisioned {
    AlreadyExisted,
    Created,
}

#[derive(Deserialize)]
struct CollectionList {
    collections: Vec<String>,
}

/// Makes sure the target collection exists before indexing.
pub struct Provisioner<'a, A> {
    api: A,
    config: &'a SolrConfig,
}

impl<'a, A: SolrApi> Provisioner<'a, A> {
    pub fn new(api: A, config: &'a SolrConfig) -> Self {
        Self { api, config }
    }

    pub fn exists(&self) -> Result<Existence> {
        let name = self.config.collection.as_str();
        let reply = self.api.list_collections()?;

        if !reply.is_success() {
            error!("Failed to list collections. Status: {status}, Body: {body}", status: reply.status, body: reply.body.as_str());
            return Ok(Existence::Unknown);
        }

        match serde_json::from_str::<CollectionList>(&reply.body) {
            Ok(list) if list.collections.iter().any(|c| c == name) => Ok(Existence::Present),
            Ok(_) => Ok(Existence::Absent),
            Err(_) => {
                error!("Unexpected collection listing. Status: {status}, Body: {body}", status: reply.status, body: reply.body.as_str());
                Ok(Existence::Unknown)
            }
        }
    }

    pub fn create(&self) -> Result<()> {
        let name = self.config.collection.as_str();
        let reply = self.api.create_collection(
            name,
            self.config.num_shards,
            self.config.replication_factor,
        )?;
        info!("Create collection response: {status} {body}", status: reply.status, body: reply.body.as_str());

        if !reply.is_success() {
            return Err(SolrError::Status {
                action: "CREATE",
                collection: name.to_string(),
                status: reply.status,
                body: reply.body,
            });
        }
        Ok(())
    }

    /// Let Solr infer fields for incoming documents.
    pub fn configure_auto_fields(&self) -> Result<()> {
        let name = self.config.collection.as_str();
        let reply = self.api.set_user_property(name, AUTO_CREATE_FIELDS, "true")?;
        info!("Auto-create fields: {status} {body}", status: reply.status, body: reply.body.as_str());

        if !reply.is_success() {
            return Err(SolrError::Status {
                action: "set-user-property",
                collection: name.to_string(),
                status: reply.status,
                body: reply.body,
            });
        }
        Ok(())
    }

    /// Create and configure the collection unless it already exists.
    ///
    /// When the listing was unreadable and creation is rejected, the
    /// listing is read again; a collection that turns out to exist counts
    /// as already provisioned.
    pub fn ensure(&self) -> Result<Provisioned> {
        let name = self.config.collection.as_str();
        match self.exists()? {
            Existence::Present => {
                info!("Solr collection '{name}' already exists.", name: name);
                Ok(Provisioned::AlreadyExisted)
            }
            Existence::Absent => {
                info!("Solr collection '{name}' does not exist. Creating it...", name: name);
                self.create()?;
                self.configure_auto_fields()?;
                Ok(Provisioned::Created)
            }
            Existence::Unknown => match self.config.on_unknown_existence {
                UnknownExistence::Create => {
                    warn!("Existence of collection '{name}' is unknown. Attempting to create it...", name: name);
                    self.create_unverified()
                }
                UnknownExistence::Abort => Err(SolrError::ExistenceUnknown {
                    collection: name.to_string(),
                }),
            },
        }
    }

    fn create_unverified(&self) -> Result<Provisioned> {
        let name = self.config.collection.as_str();
        match self.create() {
            Ok(()) => {
                self.configure_auto_fields()?;
                Ok(Provisioned::Created)
            }
            Err(SolrError::Status { status, body, .. }) => {
                warn!("Create of '{name}' was rejected with {status}, checking whether it exists", name: name, status: status);
                if self.exists()? == Existence::Present {
                    info!("Solr collection '{name}' already exists.", name: name);
                    return Ok(Provisioned::AlreadyExisted);
                }
                Err(SolrError::Status {
                    action: "CREATE",
                    collection: name.to_string(),
                    status,
                    body,
                })
            }
            Err(err) => Err(err),
        }
    }
}
