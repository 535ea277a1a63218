use crate::config::S3Config;
use crate::error::{ObjectStoreError, Result};
use crate::{ListPage, ObjectStore};
use diagnostics::*;
use s3::bucket::Bucket;
use s3::creds::Credentials;
use s3::region::Region;

/// Bucket access through the blocking rust-s3 client.
pub struct S3Store {
    bucket: Box<Bucket>,
    name: String,
    prefix: String,
}

impl S3Store {
    pub fn new(config: &S3Config) -> Result<Self> {
        let access_key = config
            .access_key
            .as_deref()
            .ok_or_else(|| ObjectStoreError::Configuration("S3 access key is not set".to_string()))?;
        let secret_key = config
            .secret_key
            .as_deref()
            .ok_or_else(|| ObjectStoreError::Configuration("S3 secret key is not set".to_string()))?;

        let region = resolve_region(config)?;
        let creds = Credentials::new(Some(access_key), Some(secret_key), None, None, None)
            .map_err(|e| ObjectStoreError::Credentials {
                message: e.to_string(),
            })?;

        let mut bucket: Box<Bucket> = Bucket::new(&config.bucket, region, creds)?.into();
        if config.endpoint.is_some() {
            bucket = bucket.with_path_style().into();
        }

        debug!("Opened bucket {bucket} in {region}", bucket: config.bucket.as_str(), region: config.region.as_str());

        Ok(Self {
            bucket,
            name: config.bucket.clone(),
            prefix: config.prefix.clone(),
        })
    }
}

/// Regions missing from rust-s3's table (GovCloud among them) parse as a
/// custom region whose endpoint is the bare region name; those are given
/// the regional AWS endpoint instead.
fn resolve_region(config: &S3Config) -> Result<Region> {
    let name = config.region.trim();
    if name.is_empty() {
        return Err(ObjectStoreError::Region {
            region: config.region.clone(),
        });
    }

    if let Some(endpoint) = &config.endpoint {
        return Ok(Region::Custom {
            region: name.to_string(),
            endpoint: endpoint.clone(),
        });
    }

    match name.parse::<Region>() {
        Ok(Region::Custom { region, .. }) => Ok(Region::Custom {
            endpoint: format!("https://s3.{region}.amazonaws.com"),
            region,
        }),
        Ok(region) => Ok(region),
        Err(_) => Err(ObjectStoreError::Region {
            region: config.region.clone(),
        }),
    }
}

impl ObjectStore for S3Store {
    fn name(&self) -> &str {
        &self.name
    }

    fn list_page(&self, continuation: Option<&str>) -> Result<ListPage> {
        let (result, status) = self.bucket.list_page(
            self.prefix.clone(),
            None,
            continuation.map(str::to_string),
            None,
            None,
        )?;

        if !(200..300).contains(&status) {
            return Err(ObjectStoreError::ListStatus {
                bucket: self.name.clone(),
                status,
            });
        }

        let next = if result.is_truncated {
            result.next_continuation_token
        } else {
            None
        };

        Ok(ListPage {
            keys: result.contents.into_iter().map(|object| object.key).collect(),
            next,
        })
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let response = self.bucket.get_object(key)?;
        match response.status_code() {
            200..=299 => Ok(response.bytes().to_vec()),
            404 => Err(ObjectStoreError::NotFound {
                key: key.to_string(),
            }),
            status => Err(ObjectStoreError::GetStatus {
                key: key.to_string(),
                status,
            }),
        }
    }
}
