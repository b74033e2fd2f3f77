//! Creating missing ancestor directories on the Disk

use crate::api::{self, EXISTENT_DIRECTORY_ERROR};
use crate::client::DiskClient;
use crate::error::{Error, Result};
use crate::remote_path::RemotePath;
use crate::transport::Transport;
use tracing::{debug, info};

impl<T: Transport> DiskClient<T> {
    /// Make sure every ancestor directory of `remote_path` exists.
    ///
    /// If the path itself exists, that single check is the only call made.
    /// Otherwise each ancestor is checked root-to-leaf and created when
    /// missing. The first failure stops the walk.
    pub async fn ensure_directories(&self, remote_path: &str) -> Result<()> {
        let remote_path = RemotePath::new(remote_path)?;

        let response = self.get_resource(remote_path.as_str()).await?;
        match response.status {
            200 => {
                debug!(path = %remote_path, "Remote path already exists");
                return Ok(());
            }
            404 => {}
            _ => return Err(api::failure(&response)),
        }

        for ancestor in remote_path.ancestors() {
            let response = self.get_resource(&ancestor).await?;
            match response.status {
                200 => debug!(path = %ancestor, "Directory exists"),
                404 => match self.create_directory(&ancestor).await {
                    Ok(_) => info!(path = %ancestor, "Created directory"),
                    // Created by someone else between the check and the PUT
                    Err(Error::Api(api_error)) if api_error.error == EXISTENT_DIRECTORY_ERROR => {
                        debug!(path = %ancestor, "Directory appeared concurrently")
                    }
                    Err(err) => return Err(err),
                },
                _ => return Err(api::failure(&response)),
            }
        }

        Ok(())
    }

    /// Create one directory at exactly `path`.
    ///
    /// Returns `Ok(true)` on 201; every other status is an error.
    pub async fn create_directory(&self, path: &str) -> Result<bool> {
        let response = self.put_resource(path).await?;
        if response.status == 201 {
            Ok(true)
        } else {
            Err(api::failure(&response))
        }
    }
}
