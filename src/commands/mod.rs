pub mod apply;
pub mod plan;

use crate::cli::ManifestArgs;
use crate::config::{self, Manifest, Overrides};
use crate::model;
use crate::paths;
use crate::remote::SpotRemote;
use anyhow::{Context, Result};
use declarative::{Request, TypeRegistry};
use spotkit::{Client, CredentialsFile};

/// Everything a command needs before talking to the API
pub struct Session {
    pub request: Request,
    pub registry: TypeRegistry,
    pub remote: SpotRemote,
}

/// Load the manifest, apply overrides and build an authenticated client
pub fn load(args: ManifestArgs) -> Result<Session> {
    let manifest = Manifest::load(&args.manifest)?;
    let overrides = Overrides::from(args.overrides);

    let request = config::build_request(&manifest, &overrides)?;

    let hint = config::credentials_path_hint(&manifest, &overrides);
    let credentials_path = paths::credentials_path(hint)?;
    let file = CredentialsFile::load(&credentials_path).with_context(|| {
        format!("Could not read credentials from {}", credentials_path.display())
    })?;
    let credentials = config::resolve_credentials(&manifest, &overrides, file)?;

    let registry = model::registry().context("Invalid document type registry")?;

    Ok(Session {
        request,
        registry,
        remote: SpotRemote::new(Client::new(credentials)),
    })
}
