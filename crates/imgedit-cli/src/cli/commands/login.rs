//! `imgedit login` – write the credential store.

use anyhow::Result;
use imgedit_core::session::{credentials_path, Credentials};

pub fn run_login(owner: &str, repo: &str, token: &str) -> Result<()> {
    let creds = Credentials {
        token: token.trim().to_string(),
        owner: owner.trim().to_string(),
        repo: repo.trim().to_string(),
    };
    let path = credentials_path()?;
    creds.save(&path)?;
    tracing::info!(owner = %creds.owner, repo = %creds.repo, "credentials saved");
    println!("Saved credentials for {}/{} to {}", creds.owner, creds.repo, path.display());
    Ok(())
}
