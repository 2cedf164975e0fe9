//! Check that two key files form a pair

use std::path::Path;

use colored::Colorize;

use crate::config::Settings;
use crate::crypto::OpensslCli;
use crate::error::Result;
use crate::keypair;

pub fn run(settings: &Settings, private_key: &Path, public_key: &Path) -> Result<()> {
    let provider = OpensslCli::new(&settings.openssl);

    keypair::verify_key_pair(&provider, private_key, public_key)?;

    println!("{} keys belong to the same pair", "OK:".green().bold());
    Ok(())
}
