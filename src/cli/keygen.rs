//! Generate an RSA key pair on disk

use std::path::Path;

use colored::Colorize;

use crate::config::Settings;
use crate::crypto::{OpensslCli, RSA_KEY_BITS};
use crate::error::{NkyError, Result};
use crate::keypair::{self, KeyNames};

pub fn run(settings: &Settings, names: Option<KeyNames>, out_dir: &Path) -> Result<()> {
    if !out_dir.is_dir() {
        return Err(NkyError::NotFound(out_dir.to_path_buf()));
    }

    let names = names.unwrap_or(settings.key_names);
    let (private_path, public_path) = names.paths_in(out_dir);
    let provider = OpensslCli::new(&settings.openssl);

    print!("{}", format!("Generating {}-bit RSA key pair... ", RSA_KEY_BITS).cyan());
    std::io::Write::flush(&mut std::io::stdout())?;

    keypair::generate_key_pair(&provider, &private_path, &public_path)?;
    println!("{}", "done".green());

    println!();
    println!("  private key: {}", private_path.display().to_string().cyan());
    println!("  public key:  {}", public_path.display().to_string().cyan());
    println!();
    println!("{}", "Keys generated".green().bold());

    Ok(())
}
