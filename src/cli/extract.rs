//! Extract the decryption key from an nky file

use std::path::Path;

use colored::Colorize;

use crate::config::Settings;
use crate::crypto::OpensslCli;
use crate::error::Result;
use crate::keypair;
use crate::nky::NkyContainer;
use crate::recover;

use super::{print_fields, rule};

pub struct ExtractArgs<'a> {
    pub nky_file: &'a Path,
    pub private_key: &'a Path,
    pub public_key: Option<&'a Path>,
    pub unwrap: bool,
}

pub fn run(settings: &Settings, args: ExtractArgs<'_>) -> Result<()> {
    let provider = OpensslCli::new(&settings.openssl);

    let container = NkyContainer::open(args.nky_file)?;
    if settings.verbose {
        print_fields(&container);
    }

    if let Some(public_key) = args.public_key {
        keypair::verify_key_pair(&provider, args.private_key, public_key)?;
        println!("{} key pair check passed", "OK:".green().bold());
    }

    let key = recover::recover_key(&provider, &container, args.private_key)?;

    if !args.unwrap {
        println!("{}", "Recovered key (base64):".cyan().bold());
        println!("{}", rule());
        println!("{}", key.to_base64());
        println!("{}", rule());
        return Ok(());
    }

    let private_key_pem = recover::unwrap_private_key(&provider, &container, &key)?;

    println!("{}", "Recovered private key (base64 PEM):".cyan().bold());
    println!("{}", rule());
    println!("{}", private_key_pem.to_base64());
    println!("{}", rule());

    Ok(())
}
