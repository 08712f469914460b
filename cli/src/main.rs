//! # shieldkit
//!
//! Operator tool for the shielded ERC-20 primitives: hashing, commitment and
//! nullifier derivation, point compression, compliance audits and a local
//! end-to-end demo against the in-memory ledger.

mod demo;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shieldkit_config::ShieldConfig;
use shieldkit_core::{ComplianceRecord, Guessers, decrypt_compliance};
use shieldkit_elgamal::{
    AuthorityKeys, CompressedPoint, CurvePoint, edwards_compress, edwards_decompress,
};
use shieldkit_field::{Element, FieldElement, HashMode, Hasher};
use shieldkit_privacy::{AssetAddress, Note, NoteValue, Salt, ZkpPrivateKey, ZkpPublicKey};

#[derive(Parser, Debug)]
#[command(name = "shieldkit")]
#[command(about = "Shielded ERC-20 cryptographic toolkit", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash hex inputs, each taken at `--bits` width
    Hash {
        #[arg(long, env = "HASH_TYPE", default_value = "sha")]
        mode: HashMode,
        #[arg(long, default_value = "256")]
        bits: usize,
        #[arg(required = true)]
        inputs: Vec<String>,
    },
    /// Derive a public key from a private key
    PublicKey { private_key: String },
    /// Derive a commitment H(asset, value, pk, salt)
    Commitment {
        #[arg(long)]
        asset: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        public_key: String,
        #[arg(long)]
        salt: String,
    },
    /// Derive a nullifier H(salt, sk)
    Nullifier {
        #[arg(long)]
        salt: String,
        #[arg(long)]
        private_key: String,
    },
    /// Compress a BabyJubJub point given as two field elements
    Compress { x: String, y: String },
    /// Decompress a 32-byte compressed point
    Decompress { point: String },
    /// Decrypt a compliance record (JSON) with authority private keys
    Audit {
        record: PathBuf,
        #[arg(long, env = "SHIELDKIT_AUTHORITY_KEYS", value_delimiter = ',', required = true)]
        keys: Vec<String>,
        #[arg(long, default_value = "100000")]
        max_amount: u64,
        /// Public keys to try for the sender and receiver slots
        #[arg(long = "known-key")]
        known_keys: Vec<String>,
    },
    /// Run mint, transfer and burn against an in-memory ledger
    Demo {
        #[arg(long, env = "HASH_TYPE", default_value = "sha")]
        mode: HashMode,
    },
    /// Configuration helpers
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigAction {
    /// Print a sample configuration file
    Sample,
    /// Print the effective configuration
    Show {
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

fn parse_scalar(s: &str) -> Result<FieldElement> {
    let parsed = if s.starts_with("0x") || s.starts_with("0X") {
        FieldElement::from_hex(s)
    } else {
        FieldElement::from_decimal(s)
    };
    parsed.with_context(|| format!("invalid field element: {s}"))
}

async fn run(args: Args) -> Result<()> {
    match args.command {
        Command::Hash { mode, bits, inputs } => {
            let elements = inputs
                .iter()
                .map(|hex| Element::from_hex(hex, bits))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            println!("{}", Hasher::new(mode).hash(&elements).to_hex());
        }
        Command::PublicKey { private_key } => {
            let sk = ZkpPrivateKey::from_hex(&private_key)?;
            println!("{}", sk.public_key());
        }
        Command::Commitment {
            asset,
            value,
            public_key,
            salt,
        } => {
            let note = Note::new(
                AssetAddress::from_hex(&asset)?,
                NoteValue::from_hex(&value)?,
                ZkpPublicKey::from_hex(&public_key)?,
                Salt::from_hex(&salt)?,
            );
            println!("{}", note.commitment());
        }
        Command::Nullifier { salt, private_key } => {
            let note_salt = Salt::from_hex(&salt)?;
            let sk = ZkpPrivateKey::from_hex(&private_key)?;
            println!("{}", shieldkit_privacy::Nullifier::derive(&note_salt, &sk).to_hex());
        }
        Command::Compress { x, y } => {
            let point = CurvePoint::new(parse_scalar(&x)?, parse_scalar(&y)?)?;
            println!("{}", edwards_compress(&point).to_hex());
        }
        Command::Decompress { point } => {
            let point = edwards_decompress(&CompressedPoint::from_hex(&point)?)?;
            println!("{}\n{}", point.x().to_decimal(), point.y().to_decimal());
        }
        Command::Audit {
            record,
            keys,
            max_amount,
            known_keys,
        } => {
            let contents = std::fs::read_to_string(&record)
                .with_context(|| format!("failed to read {}", record.display()))?;
            let record: ComplianceRecord =
                serde_json::from_str(&contents).context("failed to parse compliance record")?;
            let keys = AuthorityKeys::from_hex(&keys)?;
            let guessers = Guessers {
                max_amount,
                known_public_keys: known_keys
                    .iter()
                    .map(|k| ZkpPublicKey::from_hex(k))
                    .collect::<std::result::Result<_, _>>()?,
            };
            let decrypted = decrypt_compliance(&record, &keys, &guessers)?;
            println!("{}", serde_json::to_string_pretty(&decrypted)?);
        }
        Command::Demo { mode } => demo::run(mode).await?,
        Command::Config { action } => match action {
            ConfigAction::Sample => print!("{}", ShieldConfig::generate_sample()),
            ConfigAction::Show { path } => {
                let config = match path {
                    Some(path) => ShieldConfig::load_from(&path)?,
                    None => ShieldConfig::load()?,
                };
                println!("{config:#?}");
            }
        },
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_args() {
        let args = Args::parse_from(["shieldkit", "hash", "--mode", "mimc", "0x01", "0x02"]);
        match args.command {
            Command::Hash { mode, bits, inputs } => {
                assert_eq!(mode, HashMode::Mimc);
                assert_eq!(bits, 256);
                assert_eq!(inputs, vec!["0x01", "0x02"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("0x10").unwrap(), FieldElement::from_u64(16));
        assert_eq!(parse_scalar("16").unwrap(), FieldElement::from_u64(16));
        assert!(parse_scalar("sixteen").is_err());
    }
}
