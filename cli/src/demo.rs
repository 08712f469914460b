//! Local end-to-end run: mint two notes, transfer, burn the change.
//!
//! Uses the mock prover and the in-memory ledger, so it needs no ZoKrates
//! install. Outcomes are printed as JSON.

use std::sync::Arc;

use anyhow::Result;
use shieldkit_config::ShieldConfig;
use shieldkit_core::{BurnRequest, OperationOutcome, ShieldContext, TransferRequest};
use shieldkit_field::HashMode;
use shieldkit_privacy::{AssetAddress, Note, NoteValue, OutputNote, PayToAddress, ZkpPrivateKey};
use shieldkit_prover::MockProver;

const DEMO_ASSET: &str = "0x5fbdb2315678afecb367f032d93f642f64180aa3";

fn print(outcome: &OperationOutcome) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(outcome)?);
    Ok(())
}

pub async fn run(mode: HashMode) -> Result<()> {
    let mut config = ShieldConfig::default();
    config.hash.mode = mode;
    let (context, ledger) = ShieldContext::in_memory(config, Arc::new(MockProver::new()))?;

    let asset = AssetAddress::from_hex(DEMO_ASSET)?;
    let alice = ZkpPrivateKey::random();
    let bob = ZkpPrivateKey::random();
    log::info!("alice={} bob={}", alice.public_key(), bob.public_key());

    let first = context
        .mint(&Note::random(asset, NoteValue::new(0x20), alice.public_key()))
        .await?;
    print(&first)?;
    let second = context
        .mint(&Note::random(asset, NoteValue::new(0x10), alice.public_key()))
        .await?;
    print(&second)?;

    let transfer = context
        .transfer(TransferRequest {
            asset,
            inputs: vec![first.created[0].spendable(), second.created[0].spendable()],
            outputs: vec![
                OutputNote::random(NoteValue::new(0x28)),
                OutputNote::random(NoteValue::new(0x08)),
            ],
            receiver: bob.public_key(),
            sender_key: alice.clone(),
        })
        .await?;
    print(&transfer)?;

    let burn = context
        .burn(BurnRequest {
            asset,
            input: transfer.created[1].spendable(),
            pay_to: PayToAddress::from_hex("0x70997970c51812dc3a010c7d01b50e0d17dc79c8")?,
            sender_key: alice,
        })
        .await?;
    print(&burn)?;

    log::info!(
        "Demo finished: {} leaves, {} nullifiers spent, root {}",
        context.tree().len(),
        ledger.spent_count(),
        context.tree().root()
    );
    Ok(())
}
