mod common;

use common::*;
use shieldkit_config::ShieldConfig;
use shieldkit_core::{
    BATCH_SIZE, BatchTransferRequest, BurnRequest, ConsolidationRequest, ErrorKind, Ledger,
    MemoryLedger, Operation, Receipt, ShieldContext, Submission, TransferRequest,
};
use shieldkit_field::{FieldElement, HashMode, Hasher};
use shieldkit_privacy::{
    Commitment, MerkleTree, NoteValue, Nullifier, OutputNote, PayToAddress, SharedMerkleTree,
    SpendableNote, ZkpPrivateKey, ZkpPublicKey, verify_path,
};
use shieldkit_prover::MockProver;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn outputs(values: &[u128]) -> Vec<OutputNote> {
    values
        .iter()
        .map(|v| OutputNote::random(NoteValue::new(*v)))
        .collect()
}

#[tokio::test]
async fn test_mint_reference_note() {
    let h = Harness::new(HashMode::Sha);
    let outcome = h.context.mint(&reference_note()).await.unwrap();

    assert_eq!(outcome.operation, Operation::Mint);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].commitment.to_hex(), COMMITMENT_HEX);
    assert_eq!(outcome.created[0].index, 0);
    assert_eq!(outcome.created[0].owner.to_hex(), PK_HEX);
    assert_eq!(outcome.root.to_hex(), ONE_LEAF_ROOT_HEX, "root after one leaf");
    assert!(outcome.spent_root.is_none());
    assert_eq!(outcome.public_inputs.len(), 1);

    let inputs = h.prover.last_inputs();
    assert_eq!(inputs.len(), 6, "[pih, asset, amount, pk, salt, commitment]");
    assert_eq!(inputs[0], outcome.public_inputs[0]);
    assert_eq!(inputs[1], "1");
    assert_eq!(inputs[2], "32");
    assert_eq!(inputs[5], FieldElement::from_hex(COMMITMENT_HEX).unwrap().to_decimal());
    assert_eq!(h.leftover_workspaces(), 0, "workspace removed after proving");
}

#[tokio::test]
async fn test_mint_transfer_burn() {
    let h = Harness::new(HashMode::Sha);
    let sender = sender_key();
    let receiver = receiver_key();

    let first = h.context.mint(&reference_note()).await.unwrap();
    let second = h.mint(0x30, sender.public_key()).await;
    assert_eq!(second.created[0].index, 1);

    let request = |values: &[u128]| TransferRequest {
        asset: asset(),
        inputs: vec![first.created[0].spendable(), second.created[0].spendable()],
        outputs: outputs(values),
        receiver: receiver.public_key(),
        sender_key: sender.clone(),
    };
    let err = h.context.transfer(request(&[0x40, 0x11])).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueMismatch, "0x50 in, 0x51 out");

    let transfer = h.context.transfer(request(&[0x40, 0x10])).await.unwrap();

    assert_eq!(transfer.nullifiers.len(), 2);
    assert_eq!(transfer.nullifiers[0].to_hex(), NULLIFIER_HEX);
    assert_eq!(transfer.spent_root, Some(second.root));
    let indices: Vec<u64> = transfer.created.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![2, 3]);
    assert_eq!(transfer.created[0].owner, receiver.public_key());
    assert_eq!(transfer.created[1].owner, sender.public_key(), "change returns to the sender");
    let total: u128 = transfer.created.iter().map(|c| c.value.as_u128()).sum();
    assert_eq!(total, 0x50);
    assert_eq!(transfer.root, h.context.tree().root());

    // [pih, asset, v, sk, salt, 32 siblings, index, v, salt, 32 siblings, index,
    //  nf0, nf1, 7 output fields, root as two packets]
    let inputs = h.prover.last_inputs();
    assert_eq!(inputs.len(), 2 + 3 + 33 + 2 + 33 + 2 + 7 + 2);
    assert_eq!(inputs[0], transfer.public_inputs[0]);
    assert_eq!(
        inputs[2 + 3 + 33 + 2 + 33],
        transfer.nullifiers[0].as_field().to_decimal()
    );

    let burn = h
        .context
        .burn(BurnRequest {
            asset: asset(),
            input: transfer.created[0].spendable(),
            pay_to: PayToAddress::from_hex("0x5fbdb2315678afecb367f032d93f642f64180aa3").unwrap(),
            sender_key: receiver.clone(),
        })
        .await
        .unwrap();
    assert!(burn.created.is_empty());
    assert_eq!(burn.nullifiers.len(), 1);
    assert_eq!(burn.root, transfer.root, "burn inserts nothing");
    assert_eq!(h.prover.last_inputs().len(), 6 + 33 + 1 + 2);

    assert_eq!(h.ledger.spent_count(), 3);
    assert_eq!(h.context.tree().len(), 4);
    assert_eq!(h.leftover_workspaces(), 0);
}

#[tokio::test]
async fn test_double_spend_rejected() {
    let h = Harness::new(HashMode::Sha);
    let sender = sender_key();
    let minted = h.context.mint(&reference_note()).await.unwrap();
    let burn = || BurnRequest {
        asset: asset(),
        input: minted.created[0].spendable(),
        pay_to: PayToAddress::from_hex("0x02").unwrap(),
        sender_key: sender.clone(),
    };

    h.context.burn(burn()).await.unwrap();
    let calls = h.prover.calls.lock().unwrap().len();
    let err = h.context.burn(burn()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Ledger);
    assert_eq!(
        h.prover.calls.lock().unwrap().len(),
        calls,
        "spent inputs are rejected before proving"
    );
}

#[tokio::test]
async fn test_transfer_value_checks() {
    let h = Harness::new(HashMode::Sha);
    let sender = sender_key();
    let a = h.mint(0xffff_ffff, sender.public_key()).await;
    let b = h.mint(1, sender.public_key()).await;
    let c = h.mint(5, sender.public_key()).await;

    let request = |inputs: Vec<SpendableNote>, values: &[u128]| TransferRequest {
        asset: asset(),
        inputs,
        outputs: outputs(values),
        receiver: receiver_key().public_key(),
        sender_key: sender.clone(),
    };

    let err = h
        .context
        .transfer(request(
            vec![a.created[0].spendable(), b.created[0].spendable()],
            &[0xffff_ffff, 1],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Overflow);

    let err = h
        .context
        .transfer(request(
            vec![b.created[0].spendable(), c.created[0].spendable()],
            &[3, 4],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueMismatch);

    let err = h
        .context
        .transfer(request(vec![b.created[0].spendable()], &[1, 0]))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "exactly two inputs");

    let err = h
        .context
        .transfer(request(
            vec![b.created[0].spendable(), b.created[0].spendable()],
            &[1, 1],
        ))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "same input twice");

    assert!(h.prover.calls.lock().unwrap().len() == 3, "only the mints were proved");
}

/// Ledger that lets another writer append a leaf on the nth spent-check,
/// which lands between the sibling-path reads of two inputs
struct AppendingLedger {
    inner: MemoryLedger,
    tree: SharedMerkleTree,
    checks: AtomicUsize,
    append_on: usize,
}

impl Ledger for AppendingLedger {
    fn submit(&self, submission: Submission) -> shieldkit_core::Result<Receipt> {
        self.inner.submit(submission)
    }

    fn is_spent(&self, nullifier: &Nullifier) -> bool {
        if self.checks.fetch_add(1, Ordering::SeqCst) + 1 == self.append_on {
            let foreign = Commitment::from_hex("0x0badc0de").unwrap();
            self.tree.append(&foreign).unwrap();
        }
        self.inner.is_spent(nullifier)
    }
}

#[tokio::test]
async fn test_transfer_rejects_paths_with_different_roots() {
    let workspaces = tempfile::tempdir().unwrap();
    let mut config = ShieldConfig::default();
    config.prover.output_directory = Some(workspaces.path().to_string_lossy().into_owned());
    let tree = SharedMerkleTree::new(
        MerkleTree::new(Hasher::new(config.hash.mode), config.tree.depth).unwrap(),
    );
    let ledger = Arc::new(AppendingLedger {
        inner: MemoryLedger::new(tree.clone(), config.tree.root_history),
        tree: tree.clone(),
        checks: AtomicUsize::new(0),
        // mints never check nullifiers, so the second check is the
        // transfer's second input
        append_on: 2,
    });
    let context =
        ShieldContext::new(config, tree.clone(), Arc::new(MockProver::new()), ledger.clone())
            .unwrap();

    let sender = sender_key();
    let a = context.mint(&note(3, sender.public_key())).await.unwrap();
    let b = context.mint(&note(4, sender.public_key())).await.unwrap();
    let leaves = tree.len();

    let err = context
        .transfer(TransferRequest {
            asset: asset(),
            inputs: vec![a.created[0].spendable(), b.created[0].spendable()],
            outputs: outputs(&[5, 2]),
            receiver: receiver_key().public_key(),
            sender_key: sender,
        })
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InconsistentRoot);
    assert_eq!(tree.len(), leaves + 1, "only the racing append landed");
    assert_eq!(ledger.inner.spent_count(), 0);
    assert_eq!(std::fs::read_dir(workspaces.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_input_checks() {
    let h = Harness::new(HashMode::Sha);
    let sender = sender_key();
    let minted = h.mint(9, sender.public_key()).await;
    let mut wrong_index = minted.created[0].spendable();
    wrong_index.index = 7;

    let burn = |input: SpendableNote, key: ZkpPrivateKey| BurnRequest {
        asset: asset(),
        input,
        pay_to: PayToAddress::from_hex("0x02").unwrap(),
        sender_key: key,
    };

    let err = h.context.burn(burn(wrong_index, sender.clone())).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::LeafNotFound);

    let err = h
        .context
        .burn(burn(minted.created[0].spendable(), receiver_key()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "note is not owned by this key");

    let mut forged = minted.created[0].spendable();
    forged.value = NoteValue::new(10);
    let err = h.context.burn(burn(forged, sender)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation, "value does not open the commitment");
}

#[tokio::test]
async fn test_batch_transfer() {
    let h = Harness::new(HashMode::Sha);
    let sender = sender_key();
    let receivers: Vec<ZkpPublicKey> = (0..BATCH_SIZE)
        .map(|i| ZkpPrivateKey::from_bytes([i as u8 + 1; 32]).public_key())
        .collect();
    let minted = h.mint(50, sender.public_key()).await;

    let mut values = vec![0u128; BATCH_SIZE];
    values[0] = 20;
    values[1] = 25;
    values[19] = 6;
    let request = |values: &[u128], receivers: Vec<ZkpPublicKey>| BatchTransferRequest {
        asset: asset(),
        input: minted.created[0].spendable(),
        outputs: outputs(values),
        receivers,
        sender_key: sender.clone(),
    };

    let err = h
        .context
        .batch_transfer(request(&values, receivers.clone()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueMismatch, "outputs sum to 51");

    let err = h
        .context
        .batch_transfer(request(&values[..19], receivers[..19].to_vec()))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    values[19] = 5;
    let outcome = h
        .context
        .batch_transfer(request(&values, receivers.clone()))
        .await
        .unwrap();
    assert_eq!(outcome.created.len(), BATCH_SIZE);
    for (i, note) in outcome.created.iter().enumerate() {
        assert_eq!(note.index, 1 + i as u64, "outputs are inserted contiguously");
        assert_eq!(note.owner, receivers[i]);
    }
    let inputs = h.prover.last_inputs();
    assert_eq!(inputs.len(), 2 + 3 + 33 + 1 + 4 * BATCH_SIZE + 2);
}

#[tokio::test]
async fn test_consolidation_transfer() {
    let h = Harness::new(HashMode::Sha);
    let sender = sender_key();
    let mut inputs = Vec::new();
    for value in 1..=BATCH_SIZE as u128 {
        inputs.push(h.mint(value, sender.public_key()).await.created[0].spendable());
    }
    let total: u128 = (1..=BATCH_SIZE as u128).sum();

    let request = |inputs: Vec<SpendableNote>, value: u128| ConsolidationRequest {
        asset: asset(),
        inputs,
        output: OutputNote::random(NoteValue::new(value)),
        receiver: receiver_key().public_key(),
        sender_key: sender.clone(),
    };

    let err = h
        .context
        .consolidation_transfer(request(inputs.clone(), total - 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ValueMismatch);

    let err = h
        .context
        .consolidation_transfer(request(inputs[1..].to_vec(), total - 1))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);

    let outcome = h
        .context
        .consolidation_transfer(request(inputs, total))
        .await
        .unwrap();
    assert_eq!(outcome.nullifiers.len(), BATCH_SIZE);
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].index, BATCH_SIZE as u64);
    assert_eq!(outcome.created[0].value, NoteValue::new(total));
    let spent_root = outcome.spent_root.unwrap();
    let sent = h.prover.last_inputs();
    assert_eq!(
        sent.len(),
        2 + BATCH_SIZE * (1 + 1 + 32 + 1 + 1) + 1 + 4 + 1,
        "root is a single element even in SHA mode"
    );
    assert_eq!(sent.last().unwrap(), &spent_root.to_decimal());
}

#[tokio::test]
async fn test_mimc_deployment() {
    let h = Harness::new(HashMode::Mimc);
    let sender = sender_key();
    let first = h.context.mint(&reference_note()).await.unwrap();
    assert_eq!(
        first.created[0].commitment.to_hex(),
        COMMITMENT_HEX,
        "commitments are SHA in both modes"
    );
    assert_ne!(first.root.to_hex(), ONE_LEAF_ROOT_HEX, "nodes follow the mode");

    let second = h.mint(4, sender.public_key()).await;
    let path = h
        .context
        .tree()
        .sibling_path(&first.created[0].commitment, 0)
        .unwrap();
    assert!(verify_path(
        &h.context.hasher(),
        &first.created[0].commitment,
        0,
        &path,
        &second.root
    ));

    let transfer = h
        .context
        .transfer(TransferRequest {
            asset: asset(),
            inputs: vec![first.created[0].spendable(), second.created[0].spendable()],
            outputs: outputs(&[0x24, 0]),
            receiver: receiver_key().public_key(),
            sender_key: sender,
        })
        .await
        .unwrap();
    let inputs = h.prover.last_inputs();
    assert_eq!(inputs.len(), 2 + 3 + 33 + 2 + 33 + 2 + 7 + 1, "MiMC root is one element");
    assert_eq!(
        inputs.last().unwrap(),
        &transfer.spent_root.unwrap().to_decimal()
    );
}

#[tokio::test]
async fn test_prover_failure_cleans_up() {
    let (context, ledger, workspaces) = Harness::with_backend(Arc::new(MockProver::failing()));
    let err = context.mint(&reference_note()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Prover);
    assert_eq!(
        std::fs::read_dir(workspaces.path()).unwrap().count(),
        0,
        "failed proofs leave no artifacts"
    );
    assert!(context.tree().is_empty(), "nothing was submitted");
    assert_eq!(ledger.spent_count(), 0);
}

#[tokio::test]
async fn test_concurrent_mints() {
    let h = Arc::new(Harness::new(HashMode::Sha));
    let owner = sender_key().public_key();
    let tasks: Vec<_> = (0..8u128)
        .map(|v| {
            let h = Arc::clone(&h);
            tokio::spawn(async move { h.mint(v + 1, owner).await })
        })
        .collect();

    let mut indices = Vec::new();
    for task in tasks {
        let outcome = task.await.unwrap();
        let created = &outcome.created[0];
        assert_eq!(h.context.tree().leaf(created.index), Some(created.commitment));
        indices.push(created.index);
    }
    indices.sort_unstable();
    assert_eq!(indices, (0..8).collect::<Vec<u64>>(), "every mint got its own leaf");
    assert_eq!(h.leftover_workspaces(), 0);
}
