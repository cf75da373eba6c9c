//! End-to-end tests for the transaction essence pipeline.
//!
//! These go through the public API only: build outputs, assemble an
//! essence, sign it, ship it as bytes or JSON, and read it back on the
//! other side. Each test builds its own keys and parameters.

use primitive_types::U256;

use tangle_protocol::config::ConfigError;
use tangle_protocol::error::DepositViolation;
use tangle_protocol::{
    Address, AddressKeys, AliasId, BasicOutput, Codec, Ed25519Address, Error, FeatureBlock,
    FoundryOutput, Input, JsonCodec, NativeToken, NftId, NftOutput, Output, Payload,
    ProtocolParameters, SignerError, TokenId, TransactionEssence, TransactionEssenceBuilder,
    TransactionId, TreasuryInput, TreasuryOutput, TreasuryTransaction, UnlockCondition, UtxoInput,
    ValidationMode, WotsAddress,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn ed25519(fill: u8) -> Address {
    Address::Ed25519(Ed25519Address::new([fill; 32]))
}

fn utxo(fill: u8, index: u16) -> Input {
    Input::Utxo(UtxoInput::new(TransactionId::new([fill; 32]), index))
}

fn basic(amount: u64, owner: Address) -> Output {
    Output::Basic(BasicOutput::new(amount, vec![], vec![UnlockCondition::Address(owner)], vec![]))
}

fn free() -> ProtocolParameters {
    ProtocolParameters::default().without_rent()
}

fn assemble(
    inputs: Vec<Input>,
    outputs: Vec<Output>,
    payload: Option<Payload>,
) -> tangle_protocol::Result<TransactionEssence> {
    TransactionEssence::assemble(inputs, outputs, payload, &ProtocolParameters::default())
}

// ---------------------------------------------------------------------------
// Full lifecycle
// ---------------------------------------------------------------------------

#[test]
fn test_assemble_sign_ship_and_verify() {
    let alice = AddressKeys::generate_ed25519();
    let bob = AddressKeys::generate_ed25519();

    let essence = TransactionEssenceBuilder::new()
        .add_utxo(TransactionId::new([1; 32]), 0)
        .add_utxo(TransactionId::new([2; 32]), 3)
        .add_output(basic(5_000_000, bob.address))
        .add_output(NftOutput::new(1_000_000, alice.address, b"ipfs://artwork".to_vec()))
        .with_tagged_data(b"invoice".to_vec(), b"#42".to_vec())
        .build()
        .unwrap();

    let signatures = essence.sign(&[alice.clone(), bob.clone()]).unwrap();
    assert_eq!(signatures.len(), 2);

    // Receiver side: decode, validate, re-derive the message, verify.
    let bytes = essence.encode(ValidationMode::Perform).unwrap();
    let received = TransactionEssence::decode_exact(&bytes, ValidationMode::Perform).unwrap();
    assert_eq!(received, essence);
    received.syntactic_validate(&ProtocolParameters::default()).unwrap();

    let message = received.signing_message().unwrap();
    assert_eq!(message, essence.signing_message().unwrap());
    assert!(signatures[0].verify(&message, &alice.address).is_ok());
    assert!(signatures[1].verify(&message, &bob.address).is_ok());

    // Same essence over JSON.
    let json = essence.to_json_string().unwrap();
    let from_json = TransactionEssence::from_json_str(&json).unwrap();
    assert_eq!(from_json, essence);
    assert_eq!(from_json.signing_message().unwrap(), message);
}

#[test]
fn test_essence_from_handwritten_json() {
    let json = r#"{
      "type": 0,
      "inputs": [
        {
          "type": 0,
          "transactionId": "0x0101010101010101010101010101010101010101010101010101010101010101",
          "transactionOutputIndex": 1
        }
      ],
      "outputs": [
        {
          "type": 3,
          "amount": 1000000,
          "nativeTokens": [],
          "unlockConditions": [
            {
              "type": 0,
              "address": {
                "type": 0,
                "pubKeyHash": "0x0202020202020202020202020202020202020202020202020202020202020202"
              }
            }
          ],
          "featureBlocks": []
        }
      ],
      "payload": { "type": 5, "tag": "0x6869", "data": "0x" }
    }"#;

    let essence = TransactionEssence::from_json_str(json).unwrap();
    essence.syntactic_validate(&ProtocolParameters::default()).unwrap();
    assert_eq!(essence.inputs(), &[utxo(1, 1)]);
    assert_eq!(essence.outputs(), &[basic(1_000_000, ed25519(2))]);
    match essence.payload() {
        Some(Payload::TaggedData(tagged)) => {
            assert_eq!(tagged.tag, b"hi");
            assert!(tagged.data.is_empty());
        }
        other => panic!("expected tagged data, got {:?}", other),
    }
}

#[test]
fn test_unknown_type_code_in_json() {
    let json = r#"{ "type": 0, "inputs": [ { "type": 9 } ], "outputs": [], "payload": null }"#;
    match TransactionEssence::from_json_str(json) {
        Err(Error::UnknownTypeCode { code: 9, .. }) => {}
        other => panic!("expected UnknownTypeCode, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Counts and uniqueness
// ---------------------------------------------------------------------------

#[test]
fn test_input_count_bounds() {
    let inputs = |n: usize| (0..n).map(|i| utxo(i as u8, (i / 256) as u16)).collect::<Vec<_>>();
    let out = || vec![basic(1_000_000, ed25519(1))];

    match assemble(inputs(0), out(), None) {
        Err(Error::CountOutOfBounds { count: 0, min: 1, max: 127, .. }) => {}
        other => panic!("expected CountOutOfBounds, got {:?}", other),
    }
    assert!(assemble(inputs(1), out(), None).is_ok());
    assert!(assemble(inputs(127), out(), None).is_ok());
    match assemble(inputs(128), out(), None) {
        Err(Error::CountOutOfBounds { count: 128, .. }) => {}
        other => panic!("expected CountOutOfBounds, got {:?}", other),
    }
}

#[test]
fn test_output_count_bounds() {
    let outputs = |n: usize| (0..n).map(|_| basic(1_000_000, ed25519(1))).collect::<Vec<_>>();

    assert!(matches!(
        assemble(vec![utxo(1, 0)], outputs(0), None),
        Err(Error::CountOutOfBounds { count: 0, .. })
    ));
    assert!(assemble(vec![utxo(1, 0)], outputs(127), None).is_ok());
    assert!(matches!(
        assemble(vec![utxo(1, 0)], outputs(128), None),
        Err(Error::CountOutOfBounds { count: 128, .. })
    ));
}

#[test]
fn test_duplicate_utxo_rejected() {
    let result = assemble(
        vec![utxo(1, 0), utxo(2, 0), utxo(1, 0)],
        vec![basic(1_000_000, ed25519(1))],
        None,
    );
    match result {
        Err(Error::DuplicateReference { position: 2, .. }) => {}
        other => panic!("expected DuplicateReference, got {:?}", other),
    }

    // Same transaction, different index: two distinct UTXOs.
    let outputs = vec![basic(1_000_000, ed25519(1))];
    assert!(assemble(vec![utxo(1, 0), utxo(1, 1)], outputs, None).is_ok());
}

#[test]
fn test_treasury_items_rejected_in_essence() {
    assert!(matches!(
        assemble(
            vec![Input::Treasury(TreasuryInput::new([0; 32]))],
            vec![basic(1_000_000, ed25519(1))],
            None
        ),
        Err(Error::TypeMismatch { .. })
    ));
    assert!(matches!(
        assemble(vec![utxo(1, 0)], vec![Output::Treasury(TreasuryOutput::new(1_000_000))], None),
        Err(Error::TypeMismatch { .. })
    ));
}

#[test]
fn test_only_tagged_data_payload_allowed() {
    let treasury = Payload::TreasuryTransaction(TreasuryTransaction::new(
        TreasuryInput::new([0; 32]),
        TreasuryOutput::new(10),
    ));
    match assemble(vec![utxo(1, 0)], vec![basic(1_000_000, ed25519(1))], Some(treasury)) {
        Err(Error::TypeMismatch { actual: 4, .. }) => {}
        other => panic!("expected TypeMismatch, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Supply and deposits
// ---------------------------------------------------------------------------

#[test]
fn test_total_supply_boundary() {
    let params = free();
    let supply = params.token_supply;

    let exact = TransactionEssence::assemble(
        vec![utxo(1, 0)],
        vec![basic(supply - 1, ed25519(1)), basic(1, ed25519(2))],
        None,
        &params,
    );
    assert!(exact.is_ok());

    let over = TransactionEssence::assemble(
        vec![utxo(1, 0)],
        vec![basic(supply, ed25519(1)), basic(1, ed25519(2))],
        None,
        &params,
    );
    match over {
        Err(Error::SupplyOrDepositInvariantViolated(
            DepositViolation::SumExceedsTotalSupply { .. },
        )) => {}
        other => panic!("expected SumExceedsTotalSupply, got {:?}", other),
    }

    let single = TransactionEssence::assemble(
        vec![utxo(1, 0)],
        vec![basic(supply + 1, ed25519(1))],
        None,
        &params,
    );
    assert!(matches!(
        single,
        Err(Error::SupplyOrDepositInvariantViolated(DepositViolation::ExceedsTotalSupply { .. }))
    ));
}

#[test]
fn test_output_below_rent_rejected() {
    match assemble(vec![utxo(1, 0)], vec![basic(214_499, ed25519(1))], None) {
        Err(Error::SupplyOrDepositInvariantViolated(DepositViolation::BelowRent {
            required: 214_500,
            ..
        })) => {}
        other => panic!("expected BelowRent, got {:?}", other),
    }
}

#[test]
fn test_parameters_from_json_drive_validation() {
    let params =
        ProtocolParameters::from_json_str(r#"{ "networkName": "private", "tokenSupply": 1000 }"#)
            .unwrap();
    assert_eq!(params.network_name, "private");
    assert_eq!(params.bech32_hrp, "tgl");

    let result = TransactionEssence::assemble(
        vec![utxo(1, 0)],
        vec![basic(1001, ed25519(1))],
        None,
        &params,
    );
    assert!(matches!(
        result,
        Err(Error::SupplyOrDepositInvariantViolated(
            DepositViolation::ExceedsTotalSupply { amount: 1001, .. }
        ))
    ));

    assert!(matches!(
        ProtocolParameters::from_json_str(r#"{ "tokenSupply": 0 }"#),
        Err(ConfigError::ZeroTokenSupply)
    ));
}

// ---------------------------------------------------------------------------
// Output legality
// ---------------------------------------------------------------------------

#[test]
fn test_cyclic_nft_rejected() {
    let id = NftId::new([5; 20]);
    let nft = NftOutput {
        nft_id: id,
        ..NftOutput::new(1_000_000, id.to_address(), vec![])
    };
    match TransactionEssence::assemble(vec![utxo(1, 0)], vec![Output::Nft(nft)], None, &free()) {
        Err(Error::CyclicAddress { kind: "nft", output: 0 }) => {}
        other => panic!("expected CyclicAddress, got {:?}", other),
    }
}

#[test]
fn test_foundry_supply_rules() {
    let alias = AliasId::new([6; 20]);
    let mut foundry = FoundryOutput::new(1_000_000, alias, 1, [0; 12], U256::from(1000u64));
    let accepted =
        TransactionEssence::assemble(vec![utxo(1, 0)], vec![foundry.clone().into()], None, &free());
    assert!(accepted.is_ok());

    foundry.circulating_supply = U256::from(1001u64);
    assert!(matches!(
        TransactionEssence::assemble(vec![utxo(1, 0)], vec![foundry.clone().into()], None, &free()),
        Err(Error::SupplyOrDepositInvariantViolated(
            DepositViolation::CirculatingExceedsMaximum { .. }
        ))
    ));

    foundry.circulating_supply = U256::zero();
    foundry.maximum_supply = U256::zero();
    assert!(matches!(
        TransactionEssence::assemble(vec![utxo(1, 0)], vec![foundry.into()], None, &free()),
        Err(Error::SupplyOrDepositInvariantViolated(DepositViolation::ZeroMaximumSupply { .. }))
    ));
}

#[test]
fn test_feature_block_ordering() {
    let with_blocks = |blocks: Vec<FeatureBlock>| {
        Output::Basic(BasicOutput::new(
            1_000_000,
            vec![],
            vec![UnlockCondition::Address(ed25519(1))],
            blocks,
        ))
    };

    let ordered =
        with_blocks(vec![FeatureBlock::Sender(ed25519(2)), FeatureBlock::Tag(b"t".to_vec())]);
    assert!(assemble(vec![utxo(1, 0)], vec![ordered], None).is_ok());

    let reversed =
        with_blocks(vec![FeatureBlock::Tag(b"t".to_vec()), FeatureBlock::Sender(ed25519(2))]);
    assert!(matches!(
        assemble(vec![utxo(1, 0)], vec![reversed], None),
        Err(Error::OrderViolation { position: 1, .. })
    ));

    let doubled =
        with_blocks(vec![FeatureBlock::Sender(ed25519(2)), FeatureBlock::Sender(ed25519(3))]);
    assert!(matches!(
        assemble(vec![utxo(1, 0)], vec![doubled], None),
        Err(Error::DuplicateReference { position: 1, .. })
    ));
}

#[test]
fn test_native_tokens_per_output_limit() {
    let tokens = |n: u8| {
        (0..n)
            .map(|i| NativeToken::new(TokenId::new([i; 38]), U256::one()))
            .collect::<Vec<_>>()
    };
    let output = |n: u8| {
        Output::Basic(BasicOutput::new(
            1_000_000,
            tokens(n),
            vec![UnlockCondition::Address(ed25519(1))],
            vec![],
        ))
    };

    let at_limit = TransactionEssence::assemble(vec![utxo(1, 0)], vec![output(64)], None, &free());
    assert!(at_limit.is_ok());
    assert!(matches!(
        TransactionEssence::assemble(vec![utxo(1, 0)], vec![output(65)], None, &free()),
        Err(Error::CountOutOfBounds { count: 65, max: 64, .. })
    ));
}

// ---------------------------------------------------------------------------
// Signing
// ---------------------------------------------------------------------------

#[test]
fn test_signing_message_is_deterministic_and_sensitive() {
    struct Parts {
        tx_id: [u8; 32],
        index: u16,
        amount: u64,
        tag: Vec<u8>,
        data: Vec<u8>,
    }

    let base = || Parts {
        tx_id: [1; 32],
        index: 0,
        amount: 1_000_000,
        tag: b"tag".to_vec(),
        data: b"data".to_vec(),
    };
    let message = |p: Parts| {
        TransactionEssenceBuilder::new()
            .add_utxo(TransactionId::new(p.tx_id), p.index)
            .add_output(basic(p.amount, ed25519(1)))
            .with_tagged_data(p.tag, p.data)
            .build()
            .unwrap()
            .signing_message()
            .unwrap()
    };

    let reference = message(base());
    assert_eq!(reference, message(base()));

    let mut tx_id = [1u8; 32];
    tx_id[31] ^= 0x01;
    let variants = [
        Parts { tx_id, ..base() },
        Parts { index: 1, ..base() },
        Parts { amount: 1_000_001, ..base() },
        Parts { tag: b"taf".to_vec(), ..base() },
        Parts { data: b"dat`".to_vec(), ..base() },
    ];
    for (i, parts) in variants.into_iter().enumerate() {
        assert_ne!(message(parts), reference, "variant {} left the digest unchanged", i);
    }
}

#[test]
fn test_tampered_signature_fails_verification() {
    let owner = AddressKeys::generate_ed25519();
    let essence = assemble(vec![utxo(1, 0)], vec![basic(1_000_000, owner.address)], None).unwrap();
    let message = essence.signing_message().unwrap();

    let signature = essence.sign(&[owner.clone()]).unwrap().remove(0);
    let mut bytes = signature.encode(ValidationMode::Perform).unwrap();
    // Last byte belongs to the signature, not the public key.
    let last = bytes.len() - 1;
    bytes[last] ^= 0x01;
    let tampered =
        tangle_protocol::Signature::decode_exact(&bytes, ValidationMode::Perform).unwrap();

    assert!(signature.verify(&message, &owner.address).is_ok());
    assert_eq!(
        tampered.verify(&message, &owner.address),
        Err(SignerError::InvalidSignature)
    );
}

#[test]
fn test_signing_fails_for_unknown_and_wots_addresses() {
    let owner = AddressKeys::generate_ed25519();
    let stranger = AddressKeys::generate_ed25519();
    let essence = assemble(vec![utxo(1, 0)], vec![basic(1_000_000, owner.address)], None).unwrap();

    let signer = tangle_protocol::InMemoryAddressSigner::new([owner.clone()]);
    match essence.sign_with(&signer, &[owner.address, stranger.address]) {
        Err(Error::Signer(SignerError::MissingSigningKeys)) => {}
        other => panic!("expected MissingSigningKeys, got {:?}", other),
    }

    // WOTS addresses decode fine but can never be signed for.
    let mut wots_bytes = vec![1u8];
    wots_bytes.extend_from_slice(&[7u8; 49]);
    let wots = Address::decode_exact(&wots_bytes, ValidationMode::Perform).unwrap();
    assert_eq!(wots, Address::Wots(WotsAddress::new([7; 49])));
    match essence.sign_with(&signer, &[wots]) {
        Err(Error::Signer(SignerError::UnsupportedSignatureScheme)) => {}
        other => panic!("expected UnsupportedSignatureScheme, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[test]
fn test_bech32_addresses() {
    let owner = AddressKeys::generate_ed25519();
    let text = owner.address.to_bech32("tgl").unwrap();
    assert!(text.starts_with("tgl1"));

    let (hrp, parsed) = Address::from_bech32(&text).unwrap();
    assert_eq!(hrp, "tgl");
    assert_eq!(parsed, owner.address);

    let alias = AliasId::new([9; 20]).to_address();
    let (_, parsed) = Address::from_bech32(&alias.to_bech32("tgl").unwrap()).unwrap();
    assert_eq!(parsed, alias);

    assert!(matches!(Address::from_bech32("tgl1notanaddress"), Err(Error::InvalidBech32(_))));
}
