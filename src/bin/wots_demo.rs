use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wots_signatures::wots::{decode_transaction_signature, verify_transaction_signature, DEFAULT_PARAMS};
use wots_signatures::{Key, OsSecureRandom, ParamsEncoding};

fn parse_level(arg: Option<String>) -> Option<ParamsEncoding> {
    let Some(arg) = arg else {
        return Some(DEFAULT_PARAMS);
    };
    match arg.to_ascii_lowercase().as_str() {
        "level0" => Some(ParamsEncoding::Level0),
        "level1" => Some(ParamsEncoding::Level1),
        "level2" => Some(ParamsEncoding::Level2),
        "level3" => Some(ParamsEncoding::Level3),
        "consensus" => Some(ParamsEncoding::Consensus),
        _ => None,
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let Some(level) = parse_level(env::args().nth(1)) else {
        error!("unknown level, expected one of level0..level3, consensus");
        return ExitCode::FAILURE;
    };
    let params = level.params();
    println!("Testing WOTS+ {} ({})...", level, params);

    // Test 1: Key generation
    let key = match Key::new(params, &mut OsSecureRandom::new()) {
        Ok(key) => key,
        Err(err) => {
            error!(%err, "key generation failed");
            return ExitCode::FAILURE;
        }
    };
    let pk = key.compute_pk();
    println!("✓ Key generation passed");

    // Test 2: Signing from scratch and after precomputing the ladders
    let message = b"Hello, WOTS+!";
    let slow = key.sign(message);
    key.generate();
    let fast = key.sign(message);
    assert_eq!(slow, fast, "both signing paths must agree");
    assert_eq!(slow.len(), params.signature_size());
    println!("✓ Signature creation passed ({} bytes)", slow.len());

    // Test 3: Verification
    if level == ParamsEncoding::Consensus {
        match decode_transaction_signature(message, &slow) {
            Err(err) => println!("✓ Consensus signature refused for transactions: {}", err),
            Ok(_) => println!("✗ Consensus signature was accepted as a transaction"),
        }
        let decoded = params.decode(message, &slow[1..]).map(|decoded| decoded == pk);
        println!("✓ Consensus decode matches public key: {:?}", decoded);
    } else {
        match verify_transaction_signature(&pk, message, &slow) {
            Ok(true) => println!("✓ Signature verification passed"),
            Ok(false) => println!("✗ Signature verification failed"),
            Err(err) => println!("✗ Signature rejected: {}", err),
        }
    }

    info!(level = %level, "all WOTS+ checks completed");
    println!("\nAll WOTS+ tests completed!");
    ExitCode::SUCCESS
}
