use anyhow::{anyhow, Context, Result};
// Common library imports
use ring_signature::{
    constants::{DEFAULT_BIT_LENGTH, DEFAULT_KEY_BITS},
    models::CliSignaturePayload,
    ring::{ring_sign, ring_verify},
    rsa::{generate_keypair, public_ring, KeyPair},
};
// Logging
use log::{error, info};
// CLI interaction
use dialoguer::Input;

fn main() -> Result<()> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --- Ring Parameters ---
    let ring_size: usize = Input::<usize>::new()
        .with_prompt("Number of ring members")
        .default(4)
        .validate_with(|n: &usize| -> Result<(), &str> {
            if *n > 0 {
                Ok(())
            } else {
                Err("Ring must have at least one member")
            }
        })
        .interact_text()?;
    let signer_index: usize = Input::<usize>::new()
        .with_prompt("Signer index")
        .default(ring_size.min(2) - 1)
        .validate_with(|i: &usize| -> Result<(), &str> {
            if *i < ring_size {
                Ok(())
            } else {
                Err("Signer index must be smaller than the ring size")
            }
        })
        .interact_text()?;
    let key_bits: usize = Input::<usize>::new()
        .with_prompt("RSA key size in bits")
        .default(DEFAULT_KEY_BITS)
        .interact_text()?;
    let bit_length: usize = Input::<usize>::new()
        .with_prompt("Ring bit length L")
        .default(DEFAULT_BIT_LENGTH.min(key_bits))
        .interact_text()?;
    let message_str: String = Input::<String>::new()
        .with_prompt("Enter the message to sign")
        .default("Hello test".to_string())
        .interact_text()?;
    let message = message_str.as_bytes();

    // --- Generate Keys ---
    let mut rng = rand::thread_rng();
    info!("Generating {} keypairs of {} bits...", ring_size, key_bits);
    let keypairs = (0..ring_size)
        .map(|_| generate_keypair(key_bits, &mut rng))
        .collect::<Result<Vec<KeyPair>>>()
        .context("Failed to generate ring keypairs")?;
    let ring_pubs = public_ring(&keypairs);
    info!("Ring constructed with {} members.", ring_pubs.len());

    // --- Generate Ring Signature ---
    info!("Generating ring signature as member {}...", signer_index);
    let ring_sig = ring_sign(
        &ring_pubs,
        signer_index,
        &keypairs[signer_index].secret,
        message,
        bit_length,
        &mut rng,
    )
    .context("Failed to generate ring signature")?;

    // --- Self-Verification ---
    if !ring_verify(&ring_pubs, &ring_sig, message).context("Failed during self-verification")? {
        error!("Self-verification FAILED! The generated signature is invalid.");
        return Err(anyhow!("Generated signature failed self-verification"));
    }
    info!("Self-verification successful.");

    // --- Output JSON ---
    let payload = CliSignaturePayload::new(&ring_sig, &ring_pubs, &message_str);
    let json_output = serde_json::to_string_pretty(&payload)
        .context("Failed to serialize signature to JSON")?;
    println!("\n--- Generated Signature (JSON) ---");
    println!("{}", json_output);
    println!("--- End of Signature ---");
    println!("Length of signature items: {}", ring_sig.to_values().len());

    // --- Sign as every member ---
    // The verifier uses the same routine regardless of who signed.
    for (index, keypair) in keypairs.iter().enumerate() {
        let sig = ring_sign(
            &ring_pubs,
            index,
            &keypair.secret,
            message,
            bit_length,
            &mut rng,
        )?;
        let verified = ring_verify(&ring_pubs, &sig, message)?;
        println!("Signer {}: signature verified: {}", index, verified);
    }

    Ok(())
}
