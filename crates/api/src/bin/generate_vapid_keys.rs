//! Print a fresh VAPID keypair in both accepted configuration shapes.

use pushwave_core::vapid::VapidKeyPair;

fn main() {
    let keys = VapidKeyPair::generate();

    println!("# Either set the pair explicitly:");
    println!("VAPID_PUBLIC_KEY={}", keys.public_key);
    println!("VAPID_PRIVATE_KEY={}", keys.private_key);
    println!();
    println!("# or as a single bundled value:");
    println!("VAPID_KEYS={}", keys.bundled());
}
