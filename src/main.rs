// This binary crate is intentionally minimal.
// All engine logic lives in the library (src/lib.rs and its modules).
// Run the demo with:
//   cargo run --example xor
fn main() {
    println!("neurite: a from-scratch graph-based neural network engine in Rust.");
    println!("Run `cargo run --example xor` to see the XOR demo.");
}
