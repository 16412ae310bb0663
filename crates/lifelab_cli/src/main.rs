//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `lifelab_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

fn main() {
    println!("lifelab_core ping={}", lifelab_core::ping());
    println!("lifelab_core version={}", lifelab_core::core_version());
}
