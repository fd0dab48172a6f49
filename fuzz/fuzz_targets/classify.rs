#![no_main]
use libfuzzer_sys::fuzz_target;
use once_cell::sync::Lazy;
use unmask::triage::{classify, Registry};

static REGISTRY: Lazy<Registry> =
    Lazy::new(|| Registry::builtin().expect("built-in signatures"));

fuzz_target!(|input: (&[u8], &str)| {
    let (data, name) = input;
    let _ = classify(data, name, &REGISTRY);
});
