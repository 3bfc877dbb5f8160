#![no_main]

use libfuzzer_sys::fuzz_target;

use roomrelay::rooms::extract_room_count;

fuzz_target!(|input: (&str, &str)| {
    // Arbitrary messages and categories must never panic, and the count
    // depends on nothing but the inputs.
    let (message, category) = input;
    let first = extract_room_count(message, category);
    assert_eq!(first, extract_room_count(message, category));
});
