#![no_main]

use doccat::corpus::{Delimiter, OffsetTable, verify_bytes};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (Vec<u8>, Vec<u16>)| {
    // Arbitrary corpus and offsets: verification may reject, never panic
    let (corpus, mut starts) = input;
    starts.sort_unstable();
    starts.dedup();
    if starts.first() != Some(&0) {
        starts.insert(0, 0);
    }
    let table = OffsetTable::from_starts(starts.into_iter().map(u64::from))
        .expect("sorted, deduplicated and starting at 0");
    let _ = verify_bytes(&corpus, &table, Delimiter::new('$').unwrap());
});
