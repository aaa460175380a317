#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Parsed tables must start at 0 and strictly increase
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(table) = doccat::corpus::OffsetTable::parse(text) {
            let starts = table.as_slice();
            assert!(starts.first().is_none_or(|&s| s == 0));
            assert!(starts.windows(2).all(|w| w[0] < w[1]));
            assert_eq!(doccat::corpus::OffsetTable::parse(&table.to_text()).unwrap(), table);
        }
    }
});
