#![no_main]

use libfuzzer_sys::fuzz_target;
use loginsight::FileIndex;
use loginsight::file::reader::load_lines;

fuzz_target!(|data: &[u8]| {
    // Indexing and reading arbitrary bytes must never panic, and the
    // line spans must cover the input exactly
    let index = FileIndex::scan(data);

    let bytes: u64 = index.lines().iter().map(|l| l.byte_length).sum();
    let delimiters = index.line_count().saturating_sub(1) as u64;
    assert_eq!(bytes + delimiters, data.len() as u64);

    let count = index.line_count() as i64;
    if count > 0 {
        let lines = load_lines(data, &index, 0, count).unwrap();
        assert_eq!(lines.len(), index.line_count());
        for (line, descriptor) in lines.iter().zip(index.lines()) {
            assert_eq!(line.chars().count() as u64, descriptor.char_length);
        }
    }
    assert!(load_lines(data, &index, 0, count + 1).unwrap_err().is_out_of_range());
});
