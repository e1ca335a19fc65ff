//! Compact a small block of memory and print it before and after.
//!
//! Demonstrates:
//!   1. Handing out references into a buffer
//!   2. Compacting with `compact()` and reading the `CompactReport`
//!   3. The same workflow through a `Segment`
//!
//! Run with:
//!   cargo run --example before_after

use defrag::prelude::*;

fn dump(label: &str, memory: &[u8]) {
    println!("{label}:");
    for (i, b) in memory.iter().enumerate() {
        println!("  memory[{i}] = {b:#04x}");
    }
}

fn main() -> Result<(), CompactError> {
    // ─── Free function over a plain array ───────────────────────

    let mut memory = [0xAA, 0x00, 0xBB, 0x00, 0x00, 0xCC];
    let mut refs = [ByteRef(0), ByteRef(2), ByteRef(5)];

    dump("Before compaction", &memory);
    let report = compact(&mut memory, &mut refs)?;
    dump("After compaction", &memory);

    let moved: Vec<String> = refs.iter().map(ToString::to_string).collect();
    println!("references now at: {}", moved.join(", "));
    println!(
        "moved {} byte(s), {} already in place, zeroed {}",
        report.bytes_moved, report.bytes_in_place, report.bytes_zeroed
    );

    // ─── Segment: allocate, drop, defragment ────────────────────

    let mut seg = Segment::with_capacity(8)?;
    let handles = seg.alloc_bytes(&[0x10, 0x20, 0x30, 0x40, 0x50])?;
    let mut live = vec![handles[1], handles[4]];

    println!(
        "\nsegment fragmentation before: {:.2}",
        seg.fragmentation(&live)
    );
    seg.defragment(&mut live)?;
    println!(
        "segment fragmentation after:  {:.2}",
        seg.fragmentation(&live)
    );
    dump("Segment after defragment", seg.as_bytes());
    println!("{} of {} bytes free", seg.remaining(), seg.capacity());

    Ok(())
}
