//! Simple example of converting a Timestream query result to MDF 4.10.

use timestream_mdf::{MdfWriter, TimestreamReader};

fn main() -> Result<(), timestream_mdf::Error> {
    // Read the query result document
    let reader = TimestreamReader::from_file("result.json")?;

    println!("Read {} rows", reader.row_count());

    // Pivot into a timestamp-indexed sample table
    let table = reader.read_all()?;

    println!(
        "Pivoted {} samples across {} channels",
        table.sample_count(),
        table.channel_count()
    );

    // Write to MDF 4.10
    MdfWriter::new("out.mf4").write(&table)?;

    println!("Wrote ./out.mf4");

    Ok(())
}
