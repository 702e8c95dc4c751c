//! Minimal example: allocate bucket identifiers and run range queries.

use opaque_buckets::BucketIndex;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let index = BucketIndex::new(100)?;

    for value in [-5, 50, 150, 250, 1_000] {
        let identifier = index.get_or_create(value)?;
        let range = index.bucket_range(value)?;
        println!(
            "value {:>5} -> bucket [{}, {}] id {}",
            value, range.min, range.max, identifier
        );
    }

    println!("greater than 50: {:?}", index.greater_than(50));
    println!("less than 150: {:?}", index.less_than(150));
    println!("between -5 and 200: {:?}", index.between(-5, 200));
    Ok(())
}
