use clap::Parser;
use dualbit::{
    ops::{FnOp, Min, Sum},
    DualFenwick,
};
use log::info;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(short, long, value_parser, default_value_t = 1 << 16)]
    len: usize,
    #[clap(short, long, value_parser, default_value_t = 42)]
    seed: u64,
}

fn main() {
    // Log to stdout (run with `RUST_LOG=debug` to see tree events).
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    // Sum over the positions 0..10
    let mut tree = DualFenwick::from_values(0u64..10, Sum);
    assert_eq!(tree.query_range(0, 9), 45);
    tree.update(3, 100);
    assert_eq!(tree.query_range(0, 9), 142);
    assert_eq!(tree.query(3), 100);
    // first prefix end with a sum of at least 50
    assert_eq!(tree.lower_bound(0, 9, 50), 3);
    info!("sum tree {:?}", tree);

    // Min has no inverse so a plain Fenwick tree cannot answer arbitrary ranges
    let mut tree = DualFenwick::from_slice(&[5i32, 3, 8, 1, 9], Min);
    assert_eq!(tree.query_range(0, 4), 1);
    assert_eq!(tree.query_range(1, 2), 3);
    tree.update(3, 0);
    assert_eq!(tree.query_range(0, 4), 0);
    info!("min tree {:?}", tree);

    // Any associative closure works, order is preserved for non-commutative operators
    let concat = FnOp::new((0u64, 1u64), |(a, pa): (u64, u64), (b, pb): (u64, u64)| {
        (a * pb + b, pa * pb)
    });
    let digits = DualFenwick::from_values([4u64, 2, 7, 1].map(|d| (d, 10)), concat);
    assert_eq!(digits.query_range(0, 3).0, 4271);
    info!("digits 1..=2 read {}", digits.query_range(1, 2).0);

    // Random values and a walk against the running minimum
    fastrand::seed(args.seed);
    let values: Vec<u32> = (0..args.len).map(|_| fastrand::u32(..)).collect();
    let tree = DualFenwick::from_slice(&values, Min);
    let threshold = u32::MAX / 1000;
    match tree.find_next(0, |min| min <= threshold) {
        Some(pos) => info!(
            "first position with a value at or below {} is {} of {}",
            threshold,
            pos,
            tree.len()
        ),
        None => info!("no value at or below {} in {} positions", threshold, tree.len()),
    }
    if let Some(pos) = tree.find_prev(tree.len().saturating_sub(1), |min| min <= threshold) {
        info!("last such position is {}", pos);
    }
}
