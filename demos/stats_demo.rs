use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;

use clap::Parser;
use robin_hood_map::HashTable;
use robin_hood_map::LoadFactor;

#[derive(Parser, Debug)]
struct Args {
    /// The table starts with 2^capacity_exp slots.
    #[arg(short = 'c', long = "capacity-exp", default_value_t = 12)]
    capacity_exp: u32,

    /// Maximum load in per mille; defaults to the compiled-in density.
    #[arg(short = 'l', long = "load-permille")]
    load_permille: Option<u16>,

    /// Remove every n-th key after filling, to show backward-shift effects.
    #[arg(short = 'r', long = "remove-every")]
    remove_every: Option<u64>,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() {
    let args = Args::parse();

    let load_factor = match args.load_permille {
        Some(permille) => match LoadFactor::from_permille(permille) {
            Some(load_factor) => load_factor,
            None => {
                eprintln!("load factor must be between 1 and 999 per mille, got {permille}");
                std::process::exit(2);
            }
        },
        None => LoadFactor::default(),
    };

    println!(
        "Creating HashTable with 2^{} slots, {:?}",
        args.capacity_exp, load_factor
    );

    let mut table: HashTable<u64, u64> =
        match HashTable::try_with_load_factor(args.capacity_exp, load_factor) {
            Ok(table) => table,
            Err(err) => {
                eprintln!("could not allocate table: {err}");
                std::process::exit(1);
            }
        };

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 values...");

    let num_values = table.capacity() as u64;
    for value in 0..num_values {
        if let Err(err) = table.set(hash_u64(value), value, value, |a, b| a == b) {
            eprintln!("insertion of {value} failed: {err}");
            std::process::exit(1);
        }
    }

    println!("Inserted {} values into table", table.len());
    println!(
        "Final load factor: {:.2}%",
        (table.len() as f64 / table.num_slots() as f64) * 100.0
    );

    table.probe_histogram().print();
    table.debug_stats().print();

    if let Some(every) = args.remove_every.filter(|&every| every > 0) {
        let mut removed = 0;
        for value in (0..num_values).step_by(every as usize) {
            if table.remove(hash_u64(value), |&k| k == value).is_some() {
                removed += 1;
            }
        }

        println!();
        println!("Removed {removed} values (every {every}th key)");
        table.probe_histogram().print();
        table.debug_stats().print();
    }
}
