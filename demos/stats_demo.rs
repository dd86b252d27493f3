use std::collections::hash_map::DefaultHasher;
use std::hash::Hash;
use std::hash::Hasher;
use std::process::ExitCode;

use clap::Parser;
use probe_hash::HashTable;
use probe_hash::hash_table::Entry;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    /// Percentage of the inserted values to remove again, leaving tombstones.
    #[arg(short = 'r', long = "remove_percent", default_value_t = 0)]
    remove_percent: u8,
}

fn hash_u64(value: u64) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

fn main() -> ExitCode {
    let args = Args::parse();

    println!(
        "Creating HashTable with target capacity: {}",
        args.target_capacity
    );

    let mut table: HashTable<u64> = match HashTable::with_capacity(args.target_capacity) {
        Ok(table) => table,
        Err(err) => {
            eprintln!("Failed to create table: {err}");
            return ExitCode::FAILURE;
        }
    };

    println!(
        "Actual capacity: {} ({} slots)",
        table.capacity(),
        table.slot_count()
    );
    println!("Filling table with u64 values...");

    let num_values = table.capacity();
    for i in 0..num_values {
        let value = i as u64;
        let hash = hash_u64(value);

        match table.entry(hash, |&v| v == value, |&v| hash_u64(v)) {
            Ok(Entry::Vacant(entry)) => {
                entry.insert(value);
            }
            Ok(Entry::Occupied(_)) => {
                panic!("Value already exists in table: {}", value);
            }
            Err(err) => {
                eprintln!("Insert of {value} failed: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    let to_remove = num_values * usize::from(args.remove_percent.min(100)) / 100;
    for i in 0..to_remove {
        let value = i as u64;
        if !table.remove_if_present(hash_u64(value), |&v| v == value).is_removed() {
            panic!("Value missing from table: {}", value);
        }
    }

    println!(
        "Inserted {} values, removed {}, {} remain",
        num_values,
        to_remove,
        table.len()
    );
    println!(
        "Final load factor: {:.2}%",
        if table.slot_count() == 0 {
            0.0
        } else {
            (table.len() as f64 / table.slot_count() as f64) * 100.0
        }
    );

    table.probe_histogram(|&v| hash_u64(v)).print();
    table.debug_stats(|&v| hash_u64(v)).print();

    ExitCode::SUCCESS
}
