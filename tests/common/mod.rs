// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use permspace::{Namespace, ParameterSpace, SpaceBuilder, Value};

/// Install a test subscriber once; `RUST_LOG=permspace=trace` shows jumps.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn int(ns: &Namespace, key: &str) -> i64 {
    ns[key].as_i64().unwrap_or_else(|| panic!("{} is not an integer in {}", key, ns))
}

pub fn text(ns: &Namespace, key: &str) -> String {
    ns[key].to_string()
}

/// Numbered exam questions: 3 questions, 3 parts each, 3 subparts each,
/// with names computed through a chain of dependents.
pub fn question_builder() -> SpaceBuilder {
    ParameterSpace::builder(["arabic", "letter_lower", "roman_lower"])
        .independent("arabic", 1..4)
        .independent("letter_lower", ['a', 'b', 'c'])
        .independent("roman_lower", ["i", "ii", "iii"])
        .dependent("subpart_name", ["part_name", "roman_lower"], |args| {
            format!("{}.{}", args["part_name"], args["roman_lower"])
        })
        .dependent("part_name", ["question_name", "letter_lower"], |args| {
            format!("{}.{}", args["question_name"], args["letter_lower"])
        })
        .dependent("question_name", ["arabic"], |args| args["arabic"].to_string())
        .constant("constant", "constant")
}

pub fn question_space() -> ParameterSpace {
    question_builder().build().unwrap()
}

/// Experiment grid with three interacting filters; 70 runs survive.
pub fn record_store_space() -> ParameterSpace {
    ParameterSpace::builder([
        "random_seed",
        "agent_type",
        "num_transfers",
        "num_albums",
        "max_internal_actions",
    ])
    .independent(
        "random_seed",
        [
            0.35746869278354254,
            0.7368915891545381,
            0.03439267552305503,
            0.21913569678035283,
            0.0664623502695384,
        ],
    )
    .constant("num_episodes", 150000)
    .constant("eval_frequency", 100)
    .independent("agent_type", ["naive", "kb"])
    .independent("num_albums", [100, 500, 1000, 5000])
    .independent("max_internal_actions", 1..6)
    .constant("data_file", "data/album_decade")
    .independent("num_transfers", 1..6)
    .constant("min_return", -100)
    .constant("save_weights", false)
    .filter(["num_transfers"], |args| args["num_transfers"] == Value::from(1))
    .filter(["num_albums", "max_internal_actions"], |args| {
        args["num_albums"] == Value::from(5000) || args["max_internal_actions"] == Value::from(1)
    })
    .filter(["num_albums", "max_internal_actions"], |args| {
        !(args["num_albums"] == Value::from(5000) && args["max_internal_actions"] == Value::from(1))
    })
    .build()
    .unwrap()
}
