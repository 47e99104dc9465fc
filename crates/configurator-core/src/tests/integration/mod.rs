#![cfg(test)]

pub mod common;
pub mod roundtrip_tests;
pub mod workflow_tests;
