#[cfg(test)]
mod persistence_tests;
