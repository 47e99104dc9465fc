// Tree test module
#[cfg(test)]
mod navigator_tests;
