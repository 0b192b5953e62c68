mod common;
mod make_tests;
