//! Integration tests - registry files, compiler config and compilation together

mod registry_file_tests;
