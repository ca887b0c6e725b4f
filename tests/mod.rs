mod api_tests;
mod helpers;
