mod listing_parser_tests;
mod text_tests;
