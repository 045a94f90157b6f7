mod favorites_tests;
mod images_tests;
mod listings_tests;
mod pages_tests;
